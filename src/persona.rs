//! The tutor persona and the fixed fallback prompt.
//!
//! The persona is sent as the system instruction of every request. It is an
//! immutable value built once from configuration; no caller input is ever
//! spliced into it.

/// Fallback prompt used when a voice clip was recorded but no question typed.
///
/// The clip itself is not transcribed, so the tutor is asked for a general
/// explanation of whatever was uploaded.
pub const FALLBACK_PROMPT: &str =
    "Please explain what is in the attached file or help me with my homework.";

/// Language the tutor answers in unless configured otherwise.
pub const DEFAULT_LANGUAGE: &str = "ro";

/// The fixed behavioural instruction prepended to every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaDirective {
    text: String,
}

impl PersonaDirective {
    /// Builds the tutor persona answering in the given language code.
    pub fn for_language(language: &str) -> Self {
        let text = format!(
            "You are a friendly and patient virtual teacher for school students.\n\
             Your job is to help the student understand their homework, NOT to hand them the answer.\n\
             1. Explain the concepts step by step.\n\
             2. If the student sends a picture of an exercise, work through it explaining every step, \
             but encourage the student to try it on their own.\n\
             3. Use simple language suited to students.\n\
             4. Always answer in {}.",
            language_name(language)
        );
        Self { text }
    }

    /// The directive text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Default for PersonaDirective {
    fn default() -> Self {
        Self::for_language(DEFAULT_LANGUAGE)
    }
}

/// English name of a language code, for use inside the directive.
fn language_name(code: &str) -> &str {
    match code {
        "ro" => "Romanian",
        "en" => "English",
        "fr" => "French",
        "de" => "German",
        "es" => "Spanish",
        "it" => "Italian",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_persona_answers_in_romanian() {
        let p = PersonaDirective::default();
        assert!(p.as_str().ends_with("Always answer in Romanian."));
        assert!(p.as_str().contains("NOT to hand them the answer"));
    }

    #[test]
    fn unknown_language_code_is_used_verbatim() {
        let p = PersonaDirective::for_language("pt-BR");
        assert!(p.as_str().ends_with("Always answer in pt-BR."));
    }

    #[test]
    fn fallback_prompt_is_not_blank() {
        assert!(!FALLBACK_PROMPT.trim().is_empty());
    }
}
