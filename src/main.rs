//! Command-line front end for the tutor.
//!
//! Sends one submission, prints the explanation to stdout and optionally
//! writes the spoken answer to an MP3 file.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use gemini_tutor::{
    AudioClip, Credential, Outcome, Submission, Trigger, Tutor, TutorConfig, Upload,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tutor", version, about = "Ask the homework tutor a question")]
struct Cli {
    /// Exercise to explain (PDF, PNG or JPEG)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// The question, in your own words
    #[arg(short, long, default_value = "")]
    question: String,

    /// A recorded voice clip (WAV); submits on its own when no question is given
    #[arg(long)]
    voice: Option<PathBuf>,

    /// Configuration file, instead of ~/.gemini-tutor/config.json
    #[arg(short, long, env = "TUTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Where to write the spoken answer
    #[arg(short, long)]
    audio_out: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => TutorConfig::load_from(path)?,
        None => TutorConfig::load()?,
    };
    debug!(?config, "configuration loaded");

    let tutor = Tutor::from_config(&config, Credential::from_env())?;
    if !tutor.has_credential() {
        eprintln!("Enter your API key in the GOOGLE_API_KEY environment variable.");
    }

    let upload = match &cli.file {
        Some(path) => Some(read_upload(path).await?),
        None => None,
    };
    let voice = match &cli.voice {
        Some(path) => Some(AudioClip::wav(
            tokio::fs::read(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?,
        )),
        None => None,
    };
    let trigger = if voice.is_some() && cli.question.is_empty() {
        Trigger::AudioCaptured
    } else {
        Trigger::Submit
    };

    let outcome = tutor
        .submit(Submission {
            upload,
            question: cli.question,
            voice,
            trigger,
        })
        .await;

    match outcome {
        Outcome::Delivered(delivery) => {
            println!("{}", delivery.text);
            if let Some(warning) = &delivery.warning {
                eprintln!("warning: {warning}");
            }
            if let (Some(path), Some(audio)) = (&cli.audio_out, &delivery.audio) {
                tokio::fs::write(path, &audio.bytes)
                    .await
                    .with_context(|| format!("writing {}", path.display()))?;
                eprintln!("Audio written to {}", path.display());
            }
            Ok(())
        }
        Outcome::Reported(report) if report.error.is_user_error() => {
            eprintln!("{}", report.error);
            std::process::exit(2);
        }
        Outcome::Reported(report) => Err(report.error.into()),
        Outcome::Ignored => bail!("nothing was submitted"),
    }
}

/// Reads an upload, taking its media type from the file extension.
async fn read_upload(path: &Path) -> Result<Upload> {
    let media_type = mime_guess::from_path(path).first_or_octet_stream();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(Upload::new(media_type.essence_str(), bytes))
}
