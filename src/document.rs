//! Text extraction from uploaded PDF documents.

use tracing::debug;

use crate::error::TutorError;

/// Extracts the text of a PDF held in memory.
///
/// Pages are concatenated in physical order with no separator. Pages without
/// text contribute an empty string. Extraction runs on the blocking pool
/// because it is CPU-bound, and a panicking extractor is reported like any
/// other unreadable document.
///
/// # Errors
///
/// Returns [`TutorError::DocumentRead`] if the bytes are not a readable PDF.
pub async fn extract_text(bytes: Vec<u8>) -> Result<String, TutorError> {
    let len = bytes.len();
    let pages = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    })
    .await
    .map_err(|e| TutorError::DocumentRead {
        detail: format!("extractor aborted: {e}"),
    })?
    .map_err(|e| TutorError::DocumentRead {
        detail: e.to_string(),
    })?;

    debug!(bytes = len, pages = pages.len(), "extracted document text");
    Ok(concat_pages(pages))
}

fn concat_pages(pages: Vec<String>) -> String {
    pages.concat()
}
