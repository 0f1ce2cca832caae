//! Text extraction: turns uploaded PDF / DOCX / TXT bytes into plain text.
//!
//! Extraction returns `Result` so callers can tell an empty document from an
//! unreadable one. The analysis pipeline still treats any failure as empty
//! text (`unwrap_or_default`), which degrades to a low score rather than an error.

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

pub mod docx;
pub mod pdf;

/// Uploads larger than this are rejected before extraction.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF could not be read: {0}")]
    Pdf(String),

    #[error("DOCX could not be read: {0}")]
    Docx(String),

    #[error("Text file is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Extractor aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    /// Detects the kind from the file extension, falling back to the content type.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Option<Self> {
        let by_extension = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "pdf" => Some(Self::Pdf),
                "docx" => Some(Self::Docx),
                "txt" => Some(Self::Text),
                _ => None,
            });

        by_extension.or_else(|| match content_type? {
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            ct if ct.starts_with("text/plain") => Some(Self::Text),
            _ => None,
        })
    }
}

/// Extracts text from `data` according to `kind`.
///
/// Parsing runs on the blocking pool: it is CPU-bound and the PDF parser can
/// panic on malformed input, which surfaces here as `ExtractionError::Aborted`.
pub async fn extract_text(kind: DocumentKind, data: Bytes) -> Result<String, ExtractionError> {
    match kind {
        // Kept byte-for-byte, like pasted text.
        DocumentKind::Text => Ok(String::from_utf8(data.to_vec())?),
        DocumentKind::Pdf => run_blocking(move || pdf::extract_pdf_text(&data)).await,
        DocumentKind::Docx => run_blocking(move || docx::extract_docx_text(&data)).await,
    }
}

async fn run_blocking<F>(f: F) -> Result<String, ExtractionError>
where
    F: FnOnce() -> Result<String, ExtractionError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ExtractionError::Aborted(e.to_string()))?
}
