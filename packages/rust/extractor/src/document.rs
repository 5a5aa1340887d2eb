//! Text extraction from source documents.
//!
//! Reports arrive as local files; the format is detected by extension.
//! PDFs go through `pdf-extract`, plain text is read directly. A PDF with
//! no extractable text yields an empty string, not an error.

use std::path::Path;

use esgtracker_shared::{EsgTrackerError, Result};

/// Supported document formats, detected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// .pdf
    Pdf,
    /// .txt, .text — read as UTF-8 with lossy fallback
    PlainText,
    /// Everything else
    Unsupported,
}

/// Detect the document format from the file extension.
pub fn detect_format(path: &Path) -> DocumentFormat {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "pdf" => DocumentFormat::Pdf,
        "txt" | "text" => DocumentFormat::PlainText,
        _ => DocumentFormat::Unsupported,
    }
}

/// Extract the plain text of a document.
pub fn extract_text(path: &Path) -> Result<String> {
    match detect_format(path) {
        DocumentFormat::Pdf => extract_pdf(path),
        DocumentFormat::PlainText => extract_plaintext(path),
        DocumentFormat::Unsupported => {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown");
            Err(EsgTrackerError::extract(format!(
                "unsupported format: .{ext}"
            )))
        }
    }
}

fn extract_pdf(path: &Path) -> Result<String> {
    // pdf-extract can panic on malformed PDFs — wrap in catch_unwind
    let path_buf = path.to_path_buf();
    let result = std::panic::catch_unwind(move || pdf_extract::extract_text(&path_buf));

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(EsgTrackerError::extract(format!("PDF: {e}"))),
        Err(_) => Err(EsgTrackerError::extract(
            "PDF extraction panicked (malformed file)",
        )),
    }
}

fn extract_plaintext(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| EsgTrackerError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
