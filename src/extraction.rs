//! PDF text extraction.
//!
//! Parsing is delegated entirely to `lopdf`. Pages are visited in document order, each page's
//! text is extracted independently, and the results are joined with a blank line between
//! pages. No layout reconstruction or OCR is attempted: scanned documents simply produce no
//! text, which the caller reports separately.

use lopdf::Document;
use thiserror::Error;

const PAGE_SEPARATOR: &str = "\n\n";

/// Errors raised while reading a PDF document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The byte stream could not be parsed as a PDF.
    #[error("failed to parse PDF: {0}")]
    Parse(#[source] lopdf::Error),
    /// The document is encrypted and its content streams cannot be read.
    #[error("PDF is encrypted")]
    Encrypted,
    /// Text extraction failed for a specific page.
    #[error("failed to extract text from page {page}: {source}")]
    Page {
        /// One-based page number as reported by the document.
        page: u32,
        /// Underlying parser error.
        #[source]
        source: lopdf::Error,
    },
}

/// Extract the plain text of every page in `bytes`.
///
/// Pages that carry no text contribute an empty string, so a document with blank pages still
/// yields separators in between. The joined text is trimmed; an empty return value means the
/// document parsed but contained nothing readable.
///
/// Encrypted documents are opened with the empty user password, which covers the common case of
/// owner-only protection. Anything that needs a real password is rejected.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut document = Document::load_mem(bytes).map_err(ExtractionError::Parse)?;
    if document.is_encrypted() {
        document
            .decrypt("")
            .map_err(|_| ExtractionError::Encrypted)?;
        tracing::debug!("Opened encrypted PDF with empty user password");
    }

    let pages = document.get_pages();
    let mut texts = Vec::with_capacity(pages.len());
    for page in pages.into_keys() {
        let text = document
            .extract_text(&[page])
            .map_err(|source| ExtractionError::Page { page, source })?;
        // lopdf terminates every text object with a newline; only the separator may add blank lines.
        texts.push(text.trim_end_matches(['\r', '\n']).to_string());
    }

    tracing::debug!(pages = texts.len(), "Extracted PDF text");
    Ok(texts.join(PAGE_SEPARATOR).trim().to_string())
}
