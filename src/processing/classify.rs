//! Upload classification by declared filename and content type.
//!
//! Only the declared metadata is consulted; the bytes are never sniffed, so a PNG uploaded as
//! `scan.pdf` takes the PDF path and fails there.

use super::types::SourceType;

const PDF_EXTENSION: &str = ".pdf";
const PDF_MARKER: &str = "pdf";
const IMAGE_PREFIX: &str = "image/";

/// Decide which branch handles an upload, or `None` when the type is unsupported.
///
/// The PDF rule wins over the image rule.
pub fn classify(filename: &str, content_type: &str) -> Option<SourceType> {
    let filename = filename.to_ascii_lowercase();
    let content_type = content_type.to_ascii_lowercase();

    if filename.ends_with(PDF_EXTENSION) || content_type.contains(PDF_MARKER) {
        Some(SourceType::Pdf)
    } else if content_type.starts_with(IMAGE_PREFIX) {
        Some(SourceType::Image)
    } else {
        None
    }
}
