pub mod normalize;
pub mod pdf;
pub mod word;

use serde::Serialize;

use crate::errors::{AppError, AppResult};

pub use normalize::{normalize_whitespace, prepare_content, truncate_content, PreparedContent};
pub use pdf::{
    extract_pdf_metadata, extract_pdf_page_range, extract_pdf_text, PageTextItem, PdfMetadata,
    PdfMetadataResult,
};
pub use word::{extract_plain_text, extract_word_text};

pub const MIME_PLAIN_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_DOC: &str = "application/msword";

pub const ALLOWED_MIME_TYPES: [&str; 4] = [MIME_PLAIN_TEXT, MIME_PDF, MIME_DOCX, MIME_DOC];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Word,
}

impl DocumentKind {
    /// Maps a declared MIME type to the extractor that handles it. Parameters
    /// such as `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> AppResult<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            MIME_PLAIN_TEXT => Ok(DocumentKind::PlainText),
            MIME_PDF => Ok(DocumentKind::Pdf),
            MIME_DOCX | MIME_DOC => Ok(DocumentKind::Word),
            _ => Err(AppError::UploadError(format!(
                "Unsupported file type '{}'. Allowed types: {}",
                mime,
                ALLOWED_MIME_TYPES.join(", ")
            ))),
        }
    }
}

/// Inclusive page window for PDF uploads. `None` means the whole document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageRange {
    pub start_page: Option<i64>,
    pub end_page: Option<i64>,
}

impl PageRange {
    pub fn is_set(&self) -> bool {
        self.start_page.is_some() || self.end_page.is_some()
    }
}

/// Extracts the text of a document of the given kind. Page ranges only apply
/// to PDFs.
pub fn extract_document_text(
    kind: DocumentKind,
    bytes: &[u8],
    range: PageRange,
) -> AppResult<String> {
    match kind {
        DocumentKind::PlainText => Ok(extract_plain_text(bytes)),
        DocumentKind::Word => extract_word_text(bytes),
        DocumentKind::Pdf if range.is_set() => {
            extract_pdf_page_range(bytes, range.start_page.unwrap_or(1), range.end_page)
        }
        DocumentKind::Pdf => extract_pdf_text(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{build_pdf, line, PdfPage};

    #[test]
    fn from_mime_accepts_allowed_types() {
        assert_eq!(DocumentKind::from_mime("text/plain").unwrap(), DocumentKind::PlainText);
        assert_eq!(
            DocumentKind::from_mime("text/plain; charset=utf-8").unwrap(),
            DocumentKind::PlainText
        );
        assert_eq!(DocumentKind::from_mime("application/pdf").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_mime(MIME_DOCX).unwrap(), DocumentKind::Word);
        assert_eq!(DocumentKind::from_mime(MIME_DOC).unwrap(), DocumentKind::Word);
    }

    #[test]
    fn from_mime_rejects_images() {
        let err = DocumentKind::from_mime("image/png").unwrap_err();
        assert!(matches!(err, AppError::UploadError(_)));
        assert!(err.to_string().contains("image/png"));
    }

    #[test]
    fn dispatches_plain_text() {
        let text = extract_document_text(DocumentKind::PlainText, b"hello", PageRange::default())
            .unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn dispatches_pdf_with_and_without_range() {
        let pdf = build_pdf(&[
            PdfPage::new(vec![line(72, 700, "alpha"), line(72, 680, "beta")]),
            PdfPage::new(vec![line(72, 700, "gamma")]),
        ]);

        let full = extract_document_text(DocumentKind::Pdf, &pdf, PageRange::default()).unwrap();
        assert_eq!(full, "alpha\nbeta\n\ngamma\n\n");

        let range = PageRange {
            start_page: Some(2),
            end_page: None,
        };
        let partial = extract_document_text(DocumentKind::Pdf, &pdf, range).unwrap();
        assert_eq!(partial, "gamma\n\n");
    }

    #[test]
    fn page_range_is_ignored_for_plain_text() {
        let range = PageRange {
            start_page: Some(5),
            end_page: Some(6),
        };
        let text = extract_document_text(DocumentKind::PlainText, b"kept", range).unwrap();
        assert_eq!(text, "kept");
    }
}
