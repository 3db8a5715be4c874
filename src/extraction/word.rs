use crate::errors::{AppError, AppResult};

/// Raw text of a Word document. Conversion is left to `docx-lite`; legacy
/// binary `.doc` files are not zip containers and fail here.
pub fn extract_word_text(bytes: &[u8]) -> AppResult<String> {
    docx_lite::extract_text_from_bytes(bytes)
        .map_err(|e| AppError::ExtractionError(format!("Word extraction failed: {}", e)))
}

/// Plain text is passed through as-is. Invalid UTF-8 is replaced, not rejected.
pub fn extract_plain_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
