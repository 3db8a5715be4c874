use actix_web::web;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    extraction::{
        extract_document_text, extract_pdf_metadata, prepare_content, DocumentKind, PageRange,
        PdfMetadataResult,
    },
    services::upload_service::StoredUpload,
};

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Normalized text, cut to the configured maximum.
    pub content: String,
    pub extracted_length: usize,
    pub truncated: bool,
    pub pdf: Option<PdfMetadataResult>,
}

pub struct DocumentService {
    max_content_chars: usize,
}

impl DocumentService {
    pub fn new(config: &Config) -> Self {
        Self {
            max_content_chars: config.max_content_chars,
        }
    }

    /// Reads a stored upload and turns it into model-ready text. Extraction
    /// runs on the blocking pool.
    pub async fn extract(&self, upload: &StoredUpload, range: PageRange) -> AppResult<ExtractedDocument> {
        let bytes = upload.read().await?;
        let kind = upload.kind;

        let (text, pdf) = web::block(move || -> AppResult<(String, Option<PdfMetadataResult>)> {
            let text = extract_document_text(kind, &bytes, range)?;
            let pdf = (kind == DocumentKind::Pdf).then(|| extract_pdf_metadata(&bytes));
            Ok((text, pdf))
        })
        .await??;

        self.prepare(text, pdf, &upload.file_name)
    }

    fn prepare(
        &self,
        text: String,
        pdf: Option<PdfMetadataResult>,
        file_name: &str,
    ) -> AppResult<ExtractedDocument> {
        let prepared = prepare_content(&text, self.max_content_chars);
        if prepared.text.is_empty() {
            return Err(AppError::UploadError(format!(
                "No readable text found in '{}'",
                file_name
            )));
        }

        if prepared.truncated {
            log::info!(
                "Truncated '{}' from {} to {} characters",
                file_name,
                prepared.original_chars,
                self.max_content_chars
            );
        }

        Ok(ExtractedDocument {
            extracted_length: prepared.original_chars,
            truncated: prepared.truncated,
            content: prepared.text,
            pdf,
        })
    }
}
