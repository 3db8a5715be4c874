use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    extraction::{DocumentKind, PdfMetadataResult},
    models::domain::Question,
};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<Question>,
    pub metadata: GenerationMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub file_name: String,
    pub file_type: String,
    pub file_size: usize,
    pub document_kind: DocumentKind,
    /// Characters of normalized text before truncation.
    pub extracted_length: usize,
    /// Characters actually sent to the model.
    pub content_length: usize,
    pub truncated: bool,
    pub num_questions: usize,
    pub difficulty: String,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<PdfMetadataResult>,
}
