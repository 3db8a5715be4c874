use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        document_service::DocumentService,
        model_service::{LanguageModel, OpenAiModelService},
        question_service::QuestionService,
        upload_service::UploadService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub upload_service: Arc<UploadService>,
    pub document_service: Arc<DocumentService>,
    pub question_service: Arc<QuestionService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let model = Arc::new(OpenAiModelService::new(&config));
        log::info!(
            "Using model {} at {}",
            model.model_name(),
            config.llm_api_base_url
        );
        Self::with_model(config, model)
    }

    /// Builds the state around any [`LanguageModel`], e.g. a stub in tests.
    pub fn with_model(config: Config, model: Arc<dyn LanguageModel>) -> Self {
        let upload_service = Arc::new(UploadService::new(&config));
        let document_service = Arc::new(DocumentService::new(&config));
        let question_service = Arc::new(QuestionService::new(model));

        Self {
            upload_service,
            document_service,
            question_service,
            config: Arc::new(config),
        }
    }
}
