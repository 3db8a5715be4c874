pub mod answer_service;
pub mod document_service;
pub mod model_service;
pub mod question_service;
pub mod upload_service;

pub use model_service::{LanguageModel, OpenAiModelService};
pub use question_service::QuestionService;
