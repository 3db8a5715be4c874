pub mod health_handler;
pub mod question_handler;

use actix_web::web;

use crate::errors::AppError;

pub use health_handler::{health_check, index};
pub use question_handler::{check_answer, generate_questions};

/// Registers every route. Malformed JSON bodies come back as the same
/// `{ error, code }` shape as every other failure.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid JSON body: {}", err)).into()
    }))
    .service(index)
    .service(health_check)
    .service(generate_questions)
    .service(check_answer);
}
