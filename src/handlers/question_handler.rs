use actix_multipart::Multipart;
use actix_web::{post, web, HttpRequest, HttpResponse};
use chrono::Utc;

use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
    middleware::get_request_id,
    models::dto::{
        request::{CheckAnswerRequest, GenerateQuestionsOptions},
        response::{GenerateQuestionsResponse, GenerationMetadata},
    },
    services::{answer_service, upload_service::StoredUpload},
};

#[post("/generate-questions")]
pub async fn generate_questions(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req).unwrap_or_default();
    let form = state.upload_service.receive(payload).await?;
    let upload = form
        .file
        .ok_or_else(|| AppError::UploadError("No file uploaded".to_string()))?;
    let options = form.fields.into_options(state.config.max_questions);

    log::info!(
        "[{}] Generating questions from '{}' ({})",
        request_id,
        upload.file_name,
        upload.content_type
    );

    let result = process_upload(&state, &upload, &options).await;
    upload.release();

    Ok(HttpResponse::Ok().json(result?))
}

async fn process_upload(
    state: &AppState,
    upload: &StoredUpload,
    options: &GenerateQuestionsOptions,
) -> AppResult<GenerateQuestionsResponse> {
    let document = state
        .document_service
        .extract(upload, options.page_range)
        .await?;

    let questions = state
        .question_service
        .generate_questions(&document.content, options)
        .await?;

    Ok(GenerateQuestionsResponse {
        questions,
        metadata: GenerationMetadata {
            file_name: upload.file_name.clone(),
            file_type: upload.content_type.clone(),
            file_size: upload.size,
            document_kind: upload.kind,
            extracted_length: document.extracted_length,
            content_length: document.content.chars().count(),
            truncated: document.truncated,
            num_questions: options.num_questions,
            difficulty: options.difficulty.clone(),
            generated_at: Utc::now(),
            pdf: document.pdf,
        },
    })
}

#[post("/check-answer")]
pub async fn check_answer(
    request: web::Json<CheckAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let result = answer_service::check_answer(request.into_inner())?;
    Ok(HttpResponse::Ok().json(result))
}
