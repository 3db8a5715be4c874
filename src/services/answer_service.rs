use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::AnswerCheckResult, dto::request::CheckAnswerRequest},
};

/// Validates the request and compares the answers. Comparison is exact after
/// trimming and lowercasing both sides.
pub fn check_answer(request: CheckAnswerRequest) -> AppResult<AnswerCheckResult> {
    request.validate()?;

    let (Some(question), Some(_options), Some(correct_answer), Some(user_answer)) = (
        request.question,
        request.options,
        request.correct_answer,
        request.user_answer,
    ) else {
        return Err(AppError::ValidationError(
            "question, options, correctAnswer and userAnswer are required".to_string(),
        ));
    };

    let is_correct = answers_match(&user_answer, &correct_answer);
    let message = if is_correct {
        "Correct! Well done.".to_string()
    } else {
        format!("Incorrect. The correct answer is: {}", correct_answer)
    };

    Ok(AnswerCheckResult {
        question,
        user_answer,
        correct_answer,
        is_correct,
        message,
    })
}

pub fn answers_match(user_answer: &str, correct_answer: &str) -> bool {
    user_answer.trim().to_lowercase() == correct_answer.trim().to_lowercase()
}
