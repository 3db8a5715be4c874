use std::sync::Arc;

use crate::{
    constants::quiz_prompt::{QUESTION_FORMAT_EXAMPLE, QUIZ_GENERATION_TEMPLATE},
    errors::{AppError, AppResult},
    models::{domain::Question, dto::request::GenerateQuestionsOptions},
    services::model_service::LanguageModel,
};

pub struct QuestionService {
    model: Arc<dyn LanguageModel>,
}

impl QuestionService {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Sends one prompt for `content` and decodes the questions from the reply.
    pub async fn generate_questions(
        &self,
        content: &str,
        options: &GenerateQuestionsOptions,
    ) -> AppResult<Vec<Question>> {
        let prompt = build_prompt(content, options.num_questions, &options.difficulty);
        log::info!(
            "Requesting {} {} question(s) for {} characters of text",
            options.num_questions,
            options.difficulty,
            content.chars().count()
        );

        let reply = self.model.complete(&prompt).await?;
        let questions = parse_questions(&reply).inspect_err(|e| {
            log::error!("Could not parse model reply ({}): {}", e, reply);
        })?;

        log::info!("Model produced {} question(s)", questions.len());
        Ok(questions)
    }
}

pub fn build_prompt(content: &str, num_questions: usize, difficulty: &str) -> String {
    let count = num_questions.to_string();
    fill_template(
        QUIZ_GENERATION_TEMPLATE,
        &[
            ("{num_questions}", count.as_str()),
            ("{difficulty}", difficulty),
            ("{format_example}", QUESTION_FORMAT_EXAMPLE),
            ("{content}", content),
        ],
    )
}

/// Single left-to-right pass over `template`. Substituted values are never
/// scanned again, so placeholders inside user text stay literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decodes questions from a free-text reply.
///
/// The payload is taken to be everything from the first `[` to the last `]`.
/// Prose around the array is ignored, but a reply with several separate
/// bracketed blocks will not decode.
pub fn parse_questions(reply: &str) -> AppResult<Vec<Question>> {
    let block = bracketed_block(reply).ok_or_else(|| {
        AppError::ParseError("Reply does not contain a JSON array".to_string())
    })?;

    serde_json::from_str(block)
        .map_err(|e| AppError::ParseError(format!("Reply array is not valid question JSON: {}", e)))
}

fn bracketed_block(reply: &str) -> Option<&str> {
    let start = reply.find('[')?;
    let end = reply.rfind(']')?;
    (end > start).then(|| &reply[start..=end])
}
