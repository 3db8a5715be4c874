use serde::Deserialize;
use validator::Validate;

use crate::extraction::PageRange;

pub const DEFAULT_NUM_QUESTIONS: usize = 5;
pub const DEFAULT_DIFFICULTY: &str = "medium";

/// Body of `POST /check-answer`. Fields are optional at the type level so a
/// missing one surfaces as a validation error rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerRequest {
    #[validate(
        required(message = "question is required"),
        length(min = 1, message = "question is required")
    )]
    pub question: Option<String>,

    #[validate(required(message = "options is required"))]
    pub options: Option<Vec<String>>,

    #[validate(
        required(message = "correctAnswer is required"),
        length(min = 1, message = "correctAnswer is required")
    )]
    pub correct_answer: Option<String>,

    #[validate(
        required(message = "userAnswer is required"),
        length(min = 1, message = "userAnswer is required")
    )]
    pub user_answer: Option<String>,
}

/// Generation knobs read from the upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateQuestionsOptions {
    pub num_questions: usize,
    pub difficulty: String,
    pub page_range: PageRange,
}

impl Default for GenerateQuestionsOptions {
    fn default() -> Self {
        Self {
            num_questions: DEFAULT_NUM_QUESTIONS,
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            page_range: PageRange::default(),
        }
    }
}

/// Raw text form fields as they arrive in the multipart body.
#[derive(Debug, Clone, Default)]
pub struct GenerateQuestionsForm {
    pub num_questions: Option<String>,
    pub difficulty: Option<String>,
    pub start_page: Option<String>,
    pub end_page: Option<String>,
}

impl GenerateQuestionsForm {
    /// Lenient parse: a count that is missing, unparseable or zero falls back
    /// to the default, and anything above `max_questions` is capped.
    pub fn into_options(self, max_questions: usize) -> GenerateQuestionsOptions {
        let num_questions = self
            .num_questions
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_NUM_QUESTIONS)
            .min(max_questions.max(1));

        let difficulty = self
            .difficulty
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string());

        GenerateQuestionsOptions {
            num_questions,
            difficulty,
            page_range: PageRange {
                start_page: parse_page(self.start_page.as_deref()),
                end_page: parse_page(self.end_page.as_deref()),
            },
        }
    }
}

fn parse_page(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|r| r.trim().parse().ok())
}
