pub mod answer_check;
pub mod question;
pub use answer_check::AnswerCheckResult;
pub use question::Question;
