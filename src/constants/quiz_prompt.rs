pub const SYSTEM_PROMPT: &str = "You are an experienced educator who writes clear, fair multiple-choice questions. You only use facts stated in the material you are given and you always answer in the exact format requested.";

/// Shown to the model verbatim so the reply can be decoded as a JSON array.
pub const QUESTION_FORMAT_EXAMPLE: &str = r#"[
  {
    "question": "What is the main topic discussed in the text?",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "correctAnswer": "Option A",
    "explanation": "The text focuses on Option A throughout."
  }
]"#;

pub const QUIZ_GENERATION_TEMPLATE: &str = "Based on the following text, generate {num_questions} multiple-choice questions at a {difficulty} difficulty level.

Requirements:
- Each question must have exactly 4 options.
- Exactly one option is correct, and correctAnswer must repeat that option's text exactly.
- Include a short explanation of why the correct answer is right.
- Cover different parts of the text rather than repeating one fact.

Return ONLY a JSON array in this format, with no other commentary:
{format_example}

Text:
{content}";
