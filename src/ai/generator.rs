use crate::ai::response::parse_json_response;
use crate::ai::{OpenRouterClient, QuestionSource};
use crate::error::AiError;
use crate::logger;
use crate::models::{AnswerOption, Question};
use async_trait::async_trait;

pub const QUESTION_COUNT: usize = 5;

const SYSTEM_PROMPT: &str =
    "You are an educational assistant writing multiple-choice quiz questions. Be precise.";

fn generation_prompt(content: &str) -> String {
    format!(
        r#"Write {} multiple-choice questions that test recall of the study material below.
Respond ONLY with a JSON array (no markdown, no extra text) of objects with this exact structure:
[
  {{
    "text": "question text",
    "options": [
      {{"id": "a", "text": "option text", "isCorrect": false}},
      {{"id": "b", "text": "option text", "isCorrect": true}},
      {{"id": "c", "text": "option text", "isCorrect": false}},
      {{"id": "d", "text": "option text", "isCorrect": false}}
    ],
    "rationale": "why the correct option is correct, in markdown",
    "topicTag": "short topic label"
  }}
]
Exactly one option per question must have "isCorrect": true.

Study material:
{}
"#,
        QUESTION_COUNT, content
    )
}

/// Parses the generator's JSON and renumbers ids from 1 in batch order.
pub fn parse_questions(response: &str) -> Result<Vec<Question>, AiError> {
    let mut questions: Vec<Question> = parse_json_response(response)?;
    for (index, question) in questions.iter_mut().enumerate() {
        question.id = index as u32 + 1;
    }
    Ok(questions)
}

#[async_trait]
impl QuestionSource for OpenRouterClient {
    async fn generate(&self, content: &str) -> Result<Vec<Question>, AiError> {
        logger::log("Requesting question generation");
        let response = self
            .complete(SYSTEM_PROMPT, &generation_prompt(content))
            .await?;
        logger::log(&format!("Raw generation response: {}", response));
        parse_questions(&response)
    }
}

fn option(id: &str, text: &str, is_correct: bool) -> AnswerOption {
    AnswerOption {
        id: id.to_string(),
        text: text.to_string(),
        is_correct,
    }
}

/// Static batch used when generation fails.
pub fn fallback_questions() -> Vec<Question> {
    let entries = [
        (
            "Which study technique asks you to retrieve information from memory instead of re-reading it?",
            [
                ("Highlighting", false),
                ("Active recall", true),
                ("Summarising by copying", false),
                ("Passive review", false),
            ],
            "**Active recall** strengthens memory by forcing retrieval, which is more effective than re-exposure.",
            "Learning Science",
        ),
        (
            "What does spaced repetition space out?",
            [
                ("Study sessions over increasing intervals", true),
                ("Breaks between sentences", false),
                ("Different subjects in one session", false),
                ("Pages in a notebook", false),
            ],
            "Reviews are scheduled at growing intervals so each one lands just before the material is forgotten.",
            "Learning Science",
        ),
        (
            "Interleaving practice means:",
            [
                ("Studying one topic until mastered", false),
                ("Mixing related topics within a session", true),
                ("Studying only at night", false),
                ("Reading the same chapter twice", false),
            ],
            "Mixing problem types forces you to choose a strategy each time, which improves transfer.",
            "Learning Science",
        ),
        (
            "Which is the best use of a mistake made during practice?",
            [
                ("Ignore it and move on", false),
                ("Re-read the whole chapter", false),
                ("Revisit it in a focused follow-up attempt", true),
                ("Memorise the answer letter", false),
            ],
            "Targeted retries on missed items close specific gaps without spending time on known material.",
            "Metacognition",
        ),
        (
            "The Feynman technique centres on:",
            [
                ("Explaining a concept in simple terms", true),
                ("Timing study blocks to 25 minutes", false),
                ("Drawing mind maps only", false),
                ("Listening to lectures at double speed", false),
            ],
            "Teaching a concept plainly exposes the parts you do not yet understand.",
            "",
        ),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(|(index, (text, options, rationale, topic_tag))| Question {
            id: index as u32 + 1,
            text: text.to_string(),
            options: options
                .iter()
                .zip(["a", "b", "c", "d"])
                .map(|((option_text, is_correct), id)| option(id, option_text, *is_correct))
                .collect(),
            rationale: rationale.to_string(),
            topic_tag: topic_tag.to_string(),
        })
        .collect()
}
