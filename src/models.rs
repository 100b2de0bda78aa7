use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
    #[serde(default, alias = "is_correct")]
    pub is_correct: bool,
}

/// A multiple-choice question. Ids are only unique within the batch they
/// arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub id: u32,
    pub text: String,
    pub options: Vec<AnswerOption>,
    #[serde(default)]
    pub rationale: String,
    #[serde(default, alias = "topic_tag")]
    pub topic_tag: String,
}

impl Question {
    pub fn option(&self, option_id: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.is_correct)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub id: u64,
    pub front: String,
    pub back: String,
    pub tag: String,
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
}

#[derive(Debug)]
pub enum AiRequest {
    Generate {
        token: u64,
        content: String,
    },
    Search {
        token: u64,
        question_id: u32,
        query: String,
    },
}

#[derive(Debug)]
pub enum AiResponse {
    Questions {
        token: u64,
        questions: Vec<Question>,
        used_fallback: bool,
    },
    SearchResults {
        token: u64,
        question_id: u32,
        results: Vec<SearchResult>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    ContentInput,
    Generating,
    Quiz,
    QuizQuitConfirm,
    NoSession,
    Flashcards,
}
