pub mod client;
pub mod generator;
pub mod response;
pub mod search;

use crate::error::AiError;
use crate::models::{Question, SearchResult};
use async_trait::async_trait;

pub use client::{ModelConfig, OpenRouterClient, DEFAULT_MODEL};
pub use generator::{fallback_questions, parse_questions};
pub use response::clean_json_response;
pub use search::parse_search_results;

/// Produces the ordered question batch a quiz session starts from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn generate(&self, content: &str) -> Result<Vec<Question>, AiError>;
}

/// Looks up reference material for a question.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, AiError>;
}
