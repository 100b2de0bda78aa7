use crate::ai::response::parse_json_response;
use crate::ai::{OpenRouterClient, SearchProvider};
use crate::error::AiError;
use crate::logger;
use crate::models::SearchResult;
use async_trait::async_trait;

pub const MAX_RESULTS: usize = 5;

/// Keeps entries with an http(s) url, up to `MAX_RESULTS`.
pub fn parse_search_results(response: &str) -> Result<Vec<SearchResult>, AiError> {
    let results: Vec<SearchResult> = parse_json_response(response)?;
    Ok(results
        .into_iter()
        .filter(|r| r.url.starts_with("http://") || r.url.starts_with("https://"))
        .take(MAX_RESULTS)
        .collect())
}

#[async_trait]
impl SearchProvider for OpenRouterClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, AiError> {
        let prompt = format!(
            r#"List up to {} reputable web pages that explain the topic of this quiz question.
Respond ONLY with a JSON array (no markdown, no extra text):
[{{"title": "page title", "url": "https://..."}}]

Question: {}
"#,
            MAX_RESULTS, query
        );
        let response = self
            .complete("You are a research assistant recommending study references.", &prompt)
            .await?;
        logger::log(&format!("Raw search response: {}", response));
        parse_search_results(&response)
    }
}
