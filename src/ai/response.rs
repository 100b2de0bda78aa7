use crate::error::AiError;
use serde::de::DeserializeOwned;

/// Strips markdown fences and any prose around the outermost JSON value.
pub fn clean_json_response(response: &str) -> String {
    let mut cleaned = response.trim().to_string();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            cleaned = lines[1..lines.len() - 1].join("\n");
        }
    }

    let start = match cleaned.find(['[', '{']) {
        Some(start) => start,
        None => return cleaned.trim().to_string(),
    };
    let close = if cleaned[start..].starts_with('[') { ']' } else { '}' };
    if let Some(end) = cleaned.rfind(close)
        && end > start
    {
        cleaned = cleaned[start..=end].to_string();
    }

    cleaned.trim().to_string()
}

pub fn parse_json_response<T: DeserializeOwned>(response: &str) -> Result<T, AiError> {
    let cleaned = clean_json_response(response);
    serde_json::from_str(&cleaned).map_err(|e| AiError::Parse {
        message: e.to_string(),
        raw: response.to_string(),
    })
}
