use thiserror::Error;

pub type Result<T> = std::result::Result<T, NeurallyError>;

#[derive(Debug, Error)]
pub enum NeurallyError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Ai(#[from] AiError),
}

/// Failures from the generation and search collaborators.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("failed to create AI client: {0}")]
    Client(String),

    #[error("OpenRouter API error: {0}")]
    Api(String),

    #[error("no response choices received")]
    EmptyResponse,

    #[error("failed to parse AI response: {message}\nRaw: {raw}")]
    Parse { message: String, raw: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("question batch is empty")]
    EmptyBatch,
}
