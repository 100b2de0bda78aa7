pub mod ai;
pub mod ai_worker;
pub mod app;
pub mod config;
pub mod db;
pub mod deck;
pub mod error;
pub mod logger;
pub mod models;
pub mod quiz;
pub mod session;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use ai::{
    fallback_questions, ModelConfig, OpenRouterClient, QuestionSource, SearchProvider,
    DEFAULT_MODEL,
};
pub use ai_worker::{spawn_ai_worker, AiBackends};
pub use app::App;
pub use config::AppConfig;
pub use deck::{CardIdGenerator, Deck, FlashcardSink, SequentialIds};
pub use error::{AiError, NeurallyError, QuizError, Result};
pub use models::{AnswerOption, AppState, Flashcard, Question, SearchResult};
pub use quiz::{EnrichmentStatus, Evaluation, Navigator, QuizSession, QuizState};
pub use session::handle_key;
pub use ui::draw;
