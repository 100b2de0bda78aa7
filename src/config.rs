use crate::ai::{ModelConfig, DEFAULT_MODEL};
use std::path::PathBuf;

pub const DEFAULT_NOTES_DIR: &str = "notes";
pub const DEFAULT_LOG_FILE: &str = "neurally_debug.log";
pub const DB_FILE_NAME: &str = "neurally.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub notes_dir: PathBuf,
    pub data_dir: PathBuf,
    pub log_path: PathBuf,
    /// Whether an OpenRouter key is present.
    pub ai_enabled: bool,
}

fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\neurally")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/neurally")
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let model = ModelConfig {
            model: non_empty("NEURALLY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ..ModelConfig::default()
        };

        Self {
            model,
            notes_dir: non_empty("NEURALLY_NOTES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_NOTES_DIR)),
            data_dir: non_empty("NEURALLY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
            log_path: non_empty("NEURALLY_LOG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            ai_enabled: non_empty("OPENROUTER_API_KEY").is_some(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}
