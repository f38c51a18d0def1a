use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("hosting API error: {0}")]
    Hosting(String),
    #[error("language model error: {0}")]
    LanguageModel(String),
    #[error("invalid selection: {0}")]
    Selection(String),
    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
