use std::path::PathBuf;
use thiserror::Error;

use crate::models::ConfigError;

/// Main error type for codeagent
///
/// Only environmental failures end up here. Malformed responses and source
/// that fails to parse are ordinary outcomes and never surface as errors.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("File map error: {0}")]
    FileMap(#[from] FileMapError),

    #[error("Ollama error: {0}")]
    Ollama(#[from] OllamaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),

    #[error("File {0} does not exist")]
    FileNotFound(PathBuf),

    #[error("Source parser unavailable: {0}")]
    ParserUnavailable(String),
}

/// Errors related to file map persistence
#[derive(Error, Debug)]
pub enum FileMapError {
    #[error("Failed to read file map {0}: {1}")]
    ReadError(PathBuf, std::io::Error),

    #[error("Failed to write file map {0}: {1}")]
    WriteError(PathBuf, std::io::Error),

    #[error("Failed to serialize file map {0}: {1}")]
    SerializeError(PathBuf, String),
}

/// Errors related to Ollama API
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Stream error: {0}")]
    StreamError(String),
}

impl From<reqwest::Error> for OllamaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OllamaError::Timeout(0)
        } else if err.is_connect() {
            OllamaError::ConnectionRefused(err.to_string())
        } else if let Some(status) = err.status() {
            OllamaError::HttpError {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            OllamaError::RequestFailed(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
