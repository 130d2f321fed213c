use tracing::{error, info, warn};

use crate::core::ollama::OllamaClient;
use crate::core::parser::parse_response;
use crate::core::prompts::SYSTEM_PROMPT_GENERATE;
use crate::error::OllamaError;
use crate::models::{Config, FileRecord};
use crate::templates::mock_response;

/// Generate file records for a prompt
///
/// Calls the model unless mocks are enabled. A failed model call is not an
/// error: the bundled mock for `task` is used instead. A blank prompt yields
/// no records.
pub async fn generate_code(prompt: &str, task: &str, config: &Config) -> Vec<FileRecord> {
    if prompt.trim().is_empty() {
        error!("Prompt cannot be empty");
        return Vec::new();
    }

    if !config.model.use_mock {
        match request_model(prompt, config).await {
            Ok(response) => return parse_response(&response),
            Err(e) => {
                warn!("Failed to generate code with {}: {}", config.model.name, e);
                warn!("Falling back to mock response...");
            }
        }
    }

    let preview: String = task.chars().take(100).collect();
    info!("Using mock response for task: {}", preview);
    parse_response(mock_response(task))
}

async fn request_model(prompt: &str, config: &Config) -> Result<String, OllamaError> {
    let client = OllamaClient::new(config.model.clone())?;
    if !client.health_check().await? {
        return Err(OllamaError::ConnectionRefused(format!(
            "Ollama at {} is not healthy",
            config.model.url
        )));
    }
    client
        .generate(Some(SYSTEM_PROMPT_GENERATE), prompt, config.behavior.stream_output)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskKind;

    #[test]
    fn test_blank_prompt_yields_nothing() {
        let records = tokio_test::block_on(generate_code("   ", "flask", &Config::default()));
        assert!(records.is_empty());
    }

    #[test]
    fn test_mock_flask_project() {
        let records = tokio_test::block_on(generate_code(
            "## Task\n\nCreate a Flask app",
            "Create a Flask app",
            &Config::default(),
        ));

        let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["app.py", "requirements.txt", "templates/index.html"]);
        assert!(records.iter().all(|r| r.task == TaskKind::Create));
        assert!(records[0].code.starts_with("from flask import"));
    }

    #[test]
    fn test_unreachable_model_falls_back_to_mock() {
        let mut config = Config::default();
        config.model.use_mock = false;
        config.model.url = "http://127.0.0.1:9".to_string();
        config.model.timeout_seconds = 2;
        config.behavior.stream_output = false;

        let records = tokio_test::block_on(generate_code("## Task\n\nhello", "hello", &config));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "main.py");
    }
}
