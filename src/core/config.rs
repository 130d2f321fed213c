use std::path::Path;
use tracing::info;

use crate::error::AgentError;
use crate::models::{Config, ConfigOverrides};

/// Load configuration from the working directory with CLI overrides
pub fn load_config(working_dir: &Path, overrides: ConfigOverrides) -> Result<Config, AgentError> {
    let config = Config::load_from_dir(working_dir)?.with_overrides(overrides);

    info!(
        "Configuration loaded: model={}, mock={}, project={}",
        config.model.name,
        config.model.use_mock,
        config.paths.project_path().display()
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(temp_dir.path(), ConfigOverrides::default()).unwrap();

        assert_eq!(config.model.name, "mistral:7b");
        assert!(config.model.use_mock);
    }

    #[test]
    fn test_load_config_with_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("codeagent.toml"),
            r#"
[model]
name = "llama3"
url = "http://custom:8080"

[paths]
file_map = "state/map.json"
"#,
        )
        .unwrap();

        let config = load_config(temp_dir.path(), ConfigOverrides::default()).unwrap();

        assert_eq!(config.model.name, "llama3");
        assert_eq!(config.model.url, "http://custom:8080");
        assert_eq!(config.paths.file_map, std::path::PathBuf::from("state/map.json"));
    }

    #[test]
    fn test_load_config_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("codeagent.toml"), "[model]\nname = \"llama3\"\n").unwrap();

        let overrides = ConfigOverrides {
            model: Some("codellama".to_string()),
            ..Default::default()
        };
        let config = load_config(temp_dir.path(), overrides).unwrap();

        assert_eq!(config.model.name, "codellama");
    }

    #[test]
    fn test_load_config_malformed() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("codeagent.toml"), "[model\nname = ").unwrap();

        let result = load_config(temp_dir.path(), ConfigOverrides::default());
        assert!(matches!(result, Err(AgentError::Config(_))));
    }
}
