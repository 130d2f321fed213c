use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration loaded from codeagent.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// Model backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Ollama API URL
    #[serde(default = "default_ollama_url")]
    pub url: String,
    /// Model name to use
    #[serde(default = "default_model")]
    pub name: String,
    /// Timeout in seconds for API requests
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Answer from bundled mock responses instead of calling the model
    #[serde(default = "default_use_mock")]
    pub use_mock: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            name: default_model(),
            timeout_seconds: default_timeout(),
            use_mock: default_use_mock(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "mistral:7b".to_string()
}

fn default_timeout() -> u64 {
    300
}

fn default_use_mock() -> bool {
    true
}

/// Filesystem layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding generated projects
    #[serde(default = "default_projects_dir")]
    pub projects_dir: PathBuf,
    /// Name of the generated project inside `projects_dir`
    #[serde(default = "default_project_name")]
    pub project_name: String,
    /// Location of the persisted file map
    #[serde(default = "default_file_map")]
    pub file_map: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            projects_dir: default_projects_dir(),
            project_name: default_project_name(),
            file_map: default_file_map(),
        }
    }
}

fn default_projects_dir() -> PathBuf {
    PathBuf::from("projects")
}

fn default_project_name() -> String {
    "generated_project".to_string()
}

fn default_file_map() -> PathBuf {
    PathBuf::from("memory/file_map.json")
}

impl PathsConfig {
    /// Root of the generated project
    pub fn project_path(&self) -> PathBuf {
        self.projects_dir.join(&self.project_name)
    }
}

/// Behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Show streaming output in terminal
    #[serde(default = "default_stream_output")]
    pub stream_output: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            stream_output: default_stream_output(),
        }
    }
}

fn default_stream_output() -> bool {
    true
}

impl Config {
    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
    }

    /// Try to load config from codeagent.toml in the given directory
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join("codeagent.toml");
        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI overrides into the config
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(dir) = overrides.project_dir {
            self.paths.projects_dir = dir;
        }
        if let Some(m) = overrides.model {
            self.model.name = m;
        }
        if let Some(u) = overrides.url {
            self.model.url = u;
        }
        if overrides.live {
            self.model.use_mock = false;
        }
        if overrides.no_stream {
            self.behavior.stream_output = false;
        }
        self
    }
}

/// Values supplied on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub project_dir: Option<PathBuf>,
    pub model: Option<String>,
    pub url: Option<String>,
    pub live: bool,
    pub no_stream: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.url, "http://localhost:11434");
        assert_eq!(config.model.name, "mistral:7b");
        assert_eq!(config.model.timeout_seconds, 300);
        assert!(config.model.use_mock);
        assert_eq!(
            config.paths.project_path(),
            PathBuf::from("projects/generated_project")
        );
        assert_eq!(config.paths.file_map, PathBuf::from("memory/file_map.json"));
        assert!(config.behavior.stream_output);
    }

    #[test]
    fn test_config_with_overrides() {
        let config = Config::default().with_overrides(ConfigOverrides {
            project_dir: Some(PathBuf::from("out")),
            model: Some("codellama".to_string()),
            url: Some("http://remote:11434".to_string()),
            live: true,
            no_stream: true,
        });
        assert_eq!(config.paths.project_path(), PathBuf::from("out/generated_project"));
        assert_eq!(config.model.name, "codellama");
        assert_eq!(config.model.url, "http://remote:11434");
        assert!(!config.model.use_mock);
        assert!(!config.behavior.stream_output);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
[model]
url = "http://custom:8080"
name = "qwen2.5-coder"
use_mock = false

[paths]
project_name = "demo"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.url, "http://custom:8080");
        assert_eq!(config.model.name, "qwen2.5-coder");
        assert_eq!(config.model.timeout_seconds, 300); // default
        assert!(!config.model.use_mock);
        assert_eq!(config.paths.project_path(), PathBuf::from("projects/demo"));
        assert!(config.behavior.stream_output);
    }
}
