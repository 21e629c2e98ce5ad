//! Configuration loading and validation for agentrelay.
//!
//! Loads the multi-agent configuration from `~/.agentrelay/multi-agent.toml`
//! (or an explicit path) with an environment variable override for the
//! Ollama location. Every key is optional; validation runs at startup.

use agentrelay_core::agent::{AgentConfig, AgentKind};
use agentrelay_core::provider::GenerateOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The root configuration structure.
///
/// Maps directly to `multi-agent.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Where the generative service lives and how it samples
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Per-agent model and system prompt
    #[serde(default)]
    pub agents: AgentsConfig,

    /// Turn budget, retry policy, truncation limits and logging
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub url: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_context_window")]
    pub context_window: u32,

    /// Timeout for a single request attempt
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".into()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_context_window() -> u32 {
    4096
}
fn default_request_timeout() -> u64 {
    300
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            temperature: default_temperature(),
            context_window: default_context_window(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl OllamaConfig {
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            temperature: self.temperature,
            context_window: self.context_window,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// One optional entry per agent role.
///
/// Absent entries are not an error: [`AgentsConfig::resolve`] substitutes
/// the default model with an empty system prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<AgentConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<AgentConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<AgentConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<AgentConfig>,
}

impl AgentsConfig {
    fn entry(&self, kind: AgentKind) -> Option<&AgentConfig> {
        match kind {
            AgentKind::Main => self.main.as_ref(),
            AgentKind::Tools => self.tools.as_ref(),
            AgentKind::Code => self.code.as_ref(),
            AgentKind::Text => self.text.as_ref(),
        }
    }

    /// Whether the config file names this agent explicitly.
    pub fn is_configured(&self, kind: AgentKind) -> bool {
        self.entry(kind).is_some()
    }

    /// Total mapping from agent role to its configuration.
    pub fn resolve(&self, kind: AgentKind) -> AgentConfig {
        self.entry(kind).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum number of main-agent turns before giving up
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Attempts per generative call (including the first)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,

    #[serde(default = "default_shell_timeout")]
    pub shell_timeout_secs: u64,

    /// How much of each task is folded back into the main agent's context
    #[serde(default = "default_task_preview")]
    pub task_preview_chars: usize,

    /// How much of each result is folded back into the main agent's context
    #[serde(default = "default_result_preview")]
    pub result_preview_chars: usize,

    /// How much of each result is kept in the event log
    #[serde(default = "default_log_result")]
    pub log_result_chars: usize,

    /// Directory for `run-*.jsonl` event logs
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Case-insensitive phrases that mean the main agent is finished
    #[serde(default = "default_done_keywords")]
    pub done_keywords: Vec<String>,
}

fn default_max_turns() -> u32 {
    50
}
fn default_max_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    2
}
fn default_shell_timeout() -> u64 {
    60
}
fn default_task_preview() -> usize {
    80
}
fn default_result_preview() -> usize {
    300
}
fn default_log_result() -> usize {
    500
}
fn default_log_dir() -> PathBuf {
    RelayConfig::config_dir().join("logs")
}
fn default_done_keywords() -> Vec<String> {
    ["done", "complete", "finished", "all tasks", "project is ready"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay(),
            shell_timeout_secs: default_shell_timeout(),
            task_preview_chars: default_task_preview(),
            result_preview_chars: default_result_preview(),
            log_result_chars: default_log_result(),
            log_dir: default_log_dir(),
            done_keywords: default_done_keywords(),
        }
    }
}

impl OrchestratorConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn shell_timeout(&self) -> Duration {
        Duration::from_secs(self.shell_timeout_secs)
    }
}

impl RelayConfig {
    /// Load configuration from `path`, then apply environment overrides:
    /// - `AGENTRELAY_OLLAMA_URL` replaces `[ollama] url`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;

        if let Ok(url) = std::env::var("AGENTRELAY_OLLAMA_URL") {
            tracing::debug!(url = %url, "Ollama URL overridden from environment");
            config.ollama.url = url;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// Unlike most settings files, a missing file is an error: the operator
    /// pointed at it explicitly (or relied on the default location).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;

        for kind in AgentKind::ALL {
            if !config.agents.is_configured(kind) {
                tracing::debug!(agent = %kind, "No config entry, using default model");
            }
        }

        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".agentrelay")
    }

    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("multi-agent.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.ollama.temperature) {
            return Err(ConfigError::ValidationError(
                "ollama.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.orchestrator.max_turns == 0 {
            return Err(ConfigError::ValidationError(
                "orchestrator.max_turns must be at least 1".into(),
            ));
        }

        if self.orchestrator.max_retries == 0 {
            return Err(ConfigError::ValidationError(
                "orchestrator.max_retries must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string, with every agent listed.
    pub fn default_toml() -> String {
        let config = Self {
            agents: AgentsConfig {
                main: Some(AgentConfig::default()),
                tools: Some(AgentConfig::default()),
                code: Some(AgentConfig::default()),
                text: Some(AgentConfig::default()),
            },
            ..Self::default()
        };
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn default_config_is_valid() {
        let config = RelayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ollama.url, "http://localhost:11434");
        assert_eq!(config.orchestrator.max_turns, 50);
        assert_eq!(config.orchestrator.max_retries, 3);
        assert_eq!(config.orchestrator.retry_delay_secs, 2);
        assert_eq!(config.orchestrator.shell_timeout_secs, 60);
        assert_eq!(config.orchestrator.done_keywords.len(), 5);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = RelayConfig::load_from(Path::new("/nonexistent/multi-agent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().contains("/nonexistent/multi-agent.toml"));
    }

    #[test]
    fn parses_agent_sections() {
        let file = write_config(
            r#"
[ollama]
url = "http://gpu-box:11434"

[agents.main]
model = "qwen2.5:3b"
system = "You lead a team. Delegate with @TOOLS:, @CODE: or @TEXT:."

[agents.tools]
model = "smollm2:360m"
"#,
        );
        let config = RelayConfig::load_from(file.path()).unwrap();
        assert_eq!(config.ollama.url, "http://gpu-box:11434");

        let main = config.agents.resolve(AgentKind::Main);
        assert_eq!(main.model, "qwen2.5:3b");
        assert!(main.system_prompt.starts_with("You lead a team"));

        let tools = config.agents.resolve(AgentKind::Tools);
        assert_eq!(tools.model, "smollm2:360m");
        assert!(tools.system_prompt.is_empty());
    }

    #[test]
    fn missing_agents_fall_back_to_default_model() {
        let file = write_config("[agents.main]\nmodel = \"phi3\"\n");
        let config = RelayConfig::load_from(file.path()).unwrap();
        assert!(!config.agents.is_configured(AgentKind::Code));
        let code = config.agents.resolve(AgentKind::Code);
        assert_eq!(code, AgentConfig::default());
        assert_eq!(code.model, "smollm2:135m");
    }

    #[test]
    fn orchestrator_overrides() {
        let file = write_config(
            r#"
[orchestrator]
max_turns = 5
retry_delay_secs = 0
done_keywords = ["ship it"]
log_dir = "/var/log/agentrelay"
"#,
        );
        let config = RelayConfig::load_from(file.path()).unwrap();
        assert_eq!(config.orchestrator.max_turns, 5);
        assert_eq!(config.orchestrator.retry_delay(), Duration::ZERO);
        assert_eq!(config.orchestrator.done_keywords, vec!["ship it".to_string()]);
        assert_eq!(config.orchestrator.log_dir, PathBuf::from("/var/log/agentrelay"));
        // Untouched keys keep their defaults
        assert_eq!(config.orchestrator.result_preview_chars, 300);
    }

    #[test]
    fn zero_turn_budget_rejected() {
        let file = write_config("[orchestrator]\nmax_turns = 0\n");
        let err = RelayConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = RelayConfig {
            ollama: OllamaConfig {
                temperature: 5.0,
                ..OllamaConfig::default()
            },
            ..RelayConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn nan_temperature_rejected() {
        let file = write_config("[ollama]\ntemperature = nan\n");
        let err = RelayConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn temperature_serializes_exactly() {
        let rendered = toml::to_string(&RelayConfig::default()).unwrap();
        assert!(rendered.contains("temperature = 0.7\n"));
    }

    #[test]
    fn logs_default_under_config_dir() {
        let config = RelayConfig::default();
        assert_eq!(config.orchestrator.log_dir, RelayConfig::config_dir().join("logs"));
        assert!(config.orchestrator.log_dir.ends_with(".agentrelay/logs"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let file = write_config("[agents.main\nmodel = ");
        let err = RelayConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn default_toml_roundtrips() {
        let toml_str = RelayConfig::default_toml();
        assert!(toml_str.contains("smollm2:135m"));
        assert!(toml_str.contains("[agents.text]"));
        let parsed: RelayConfig = toml::from_str(&toml_str).unwrap();
        assert!(parsed.agents.is_configured(AgentKind::Text));
        assert_eq!(parsed.orchestrator.max_turns, 50);
    }

    #[test]
    fn options_come_from_ollama_section() {
        let config = RelayConfig::default();
        let opts = config.ollama.options();
        assert_eq!(opts.context_window, 4096);
        assert_eq!(config.ollama.request_timeout(), Duration::from_secs(300));
    }
}
