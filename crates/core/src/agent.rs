//! Agent roles and their configuration.

use serde::{Deserialize, Serialize};

/// Model used for any agent without an explicit entry in the config file.
pub const DEFAULT_AGENT_MODEL: &str = "smollm2:135m";

/// Every role that takes part in an orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// The reasoning agent that decomposes the challenge and delegates.
    Main,
    /// Turns a task into a single shell command, which is then executed.
    Tools,
    /// Generates source code.
    Code,
    /// Free-text writing and summarizing.
    Text,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Main,
        AgentKind::Tools,
        AgentKind::Code,
        AgentKind::Text,
    ];

    /// The lowercase name used as the config section key (`[agents.tools]`).
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Main => "main",
            AgentKind::Tools => "tools",
            AgentKind::Code => "code",
            AgentKind::Text => "text",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The sub-agents the main agent may delegate to. Never [`AgentKind::Main`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelegationKind {
    Tools,
    Code,
    Text,
}

impl DelegationKind {
    pub const ALL: [DelegationKind; 3] = [
        DelegationKind::Tools,
        DelegationKind::Code,
        DelegationKind::Text,
    ];

    /// The tag word as written after `@` in a main-agent response.
    pub fn tag(self) -> &'static str {
        match self {
            DelegationKind::Tools => "TOOLS",
            DelegationKind::Code => "CODE",
            DelegationKind::Text => "TEXT",
        }
    }

    pub fn agent(self) -> AgentKind {
        match self {
            DelegationKind::Tools => AgentKind::Tools,
            DelegationKind::Code => AgentKind::Code,
            DelegationKind::Text => AgentKind::Text,
        }
    }
}

impl std::fmt::Display for DelegationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.agent().as_str())
    }
}

/// Model and system prompt for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Ollama model tag (e.g., "qwen2.5:3b")
    #[serde(default = "default_model")]
    pub model: String,

    /// System prompt; empty means none is sent
    #[serde(default, rename = "system")]
    pub system_prompt: String,
}

fn default_model() -> String {
    DEFAULT_AGENT_MODEL.into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            system_prompt: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_agent_uses_fallback_model() {
        let cfg = AgentConfig::default();
        assert_eq!(cfg.model, "smollm2:135m");
        assert!(cfg.system_prompt.is_empty());
    }

    #[test]
    fn delegation_kind_maps_to_agent() {
        assert_eq!(DelegationKind::Tools.agent(), AgentKind::Tools);
        assert_eq!(DelegationKind::Code.agent(), AgentKind::Code);
        assert_eq!(DelegationKind::Text.agent(), AgentKind::Text);
        assert_eq!(DelegationKind::Code.to_string(), "code");
        assert_eq!(DelegationKind::Text.tag(), "TEXT");
    }

    #[test]
    fn agent_config_reads_system_key() {
        let cfg: AgentConfig =
            serde_json::from_str(r#"{"model":"phi3","system":"be terse"}"#).unwrap();
        assert_eq!(cfg.model, "phi3");
        assert_eq!(cfg.system_prompt, "be terse");
    }
}
