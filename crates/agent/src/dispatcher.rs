//! Routing delegations to the sub-agents.
//!
//! Each sub-agent is a model plus a system prompt. The tools agent is the
//! only one that acts on the machine: its reply is mined for a single shell
//! command, which is executed and reported back.

use agentrelay_config::AgentsConfig;
use agentrelay_core::agent::{AgentConfig, DelegationKind};
use agentrelay_core::tool::{render_outcome, ShellRunner};
use agentrelay_providers::{is_failure_sentinel, GenerativeClient};
use agentrelay_tools::extract_command;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The outcome of one delegation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub kind: DelegationKind,
    pub task: String,
    pub output: String,
}

impl DispatchResult {
    pub fn new(kind: DelegationKind, task: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            kind,
            task: task.into(),
            output: output.into(),
        }
    }
}

/// Sends tasks to the tools, code and text agents.
pub struct AgentDispatcher {
    client: Arc<GenerativeClient>,
    agents: AgentsConfig,
    shell: Arc<dyn ShellRunner>,
}

impl AgentDispatcher {
    pub fn new(
        client: Arc<GenerativeClient>,
        agents: AgentsConfig,
        shell: Arc<dyn ShellRunner>,
    ) -> Self {
        Self {
            client,
            agents,
            shell,
        }
    }

    pub fn agent_config(&self, kind: DelegationKind) -> AgentConfig {
        self.agents.resolve(kind.agent())
    }

    /// Run one delegation to completion.
    ///
    /// Never fails: provider exhaustion comes back as the sentinel text and
    /// shell problems are rendered into the output.
    pub async fn dispatch(&self, kind: DelegationKind, task: &str) -> DispatchResult {
        let agent = self.agent_config(kind);
        debug!(agent = %kind, model = %agent.model, "Dispatching task");

        let response = self
            .client
            .generate(&agent.model, task, &agent.system_prompt)
            .await;

        let output = match kind {
            DelegationKind::Tools => self.run_tools_response(response).await,
            DelegationKind::Code => {
                info!(chars = response.chars().count(), "Code agent finished");
                response
            }
            DelegationKind::Text => response,
        };

        DispatchResult::new(kind, task, output)
    }

    async fn run_tools_response(&self, response: String) -> String {
        if is_failure_sentinel(&response) {
            return response;
        }

        let Some(command) = extract_command(&response) else {
            warn!("Tools agent reply had no runnable command");
            return response;
        };

        info!(command = %command, "Running command");
        let outcome = self.shell.run(command).await;
        format!("Command: {command}\nOutput: {}", render_outcome(&outcome))
    }
}
