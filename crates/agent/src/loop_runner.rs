//! The turn loop that drives the main agent.

use agentrelay_config::{OrchestratorConfig, RelayConfig};
use agentrelay_core::agent::{AgentConfig, AgentKind};
use agentrelay_core::event::{EventSink, RunEvent};
use agentrelay_core::provider::Provider;
use agentrelay_core::tool::ShellRunner;
use agentrelay_providers::{GenerativeClient, RetryPolicy};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::context::{truncate_chars, ConversationContext};
use crate::dispatcher::{AgentDispatcher, DispatchResult};
use crate::parser::parse_delegations;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The main agent returned nothing
    EmptyResponse,
    /// The main agent issued no delegations and said it was finished
    DoneDeclared,
    /// The turn budget ran out
    TurnLimit,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptyResponse => "empty response",
            Self::DoneDeclared => "done declared",
            Self::TurnLimit => "turn limit reached",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress through a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnState {
    /// Zero-based index of the next turn
    pub turn_index: u32,

    /// Set once the run has stopped
    pub stop_reason: Option<StopReason>,
}

/// Loop limits and presentation settings, fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSettings {
    pub max_turns: u32,
    pub task_preview_chars: usize,
    pub result_preview_chars: usize,
    pub log_result_chars: usize,
    pub done_keywords: Vec<String>,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self::from(&OrchestratorConfig::default())
    }
}

impl From<&OrchestratorConfig> for LoopSettings {
    fn from(config: &OrchestratorConfig) -> Self {
        Self {
            max_turns: config.max_turns,
            task_preview_chars: config.task_preview_chars,
            result_preview_chars: config.result_preview_chars,
            log_result_chars: config.log_result_chars,
            done_keywords: config
                .done_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }
}

/// What a finished run leaves behind.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub stop_reason: StopReason,

    /// Number of main-agent calls made
    pub turns: u32,

    /// The final conversation context
    pub context: ConversationContext,
}

/// Asks the main agent for delegations, runs them, and feeds the results
/// back until the agent stops, declares completion, or the budget runs out.
pub struct TurnLoop {
    client: Arc<GenerativeClient>,
    dispatcher: AgentDispatcher,
    main: AgentConfig,
    settings: LoopSettings,
    events: Arc<dyn EventSink>,
}

impl TurnLoop {
    pub fn new(
        client: Arc<GenerativeClient>,
        dispatcher: AgentDispatcher,
        main: AgentConfig,
        settings: LoopSettings,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            client,
            dispatcher,
            main,
            settings,
            events,
        }
    }

    /// Wire a loop, its client and its dispatcher from a loaded config.
    pub fn from_config(
        config: &RelayConfig,
        provider: Arc<dyn Provider>,
        shell: Arc<dyn ShellRunner>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let policy = RetryPolicy {
            max_attempts: config.orchestrator.max_retries,
            delay: config.orchestrator.retry_delay(),
        };
        let client = Arc::new(GenerativeClient::new(provider, policy, config.ollama.options()));
        let dispatcher = AgentDispatcher::new(client.clone(), config.agents.clone(), shell);

        Self::new(
            client,
            dispatcher,
            config.agents.resolve(AgentKind::Main),
            LoopSettings::from(&config.orchestrator),
            events,
        )
    }

    pub fn main_agent(&self) -> &AgentConfig {
        &self.main
    }

    /// Whether a delegation-free response reads as "finished".
    ///
    /// A blunt case-insensitive substring match, so "incomplete" counts too.
    pub fn is_done_signal(&self, response: &str) -> bool {
        let lower = response.to_lowercase();
        self.settings
            .done_keywords
            .iter()
            .any(|keyword| lower.contains(keyword.as_str()))
    }

    /// Run the challenge to a stop.
    pub async fn run(&self, challenge: &str) -> RunOutcome {
        let mut context = ConversationContext::new(challenge);
        let mut state = TurnState::default();

        while state.turn_index < self.settings.max_turns {
            let turn = state.turn_index;
            info!(turn = turn + 1, max_turns = self.settings.max_turns, "Starting turn");

            state.stop_reason = self.step(turn, &mut context).await;
            state.turn_index += 1;

            if let Some(stop_reason) = state.stop_reason {
                info!(reason = %stop_reason, turns = state.turn_index, "Run stopped");
                return RunOutcome {
                    stop_reason,
                    turns: state.turn_index,
                    context,
                };
            }
        }

        warn!(turns = state.turn_index, "Turn limit reached");
        self.events.emit(RunEvent::TurnLimit {
            turns: state.turn_index,
        });
        RunOutcome {
            stop_reason: StopReason::TurnLimit,
            turns: state.turn_index,
            context,
        }
    }

    /// One turn: ask the main agent, then stop, nudge, or dispatch.
    async fn step(&self, turn: u32, context: &mut ConversationContext) -> Option<StopReason> {
        let response = self
            .client
            .generate(&self.main.model, context.as_str(), &self.main.system_prompt)
            .await;

        if response.trim().is_empty() {
            warn!(turn, "Main agent returned an empty response");
            self.events.emit(RunEvent::Empty { turn });
            return Some(StopReason::EmptyResponse);
        }

        debug!(turn, chars = response.chars().count(), "Main agent responded");
        self.events.emit(RunEvent::Main {
            turn,
            response: response.clone(),
        });

        let delegations = parse_delegations(&response);
        if delegations.is_empty() {
            if self.is_done_signal(&response) {
                info!(turn, "Main agent declared the challenge done");
                self.events.emit(RunEvent::Done { turn });
                return Some(StopReason::DoneDeclared);
            }

            warn!(turn, "No delegations found, nudging main agent");
            context.push_nudge(&response);
            return None;
        }

        info!(turn, count = delegations.len(), "Dispatching delegations");
        let mut results: Vec<DispatchResult> = Vec::with_capacity(delegations.len());
        for delegation in delegations {
            let result = self
                .dispatcher
                .dispatch(delegation.kind, &delegation.task)
                .await;
            self.record_result(turn, &result);
            results.push(result);
        }

        context.push_results(
            &response,
            &results,
            self.settings.task_preview_chars,
            self.settings.result_preview_chars,
        );
        None
    }

    fn record_result(&self, turn: u32, result: &DispatchResult) {
        self.events.emit(RunEvent::SubAgent {
            turn,
            agent: result.kind,
            task: result.task.clone(),
            result: truncate_chars(&result.output, self.settings.log_result_chars).to_string(),
            chars: result.output.chars().count(),
        });
    }
}
