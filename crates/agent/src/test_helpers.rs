//! Shared test doubles for the orchestration tests.

use agentrelay_core::error::{ProviderError, ToolError};
use agentrelay_core::provider::{GenerateOptions, GenerateRequest, Provider};
use agentrelay_core::tool::{ShellOutput, ShellRunner};
use agentrelay_providers::{GenerativeClient, RetryPolicy};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A provider that answers from a per-model script.
///
/// Each model has its own queue of outcomes; once a queue runs dry the
/// provider falls back to a fixed reply. Every request is logged.
pub struct ScriptedProvider {
    scripts: Mutex<HashMap<String, VecDeque<Result<String, ProviderError>>>>,
    fallback: String,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            fallback: String::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Reply used when a model's script is exhausted.
    pub fn with_fallback(mut self, reply: &str) -> Self {
        self.fallback = reply.into();
        self
    }

    /// Queue successful replies for `model`.
    pub fn script(self, model: &str, replies: &[&str]) -> Self {
        {
            let mut scripts = self.scripts.lock().unwrap();
            let queue = scripts.entry(model.into()).or_default();
            queue.extend(replies.iter().map(|r| Ok(r.to_string())));
        }
        self
    }

    /// Queue `count` transport failures for `model`.
    pub fn failing(self, model: &str, count: usize) -> Self {
        {
            let mut scripts = self.scripts.lock().unwrap();
            let queue = scripts.entry(model.into()).or_default();
            for _ in 0..count {
                queue.push_back(Err(ProviderError::Network("connection refused".into())));
            }
        }
        self
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests sent to `model`.
    pub fn calls_to(&self, model: &str) -> usize {
        self.requests().iter().filter(|r| r.model == model).count()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&request.model)
            .and_then(|queue| queue.pop_front());
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

/// Wrap a provider in a client that retries without waiting.
pub fn client(provider: Arc<ScriptedProvider>) -> Arc<GenerativeClient> {
    Arc::new(GenerativeClient::new(
        provider,
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::ZERO,
        },
        GenerateOptions::default(),
    ))
}

/// How a [`RecordingShell`] answers.
#[derive(Clone)]
pub enum ShellBehavior {
    /// Echo the command back on stdout
    Echo,
    /// Return this output for every command
    Fixed(ShellOutput),
    /// Report a timeout
    TimeOut,
}

/// A shell runner that records commands instead of executing them.
pub struct RecordingShell {
    behavior: ShellBehavior,
    commands: Mutex<Vec<String>>,
}

impl RecordingShell {
    pub fn new(behavior: ShellBehavior) -> Self {
        Self {
            behavior,
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn echo() -> Self {
        Self::new(ShellBehavior::Echo)
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ShellRunner for RecordingShell {
    async fn run(&self, command: &str) -> Result<ShellOutput, ToolError> {
        self.commands.lock().unwrap().push(command.to_string());
        match &self.behavior {
            ShellBehavior::Echo => Ok(ShellOutput {
                stdout: format!("ran {command}"),
                stderr: String::new(),
                exit_code: 0,
            }),
            ShellBehavior::Fixed(output) => Ok(output.clone()),
            ShellBehavior::TimeOut => Err(ToolError::Timeout { timeout_secs: 60 }),
        }
    }
}
