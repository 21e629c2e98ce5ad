//! # agentrelay Core
//!
//! Domain types, traits, and error definitions for the agentrelay
//! orchestrator. This crate has **no I/O of its own**. It defines the
//! vocabulary the other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (the generative service, the shell, the event
//! log) is a trait here. Implementations live in their respective crates,
//! which keeps the orchestration loop testable with scripted stand-ins.

pub mod agent;
pub mod error;
pub mod event;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use agent::{AgentConfig, AgentKind, DelegationKind, DEFAULT_AGENT_MODEL};
pub use error::{ProviderError, ToolError};
pub use event::{EventRecord, EventSink, RunEvent};
pub use provider::{GenerateOptions, GenerateRequest, Provider};
pub use tool::{ShellOutput, ShellRunner};
