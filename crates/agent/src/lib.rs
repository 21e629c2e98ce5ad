//! The orchestration loop of agentrelay.
//!
//! A main agent reads the challenge and answers with delegations:
//!
//! 1. **Ask** the main agent, passing the whole conversation context
//! 2. **Parse** `@TOOLS:`, `@CODE:` and `@TEXT:` delegations out of its reply
//! 3. **Dispatch** each delegation to its sub-agent, in order
//! 4. **Fold** the results back into the context and ask again
//!
//! A reply with no delegations either declares the challenge done or earns a
//! nudge. The loop also stops on an empty reply or when the turn budget runs
//! out.

pub mod context;
pub mod dispatcher;
pub mod loop_runner;
pub mod parser;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use context::{truncate_chars, ConversationContext};
pub use dispatcher::{AgentDispatcher, DispatchResult};
pub use loop_runner::{LoopSettings, RunOutcome, StopReason, TurnLoop, TurnState};
pub use parser::{parse_delegations, scan_markers, task_spans, Delegation, Marker};
