//! The directive loop — the heart of Ori.
//!
//! Each user request follows the same cycle:
//!
//! 1. **Send** the conversation to the model
//! 2. **Parse** the reply into literal text and embedded directives
//! 3. **Gate** each directive through confirmation
//! 4. **Execute** confirmed directives and feed the outcomes back as
//!    synthetic user messages
//! 5. **Re-query** the model with the grown conversation
//!
//! The loop ends when a reply carries no directives, or when the directive
//! turn limit is reached.

pub mod gate;
pub mod loop_runner;
pub mod observer;
pub mod prompt;

pub use gate::{Confirm, ExecutionGate, GateDecision};
pub use loop_runner::AgentLoop;
pub use observer::{NullObserver, TurnObserver};
pub use prompt::SYSTEM_PROMPT;
