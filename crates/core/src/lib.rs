//! # Ori Core
//!
//! Domain types, traits, and error definitions for the Ori terminal agent.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The chat client and the command runner are defined as traits here.
//! Implementations live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod client;
pub mod directive;
pub mod error;
pub mod message;
pub mod runner;

// Re-export key types at crate root for ergonomics
pub use client::ChatCompletionClient;
pub use directive::{
    Directive, EditDirective, EditOperation, EditPayloadError, ExecutionOutcome, RunOutput, Segment,
};
pub use error::{ClientError, Error, Result};
pub use message::{Conversation, Message, Role};
pub use runner::CommandRunner;
