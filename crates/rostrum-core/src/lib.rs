//! # Rostrum Core
//!
//! Core types for Rostrum debate sessions:
//! - [`Agent`] - a participant with a role, system message and input source
//! - [`InputSource`] - model binding or human-supplied value, never both
//! - [`MessageHistory`] / [`TurnRecord`] - append-only, hashed utterances
//! - [`ModelConfig`] - model choice and sampling parameters
//! - [`format_transcript`] - rendering a history for the judge

pub mod agent;
pub mod hash;
pub mod history;
pub mod model;
pub mod transcript;

pub use agent::{Agent, AgentCapability, AgentId, AgentRole, DebateSide, InputSource, UnknownSide};
pub use hash::ContentHash;
pub use history::{MessageHistory, Speaker, TurnRecord};
pub use model::{ModelConfig, ModelPreset, ModelSelection, UnknownPreset, FEEDBACK_TEMPERATURE};
pub use transcript::format_transcript;
