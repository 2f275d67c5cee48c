//! Lightweight behavior tree library optimized for turn-based games.
//!
//! This library provides a minimal, deterministic behavior tree implementation
//! for turn-based tactics AI.
//!
//! - **No delta time**: Every tick completes immediately (turn-based semantics)
//! - **Running means retry**: A blocked action reports `Running`, not `Failure`
//! - **Stateless trees**: All memory lives in the context, never in nodes
//! - **Zero dependencies**: Pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`Behavior`]: Core trait for all nodes
//! - [`Leaf`]: Game-defined conditions and actions
//! - [`Status`]: Success, Failure or Running
//! - [`Node`]: Condition/Action leaves combined via Sequence/Selector

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod node;
pub mod status;

// Re-export core types for ergonomic API
pub use behavior::{Behavior, Leaf};
pub use composite::{tick_selector, tick_sequence};
pub use node::Node;
pub use status::Status;
