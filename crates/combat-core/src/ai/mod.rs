//! Autonomous decision making: capabilities, trees, contexts and pacing.

pub mod capability;
pub mod context;
pub mod scheduler;
pub mod tree;

pub use capability::{Capability, CapabilityError, CapabilityResult, TacticalCapabilities};
pub use context::AiContext;
pub use scheduler::{AiScheduler, TaskCallback};
pub use tree::{TacticalTree, evaluate, reference_tree};
