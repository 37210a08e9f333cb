//! Application handlers.
//!
//! Command handlers that orchestrate domain operations through the ports.

pub mod breeding;

pub use breeding::{
    CreateCycleCommand, CreateCycleError, CreateCycleHandler, CreateCycleResult, CycleLocks,
    CycleOrchestrator, ProposeTransitionCommand, TransitionError, TransitionOutcome,
};
