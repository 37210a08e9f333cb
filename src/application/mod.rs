//! Application layer - commands and their handlers.
//!
//! This layer sequences domain operations and coordinates the ports:
//! loading, validating, deriving, persisting and publishing.

pub mod handlers;

pub use handlers::{
    CreateCycleCommand, CreateCycleError, CreateCycleHandler, CreateCycleResult, CycleLocks,
    CycleOrchestrator, ProposeTransitionCommand, TransitionError, TransitionOutcome,
};
