//! Breeding handlers - create cycles and drive their transitions.

mod create_cycle;
mod cycle_locks;
mod errors;
mod orchestrator;
mod publishing;

pub use create_cycle::{CreateCycleCommand, CreateCycleHandler, CreateCycleResult};
pub use cycle_locks::{CycleLockGuard, CycleLocks};
pub use errors::{CreateCycleError, TransitionError};
pub use orchestrator::{CycleOrchestrator, ProposeTransitionCommand, TransitionOutcome};
