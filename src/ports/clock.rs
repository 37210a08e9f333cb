//! Clock port - source of the current time.
//!
//! Every time-dependent derivation takes an explicit `now`; the
//! application layer reads it from this port so tests can pin it.

use crate::domain::foundation::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
