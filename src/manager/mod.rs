//! Token lifecycle and the batch refresh loop.

pub mod lifecycle;
pub mod scheduler;

pub use lifecycle::{TokenLifecycle, UpdateOutcome};
pub use scheduler::{BatchOutcome, BatchScheduler};
