//! Batches: what a store has baking, and when it will be ready.

pub mod dashboard;
pub mod publish;
pub mod readiness;

pub use dashboard::{BatchLine, DashboardAggregate, DashboardView, LoadOutcome};
pub use publish::{BatchForm, ReadyIn, publish};
pub use readiness::{Readiness, label};
