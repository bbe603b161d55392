//! lunchcast: turn today's weather into a lunch suggestion and email it.

pub mod cli;
pub mod pipeline;

pub use pipeline::{run_once, Delivery, RunOutcome};
