//! Application-level orchestration utilities.
//!
//! Runs the form's network jobs (image batches, listing submission) on the Tokio runtime
//! and reports each completion back to the UI layer, which owns the form state.

mod controller;

pub(crate) use controller::{run_controller, FormEvent, UiCommand};
