//! Event classification and aggregation
//!
//! Turns a user's raw event feed into a short list of readable lines: pushes
//! are summarized per repository, everything else is described one event at a
//! time, most recent first.

pub mod aggregate;
pub mod classify;
pub mod compose;
pub mod resolve;


pub use aggregate::{aggregate, PushSummary};
pub use classify::classify;
pub use compose::{compose, ActivityComposer, ActivityReport};
