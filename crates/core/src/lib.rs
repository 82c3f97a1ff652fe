//! Domain model for the fieldtask capture-and-submission pipeline.
//!
//! Holds the client-side task record under construction
//! ([`task::TaskDraft`] with its bounded [`task::ImageBuffer`]), the
//! server-confirmed [`submitted::SubmittedTask`], the authenticated
//! session value threaded through every network call, and the canonical
//! wire field names of the submission endpoint.

pub mod fields;
pub mod session;
pub mod submitted;
pub mod task;
pub mod types;
