//! Wire protocol for the task backend.
//!
//! [`encoder`] turns a validated draft into an inspectable multipart
//! payload, [`submit`] sends it, and [`query`] retrieves and searches
//! the technician's previously submitted tasks. Both endpoints are
//! consumed, never served; the bearer credential arrives as an explicit
//! [`fieldtask_core::session::AuthSession`] value.

pub mod encoder;
pub mod error;
pub mod query;
pub mod submit;
