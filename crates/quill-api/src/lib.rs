//! Quill API Library
//!
//! HTTP handlers, the submission pipeline and application setup.

mod handlers;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::{SubmissionOrchestrator, UploadOrchestrator};
pub use state::{AppState, Collaborators};
