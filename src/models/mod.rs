//! Request and response models for the voting backend
//!
//! Mirrors the backend's JSON envelope contract.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::VoteRequest;
pub use responses::{ApiResponse, Envelope};
