//! Security Module
//!
//! Classification of security-policy responses and the state the UI renders.

mod classifier;
mod guard;
mod state;

pub use classifier::{classify, SecurityError, SecurityErrorKind};
pub use guard::{SecurityGuard, SUBMIT_VOTE_OPERATION};
pub use state::{SecurityPhase, SecurityState};
