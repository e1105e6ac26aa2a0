//! Client Module
//!
//! HTTP access to the voting backend.
//!
//! # Endpoints
//! - `GET /api/status`, `/api/count`, `/api/history`, `/api/queue-status`,
//!   `/api/session-debug`, `/api/health` - cached reads
//! - `POST /api/vote` - guarded vote submission

pub mod api;
pub mod reads;

pub use api::VotingApi;
pub use reads::{ReadCache, ReadCacheStats, ReadEndpoint};
