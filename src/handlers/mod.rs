//! HTTP request handlers
//!
//! - `api` - Liveness and health/capability endpoints
//! - `speech` - OpenAI-compatible speech synthesis
//! - `voices` - Voice alias listing

pub mod api;
pub mod speech;
pub mod voices;
