//! Shared types for the seat booking server
//!
//! Wire models, error codes and response structures used by the
//! booking server and its API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
