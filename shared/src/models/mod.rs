//! Data models
//!
//! Shared between booking-server and frontend (via API).
//! Table IDs are `i64`, booking IDs are UUID strings.

pub mod booking;
pub mod dining_table;
pub mod pricing;
pub mod stats;
pub mod zone;

// Re-exports
pub use booking::*;
pub use dining_table::*;
pub use pricing::*;
pub use stats::*;
pub use zone::*;
