//! Seat Pricing Engine
//!
//! Pure functions over an already-fetched catalog snapshot:
//!
//! ```text
//! selected seats ─▶ group_by_table ─▶ price_group (per table) ─▶ PriceBreakdown
//! ```
//!
//! No storage access happens here. The caller (booking manager or price
//! preview) reads tables and zone policies once and passes them in.

mod calculator;
mod error;
mod grouping;

pub use calculator::*;
pub use error::*;
pub use grouping::*;

use shared::models::{DiningTable, ZonePolicy};
use std::collections::HashMap;

/// Table catalog snapshot keyed by table id
pub type TableCatalog = HashMap<i64, DiningTable>;

/// Zone policies keyed by zone id
pub type ZonePolicies = HashMap<String, ZonePolicy>;
