use rust_decimal::Decimal;
use shared::models::{DiningTable, PriceBreakdown, SelectedSeat, ZonePolicy};

use crate::pricing::{self, PricingResult, TableCatalog, ZonePolicies};

/// Tables and zone policies read together from one transaction
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub tables: TableCatalog,
    pub policies: ZonePolicies,
}

impl CatalogSnapshot {
    pub fn from_parts(tables: Vec<DiningTable>, zones: Vec<ZonePolicy>) -> Self {
        Self {
            tables: tables.into_iter().map(|t| (t.id, t)).collect(),
            policies: zones.into_iter().map(|z| (z.id.clone(), z)).collect(),
        }
    }

    pub fn price(&self, selected: &[SelectedSeat]) -> PricingResult<PriceBreakdown> {
        pricing::calculate_detailed_price(selected, &self.tables, &self.policies)
    }

    /// Price a selection for display, rejecting seats that are already booked
    pub fn preview(&self, selected: &[SelectedSeat]) -> PricingResult<PriceBreakdown> {
        let breakdown = self.price(selected)?;
        pricing::ensure_unbooked(selected, &self.tables)?;
        Ok(breakdown)
    }

    pub fn total(&self, selected: &[SelectedSeat]) -> PricingResult<Decimal> {
        pricing::calculate_total_price(selected, &self.tables, &self.policies)
    }

    pub fn zone_of(&self, table_id: i64) -> Option<&str> {
        self.tables.get(&table_id).map(|t| t.zone.as_str())
    }
}
