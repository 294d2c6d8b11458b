use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unrounded intermediate values behind an indication, kept for tracing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumBreakdown {
    pub base: Decimal,
    pub per_truck: Decimal,
    pub band_factor: Decimal,
    pub state_adjustment: Decimal,
    pub loss_adjustment: Decimal,
    pub estimated: Decimal,
    pub low: Decimal,
    pub high: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub low: u64,
    pub high: u64,
    pub headline: String,
    pub summary_items: Vec<String>,
    pub next_step_message: String,
    pub breakdown: PremiumBreakdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumRange {
    pub low: u64,
    pub high: u64,
}

impl QuoteResult {
    pub fn range(&self) -> PremiumRange {
        PremiumRange { low: self.low, high: self.high }
    }
}
