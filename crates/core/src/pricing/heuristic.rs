use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::form::{CdlBand, FormFields};
use crate::domain::quote::PremiumBreakdown;

const BASE_PREMIUM: i64 = 750;
const PER_TRUCK: i64 = 140;
const BLANK_LOSS_RUNS_WITH_CONSENT: i64 = 35;
const RECENT_LOSS_SURCHARGE: i64 = 120;
const LOW_FLOOR: i64 = 350;

const HIGH_COST_LANES: [&str; 3] = ["CA", "NY", "NJ"];
const LOW_COST_LANES: [&str; 2] = ["TX", "OK"];

pub fn band_factor(band: Option<CdlBand>) -> Decimal {
    match band {
        Some(CdlBand::Elite) => Decimal::new(82, 2),
        Some(CdlBand::Preferred) => Decimal::new(95, 2),
        Some(CdlBand::Standard) => Decimal::new(115, 2),
        Some(CdlBand::Watchlist) => Decimal::new(135, 2),
        None => Decimal::new(12, 1),
    }
}

/// Lane multiplier; each lane group applies at most once however many codes match.
pub fn state_adjustment(states: &str) -> Decimal {
    let states = states.to_uppercase();
    let mut adjustment = Decimal::ONE;
    if HIGH_COST_LANES.iter().any(|lane| states.contains(lane)) {
        adjustment += Decimal::new(8, 2);
    }
    if LOW_COST_LANES.iter().any(|lane| states.contains(lane)) {
        adjustment -= Decimal::new(3, 2);
    }
    adjustment
}

// The two add-ons cannot both fire: the first needs blank text, the second needs "recent".
pub fn loss_adjustment(loss_runs: &str, consent: bool) -> Decimal {
    let loss_runs = loss_runs.trim();
    let mut adjustment = Decimal::ZERO;
    if loss_runs.is_empty() && consent {
        adjustment += Decimal::from(BLANK_LOSS_RUNS_WITH_CONSENT);
    }
    if loss_runs.to_lowercase().contains("recent") {
        adjustment += Decimal::from(RECENT_LOSS_SURCHARGE);
    }
    adjustment
}

/// `low` is floored at 350 and `high` is 12% above the estimate.
pub fn premium_bounds(estimated: Decimal) -> (Decimal, Decimal) {
    let low = (estimated * Decimal::new(92, 2)).max(Decimal::from(LOW_FLOOR));
    let high = estimated * Decimal::new(112, 2);
    (low, high)
}

pub fn round_currency(amount: Decimal) -> u64 {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(u64::MAX)
}

pub fn compute_breakdown(fields: &FormFields) -> PremiumBreakdown {
    let base = Decimal::from(BASE_PREMIUM);
    let per_truck = Decimal::from(PER_TRUCK) * Decimal::from(fields.trucks());
    let band_factor = band_factor(fields.cdl_band);
    let state_adjustment = state_adjustment(fields.states());
    let loss_adjustment = loss_adjustment(&fields.loss_runs, fields.consent);

    let estimated = (base + per_truck + loss_adjustment) * band_factor * state_adjustment;
    let (low, high) = premium_bounds(estimated);

    PremiumBreakdown {
        base,
        per_truck,
        band_factor,
        state_adjustment,
        loss_adjustment,
        estimated,
        low,
        high,
    }
}
