pub mod heuristic;
pub mod summary;

use crate::domain::form::FormFields;
use crate::domain::quote::QuoteResult;

pub use heuristic::{band_factor, compute_breakdown, premium_bounds, round_currency};
pub use summary::{band_label, FINAL_PRICING_FOOTNOTE, LIVE_INDICATION_NOTE};

pub trait PremiumEstimator: Send + Sync {
    fn estimate(&self, fields: &FormFields) -> QuoteResult;
}

/// The broker's rule-of-thumb indication. Not an actuarial model.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicPremiumEstimator;

impl PremiumEstimator for HeuristicPremiumEstimator {
    fn estimate(&self, fields: &FormFields) -> QuoteResult {
        estimate(fields)
    }
}

pub fn estimate(fields: &FormFields) -> QuoteResult {
    let breakdown = compute_breakdown(fields);
    let low = round_currency(breakdown.low);
    let high = round_currency(breakdown.high);

    QuoteResult {
        low,
        high,
        headline: summary::headline(low, high),
        summary_items: summary::summary_items(fields),
        next_step_message: summary::next_step_message(fields.timeline).to_string(),
        breakdown,
    }
}
