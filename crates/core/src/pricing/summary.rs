use crate::domain::form::{CdlBand, FormFields, Timeline};

pub const LIVE_INDICATION_NOTE: &str =
    "Live indication based on the details provided. \
     An agent will confirm carrier appetite and discounts.";
pub const FINAL_PRICING_FOOTNOTE: &str =
    "Final pricing may change after carrier underwriting, MVR review, and loss run validation.";

const DEFAULT_POLICY_FOCUS: &str = "Auto liability focus";

pub fn band_label(band: Option<CdlBand>) -> &'static str {
    match band {
        Some(CdlBand::Elite) => "Elite (0-1 points, clean MVRs)",
        Some(CdlBand::Preferred) => "Preferred (2-3 points)",
        Some(CdlBand::Standard) => "Standard (4-5 points)",
        Some(CdlBand::Watchlist) => "Watchlist (6+ points or recent major)",
        None => "Not specified",
    }
}

pub fn headline(low: u64, high: u64) -> String {
    format!("Estimated monthly premium: ${low} - ${high}")
}

pub fn summary_items(fields: &FormFields) -> Vec<String> {
    let trucks = fields.trucks();
    let mut items = vec![
        format!("{trucks} power unit{}", if trucks > 1 { "s" } else { "" }),
        format!("CDL band: {}", band_label(fields.cdl_band)),
    ];

    if fields.policies().is_empty() {
        items.push(format!("Policies: {DEFAULT_POLICY_FOCUS}"));
    } else {
        items.push(format!("Policies: {}", fields.policies().join(", ")));
    }

    if !fields.states().is_empty() {
        items.push(format!("Lanes: {}", fields.states()));
    }

    items.push(
        if fields.consent { "Consent to pull loss runs" } else { "Loss runs provided" }
            .to_string(),
    );
    items
}

pub fn next_step_message(timeline: Timeline) -> &'static str {
    match timeline {
        Timeline::Asap => "We will prioritize same-day binding.",
        Timeline::Week => "Expect bindable terms within a week for clean files.",
        Timeline::Flexible => "We will prepare options and hold until you are ready.",
    }
}
