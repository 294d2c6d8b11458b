use haulquote_core::estimate;
use haulquote_core::pricing::{FINAL_PRICING_FOOTNOTE, LIVE_INDICATION_NOTE};
use serde_json::json;

use crate::commands::CommandResult;
use crate::FormArgs;

pub fn run(form: &FormArgs) -> CommandResult {
    let result = estimate(&form.to_fields());
    let headline = result.headline.clone();

    let data = json!({
        "quote": result,
        "notes": [LIVE_INDICATION_NOTE, FINAL_PRICING_FOOTNOTE],
    });
    CommandResult::success_with_data("estimate", headline, Some(data))
}
