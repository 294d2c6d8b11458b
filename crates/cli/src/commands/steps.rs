use haulquote_core::config::{AppConfig, LoadOptions};
use haulquote_core::{WizardLayout, WizardVariant};
use serde_json::{json, Value};

use crate::commands::CommandResult;

/// An explicit variant skips config loading entirely.
pub fn run(variant: Option<WizardVariant>) -> CommandResult {
    let variant = match variant {
        Some(variant) => variant,
        None => match AppConfig::load(LoadOptions::default()) {
            Ok(config) => config.wizard.variant,
            Err(error) => {
                return CommandResult::failure(
                    "steps",
                    "config_validation",
                    format!("configuration issue: {error}"),
                    2,
                );
            }
        },
    };

    let layout = WizardLayout::for_variant(variant);
    let steps: Vec<Value> = layout
        .steps()
        .iter()
        .enumerate()
        .map(|(index, step)| {
            json!({
                "index": index,
                "label": step.label,
                "fields": step.fields.iter().map(|field| json!({
                    "key": field.key.as_str(),
                    "kind": field.kind,
                    "required": field.required,
                })).collect::<Vec<_>>(),
            })
        })
        .collect();

    CommandResult::success_with_data(
        "steps",
        format!("{} layout with {} steps", variant.as_str(), layout.len()),
        Some(json!({ "variant": variant.as_str(), "steps": steps })),
    )
}
