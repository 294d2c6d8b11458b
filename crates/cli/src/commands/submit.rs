use std::sync::Arc;

use anyhow::Context;
use haulquote_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use haulquote_core::{
    AdvanceOutcome, ApplicationError, DeliveryStatus, DomainError, FieldKey, InMemoryLeadTransport,
    LeadSubmitter, QuoteResult, WizardLayout, WizardSession, WizardVariant,
};
use serde_json::json;
use tracing::info;

use crate::commands::CommandResult;
use crate::FormArgs;

const COMMAND: &str = "submit";

#[derive(Clone, Debug, Default)]
pub struct SubmitOptions {
    pub endpoint: Option<String>,
    pub variant: Option<WizardVariant>,
    pub dry_run: bool,
}

pub fn run(form: &FormArgs, options: SubmitOptions) -> CommandResult {
    let overrides = ConfigOverrides {
        lead_endpoint: options.endpoint.clone(),
        wizard_variant: options.variant,
        ..ConfigOverrides::default()
    };
    let config = match AppConfig::load(LoadOptions { overrides, ..LoadOptions::default() }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let recorder = InMemoryLeadTransport::default();
    let mut session = if options.dry_run {
        WizardSession::new(
            WizardLayout::for_variant(config.wizard.variant),
            LeadSubmitter::new(Arc::new(recorder.clone()), config.lead.timeout()),
        )
        .with_contact(config.contact.clone())
        .with_source(config.lead.source.clone())
    } else {
        match WizardSession::from_config(&config) {
            Ok(session) => session,
            Err(error) => {
                let error = ApplicationError::from(error);
                return CommandResult::failure(COMMAND, error.error_class(), error.to_string(), 4);
            }
        }
    };

    for (key, value) in form.entries() {
        session.set_field(key, &value);
    }

    if let Some(blocked) = walk_steps(&mut session) {
        return blocked;
    }

    let status = match deliver(&mut session, present_quote) {
        Ok(status) => status,
        Err(error) => {
            return CommandResult::failure(COMMAND, "runtime", format!("{error:#}"), 5);
        }
    };

    let payload = if options.dry_run { recorder.payloads().into_iter().next() } else { None };
    let data = json!({
        "session_id": session.id().to_string(),
        "quote": session.last_result(),
        "delivery": status,
        "fallback_contact": {
            "phone": session.contact().phone,
            "phone_uri": session.contact().phone_uri(),
            "email": session.contact().email,
        },
        "dry_run": options.dry_run,
        "payload": payload,
    });
    CommandResult::success_with_data(COMMAND, status.message.clone(), Some(data))
}

/// Advances through every step. Returns the failure envelope when a step blocks.
fn walk_steps(session: &mut WizardSession) -> Option<CommandResult> {
    loop {
        match session.advance() {
            AdvanceOutcome::Moved { .. } => continue,
            AdvanceOutcome::SubmitRequested => return None,
            AdvanceOutcome::Blocked { step, missing_fields } => {
                let label = session.navigator().layout().hint(step).to_string();
                let missing = missing_fields.iter().map(FieldKey::as_str).collect::<Vec<_>>();
                return Some(CommandResult::failure_with_data(
                    COMMAND,
                    "step_incomplete",
                    format!("step {} ({label}) is missing: {}", step + 1, missing.join(", ")),
                    3,
                    Some(json!({ "step": step, "label": label, "missing_fields": missing })),
                ));
            }
            AdvanceOutcome::Busy => {
                let error = ApplicationError::from(DomainError::SubmissionInProgress);
                return Some(CommandResult::failure(
                    COMMAND,
                    error.error_class(),
                    error.to_string(),
                    3,
                ));
            }
        }
    }
}

/// Prices and captures the lead, hands the quote to `on_quote`, then delivers.
/// `on_quote` runs before the network call starts.
fn deliver(
    session: &mut WizardSession,
    on_quote: impl FnOnce(&QuoteResult),
) -> anyhow::Result<DeliveryStatus> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize async runtime")?;
    let pending = session.begin_submission().context("lead submission could not start")?;
    if let Some(result) = session.last_result() {
        on_quote(result);
    }
    let report = runtime.block_on(pending.run());
    Ok(session.complete_submission(report).clone())
}

fn present_quote(result: &QuoteResult) {
    info!(
        event_name = "quote.presented",
        low = result.low,
        high = result.high,
        headline = %result.headline,
        "quote ready, delivering lead"
    );
}
