use std::sync::Arc;
use std::time::Duration;

use haulquote_core::config::{AppConfig, ContactConfig};
use haulquote_core::{
    AdvanceOutcome, DeliveryError, FieldKey, InMemoryAuditSink, InMemoryLeadTransport,
    LeadSubmitter, WizardLayout, WizardSession, WizardVariant,
};

fn fill_scenario_one(session: &mut WizardSession) {
    session.set_field(FieldKey::FullName, "Dana Ruiz");
    session.set_field(FieldKey::Email, "dana@ruizfreight.test");
    session.set_field(FieldKey::Phone, "555-0100");
    session.set_field(FieldKey::Company, "Ruiz Freight LLC");
    session.set_field(FieldKey::McNumber, "MC-123456");
    session.set_field(FieldKey::Trucks, "2");
    session.set_field(FieldKey::CdlBand, "preferred");
    session.set_field(FieldKey::States, "TX");
    session.set_field(FieldKey::LossRuns, "");
    session.set_field(FieldKey::Consent, "on");
    session.set_field(FieldKey::Timeline, "asap");
}

fn walk_to_submit(session: &mut WizardSession) {
    loop {
        match session.advance() {
            AdvanceOutcome::Moved { .. } => continue,
            AdvanceOutcome::SubmitRequested => return,
            other => panic!("unexpected outcome while walking the wizard: {other:?}"),
        }
    }
}

#[tokio::test]
async fn delivered_lead_reports_success_after_quote() {
    let transport = InMemoryLeadTransport::default();
    let sink = InMemoryAuditSink::default();
    let mut session = WizardSession::new(
        WizardLayout::standard(),
        LeadSubmitter::new(Arc::new(transport.clone()), Duration::from_secs(1)),
    )
    .with_audit_sink(Arc::new(sink.clone()));
    fill_scenario_one(&mut session);

    walk_to_submit(&mut session);
    let status = session.submit().await.expect("submit");

    let result = session.last_result().expect("quote");
    assert_eq!((result.low, result.high), (903, 1099));
    assert_eq!(result.headline, "Estimated monthly premium: $903 - $1099");
    assert!(status.delivered);
    assert_eq!(transport.payloads().len(), 1);
    assert_eq!(
        sink.event_types(),
        vec![
            "wizard.step_advanced".to_string(),
            "wizard.step_advanced".to_string(),
            "wizard.step_advanced".to_string(),
            "quote.estimated".to_string(),
            "lead.delivered".to_string(),
        ]
    );
}

#[tokio::test]
async fn delivery_failure_still_shows_quote_then_fallback_contact() {
    let contact = ContactConfig {
        phone: "+1 (312) 555-0199".to_string(),
        email: "desk@broker.test".to_string(),
    };
    let mut session = WizardSession::new(
        WizardLayout::standard(),
        LeadSubmitter::new(
            Arc::new(InMemoryLeadTransport::failing(DeliveryError::Transport(
                "connection refused".to_string(),
            ))),
            Duration::from_secs(1),
        ),
    )
    .with_contact(contact);
    fill_scenario_one(&mut session);
    walk_to_submit(&mut session);

    let pending = session.begin_submission().expect("begin");
    let headline = session.last_result().map(|result| result.headline.clone());
    assert_eq!(headline.as_deref(), Some("Estimated monthly premium: $903 - $1099"));
    assert!(session.state().is_submitting);
    assert!(session.delivery_status().is_none());

    let report = tokio::spawn(pending.run()).await.expect("delivery task");
    let status = session.complete_submission(report).clone();

    assert!(!status.delivered);
    assert_eq!(
        status.message,
        "We could not reach the server. Please call +1 (312) 555-0199 or email desk@broker.test."
    );
    assert!(!session.state().is_submitting);
    assert!(session.last_result().is_some());
}

#[tokio::test]
async fn unconfigured_endpoint_follows_the_fallback_path() {
    let mut session = WizardSession::from_config(&AppConfig::default()).expect("session");
    fill_scenario_one(&mut session);
    walk_to_submit(&mut session);

    let status = session.submit().await.expect("submit");

    assert!(!status.delivered);
    assert!(status.message.starts_with("We could not reach the server."));
    assert!(!session.state().is_submitting);
}

#[test]
fn extended_variant_adds_an_authority_step() {
    let mut config = AppConfig::default();
    config.wizard.variant = WizardVariant::Extended;
    let mut session = WizardSession::from_config(&config).expect("session");
    session.set_field(FieldKey::FullName, "Dana Ruiz");
    session.set_field(FieldKey::Email, "dana@ruizfreight.test");
    session.set_field(FieldKey::Phone, "555-0100");
    session.set_field(FieldKey::Company, "Ruiz Freight LLC");

    assert_eq!(session.navigator().step_count(), 5);
    assert_eq!(session.advance(), AdvanceOutcome::Moved { from: 0, to: 1 });
    assert_eq!(
        session.advance(),
        AdvanceOutcome::Blocked { step: 1, missing_fields: vec![FieldKey::McNumber] }
    );

    session.set_field(FieldKey::McNumber, "MC-123456");
    assert_eq!(session.advance(), AdvanceOutcome::Moved { from: 1, to: 2 });
    assert!(session.retreat());
    assert_eq!(session.field_value(FieldKey::McNumber), "MC-123456");
}
