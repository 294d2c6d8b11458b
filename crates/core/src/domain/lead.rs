use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::form::{CdlBand, FormFields, Timeline};
use crate::domain::quote::{PremiumRange, QuoteResult};

/// Snapshot of a finished wizard run as sent to the intake endpoint.
///
/// Built once at submission time; there is no way to change it afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    full_name: String,
    email: String,
    phone: String,
    company: String,
    mc_number: String,
    trucks: u32,
    cdl_band: Option<CdlBand>,
    policies: Vec<String>,
    states: String,
    loss_runs: String,
    consent: bool,
    timeline: Timeline,
    range: PremiumRange,
    source: String,
    timestamp: String,
}

impl LeadPayload {
    pub fn capture(
        fields: &FormFields,
        result: &QuoteResult,
        source: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            full_name: fields.full_name.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            company: fields.company.clone(),
            mc_number: fields.mc_number.clone(),
            trucks: fields.trucks(),
            cdl_band: fields.cdl_band,
            policies: fields.policies().to_vec(),
            states: fields.states().to_string(),
            loss_runs: fields.loss_runs.trim().to_string(),
            consent: fields.consent,
            timeline: fields.timeline,
            range: result.range(),
            source: source.into(),
            timestamp: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn trucks(&self) -> u32 {
        self.trucks
    }

    pub fn range(&self) -> PremiumRange {
        self.range
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use crate::domain::form::{FieldKey, FormFields};
    use crate::domain::lead::LeadPayload;
    use crate::pricing::estimate;

    #[test]
    fn payload_flattens_fields_with_range_source_and_timestamp() {
        let mut fields = FormFields::default();
        fields.set_field(FieldKey::FullName, "Dana Ruiz");
        fields.set_field(FieldKey::Email, "dana@ruizfreight.test");
        fields.set_field(FieldKey::Phone, "555-0100");
        fields.set_field(FieldKey::Company, "Ruiz Freight LLC");
        fields.set_field(FieldKey::McNumber, "MC-123456");
        fields.set_field(FieldKey::Trucks, "2");
        fields.set_field(FieldKey::CdlBand, "preferred");
        fields.set_field(FieldKey::Policies, "Auto liability, Cargo");
        fields.set_field(FieldKey::States, "tx");
        fields.set_field(FieldKey::LossRuns, "   ");
        fields.set_field(FieldKey::Consent, "on");

        let result = estimate(&fields);
        let submitted_at = Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).single().expect("time");
        let payload = LeadPayload::capture(&fields, &result, "insure.supertruck.ai", submitted_at);

        let value = serde_json::to_value(&payload).expect("payload serializes");
        assert_eq!(
            value,
            json!({
                "fullName": "Dana Ruiz",
                "email": "dana@ruizfreight.test",
                "phone": "555-0100",
                "company": "Ruiz Freight LLC",
                "mcNumber": "MC-123456",
                "trucks": 2,
                "cdlBand": "preferred",
                "policies": ["Auto liability", "Cargo"],
                "states": "TX",
                "lossRuns": "",
                "consent": true,
                "timeline": "asap",
                "range": { "low": 903, "high": 1099 },
                "source": "insure.supertruck.ai",
                "timestamp": "2026-03-14T15:09:26.000Z"
            })
        );
    }

    #[test]
    fn unset_band_serializes_as_null() {
        let fields = FormFields::default();
        let result = estimate(&fields);
        let payload = LeadPayload::capture(&fields, &result, "test", Utc::now());

        let value = serde_json::to_value(&payload).expect("payload serializes");
        assert!(value["cdlBand"].is_null());
        assert_eq!(value["trucks"], 1);
        assert_eq!(payload.range(), result.range());
    }
}
