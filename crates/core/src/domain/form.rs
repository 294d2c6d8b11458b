use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Driver-risk band reported for the fleet's CDL holders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CdlBand {
    Elite,
    Preferred,
    Standard,
    Watchlist,
}

impl CdlBand {
    pub const ALL: [CdlBand; 4] = [Self::Elite, Self::Preferred, Self::Standard, Self::Watchlist];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Elite => "elite",
            Self::Preferred => "preferred",
            Self::Standard => "standard",
            Self::Watchlist => "watchlist",
        }
    }

    /// Lenient parse used for raw form input; anything unrecognized is "not specified".
    pub fn from_input(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl FromStr for CdlBand {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "elite" => Ok(Self::Elite),
            "preferred" => Ok(Self::Preferred),
            "standard" => Ok(Self::Standard),
            "watchlist" => Ok(Self::Watchlist),
            other => Err(format!(
                "unsupported cdl band `{other}` (expected elite|preferred|standard|watchlist)"
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeline {
    #[default]
    Asap,
    Week,
    Flexible,
}

impl Timeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asap => "asap",
            Self::Week => "week",
            Self::Flexible => "flexible",
        }
    }

    /// Blank input falls back to `asap`; unknown values take the "hold until ready" path.
    pub fn from_input(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "asap" => Self::Asap,
            "week" => Self::Week,
            _ => Self::Flexible,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    FullName,
    Email,
    Phone,
    Company,
    McNumber,
    Trucks,
    CdlBand,
    Policies,
    States,
    LossRuns,
    Consent,
    Timeline,
}

impl FieldKey {
    pub const ALL: [FieldKey; 12] = [
        Self::FullName,
        Self::Email,
        Self::Phone,
        Self::Company,
        Self::McNumber,
        Self::Trucks,
        Self::CdlBand,
        Self::Policies,
        Self::States,
        Self::LossRuns,
        Self::Consent,
        Self::Timeline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Company => "company",
            Self::McNumber => "mcNumber",
            Self::Trucks => "trucks",
            Self::CdlBand => "cdlBand",
            Self::Policies => "policies",
            Self::States => "states",
            Self::LossRuns => "lossRuns",
            Self::Consent => "consent",
            Self::Timeline => "timeline",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', '-'], "");
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| format!("unknown form field `{}`", value.trim()))
    }
}

/// Everything the user has typed into the wizard for one session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFields {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub mc_number: String,
    trucks: u32,
    pub cdl_band: Option<CdlBand>,
    policies: Vec<String>,
    states: String,
    pub loss_runs: String,
    pub consent: bool,
    pub timeline: Timeline,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            mc_number: String::new(),
            trucks: 1,
            cdl_band: None,
            policies: Vec::new(),
            states: String::new(),
            loss_runs: String::new(),
            consent: false,
            timeline: Timeline::Asap,
        }
    }
}

impl FormFields {
    pub fn trucks(&self) -> u32 {
        self.trucks
    }

    /// Zero coerces to one so the fleet always has at least one power unit.
    pub fn set_trucks(&mut self, trucks: u32) {
        self.trucks = trucks.max(1);
    }

    /// Non-numeric, negative or zero input coerces to one.
    pub fn set_trucks_input(&mut self, raw: &str) {
        self.set_trucks(raw.trim().parse::<u32>().unwrap_or(1));
    }

    pub fn policies(&self) -> &[String] {
        &self.policies
    }

    /// Adds or removes a coverage type, keeping first-selection order.
    pub fn set_policy(&mut self, policy: &str, selected: bool) {
        let policy = policy.trim();
        if policy.is_empty() {
            return;
        }
        let existing = self.policies.iter().position(|candidate| candidate == policy);
        match (existing, selected) {
            (None, true) => self.policies.push(policy.to_string()),
            (Some(index), false) => {
                self.policies.remove(index);
            }
            _ => {}
        }
    }

    pub fn replace_policies<I, S>(&mut self, policies: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.policies.clear();
        for policy in policies {
            self.set_policy(policy.as_ref(), true);
        }
    }

    pub fn states(&self) -> &str {
        &self.states
    }

    pub fn set_states(&mut self, raw: &str) {
        self.states = raw.to_uppercase();
    }

    pub fn loss_runs_provided(&self) -> bool {
        !self.loss_runs.trim().is_empty()
    }

    /// Writes one field from raw form input.
    pub fn set_field(&mut self, key: FieldKey, raw: &str) {
        match key {
            FieldKey::FullName => self.full_name = raw.to_string(),
            FieldKey::Email => self.email = raw.to_string(),
            FieldKey::Phone => self.phone = raw.to_string(),
            FieldKey::Company => self.company = raw.to_string(),
            FieldKey::McNumber => self.mc_number = raw.to_string(),
            FieldKey::Trucks => self.set_trucks_input(raw),
            FieldKey::CdlBand => self.cdl_band = CdlBand::from_input(raw),
            FieldKey::Policies => {
                self.replace_policies(raw.split(',').map(str::trim).filter(|p| !p.is_empty()))
            }
            FieldKey::States => self.set_states(raw),
            FieldKey::LossRuns => self.loss_runs = raw.to_string(),
            FieldKey::Consent => self.consent = parse_checkbox(raw),
            FieldKey::Timeline => self.timeline = Timeline::from_input(raw),
        }
    }

    /// Reads one field back as the value a form control would hold.
    pub fn field_value(&self, key: FieldKey) -> String {
        match key {
            FieldKey::FullName => self.full_name.clone(),
            FieldKey::Email => self.email.clone(),
            FieldKey::Phone => self.phone.clone(),
            FieldKey::Company => self.company.clone(),
            FieldKey::McNumber => self.mc_number.clone(),
            FieldKey::Trucks => self.trucks.to_string(),
            FieldKey::CdlBand => {
                self.cdl_band.map(|band| band.as_str().to_string()).unwrap_or_default()
            }
            FieldKey::Policies => self.policies.join(", "),
            FieldKey::States => self.states.clone(),
            FieldKey::LossRuns => self.loss_runs.clone(),
            FieldKey::Consent => String::from(if self.consent { "on" } else { "" }),
            FieldKey::Timeline => self.timeline.as_str().to_string(),
        }
    }
}

fn parse_checkbox(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "on" | "true" | "yes" | "1" | "checked")
}
