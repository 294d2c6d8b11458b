use serde::{Deserialize, Serialize};

use crate::domain::quote::QuoteResult;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryStatus {
    pub delivered: bool,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    pub current_step_index: usize,
    pub is_submitting: bool,
    pub last_result: Option<QuoteResult>,
    pub delivery_status: Option<DeliveryStatus>,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }
}
