use serde::{Deserialize, Serialize};

use crate::domain::form::{FieldKey, FormFields};
use crate::wizard::state::WizardState;
use crate::wizard::steps::{StepDefinition, WizardLayout};
use crate::wizard::validator::{RequiredFieldValidator, StepValidator};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvanceOutcome {
    Moved { from: usize, to: usize },
    /// The current step is incomplete; the index did not change.
    Blocked { step: usize, missing_fields: Vec<FieldKey> },
    /// The last step is complete and the caller should submit.
    SubmitRequested,
    /// A submission is in flight, so the finish control is disabled.
    Busy,
}

/// Linear step machine over a [`WizardLayout`].
///
/// The navigator owns no session data: it reads [`FormFields`] and mutates the
/// [`WizardState`] handed to it, so one navigator can serve many sessions.
pub struct StepNavigator<V = RequiredFieldValidator> {
    layout: WizardLayout,
    validator: V,
}

impl StepNavigator<RequiredFieldValidator> {
    pub fn new(layout: WizardLayout) -> Self {
        Self::with_validator(layout, RequiredFieldValidator)
    }
}

impl Default for StepNavigator<RequiredFieldValidator> {
    fn default() -> Self {
        Self::new(WizardLayout::standard())
    }
}

impl<V> StepNavigator<V>
where
    V: StepValidator,
{
    pub fn with_validator(layout: WizardLayout, validator: V) -> Self {
        Self { layout, validator }
    }

    pub fn layout(&self) -> &WizardLayout {
        &self.layout
    }

    pub fn step_count(&self) -> usize {
        self.layout.len()
    }

    pub fn current_step(&self, state: &WizardState) -> Option<&StepDefinition> {
        self.layout.step(state.current_step_index).ok()
    }

    pub fn is_last_step(&self, state: &WizardState) -> bool {
        state.current_step_index >= self.layout.last_index()
    }

    pub fn advance(&self, state: &mut WizardState, fields: &FormFields) -> AdvanceOutcome {
        if state.is_submitting {
            return AdvanceOutcome::Busy;
        }

        let current = state.current_step_index.min(self.layout.last_index());
        let missing_fields = match self.layout.step(current) {
            Ok(step) => self.validator.missing_fields(step, fields),
            Err(_) => Vec::new(),
        };
        if !missing_fields.is_empty() {
            return AdvanceOutcome::Blocked { step: current, missing_fields };
        }

        if current == self.layout.last_index() {
            return AdvanceOutcome::SubmitRequested;
        }

        state.current_step_index = current + 1;
        AdvanceOutcome::Moved { from: current, to: state.current_step_index }
    }

    /// First step, in layout order, that still has missing required fields.
    pub fn first_incomplete_step(&self, fields: &FormFields) -> Option<(usize, Vec<FieldKey>)> {
        self.layout.steps().iter().enumerate().find_map(|(index, step)| {
            let missing = self.validator.missing_fields(step, fields);
            (!missing.is_empty()).then_some((index, missing))
        })
    }

    /// Going back never validates. Returns whether the index moved.
    pub fn retreat(&self, state: &mut WizardState) -> bool {
        if state.current_step_index == 0 {
            return false;
        }
        state.current_step_index = (state.current_step_index - 1).min(self.layout.last_index());
        true
    }

    pub fn can_retreat(&self, state: &WizardState) -> bool {
        state.current_step_index > 0
    }

    pub fn progress_percent(&self, state: &WizardState) -> f64 {
        (state.current_step_index as f64 + 1.0) / self.layout.len() as f64 * 100.0
    }

    pub fn current_hint(&self, state: &WizardState) -> &str {
        self.layout.hint(state.current_step_index)
    }

    pub fn progress_label(&self, state: &WizardState) -> String {
        format!("Step {} of {}", state.current_step_index + 1, self.layout.len())
    }

    pub fn finish_label(&self, state: &WizardState) -> &'static str {
        if state.is_submitting {
            "Sending..."
        } else if self.is_last_step(state) {
            "Finish"
        } else {
            "Next"
        }
    }
}
