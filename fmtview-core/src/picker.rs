//! Language-change confirmation state machine.
//!
//! Choosing a fixed dialect offers to replace the input with that dialect's
//! sample. With an empty input the sample loads straight away; otherwise the
//! picker waits in `AwaitingConfirmation` until the user resolves it.
//! Choosing again while waiting just retargets the pending change.

use crate::dialect::{Dialect, LanguageSelection};
use crate::samples::sample_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerState {
    #[default]
    Idle,
    AwaitingConfirmation { target: Dialect },
}

/// How the user answered the confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Switch language and replace the input with the sample.
    LoadSample,
    /// Switch language, keep the current input.
    KeepInput,
    Cancel,
}

/// What the caller should do to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageChange {
    Apply { selection: LanguageSelection, sample: Option<&'static str> },
    AwaitConfirmation(Dialect),
    Cancelled,
    /// Resolution arrived with nothing pending.
    Unchanged,
}

#[derive(Debug, Default)]
pub struct LanguagePicker {
    state: PickerState,
}

impl LanguagePicker {
    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, PickerState::AwaitingConfirmation { .. })
    }

    pub fn select(&mut self, target: LanguageSelection, input_is_empty: bool) -> LanguageChange {
        match target {
            LanguageSelection::Auto => {
                self.state = PickerState::Idle;
                LanguageChange::Apply { selection: target, sample: None }
            }
            LanguageSelection::Fixed(d) if input_is_empty => {
                self.state = PickerState::Idle;
                LanguageChange::Apply { selection: target, sample: Some(sample_for(d)) }
            }
            LanguageSelection::Fixed(d) => {
                self.state = PickerState::AwaitingConfirmation { target: d };
                LanguageChange::AwaitConfirmation(d)
            }
        }
    }

    pub fn resolve(&mut self, resolution: Resolution) -> LanguageChange {
        let PickerState::AwaitingConfirmation { target } = std::mem::take(&mut self.state) else {
            return LanguageChange::Unchanged;
        };
        let selection = LanguageSelection::Fixed(target);
        match resolution {
            Resolution::LoadSample => LanguageChange::Apply { selection, sample: Some(sample_for(target)) },
            Resolution::KeepInput => LanguageChange::Apply { selection, sample: None },
            Resolution::Cancel => LanguageChange::Cancelled,
        }
    }
}
