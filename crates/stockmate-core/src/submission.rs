//! # Submission Flow
//!
//! The "soft block with override" used by the material entry form.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────┐  evaluate / edit   ┌───────────┐                        │
//! │   │ Drafting │───────────────────►│ Evaluated │◄──┐ edit (live)        │
//! │   └──────────┘                    └─────┬─────┘───┘                    │
//! │        ▲                                │ submit                        │
//! │        │                   ┌────────────┴────────────┐                  │
//! │        │                   │ Within                  │ Below / Above    │
//! │        │                   ▼                         ▼                  │
//! │        │            ┌───────────┐   confirm  ┌─────────────────────┐   │
//! │        │            │ Committed │◄───────────│ PendingConfirmation │   │
//! │        │            └───────────┘            └──────────┬──────────┘   │
//! │        │              (terminal)                        │ cancel       │
//! │        └────────────────────────────────────────────────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An out-of-tolerance verdict never rejects an entry. It only inserts the
//! confirmation step, and confirming passes the original inputs through
//! unchanged.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::tolerance::{
    per_dozen_figures, PerDozenFigures, ToleranceEngine, ToleranceResult, WeighingInput,
};
use crate::types::{BagType, Item, Polisher};
use crate::validation::{validate_dozens, validate_gross_weight, validate_weighing_input};

// =============================================================================
// Entry Draft
// =============================================================================

/// Everything the entry form has gathered for one submission.
///
/// Master data is snapshotted when the draft is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub item_id: String,
    pub item_code: String,
    pub item_name: String,
    pub standard_weight_per_dozen: f64,

    pub bag_type_id: String,
    pub bag_type_name: String,
    pub bag_weight: f64,

    pub polisher_id: String,
    pub polisher_name: String,

    pub dozens: u32,
    pub gross_weight: f64,
}

impl EntryDraft {
    pub fn new(
        item: &Item,
        bag_type: &BagType,
        polisher: &Polisher,
        dozens: u32,
        gross_weight: f64,
    ) -> Self {
        EntryDraft {
            item_id: item.id.clone(),
            item_code: item.code.clone(),
            item_name: item.name.clone(),
            standard_weight_per_dozen: item.standard_weight,
            bag_type_id: bag_type.id.clone(),
            bag_type_name: bag_type.name.clone(),
            bag_weight: bag_type.weight,
            polisher_id: polisher.id.clone(),
            polisher_name: polisher.display_name(),
            dozens,
            gross_weight,
        }
    }

    /// The four numbers the tolerance engine needs.
    pub fn weighing_input(&self) -> WeighingInput {
        WeighingInput {
            gross_weight: self.gross_weight,
            bag_weight: self.bag_weight,
            dozens: self.dozens,
            standard_weight_per_dozen: self.standard_weight_per_dozen,
        }
    }
}

// =============================================================================
// Committed Entry
// =============================================================================

/// A submission that passed the gate, ready for the storage collaborator.
///
/// Only [`Submission::submit`] and [`Submission::confirm`] build one, so the
/// result always belongs to the draft and `forced` always means the operator
/// answered the warning.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CommittedEntry {
    draft: EntryDraft,
    result: ToleranceResult,
    per_dozen: PerDozenFigures,
    forced: bool,
}

impl CommittedEntry {
    fn new(draft: EntryDraft, result: ToleranceResult, forced: bool) -> Self {
        let per_dozen = per_dozen_figures(&draft.weighing_input());
        CommittedEntry {
            draft,
            result,
            per_dozen,
            forced,
        }
    }

    pub fn draft(&self) -> &EntryDraft {
        &self.draft
    }

    pub fn result(&self) -> &ToleranceResult {
        &self.result
    }

    pub fn per_dozen(&self) -> &PerDozenFigures {
        &self.per_dozen
    }

    /// True when an out-of-tolerance verdict was explicitly overridden.
    pub fn forced(&self) -> bool {
        self.forced
    }

    /// Checks that an out-of-tolerance entry carries the override flag.
    pub fn ensure_confirmed(&self) -> CoreResult<()> {
        if self.result.verdict.requires_confirmation() && !self.forced {
            return Err(CoreError::ConfirmationRequired {
                verdict: self.result.verdict,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Submission State
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    /// Inputs being filled in; no valid evaluation yet.
    Drafting,
    /// Live feedback for the current inputs.
    Evaluated(ToleranceResult),
    /// Out of tolerance; waiting for confirm or cancel.
    PendingConfirmation(ToleranceResult),
    /// Handed to storage. Terminal.
    Committed(ToleranceResult),
}

impl SubmissionState {
    pub const fn name(&self) -> &'static str {
        match self {
            SubmissionState::Drafting => "drafting",
            SubmissionState::Evaluated(_) => "evaluated",
            SubmissionState::PendingConfirmation(_) => "pending confirmation",
            SubmissionState::Committed(_) => "committed",
        }
    }

    /// Latest evaluation, if any.
    pub fn result(&self) -> Option<&ToleranceResult> {
        match self {
            SubmissionState::Drafting => None,
            SubmissionState::Evaluated(r)
            | SubmissionState::PendingConfirmation(r)
            | SubmissionState::Committed(r) => Some(r),
        }
    }
}

/// What `submit` decided.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Within tolerance: store it.
    Committed(CommittedEntry),
    /// Outside tolerance: show the warning and wait for confirm/cancel.
    NeedsConfirmation(ToleranceResult),
}

// =============================================================================
// Submission
// =============================================================================

/// One attempt at recording a material entry.
#[derive(Debug, Clone)]
pub struct Submission {
    draft: EntryDraft,
    engine: ToleranceEngine,
    state: SubmissionState,
}

impl Submission {
    pub fn new(draft: EntryDraft, engine: ToleranceEngine) -> Self {
        Submission {
            draft,
            engine,
            state: SubmissionState::Drafting,
        }
    }

    pub fn draft(&self) -> &EntryDraft {
        &self.draft
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    fn ensure_editable(&self, action: &'static str) -> CoreResult<()> {
        match self.state {
            SubmissionState::Drafting | SubmissionState::Evaluated(_) => Ok(()),
            _ => Err(CoreError::invalid_transition(action, &self.state)),
        }
    }

    /// Validates the draft and computes live feedback.
    pub fn evaluate(&mut self) -> CoreResult<ToleranceResult> {
        self.ensure_editable("evaluate")?;
        validate_weighing_input(&self.draft.weighing_input())?;

        let result = self.engine.evaluate(&self.draft.weighing_input());
        self.state = SubmissionState::Evaluated(result);
        Ok(result)
    }

    /// Updates the scale reading (from the keyboard or the Bluetooth scale).
    ///
    /// Returns the fresh evaluation, or `None` while the value is invalid
    /// (the form shows its own message and the state drops to Drafting).
    pub fn set_gross_weight(&mut self, kg: f64) -> CoreResult<Option<ToleranceResult>> {
        self.ensure_editable("edit")?;
        self.draft.gross_weight = kg;
        if validate_gross_weight(kg).is_err() {
            self.state = SubmissionState::Drafting;
            return Ok(None);
        }
        self.reevaluate()
    }

    /// Updates the dozen count; same contract as [`Self::set_gross_weight`].
    pub fn set_dozens(&mut self, dozens: u32) -> CoreResult<Option<ToleranceResult>> {
        self.ensure_editable("edit")?;
        self.draft.dozens = dozens;
        if validate_dozens(dozens).is_err() {
            self.state = SubmissionState::Drafting;
            return Ok(None);
        }
        self.reevaluate()
    }

    fn reevaluate(&mut self) -> CoreResult<Option<ToleranceResult>> {
        match self.evaluate() {
            Ok(result) => Ok(Some(result)),
            Err(CoreError::Validation(_)) => {
                self.state = SubmissionState::Drafting;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Submits the entry.
    ///
    /// ## Behavior
    /// - Within tolerance: moves to Committed and returns the entry
    /// - Below/Above: moves to PendingConfirmation and returns the result
    ///   for the warning modal
    pub fn submit(&mut self) -> CoreResult<SubmitOutcome> {
        let result = self.evaluate()?;

        if result.verdict.is_within() {
            self.state = SubmissionState::Committed(result);
            return Ok(SubmitOutcome::Committed(CommittedEntry::new(
                self.draft.clone(),
                result,
                false,
            )));
        }

        self.state = SubmissionState::PendingConfirmation(result);
        Ok(SubmitOutcome::NeedsConfirmation(result))
    }

    /// "Submit Anyway": commits an out-of-tolerance entry.
    pub fn confirm(&mut self) -> CoreResult<CommittedEntry> {
        match self.state {
            SubmissionState::PendingConfirmation(result) => {
                self.state = SubmissionState::Committed(result);
                Ok(CommittedEntry::new(self.draft.clone(), result, true))
            }
            _ => Err(CoreError::invalid_transition("confirm", &self.state)),
        }
    }

    /// Closes the warning and returns to editing with inputs intact.
    pub fn cancel(&mut self) -> CoreResult<()> {
        match self.state {
            SubmissionState::PendingConfirmation(_) => {
                self.state = SubmissionState::Drafting;
                Ok(())
            }
            _ => Err(CoreError::invalid_transition("cancel", &self.state)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
