//! Upload record — the per-file state machine.
//!
//! DESIGN
//! ======
//! A record moves forward only: `Uploading → Analyzing → Completed`, or
//! `→ Failed` from either active phase. Every mutation goes through a
//! transition method that checks the current phase, so an out-of-order tick
//! surfaces as a `TransitionError` instead of silently corrupting state.
//!
//! Progress is a percentage in `0.0..=100.0`. It never decreases inside a
//! phase and is reset to zero only when analysis begins.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound of the progress percentage.
pub const PROGRESS_MAX: f64 = 100.0;

// =============================================================================
// PHASE
// =============================================================================

/// Lifecycle stage of an upload record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Uploading,
    Analyzing,
    Completed,
    Failed,
}

impl Phase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Active phases have a running ticker and a meaningful progress value.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Uploading | Self::Analyzing)
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }

    /// Whether `self → next` is a legal forward step.
    #[must_use]
    pub fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Self::Uploading, Self::Analyzing)
                | (Self::Analyzing, Self::Completed)
                | (Self::Uploading | Self::Analyzing, Self::Failed)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: Phase, to: Phase },
    #[error("record is not active (phase {0})")]
    NotActive(Phase),
    #[error("{phase} phase incomplete at {progress:.1}%")]
    IncompletePhase { phase: Phase, progress: f64 },
}

// =============================================================================
// RECORD
// =============================================================================

/// One in-flight or finished upload, as seen by observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: Uuid,
    /// Display name of the submitted file. Not unique.
    pub identifier: String,
    pub size_label: String,
    pub phase: Phase,
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_count: Option<u32>,
    /// Submission order, assigned by the simulator.
    pub seq: u64,
}

impl UploadRecord {
    #[must_use]
    pub fn new(identifier: impl Into<String>, size_label: impl Into<String>, seq: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier: identifier.into(),
            size_label: size_label.into(),
            phase: Phase::Uploading,
            progress: 0.0,
            issue_count: None,
            seq,
        }
    }

    /// Whether the current phase has reached 100%.
    #[must_use]
    pub fn phase_done(&self) -> bool {
        self.progress >= PROGRESS_MAX
    }

    /// Add `increment` to the current phase's progress, clamped to 100.
    ///
    /// Negative or non-finite increments count as zero so progress never
    /// moves backward. Returns `true` once the phase has reached 100%.
    ///
    /// # Errors
    ///
    /// Returns `NotActive` if the record is in a terminal phase.
    pub fn advance(&mut self, increment: f64) -> Result<bool, TransitionError> {
        if !self.phase.is_active() {
            return Err(TransitionError::NotActive(self.phase));
        }
        let step = if increment.is_finite() && increment > 0.0 { increment } else { 0.0 };
        self.progress = (self.progress + step).min(PROGRESS_MAX);
        Ok(self.phase_done())
    }

    /// Uploading (at 100%) → Analyzing, progress reset to zero.
    ///
    /// # Errors
    ///
    /// Returns an error unless the record is Uploading at 100%.
    pub fn begin_analysis(&mut self) -> Result<(), TransitionError> {
        self.check_step(Phase::Analyzing)?;
        self.phase = Phase::Analyzing;
        self.progress = 0.0;
        Ok(())
    }

    /// Analyzing (at 100%) → Completed with a fixed issue count.
    ///
    /// # Errors
    ///
    /// Returns an error unless the record is Analyzing at 100%.
    pub fn complete(&mut self, issue_count: u32) -> Result<(), TransitionError> {
        self.check_step(Phase::Completed)?;
        self.phase = Phase::Completed;
        self.progress = PROGRESS_MAX;
        self.issue_count = Some(issue_count);
        Ok(())
    }

    /// Any active phase → Failed. Progress is kept as last observed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` from a terminal phase.
    pub fn fail(&mut self) -> Result<(), TransitionError> {
        if !self.phase.can_transition_to(Phase::Failed) {
            return Err(TransitionError::InvalidTransition { from: self.phase, to: Phase::Failed });
        }
        self.phase = Phase::Failed;
        Ok(())
    }

    fn check_step(&self, next: Phase) -> Result<(), TransitionError> {
        if !self.phase.can_transition_to(next) {
            return Err(TransitionError::InvalidTransition { from: self.phase, to: next });
        }
        if !self.phase_done() {
            return Err(TransitionError::IncompletePhase { phase: self.phase, progress: self.progress });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
