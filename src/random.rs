//! Random draws for the upload simulation.
//!
//! DESIGN
//! ======
//! Every random value the simulator needs (cosmetic size, per-tick
//! increments, final issue count) is derived from one uniform draw in
//! `[0, 1)`. Implementations only supply that draw, so tests can script
//! exact sequences and assert exact transition points.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Exclusive upper bound of an upload tick increment.
pub const UPLOAD_INCREMENT_MAX: f64 = 30.0;
/// Exclusive upper bound of an analysis tick increment.
pub const ANALYSIS_INCREMENT_MAX: f64 = 25.0;
/// Exclusive upper bound of the issue count assigned on completion.
pub const ISSUE_COUNT_MAX: u32 = 8;

/// Size labels span 1.0–5.9 MB in tenths.
const SIZE_TENTHS_MIN: u32 = 10;
const SIZE_TENTHS_SPAN: u32 = 50;

/// Pluggable source of uniform draws.
pub trait RandomSource: Send + Sync {
    /// A uniform value in `[0, 1)`.
    fn unit(&self) -> f64;

    /// Cosmetic file size, formatted as `"X.YMB"` in 1.0–5.9.
    fn size_label(&self) -> String {
        let tenths = SIZE_TENTHS_MIN + scale(self.unit(), SIZE_TENTHS_SPAN);
        format!("{}.{}MB", tenths / 10, tenths % 10)
    }

    /// Progress increment for one upload tick, in `[0, 30)`.
    fn upload_increment(&self) -> f64 {
        clamp_unit(self.unit()) * UPLOAD_INCREMENT_MAX
    }

    /// Progress increment for one analysis tick, in `[0, 25)`.
    fn analysis_increment(&self) -> f64 {
        clamp_unit(self.unit()) * ANALYSIS_INCREMENT_MAX
    }

    /// Issue count for a completed analysis, in `[0, 8)`.
    fn issue_count(&self) -> u32 {
        scale(self.unit(), ISSUE_COUNT_MAX)
    }
}

/// Keep a draw inside `[0, 1)` even if an implementation misbehaves.
fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() { value.clamp(0.0, 1.0 - f64::EPSILON) } else { 0.0 }
}

/// Map a unit draw onto `0..span`.
fn scale(value: f64, span: u32) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (clamp_unit(value) * f64::from(span)).floor() as u32;
    index.min(span.saturating_sub(1))
}

// =============================================================================
// IMPLEMENTATIONS
// =============================================================================

/// Per-call thread RNG. The default for live simulations.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn unit(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Deterministic RNG seeded once, for reproducible demo runs.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl RandomSource for SeededRandom {
    fn unit(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
pub struct ScriptedRandom {
    script: Vec<f64>,
    cursor: Mutex<VecDeque<f64>>,
}

impl ScriptedRandom {
    #[must_use]
    pub fn new(script: Vec<f64>) -> Self {
        let cursor = Mutex::new(script.iter().copied().collect());
        Self { script, cursor }
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&self) -> f64 {
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        if cursor.is_empty() {
            cursor.extend(self.script.iter().copied());
        }
        cursor.pop_front().unwrap_or(0.0)
    }
}

#[cfg(test)]
#[path = "random_test.rs"]
mod tests;
