//! Ticker — one driver task per record.
//!
//! DESIGN
//! ======
//! The driver runs the record's phases in sequence: an upload interval until
//! 100%, a fixed hand-off pause, then an analysis interval until completion.
//! Each tick re-enters the simulator under its lock, which re-checks that
//! the record still exists, so an aborted or orphaned driver never mutates a
//! removed record.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;
use uuid::Uuid;

use crate::record::Phase;
use crate::services::upload::UploadSimulator;

/// `tokio::time::interval` rejects a zero period.
const MIN_TICK: Duration = Duration::from_millis(1);

/// Result of one tick, as seen by the driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// Progress moved (or stayed) below 100%; keep ticking.
    Advanced,
    /// The phase reached 100%; stop this phase's interval.
    PhaseFinished,
    /// The record is gone or no longer in this phase; stop the driver.
    Stopped,
}

/// Drive record `id` from Uploading to Completed.
pub(crate) async fn drive_record(sim: UploadSimulator, id: Uuid) {
    let timing = sim.config().timing;

    if !run_phase(&sim, id, Phase::Uploading, timing.upload_tick).await {
        debug!(%id, "driver stopped during upload");
        return;
    }

    tokio::time::sleep(timing.analysis_handoff).await;
    if !sim.begin_analysis(id).await {
        debug!(%id, "driver stopped before analysis");
        return;
    }

    if run_phase(&sim, id, Phase::Analyzing, timing.analysis_tick).await {
        debug!(%id, "driver finished");
    } else {
        debug!(%id, "driver stopped during analysis");
    }
}

/// Tick `phase` on a fixed period until it finishes (`true`) or stops.
async fn run_phase(sim: &UploadSimulator, id: Uuid, phase: Phase, period: Duration) -> bool {
    let period = period.max(MIN_TICK);
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        match sim.tick(id, phase).await {
            TickOutcome::Advanced => {}
            TickOutcome::PhaseFinished => return true,
            TickOutcome::Stopped => return false,
        }
    }
}

#[cfg(test)]
#[path = "ticker_test.rs"]
mod tests;
