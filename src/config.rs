//! Runtime configuration parsed from environment variables.
//!
//! Every knob has a default. Zero intervals and unknown policies abort
//! startup; unparseable numbers keep the default.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPLOAD_TICK_MS: u64 = 200;
pub const DEFAULT_ANALYSIS_TICK_MS: u64 = 300;
pub const DEFAULT_ANALYSIS_HANDOFF_MS: u64 = 500;
pub const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
    #[error("unknown duplicate policy `{0}` (expected `allow` or `suffix`)")]
    UnknownDuplicatePolicy(String),
}

/// How `submit` treats a display name that is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the name as given; records stay independent by id.
    #[default]
    Allow,
    /// Rename to `"name (n).ext"` with the smallest free `n`.
    Suffix,
}

impl DuplicatePolicy {
    /// Parse a policy name. `None` yields the default.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDuplicatePolicy` for unrecognized names.
    pub fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(str::trim).unwrap_or("allow").to_ascii_lowercase().as_str() {
            "allow" | "" => Ok(Self::Allow),
            "suffix" => Ok(Self::Suffix),
            other => Err(ConfigError::UnknownDuplicatePolicy(other.to_owned())),
        }
    }
}

/// Tick timings for the two active phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub upload_tick: Duration,
    pub analysis_tick: Duration,
    /// Pause between a finished upload and the start of analysis.
    pub analysis_handoff: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            upload_tick: Duration::from_millis(DEFAULT_UPLOAD_TICK_MS),
            analysis_tick: Duration::from_millis(DEFAULT_ANALYSIS_TICK_MS),
            analysis_handoff: Duration::from_millis(DEFAULT_ANALYSIS_HANDOFF_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    pub timing: Timing,
    pub event_queue_capacity: usize,
    pub duplicate_policy: DuplicatePolicy,
    /// Seed for a reproducible random source; thread RNG when `None`.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            event_queue_capacity: DEFAULT_EVENT_QUEUE_CAPACITY,
            duplicate_policy: DuplicatePolicy::Allow,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    /// Build simulator config from environment variables.
    ///
    /// Optional:
    /// - `UPLOAD_TICK_MS`: default 200
    /// - `ANALYSIS_TICK_MS`: default 300
    /// - `ANALYSIS_HANDOFF_MS`: default 500
    /// - `EVENT_QUEUE_CAPACITY`: default 256
    /// - `DUPLICATE_POLICY`: `allow` (default) or `suffix`
    /// - `SIM_SEED`: u64 seed for reproducible runs
    ///
    /// # Errors
    ///
    /// Returns an error for zero intervals, a zero queue capacity, or an
    /// unknown duplicate policy.
    pub fn from_env() -> Result<Self, ConfigError> {
        let upload_tick_ms = non_zero("UPLOAD_TICK_MS", env_parse("UPLOAD_TICK_MS", DEFAULT_UPLOAD_TICK_MS))?;
        let analysis_tick_ms = non_zero("ANALYSIS_TICK_MS", env_parse("ANALYSIS_TICK_MS", DEFAULT_ANALYSIS_TICK_MS))?;
        let analysis_handoff_ms = env_parse("ANALYSIS_HANDOFF_MS", DEFAULT_ANALYSIS_HANDOFF_MS);
        let event_queue_capacity = non_zero(
            "EVENT_QUEUE_CAPACITY",
            env_parse("EVENT_QUEUE_CAPACITY", DEFAULT_EVENT_QUEUE_CAPACITY),
        )?;
        let duplicate_policy = DuplicatePolicy::parse(std::env::var("DUPLICATE_POLICY").ok().as_deref())?;
        let seed = std::env::var("SIM_SEED")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok());

        Ok(Self {
            timing: Timing {
                upload_tick: Duration::from_millis(upload_tick_ms),
                analysis_tick: Duration::from_millis(analysis_tick_ms),
                analysis_handoff: Duration::from_millis(analysis_handoff_ms),
            },
            event_queue_capacity,
            duplicate_policy,
            seed,
        })
    }
}

/// Listening port from `PORT`, default 3000.
#[must_use]
pub fn port_from_env() -> u16 {
    env_parse("PORT", DEFAULT_PORT)
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn non_zero<T>(var: &'static str, value: T) -> Result<T, ConfigError>
where
    T: PartialEq + Default,
{
    if value == T::default() { Err(ConfigError::Zero { var }) } else { Ok(value) }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
