//! Assignment engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default cap on tentative assignments explored by one search.
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

/// Default wall-clock budget for one search.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(5);

/// Configuration for the assignment engine.
///
/// In serialized form a budget of `0` (or `"0s"`) means unbounded, so an
/// unbounded config survives a round trip instead of picking the defaults
/// back up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed seed for the search order. `None` seeds from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Maximum tentative assignments before giving up. `None` is unbounded.
    #[serde(with = "zero_is_unbounded")]
    pub max_steps: Option<u64>,
    /// Wall-clock budget for one search. `None` is unbounded.
    #[serde(with = "zero_is_unbounded_duration")]
    pub time_budget: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_steps: Some(DEFAULT_MAX_STEPS),
            time_budget: Some(DEFAULT_TIME_BUDGET),
        }
    }
}

impl EngineConfig {
    /// Config with no budgets at all; the search runs to success or exhaustion.
    pub fn unbounded() -> Self {
        Self {
            seed: None,
            max_steps: None,
            time_budget: None,
        }
    }

    /// Set the search-order seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the step budget.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Set the wall-clock budget.
    #[must_use]
    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = Some(time_budget);
        self
    }
}

mod zero_is_unbounded {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.unwrap_or(0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        let value = u64::deserialize(deserializer)?;
        Ok((value != 0).then_some(value))
    }
}

mod zero_is_unbounded_duration {
    use std::time::Duration;

    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        humantime_serde::serialize(&value.unwrap_or(Duration::ZERO), serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let value: Duration = humantime_serde::deserialize(deserializer)?;
        Ok((!value.is_zero()).then_some(value))
    }
}
