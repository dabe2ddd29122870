use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use santa_core::EngineConfig;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSantaConfig {
    #[serde(default)]
    pub engine: RawEngineConfig,

    #[serde(default)]
    pub event: RawEventConfig,
}

/// Engine config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawEngineConfig {
    /// Fixed search-order seed
    pub seed: Option<u64>,

    /// Step budget; 0 disables the limit
    pub max_steps: Option<u64>,

    /// Wall-clock budget, e.g. "2s"; "0s" disables the limit
    #[serde(default, with = "humantime_serde")]
    pub time_budget: Option<Duration>,
}

/// Event defaults as stored in TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawEventConfig {
    /// Money limit for newly created events
    pub money_limit: Option<String>,

    /// Directory holding event documents
    pub events_dir: Option<PathBuf>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SantaConfig {
    pub engine: EngineConfig,

    pub event: EventConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// Money limit for newly created events
    pub money_limit: String,

    /// Directory holding event documents
    pub events_dir: PathBuf,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            money_limit: santa_core::event::DEFAULT_MONEY_LIMIT.to_string(),
            events_dir: santa_paths::events_dir(),
        }
    }
}
