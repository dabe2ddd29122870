use super::types::{
    EventConfig, RawEngineConfig, RawEventConfig, RawSantaConfig, SantaConfig,
};
use anyhow::{Context, Result};
use santa_core::EngineConfig;
use std::path::{Path, PathBuf};

/// One config file in merge order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    pub name: &'static str,
    pub path: PathBuf,
}

impl ConfigLayer {
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<SantaConfig> {
        let layers = Self::layers();
        let paths: Vec<&Path> = layers.iter().map(|layer| layer.path.as_path()).collect();
        Self::load_from(&paths)
    }

    /// Config files consulted by [`ConfigLoader::load`], lowest precedence first
    pub fn layers() -> Vec<ConfigLayer> {
        vec![
            ConfigLayer {
                name: "user",
                path: Self::user_config_path(),
            },
            ConfigLayer {
                name: "project",
                path: Self::project_config_path(),
            },
        ]
    }

    /// Load and merge config files in order; later files win. Missing files are skipped.
    pub fn load_from(paths: &[&Path]) -> Result<SantaConfig> {
        let mut raw = RawSantaConfig::default();

        for path in paths {
            if !path.exists() {
                continue;
            }
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let layer: RawSantaConfig = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            tracing::debug!(path = %path.display(), "Loaded config layer");
            raw = Self::merge_raw(raw, layer);
        }

        Ok(Self::finalize(raw))
    }

    /// Get user config path (`$XDG_CONFIG_HOME/santa/config.toml`)
    pub fn user_config_path() -> PathBuf {
        santa_paths::config_dir().join("config.toml")
    }

    /// Get project config path
    /// Can be overridden with SANTA_PROJECT_CONFIG_DIR env var (useful for isolated e2e tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("SANTA_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".santa/config.toml")
        }
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawSantaConfig, overlay: RawSantaConfig) -> RawSantaConfig {
        RawSantaConfig {
            engine: RawEngineConfig {
                seed: overlay.engine.seed.or(base.engine.seed),
                max_steps: overlay.engine.max_steps.or(base.engine.max_steps),
                time_budget: overlay.engine.time_budget.or(base.engine.time_budget),
            },
            event: RawEventConfig {
                money_limit: overlay.event.money_limit.or(base.event.money_limit),
                events_dir: overlay.event.events_dir.or(base.event.events_dir),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawSantaConfig) -> SantaConfig {
        let engine_defaults = EngineConfig::default();
        let event_defaults = EventConfig::default();

        SantaConfig {
            engine: EngineConfig {
                seed: raw.engine.seed,
                max_steps: match raw.engine.max_steps {
                    Some(0) => None,
                    Some(steps) => Some(steps),
                    None => engine_defaults.max_steps,
                },
                time_budget: match raw.engine.time_budget {
                    Some(budget) if budget.is_zero() => None,
                    Some(budget) => Some(budget),
                    None => engine_defaults.time_budget,
                },
            },
            event: EventConfig {
                money_limit: raw.event.money_limit.unwrap_or(event_defaults.money_limit),
                events_dir: raw.event.events_dir.unwrap_or(event_defaults.events_dir),
            },
        }
    }
}
