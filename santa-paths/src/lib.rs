//! XDG Base Directory paths for santa.
//!
//! The CLI keeps its config and event files under XDG paths on every
//! platform, the same layout tools like gh and kubectl use.

use std::path::PathBuf;

const APP_DIR: &str = "santa";

/// Get the santa config directory.
///
/// Returns `$XDG_CONFIG_HOME/santa` if set, otherwise `~/.config/santa`.
///
/// # Examples
///
/// ```
/// use santa_paths::config_dir;
///
/// let config = config_dir().join("config.toml");
/// assert!(config.ends_with("santa/config.toml"));
/// ```
pub fn config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// Get the santa data directory.
///
/// Returns `$XDG_DATA_HOME/santa` if set, otherwise `~/.local/share/santa`.
/// Event files live under `events/` in here unless configured otherwise.
pub fn data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share")
}

/// Default directory for event documents.
pub fn events_dir() -> PathBuf {
    data_dir().join("events")
}

fn xdg_dir(env_var: &str, home_relative: &str) -> PathBuf {
    if let Ok(base) = std::env::var(env_var)
        && !base.is_empty()
    {
        PathBuf::from(base).join(APP_DIR)
    } else if let Some(home) = dirs::home_dir() {
        home.join(home_relative).join(APP_DIR)
    } else {
        PathBuf::from(home_relative).join(APP_DIR)
    }
}
