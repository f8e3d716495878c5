mod loader;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::log::LogConfig;
use crate::shared::TARGET_EXE_CAPACITY;
use crate::{Error, Result};

pub use loader::{config_dir, config_path, load, try_load};

/// Top-level configuration for Tuckaway.
///
/// Loaded from `~/.config/tuckaway/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The application whose main window is intercepted.
    pub target: TargetConfig,
    /// Process presence polling.
    pub monitor: MonitorConfig,
    /// Restore behaviour.
    pub restore: RestoreConfig,
    /// File logging.
    pub logging: LogConfig,
}

/// The monitored application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Executable base name, compared case-insensitively (e.g. "olk.exe").
    pub executable: String,
    /// URI or path opened through the shell when the target has to be
    /// launched (e.g. "ms-outlook:").
    pub launch_uri: String,
}

/// Presence monitor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Interval between process probes, in milliseconds.
    pub poll_interval_ms: u64,
}

/// Restore settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreConfig {
    /// Put back the saved rectangle and taskbar style before showing the
    /// window. When `false`, the window is only shown and focused.
    pub reapply_geometry: bool,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            executable: "olk.exe".into(),
            launch_uri: "ms-outlook:".into(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
        }
    }
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            reapply_geometry: true,
        }
    }
}

impl Config {
    /// Clamps values to safe ranges and fills in blank fields.
    ///
    /// A blank executable falls back to the default target, and the
    /// poll interval stays between 100 ms and 10 s. An executable name
    /// too long to publish in the shared state is rejected.
    pub fn validate(&mut self) -> Result<()> {
        self.target.executable = self.target.executable.trim().to_string();
        if self.target.executable.is_empty() {
            self.target.executable = TargetConfig::default().executable;
        }
        if self.target.executable.encode_utf16().count() >= TARGET_EXE_CAPACITY {
            return Err(Error::InvalidTarget(format!(
                "{} (at most {} UTF-16 units)",
                self.target.executable,
                TARGET_EXE_CAPACITY - 1
            )));
        }
        self.monitor.poll_interval_ms = self.monitor.poll_interval_ms.clamp(100, 10_000);
        Ok(())
    }
}
