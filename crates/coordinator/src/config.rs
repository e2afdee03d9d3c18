//! Coordinator configuration.
//!
//! Hosts embed this in their own settings (it deserializes with serde) or
//! take the defaults; the launcher binary layers environment overrides on
//! top with [`CoordinatorConfig::with_env_overrides`].

use crate::error::ConfigError;
use crate::locate::DEFAULT_HELPER_RELATIVE_PATH;
use pluginhost_process::{HelperIdentity, DEFAULT_STARTUP_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Wait between a successful launch and the `SetSourceApplication` publish,
/// long enough for the helper to finish startup and attach its observers.
pub const DEFAULT_LAUNCH_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Wait between activating a background helper and the show request.
pub const DEFAULT_ACTIVATION_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Which coordinator operation a fired hotkey runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Only make sure the helper exists; once it runs, its own hotkey
    /// handling owns show/hide. Avoids two processes acting on one press.
    #[default]
    #[serde(rename = "ensure")]
    EnsureRunning,
    /// Launch, show or hide from the primary on every press.
    Toggle,
}

impl FromStr for TriggerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ensure" | "ensure_running" => Ok(TriggerMode::EnsureRunning),
            "toggle" => Ok(TriggerMode::Toggle),
            _ => Err(ConfigError::InvalidTriggerMode(s.to_string())),
        }
    }
}

/// Coordinator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Identity the helper registers under.
    pub helper_identity: HelperIdentity,

    /// Helper location relative to the primary's bundle root.
    pub helper_relative_path: PathBuf,

    #[serde(rename = "launch_settle_delay_ms", with = "millis")]
    pub launch_settle_delay: Duration,

    #[serde(rename = "activation_settle_delay_ms", with = "millis")]
    pub activation_settle_delay: Duration,

    /// How long a launch may take to show up in the process table.
    #[serde(rename = "startup_timeout_ms", with = "millis")]
    pub startup_timeout: Duration,

    pub trigger_mode: TriggerMode,

    /// Terminate the helper when the coordinator shuts down.
    pub owns_helper: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            helper_identity: HelperIdentity::default(),
            helper_relative_path: PathBuf::from(DEFAULT_HELPER_RELATIVE_PATH),
            launch_settle_delay: DEFAULT_LAUNCH_SETTLE_DELAY,
            activation_settle_delay: DEFAULT_ACTIVATION_SETTLE_DELAY,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            trigger_mode: TriggerMode::default(),
            owns_helper: true,
        }
    }
}

impl CoordinatorConfig {
    pub const ENV_HELPER_ID: &'static str = "PLUGINHOST_HELPER_ID";
    pub const ENV_HELPER_PATH: &'static str = "PLUGINHOST_HELPER_PATH";
    pub const ENV_TRIGGER_MODE: &'static str = "PLUGINHOST_TRIGGER_MODE";
    pub const ENV_LAUNCH_DELAY_MS: &'static str = "PLUGINHOST_LAUNCH_DELAY_MS";
    pub const ENV_ACTIVATION_DELAY_MS: &'static str = "PLUGINHOST_ACTIVATION_DELAY_MS";

    /// Apply overrides from `lookup` (normally `std::env::var`).
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup(Self::ENV_HELPER_ID).filter(|s| !s.is_empty()) {
            self.helper_identity = HelperIdentity::new(id);
        }
        if let Some(path) = lookup(Self::ENV_HELPER_PATH).filter(|s| !s.is_empty()) {
            self.helper_relative_path = PathBuf::from(path);
        }
        if let Some(mode) = lookup(Self::ENV_TRIGGER_MODE) {
            self.trigger_mode = mode.parse()?;
        }
        if let Some(delay) = parse_millis(&lookup, Self::ENV_LAUNCH_DELAY_MS)? {
            self.launch_settle_delay = delay;
        }
        if let Some(delay) = parse_millis(&lookup, Self::ENV_ACTIVATION_DELAY_MS)? {
            self.activation_settle_delay = delay;
        }
        Ok(self)
    }
}

fn parse_millis<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|_| ConfigError::InvalidDelay { var, value })
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
