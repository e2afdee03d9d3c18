//! Source application value types.

use crate::provider::ActiveAppProvider;
use serde::{Deserialize, Serialize};

/// Display name used when the frontmost application cannot be named.
pub const UNKNOWN_APP_NAME: &str = "Unknown";

/// Wire value for a process id that could not be determined.
pub const PROCESS_ID_SENTINEL: i64 = -1;

/// Information about the currently focused application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    /// Bundle ID (e.g., "com.apple.finder")
    pub bundle_id: Option<String>,

    /// Display name (e.g., "Finder")
    pub name: Option<String>,

    /// OS-assigned process id
    pub pid: Option<i32>,
}

impl AppInfo {
    pub fn new(bundle_id: impl Into<String>, name: impl Into<String>, pid: i32) -> Self {
        Self {
            bundle_id: Some(bundle_id.into()),
            name: Some(name.into()),
            pid: Some(pid),
        }
    }
}

/// The application that was active immediately before a trigger.
///
/// Captured once per trigger and never persisted. The serialized form is
/// the flat key set the helper process reads from activation messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceContext {
    #[serde(rename = "sourceAppName")]
    pub app_name: String,

    #[serde(rename = "sourceAppBundleId", default)]
    pub bundle_id: String,

    /// `None` travels as [`PROCESS_ID_SENTINEL`].
    #[serde(rename = "sourceAppProcessId", with = "pid_sentinel", default)]
    pub process_id: Option<i32>,
}

impl SourceContext {
    /// Capture the frontmost application from `provider`.
    pub fn capture(provider: &dyn ActiveAppProvider) -> Self {
        let source = Self::from_app(provider.get_active_app());
        tracing::debug!(
            app = %source.app_name,
            bundle_id = %source.bundle_id,
            pid = ?source.process_id,
            "captured source application"
        );
        source
    }

    /// Build a context, filling in the fallbacks for missing fields.
    pub fn from_app(app: Option<AppInfo>) -> Self {
        match app {
            Some(app) => Self {
                app_name: app.name.unwrap_or_else(|| UNKNOWN_APP_NAME.to_string()),
                bundle_id: app.bundle_id.unwrap_or_default(),
                process_id: app.pid.filter(|pid| *pid >= 0),
            },
            None => Self::unknown(),
        }
    }

    /// Context used when nothing is frontmost.
    pub fn unknown() -> Self {
        Self {
            app_name: UNKNOWN_APP_NAME.to_string(),
            bundle_id: String::new(),
            process_id: None,
        }
    }

    /// Process id as carried on the wire.
    pub fn wire_process_id(&self) -> i64 {
        self.process_id
            .map(i64::from)
            .unwrap_or(PROCESS_ID_SENTINEL)
    }
}

mod pid_sentinel {
    use super::PROCESS_ID_SENTINEL;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(pid: &Option<i32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(pid.map(i64::from).unwrap_or(PROCESS_ID_SENTINEL))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        if raw < 0 {
            return Ok(None);
        }
        Ok(i32::try_from(raw).ok())
    }
}
