//! Helper bundle location.

use crate::error::CoordinatorError;
use std::path::{Path, PathBuf};

/// Where the helper lives inside the primary's bundle.
pub const DEFAULT_HELPER_RELATIVE_PATH: &str = "Contents/Library/LoginItems/SquirrelPluginHost.app";

/// Bundle root of an executable: its outermost `*.app` ancestor, or the
/// directory containing it when it is not inside a bundle.
pub fn bundle_root_from_exe(exe: &Path) -> Option<PathBuf> {
    exe.ancestors()
        .filter(|p| is_app_bundle(p))
        .last()
        .or_else(|| exe.parent())
        .map(Path::to_path_buf)
}

/// Bundle root of the running process.
pub fn current_bundle_root() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    bundle_root_from_exe(&exe).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no parent directory for {}", exe.display()),
        )
    })
}

fn is_app_bundle(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("app")
}

/// Resolves the helper path relative to a bundle root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperLocation {
    bundle_root: PathBuf,
    relative_path: PathBuf,
}

impl HelperLocation {
    pub fn new(bundle_root: impl Into<PathBuf>, relative_path: impl Into<PathBuf>) -> Self {
        Self {
            bundle_root: bundle_root.into(),
            relative_path: relative_path.into(),
        }
    }

    /// Expected helper path. Pure; does not touch the filesystem.
    pub fn resolve(&self) -> PathBuf {
        self.bundle_root.join(&self.relative_path)
    }

    /// Resolved path, provided something exists there.
    pub fn locate(&self) -> Result<PathBuf, CoordinatorError> {
        let path = self.resolve();
        if path.exists() {
            Ok(path)
        } else {
            Err(CoordinatorError::HelperNotInstalled { path })
        }
    }
}
