//! Process adapters for platforms without a bundle registry.
//!
//! The helper identity is matched against process names and executable
//! stems. There is no portable "is foreground" signal, so every running
//! helper is reported as background and activation is a no-op.

use crate::{
    ActivationScope, HelperIdentity, LaunchError, LaunchOptions, ProcessHandle, ProcessLauncher,
    ProcessRegistry,
};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;
use sysinfo::{Pid, Process, ProcessesToUpdate, Signal, System};
use tokio::process::Command;

/// Registry backed by the `sysinfo` process table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoRegistry;

impl SysinfoRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRegistry for SysinfoRegistry {
    fn find_running(&self, identity: &HelperIdentity) -> Option<ProcessHandle> {
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::All, true);

        let process = sys
            .processes()
            .values()
            .find(|process| matches_identity(process, identity))?;
        Some(ProcessHandle::new(identity.clone(), process.pid().as_u32()))
    }

    fn is_foreground_active(&self, _handle: &ProcessHandle) -> bool {
        false
    }
}

fn matches_identity(process: &Process, identity: &HelperIdentity) -> bool {
    let wanted = OsStr::new(identity.as_str());
    if process.name() == wanted {
        return true;
    }
    process
        .exe()
        .and_then(Path::file_stem)
        .is_some_and(|stem| stem == wanted)
}

/// Launcher that spawns the helper executable directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpawnLauncher;

impl SpawnLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessLauncher for SpawnLauncher {
    async fn launch(
        &self,
        path: &Path,
        identity: &HelperIdentity,
        _options: &LaunchOptions,
    ) -> Result<ProcessHandle, LaunchError> {
        if !path.exists() {
            return Err(LaunchError::NotFound {
                path: path.to_path_buf(),
            });
        }

        // The child is detached: dropping the handle does not kill it.
        let child = Command::new(path).spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound => LaunchError::NotFound {
                path: path.to_path_buf(),
            },
            _ => LaunchError::rejected(e.to_string()),
        })?;

        let pid = child
            .id()
            .ok_or_else(|| LaunchError::rejected("helper exited during startup"))?;
        Ok(ProcessHandle::new(identity.clone(), pid))
    }

    fn activate(&self, handle: &ProcessHandle, _scope: ActivationScope) -> bool {
        tracing::debug!(pid = handle.pid, "foreground activation unsupported on this platform");
        false
    }

    fn terminate(&self, handle: &ProcessHandle) -> bool {
        let mut sys = System::new();
        let pid = Pid::from_u32(handle.pid);
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let Some(process) = sys.process(pid) else {
            return false;
        };
        process
            .kill_with(Signal::Term)
            .unwrap_or_else(|| process.kill())
    }
}
