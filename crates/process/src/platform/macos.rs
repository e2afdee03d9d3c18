//! macOS process adapters built on `NSRunningApplication`.

use crate::{
    wait_for_process, ActivationScope, HelperIdentity, LaunchError, LaunchOptions, ProcessHandle, ProcessLauncher,
    ProcessRegistry,
};
use async_trait::async_trait;
use objc::runtime::{Class, Object, BOOL, NO};
use objc::{msg_send, sel, sel_impl};
use pluginhost_context::platform::cocoa::{nsstring, pump_run_loop};
use std::path::Path;
use tokio::process::Command;

/// NSApplicationActivateIgnoringOtherApps
const ACTIVATE_IGNORING_OTHERS: usize = 1 << 1;

/// NSApplicationActivateAllWindows | NSApplicationActivateIgnoringOtherApps
const ACTIVATE_ALL_IGNORING_OTHERS: usize = (1 << 0) | ACTIVATE_IGNORING_OTHERS;

fn activation_options(scope: ActivationScope) -> usize {
    match scope {
        ActivationScope::AllWindows => ACTIVATE_ALL_IGNORING_OTHERS,
        ActivationScope::KeyWindow => ACTIVATE_IGNORING_OTHERS,
    }
}

/// Registry backed by `NSRunningApplication`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacOSRegistry;

impl MacOSRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRegistry for MacOSRegistry {
    fn find_running(&self, identity: &HelperIdentity) -> Option<ProcessHandle> {
        pump_run_loop();
        let app = running_app_with_bundle_id(identity.as_str())?;
        let pid: i32 = unsafe { msg_send![app, processIdentifier] };
        let pid = u32::try_from(pid).ok()?;
        Some(ProcessHandle::new(identity.clone(), pid))
    }

    fn is_foreground_active(&self, handle: &ProcessHandle) -> bool {
        pump_run_loop();
        let Some(app) = running_app_with_pid(handle.pid) else {
            return false;
        };
        let active: BOOL = unsafe { msg_send![app, isActive] };
        active != NO
    }
}

/// Launcher that starts app bundles through `open`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacOSLauncher {
    registry: MacOSRegistry,
}

impl MacOSLauncher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProcessLauncher for MacOSLauncher {
    async fn launch(
        &self,
        path: &Path,
        identity: &HelperIdentity,
        options: &LaunchOptions,
    ) -> Result<ProcessHandle, LaunchError> {
        if !path.exists() {
            return Err(LaunchError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let mut command = Command::new("open");
        if !options.activate_on_launch {
            // -g: do not bring the application to the foreground
            command.arg("-g");
        }
        let output = command
            .arg(path)
            .output()
            .await
            .map_err(|e| LaunchError::rejected(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LaunchError::rejected(stderr.trim()));
        }

        wait_for_process(&self.registry, identity, options.startup_timeout)
            .await
            .ok_or_else(|| {
                tracing::warn!(
                    %identity,
                    timeout_ms = options.startup_timeout.as_millis() as u64,
                    "helper started but never registered"
                );
                LaunchError::rejected(format!(
                    "{} did not register as {} within {:?}",
                    path.display(),
                    identity,
                    options.startup_timeout
                ))
            })
    }

    fn activate(&self, handle: &ProcessHandle, scope: ActivationScope) -> bool {
        let Some(app) = running_app_with_pid(handle.pid) else {
            return false;
        };
        let options = activation_options(scope);
        let activated: BOOL = unsafe { msg_send![app, activateWithOptions: options] };
        activated != NO
    }

    fn terminate(&self, handle: &ProcessHandle) -> bool {
        let Some(app) = running_app_with_pid(handle.pid) else {
            return false;
        };
        let requested: BOOL = unsafe { msg_send![app, terminate] };
        requested != NO
    }
}

/// First entry of `[NSRunningApplication runningApplicationsWithBundleIdentifier:]`.
fn running_app_with_bundle_id(bundle_id: &str) -> Option<*mut Object> {
    let class = Class::get("NSRunningApplication")?;
    let bundle_id = nsstring(bundle_id)?;

    unsafe {
        let apps: *mut Object = msg_send![class, runningApplicationsWithBundleIdentifier: bundle_id];
        if apps.is_null() {
            return None;
        }
        let count: usize = msg_send![apps, count];
        if count == 0 {
            return None;
        }
        let app: *mut Object = msg_send![apps, objectAtIndex: 0usize];
        (!app.is_null()).then_some(app)
    }
}

/// `[NSRunningApplication runningApplicationWithProcessIdentifier:]`
fn running_app_with_pid(pid: u32) -> Option<*mut Object> {
    let class = Class::get("NSRunningApplication")?;
    let pid = i32::try_from(pid).ok()?;

    unsafe {
        let app: *mut Object = msg_send![class, runningApplicationWithProcessIdentifier: pid];
        (!app.is_null()).then_some(app)
    }
}
