//! macOS implementation of the frontmost application query.

use super::cocoa::{nsstring_to_string, pump_run_loop, shared_workspace};
use crate::provider::ActiveAppProvider;
use crate::source::AppInfo;

use objc::runtime::Object;
use objc::{msg_send, sel, sel_impl};

/// macOS implementation using NSWorkspace.frontmostApplication.
///
/// Must be queried before the helper is activated; once the helper is
/// frontmost this reports the helper itself.
#[derive(Debug, Default)]
pub struct MacOSProvider;

impl MacOSProvider {
    pub fn new() -> Self {
        Self
    }
}

impl ActiveAppProvider for MacOSProvider {
    fn get_active_app(&self) -> Option<AppInfo> {
        get_frontmost_app()
    }
}

/// Get the frontmost application using native Cocoa APIs.
///
/// With no window selected (e.g. after clicking the desktop) this is
/// usually Finder.
fn get_frontmost_app() -> Option<AppInfo> {
    pump_run_loop();
    let workspace = shared_workspace()?;

    unsafe {
        // Get frontmost application: [workspace frontmostApplication]
        let frontmost_app: *mut Object = msg_send![workspace, frontmostApplication];
        if frontmost_app.is_null() {
            return None;
        }

        let bundle_id_ns: *mut Object = msg_send![frontmost_app, bundleIdentifier];
        let name_ns: *mut Object = msg_send![frontmost_app, localizedName];
        let pid: i32 = msg_send![frontmost_app, processIdentifier];

        Some(AppInfo {
            bundle_id: nsstring_to_string(bundle_id_ns).filter(|s| !s.is_empty()),
            name: nsstring_to_string(name_ns),
            pid: (pid >= 0).then_some(pid),
        })
    }
}
