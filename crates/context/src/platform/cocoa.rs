//! Small helpers for talking to Foundation/AppKit through `objc`.
//!
//! Shared by the process and activation-channel crates so the unsafe
//! NSString conversions live in one place.

use core_foundation::runloop::{kCFRunLoopDefaultMode, CFRunLoop};
use objc::runtime::{Class, Object};
use objc::{msg_send, sel, sel_impl};
use std::ffi::{CStr, CString};
use std::time::Duration;

/// Make one non-blocking pass through the current thread's run loop.
///
/// `NSWorkspace.frontmostApplication` and `NSRunningApplication.isActive`
/// are updated from notifications delivered on the main run loop. A process
/// with no AppKit event loop sees stale values unless it pumps the loop
/// before reading them. Only effective on the main thread.
pub fn pump_run_loop() {
    let mode = unsafe { kCFRunLoopDefaultMode };
    CFRunLoop::run_in_mode(mode, Duration::ZERO, false);
}

/// `[NSWorkspace sharedWorkspace]`, or `None` if AppKit is unavailable.
pub fn shared_workspace() -> Option<*mut Object> {
    unsafe {
        let workspace_class = Class::get("NSWorkspace")?;
        let workspace: *mut Object = msg_send![workspace_class, sharedWorkspace];
        (!workspace.is_null()).then_some(workspace)
    }
}

/// Convert NSString to Rust String.
///
/// # Safety
///
/// `nsstring` must be null or a valid NSString pointer.
pub unsafe fn nsstring_to_string(nsstring: *mut Object) -> Option<String> {
    if nsstring.is_null() {
        return None;
    }

    // Get UTF8 C string: [nsstring UTF8String]
    let c_str: *const std::os::raw::c_char = msg_send![nsstring, UTF8String];
    if c_str.is_null() {
        return None;
    }

    let rust_str = CStr::from_ptr(c_str).to_str().ok()?;
    Some(rust_str.to_string())
}

/// Create an autoreleased NSString from a Rust string.
///
/// Returns `None` for strings with interior NUL bytes.
pub fn nsstring(value: &str) -> Option<*mut Object> {
    let c_string = CString::new(value).ok()?;
    unsafe {
        let string_class = Class::get("NSString")?;
        let ns: *mut Object = msg_send![string_class, stringWithUTF8String: c_string.as_ptr()];
        (!ns.is_null()).then_some(ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_pump_run_loop_does_not_block() {
        let start = Instant::now();
        pump_run_loop();
        pump_run_loop();
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_nsstring_round_trip() {
        let ns = nsstring("Finder").unwrap();
        assert_eq!(unsafe { nsstring_to_string(ns) }.as_deref(), Some("Finder"));
        assert!(nsstring("bad\0value").is_none());
    }
}
