//! macOS permission check for global key polling.

/// Check if the application has accessibility permissions on macOS.
///
/// Global key state is only readable by trusted processes.
pub fn has_accessibility_access() -> bool {
    unsafe {
        #[link(name = "ApplicationServices", kind = "framework")]
        extern "C" {
            fn AXIsProcessTrusted() -> bool;
        }
        AXIsProcessTrusted()
    }
}
