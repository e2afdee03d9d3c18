//! Platform-specific channel implementations.

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "macos")]
pub use macos::DistributedChannel;

#[cfg(target_os = "macos")]
pub type PlatformChannel = DistributedChannel;

/// Without a system-wide bus, messages stay in-process and are not kept.
#[cfg(not(target_os = "macos"))]
pub type PlatformChannel = crate::LocalChannel;

#[cfg(all(test, not(target_os = "macos")))]
mod tests {
    use super::*;
    use crate::LocalChannel;

    #[test]
    fn test_platform_channel_does_not_record() {
        fn dispatch_only(_: &LocalChannel) {}
        dispatch_only(&PlatformChannel::new());
    }
}
