//! The activation decision algorithm.

use crate::alert::{AlertPresenterRef, PlatformPresenter, UserAlert};
use crate::config::CoordinatorConfig;
use crate::error::CoordinatorError;
use crate::locate::HelperLocation;
use crate::state::CoordinatorState;
use pluginhost_context::platform::PlatformProvider;
use pluginhost_context::{ActiveAppProviderRef, SourceContext};
use pluginhost_events::platform::PlatformChannel;
use pluginhost_events::{ActivationChannelRef, ActivationMessage, ChannelError, MessageHandler};
use pluginhost_process::platform::{PlatformLauncher, PlatformRegistry};
use pluginhost_process::{
    ActivationScope, LaunchOptions, ProcessHandle, ProcessLauncherRef, ProcessRegistryRef,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a coordinator operation ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The helper was already running; nothing was sent.
    AlreadyRunning { pid: u32 },
    /// The helper was started and handed the source context.
    Launched { pid: u32 },
    /// The helper was in the foreground and was asked to hide.
    Hidden { pid: u32 },
    /// The helper was activated and asked to show.
    Shown { pid: u32 },
    /// The helper was activated without any message.
    BroughtToFront { pid: u32 },
    /// The helper was asked to quit.
    Terminated { pid: u32 },
    /// No helper to act on.
    NotRunning,
}

/// The coordinator's collaborators, injected at construction.
#[derive(Clone)]
pub struct Collaborators {
    pub apps: ActiveAppProviderRef,
    pub registry: ProcessRegistryRef,
    pub launcher: ProcessLauncherRef,
    pub channel: ActivationChannelRef,
    pub alerts: AlertPresenterRef,
}

impl Collaborators {
    /// The real implementations for the current platform.
    pub fn platform() -> Self {
        Self {
            apps: Arc::new(PlatformProvider::new()),
            registry: Arc::new(PlatformRegistry::new()),
            launcher: Arc::new(PlatformLauncher::new()),
            channel: Arc::new(PlatformChannel::new()),
            alerts: Arc::new(PlatformPresenter::new()),
        }
    }
}

/// Launches, shows and hides the helper process.
///
/// Holds no mutable state of its own: every operation borrows the
/// [`CoordinatorState`] created at process start.
pub struct Coordinator {
    config: CoordinatorConfig,
    location: HelperLocation,
    deps: Collaborators,
}

impl Coordinator {
    pub fn new(config: CoordinatorConfig, bundle_root: impl Into<PathBuf>, deps: Collaborators) -> Self {
        let location = HelperLocation::new(bundle_root, config.helper_relative_path.clone());
        Self {
            config,
            location,
            deps,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Make sure a helper process exists, launching it if needed.
    ///
    /// Calling this while the helper runs is a no-op: no launch, no message.
    pub async fn ensure_helper_running(
        &self,
        state: &CoordinatorState,
    ) -> Result<Outcome, CoordinatorError> {
        if let Some(handle) = self.find_helper() {
            debug!(pid = handle.pid, "helper already running");
            state.set_helper_observed_running(true);
            return Ok(Outcome::AlreadyRunning { pid: handle.pid });
        }

        // Capture before the launch moves focus to the helper.
        let source = SourceContext::capture(self.deps.apps.as_ref());
        self.launch_with_context(state, source).await
    }

    /// Launch, show or hide the helper depending on where it stands now.
    pub async fn toggle_helper_window(
        &self,
        state: &CoordinatorState,
    ) -> Result<Outcome, CoordinatorError> {
        let source = SourceContext::capture(self.deps.apps.as_ref());

        let Some(handle) = self.find_helper() else {
            return self.launch_with_context(state, source).await;
        };
        state.set_helper_observed_running(true);

        // Must be read before activate(), which would make it true.
        let foreground = self.deps.registry.is_foreground_active(&handle);

        if foreground {
            info!(pid = handle.pid, app = %source.app_name, "hiding helper window");
            self.publish(&ActivationMessage::toggle(source, true));
            return Ok(Outcome::Hidden { pid: handle.pid });
        }

        if !self.deps.launcher.activate(&handle, ActivationScope::AllWindows) {
            warn!(pid = handle.pid, "helper activation refused");
        }
        tokio::time::sleep(self.config.activation_settle_delay).await;

        info!(pid = handle.pid, app = %source.app_name, "showing helper window");
        self.publish(&ActivationMessage::toggle(source, false));
        Ok(Outcome::Shown { pid: handle.pid })
    }

    /// Activate a running helper without sending it anything.
    pub fn bring_helper_to_front(&self) -> Outcome {
        match self.find_helper() {
            Some(handle) => {
                if !self.deps.launcher.activate(&handle, ActivationScope::KeyWindow) {
                    warn!(pid = handle.pid, "helper activation refused");
                }
                Outcome::BroughtToFront { pid: handle.pid }
            }
            None => Outcome::NotRunning,
        }
    }

    /// Ask the helper to quit, if this coordinator started or saw it.
    pub fn terminate_helper(&self, state: &CoordinatorState) -> Outcome {
        if !state.helper_observed_running() {
            return Outcome::NotRunning;
        }
        state.set_helper_observed_running(false);

        match self.find_helper() {
            Some(handle) => {
                self.deps.launcher.terminate(&handle);
                info!(pid = handle.pid, "helper terminated");
                Outcome::Terminated { pid: handle.pid }
            }
            None => Outcome::NotRunning,
        }
    }

    /// Subscribe to `topic` for the lifetime of `state`.
    pub fn subscribe(
        &self,
        state: &CoordinatorState,
        topic: &str,
        handler: MessageHandler,
    ) -> Result<(), ChannelError> {
        let id = self.deps.channel.subscribe(topic, handler)?;
        state.track_subscription(id);
        Ok(())
    }

    /// Tear down `state`: stop the hotkey listener, drop subscriptions and,
    /// if configured to own it, terminate the helper.
    ///
    /// Delayed publishes still pending on the runtime are lost.
    pub fn shutdown(&self, state: &CoordinatorState) {
        state.release(self.deps.channel.as_ref());
        if self.config.owns_helper {
            self.terminate_helper(state);
        }
        debug!("coordinator shut down");
    }

    fn find_helper(&self) -> Option<ProcessHandle> {
        self.deps.registry.find_running(&self.config.helper_identity)
    }

    async fn launch_with_context(
        &self,
        state: &CoordinatorState,
        source: SourceContext,
    ) -> Result<Outcome, CoordinatorError> {
        match self.launch_helper(state).await {
            Ok(handle) => {
                tokio::time::sleep(self.config.launch_settle_delay).await;
                info!(pid = handle.pid, app = %source.app_name, "sending source context to helper");
                self.publish(&ActivationMessage::set_source_context(source));
                Ok(Outcome::Launched { pid: handle.pid })
            }
            Err(e) => {
                state.set_helper_observed_running(false);
                self.deps.alerts.present(&UserAlert::from(&e));
                Err(e)
            }
        }
    }

    async fn launch_helper(&self, state: &CoordinatorState) -> Result<ProcessHandle, CoordinatorError> {
        let path = self.location.locate()?;

        let options = LaunchOptions {
            activate_on_launch: true,
            startup_timeout: self.config.startup_timeout,
        };
        info!(path = %path.display(), "launching helper");
        let handle = self
            .deps
            .launcher
            .launch(&path, &self.config.helper_identity, &options)
            .await
            .inspect_err(|e| warn!(error = %e, "helper launch failed"))?;
        state.set_helper_observed_running(true);

        // The launch request can leave the helper behind the caller.
        if !self.deps.launcher.activate(&handle, ActivationScope::AllWindows) {
            debug!(pid = handle.pid, "corrective activation refused");
        }
        Ok(handle)
    }

    fn publish(&self, message: &ActivationMessage) {
        self.deps.channel.publish(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::LogPresenter;
    use pluginhost_context::NullProvider;
    use pluginhost_events::InMemoryChannel;
    use pluginhost_process::{HelperIdentity, LaunchError, ProcessLauncher, ProcessRegistry};
    use std::path::Path;

    struct NoHelper;

    impl ProcessRegistry for NoHelper {
        fn find_running(&self, _identity: &HelperIdentity) -> Option<ProcessHandle> {
            None
        }

        fn is_foreground_active(&self, _handle: &ProcessHandle) -> bool {
            false
        }
    }

    struct Unlaunchable;

    #[async_trait::async_trait]
    impl ProcessLauncher for Unlaunchable {
        async fn launch(
            &self,
            _path: &Path,
            _identity: &HelperIdentity,
            _options: &LaunchOptions,
        ) -> Result<ProcessHandle, LaunchError> {
            Err(LaunchError::rejected("unreachable in these tests"))
        }

        fn activate(&self, _handle: &ProcessHandle, _scope: ActivationScope) -> bool {
            false
        }

        fn terminate(&self, _handle: &ProcessHandle) -> bool {
            false
        }
    }

    fn coordinator() -> Coordinator {
        Coordinator::new(
            CoordinatorConfig::default(),
            "/nonexistent/Primary.app",
            Collaborators {
                apps: Arc::new(NullProvider::new()),
                registry: Arc::new(NoHelper),
                launcher: Arc::new(Unlaunchable),
                channel: Arc::new(InMemoryChannel::new()),
                alerts: Arc::new(LogPresenter::new()),
            },
        )
    }

    #[test]
    fn test_terminate_without_observed_helper_is_noop() {
        let state = CoordinatorState::new();
        assert_eq!(coordinator().terminate_helper(&state), Outcome::NotRunning);
    }

    #[test]
    fn test_bring_to_front_without_helper() {
        assert_eq!(coordinator().bring_helper_to_front(), Outcome::NotRunning);
    }

    #[tokio::test]
    async fn test_missing_bundle_is_not_installed() {
        let state = CoordinatorState::new();
        let result = coordinator().ensure_helper_running(&state).await;
        assert!(matches!(
            result,
            Err(CoordinatorError::HelperNotInstalled { .. })
        ));
        assert!(!state.helper_observed_running());
    }
}
