//! Fakes shared by the coordinator integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use pluginhost_context::{AppInfo, FixedProvider};
use pluginhost_coordinator::{
    AlertPresenter, Collaborators, Coordinator, CoordinatorConfig, CoordinatorState, UserAlert,
    DEFAULT_HELPER_RELATIVE_PATH,
};
use pluginhost_events::InMemoryChannel;
use pluginhost_process::{
    ActivationScope, HelperIdentity, LaunchError, LaunchOptions, ProcessHandle, ProcessLauncher,
    ProcessRegistry,
};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const HELPER_PID: u32 = 4242;

/// Calls made against the registry and launcher, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindRunning,
    IsForegroundActive,
    Launch { path: PathBuf, activate: bool },
    Activate(ActivationScope),
    Terminate,
}

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn launches(&self) -> usize {
        self.count(|c| matches!(c, Call::Launch { .. }))
    }

    pub fn activations(&self) -> usize {
        self.count(|c| matches!(c, Call::Activate(_)))
    }

    /// Paths passed to every launch, in order.
    pub fn launch_paths(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Launch { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().position(pred)
    }
}

/// A process table holding at most one helper.
pub struct FakeRegistry {
    log: CallLog,
    pid: AtomicU32,
    foreground: AtomicBool,
}

impl FakeRegistry {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            pid: AtomicU32::new(0),
            foreground: AtomicBool::new(false),
        }
    }

    pub fn set_running(&self, pid: Option<u32>) {
        self.pid.store(pid.unwrap_or(0), Ordering::SeqCst);
    }

    pub fn set_foreground(&self, foreground: bool) {
        self.foreground.store(foreground, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.pid.load(Ordering::SeqCst) != 0
    }
}

impl ProcessRegistry for FakeRegistry {
    fn find_running(&self, identity: &HelperIdentity) -> Option<ProcessHandle> {
        self.log.push(Call::FindRunning);
        match self.pid.load(Ordering::SeqCst) {
            0 => None,
            pid => Some(ProcessHandle::new(identity.clone(), pid)),
        }
    }

    fn is_foreground_active(&self, _handle: &ProcessHandle) -> bool {
        self.log.push(Call::IsForegroundActive);
        self.foreground.load(Ordering::SeqCst)
    }
}

/// Launcher that "starts" the helper by updating [`FakeRegistry`].
///
/// Bringing the helper forward also makes it the frontmost app, the way
/// the OS would.
pub struct FakeLauncher {
    log: CallLog,
    registry: Arc<FakeRegistry>,
    apps: Arc<FixedProvider>,
    reject_with: Mutex<Option<String>>,
}

impl FakeLauncher {
    pub fn new(log: CallLog, registry: Arc<FakeRegistry>, apps: Arc<FixedProvider>) -> Self {
        Self {
            log,
            registry,
            apps,
            reject_with: Mutex::new(None),
        }
    }

    fn focus_helper(&self) {
        self.registry.set_foreground(true);
        self.apps.set(Some(helper_app()));
    }

    pub fn reject_with(&self, message: &str) {
        *self.reject_with.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl ProcessLauncher for FakeLauncher {
    async fn launch(
        &self,
        path: &Path,
        identity: &HelperIdentity,
        options: &LaunchOptions,
    ) -> Result<ProcessHandle, LaunchError> {
        self.log.push(Call::Launch {
            path: path.to_path_buf(),
            activate: options.activate_on_launch,
        });
        if !path.exists() {
            return Err(LaunchError::NotFound {
                path: path.to_path_buf(),
            });
        }
        if let Some(message) = self.reject_with.lock().unwrap().clone() {
            return Err(LaunchError::rejected(message));
        }
        self.registry.set_running(Some(HELPER_PID));
        if options.activate_on_launch {
            self.focus_helper();
        }
        Ok(ProcessHandle::new(identity.clone(), HELPER_PID))
    }

    fn activate(&self, _handle: &ProcessHandle, scope: ActivationScope) -> bool {
        self.log.push(Call::Activate(scope));
        self.focus_helper();
        true
    }

    fn terminate(&self, _handle: &ProcessHandle) -> bool {
        self.log.push(Call::Terminate);
        self.registry.set_running(None);
        self.registry.set_foreground(false);
        true
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    alerts: Mutex<Vec<UserAlert>>,
}

impl RecordingPresenter {
    pub fn alerts(&self) -> Vec<UserAlert> {
        self.alerts.lock().unwrap().clone()
    }
}

impl AlertPresenter for RecordingPresenter {
    fn present(&self, alert: &UserAlert) {
        self.alerts.lock().unwrap().push(alert.clone());
    }
}

pub fn finder() -> AppInfo {
    AppInfo::new("com.apple.finder", "Finder", 123)
}

pub fn helper_app() -> AppInfo {
    AppInfo::new("im.rime.plugin.host", "SquirrelPluginHost", HELPER_PID as i32)
}

/// A coordinator over fakes, with the primary bundle in a temp dir.
pub struct Harness {
    pub bundle: TempDir,
    pub log: CallLog,
    pub apps: Arc<FixedProvider>,
    pub registry: Arc<FakeRegistry>,
    pub launcher: Arc<FakeLauncher>,
    pub channel: Arc<InMemoryChannel>,
    pub alerts: Arc<RecordingPresenter>,
    pub coordinator: Rc<Coordinator>,
    pub state: Rc<CoordinatorState>,
}

impl Harness {
    /// Helper bundle installed, not running.
    pub fn new() -> Self {
        Self::with_config(CoordinatorConfig::default(), true)
    }

    /// No helper bundle on disk.
    pub fn without_helper() -> Self {
        Self::with_config(CoordinatorConfig::default(), false)
    }

    pub fn with_config(config: CoordinatorConfig, installed: bool) -> Self {
        let bundle = tempfile::Builder::new()
            .suffix(".app")
            .tempdir()
            .unwrap();
        if installed {
            std::fs::create_dir_all(bundle.path().join(DEFAULT_HELPER_RELATIVE_PATH)).unwrap();
        }

        let log = CallLog::default();
        let apps = Arc::new(FixedProvider::new(Some(finder())));
        let registry = Arc::new(FakeRegistry::new(log.clone()));
        let launcher = Arc::new(FakeLauncher::new(
            log.clone(),
            Arc::clone(&registry),
            Arc::clone(&apps),
        ));
        let channel = Arc::new(InMemoryChannel::new());
        let alerts = Arc::new(RecordingPresenter::default());

        let coordinator = Coordinator::new(
            config,
            bundle.path(),
            Collaborators {
                apps: apps.clone(),
                registry: registry.clone(),
                launcher: launcher.clone(),
                channel: channel.clone(),
                alerts: alerts.clone(),
            },
        );

        Self {
            bundle,
            log,
            apps,
            registry,
            launcher,
            channel,
            alerts,
            coordinator: Rc::new(coordinator),
            state: Rc::new(CoordinatorState::new()),
        }
    }

    pub fn helper_path(&self) -> PathBuf {
        self.bundle.path().join(DEFAULT_HELPER_RELATIVE_PATH)
    }

    /// Put a running helper in the fake process table.
    pub fn helper_running(&self, foreground: bool) {
        self.registry.set_running(Some(HELPER_PID));
        self.registry.set_foreground(foreground);
    }
}
