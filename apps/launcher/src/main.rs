//! Runs the activation coordinator behind a global hotkey until Ctrl-C.

use anyhow::Context;
use pluginhost_coordinator::{
    current_bundle_root, Collaborators, Coordinator, CoordinatorConfig, CoordinatorState,
    HotkeyDispatcher,
};
use pluginhost_hotkey::{start_hotkey_listener, HotkeyConfig, TriggerGuard};
use std::rc::Rc;
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pluginhost=debug")),
        )
        .init();

    let config = CoordinatorConfig::default()
        .with_env_overrides(|var| std::env::var(var).ok())
        .context("invalid coordinator configuration")?;
    let bundle_root = current_bundle_root().context("cannot locate own bundle")?;

    tracing::info!(
        helper = %config.helper_identity,
        mode = ?config.trigger_mode,
        bundle = %bundle_root.display(),
        "starting pluginhost launcher"
    );

    // Everything below stays on the main thread: on macOS the provider and
    // registry pump its run loop before each read.
    let coordinator = Rc::new(Coordinator::new(config, bundle_root, Collaborators::platform()));
    let state = Rc::new(CoordinatorState::new());

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let hotkey = start_hotkey_listener(HotkeyConfig::default(), tx)
        .context("failed to start hotkey listener")?;
    state.install_hotkey(hotkey);

    let dispatcher = HotkeyDispatcher::new(
        TriggerGuard::default(),
        Rc::clone(&coordinator),
        Rc::clone(&state),
    );

    LocalSet::new()
        .run_until(async {
            tokio::select! {
                _ = dispatcher.run(rx) => {
                    tracing::warn!("hotkey listener stopped");
                }
                result = tokio::signal::ctrl_c() => {
                    result.context("failed to wait for Ctrl-C")?;
                    tracing::info!("shutting down");
                }
            }
            anyhow::Ok(())
        })
        .await?;

    coordinator.shutdown(&state);
    Ok(())
}
