//! Reducer actions, side-effect intents, and transition logic for the window registry.

use std::time::Duration;

use desktop_app_contract::{AppKey, AppLifecycleEvent, ContentHandle, InstanceId, LaunchContext};
use thiserror::Error;

use crate::{
    apps::AppCatalog,
    config::{ReopenPolicy, RuntimeConfig},
    model::{DesktopState, OpenWindowRequest, PowerState, WindowEntry},
    window_manager::{holds_top_z_index, next_z_index, raise_to_top},
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open (or re-open) the app described by the request.
    OpenWindow(OpenWindowRequest),
    /// Request a close; removal is deferred.
    CloseWindow {
        /// Window to close.
        key: AppKey,
    },
    /// Deferred half of a close: remove the entry if it is still the scheduled instance.
    FinalizeClose {
        /// Window key captured when the close was requested.
        key: AppKey,
        /// Entry instance captured when the close was requested.
        instance: InstanceId,
    },
    /// Hide a window without closing it.
    MinimizeWindow {
        /// Window to minimize.
        key: AppKey,
    },
    /// Taskbar click: minimize the top window, or restore a minimized one.
    ToggleMinimize {
        /// Window associated with the taskbar button.
        key: AppKey,
    },
    /// Raise a window after interaction with its body.
    FocusWindow {
        /// Window to raise.
        key: AppKey,
    },
    /// Power on and open the configured boot apps.
    Boot,
    /// Start the delayed shutdown sequence.
    BeginShutdown,
    /// Delayed half of [`DesktopAction::BeginShutdown`].
    CompleteShutdown {
        /// Shutdown epoch captured when the shutdown was requested.
        epoch: u64,
    },
    /// Clear the registry and power off immediately.
    Shutdown,
    /// Clear the registry and stay powered on.
    Reboot,
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the runtime to execute.
pub enum RuntimeEffect {
    /// Notify a hosted body about a lifecycle transition.
    DispatchLifecycle {
        /// Window key.
        key: AppKey,
        /// Entry instance the body belongs to.
        instance: InstanceId,
        /// Body to notify.
        content: ContentHandle,
        /// Transition.
        event: AppLifecycleEvent,
    },
    /// Dispatch [`DesktopAction::FinalizeClose`] after `delay`.
    ScheduleRemoval {
        /// Window key.
        key: AppKey,
        /// Entry instance to remove.
        instance: InstanceId,
        /// Delay before removal.
        delay: Duration,
    },
    /// Dispatch [`DesktopAction::CompleteShutdown`] after `delay`.
    ScheduleShutdown {
        /// Delay before power-off.
        delay: Duration,
        /// Shutdown epoch the power-off belongs to.
        epoch: u64,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Caller-misuse errors. Actions on a key with no entry are silent no-ops, not errors.
pub enum ReducerError {
    /// The key is malformed or not present in the application catalog.
    #[error("unknown app key `{0}`")]
    InvalidKey(String),
    /// Windows cannot be opened while the desktop is powered off.
    #[error("desktop is powered off")]
    PoweredOff,
}

/// Applies a [`DesktopAction`] to the registry and collects resulting side effects.
///
/// # Errors
///
/// Returns [`ReducerError::InvalidKey`] when opening a key that is not in `catalog`, and
/// [`ReducerError::PoweredOff`] when opening while the desktop is off. The registry is left
/// untouched on error.
pub fn reduce_desktop(
    state: &mut DesktopState,
    catalog: &AppCatalog,
    config: &RuntimeConfig,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            let descriptor = catalog.resolve(&req.key)?;
            if state.power == PowerState::Off {
                return Err(ReducerError::PoweredOff);
            }

            let existing = state.windows.iter().position(|w| w.key == req.key);
            let refocus = existing.is_some_and(|index| {
                !state.windows[index].closing && config.reopen_policy == ReopenPolicy::Refocus
            });

            if refocus {
                raise_to_top(state, &req.key);
                if let Some(entry) = state.entry_mut(&req.key) {
                    let event = if entry.minimized {
                        AppLifecycleEvent::Restored
                    } else {
                        AppLifecycleEvent::Focused
                    };
                    entry.minimized = false;
                    effects.push(lifecycle(entry, event));
                }
            } else {
                let instance = next_instance(state);
                let context = LaunchContext {
                    key: req.key.clone(),
                    instance,
                    launch_params: req.launch_params,
                };
                let entry = WindowEntry {
                    key: req.key,
                    instance,
                    z_index: next_z_index(&mut state.windows),
                    minimized: false,
                    closing: false,
                    display_name: descriptor.display_name.clone(),
                    icon_ref: descriptor.icon_ref.clone(),
                    content: descriptor.launch(&context),
                };
                effects.push(lifecycle(&entry, AppLifecycleEvent::Mounted));
                match existing {
                    Some(index) => {
                        let replaced = std::mem::replace(&mut state.windows[index], entry);
                        effects.push(lifecycle(&replaced, AppLifecycleEvent::Closed));
                    }
                    None => state.windows.push(entry),
                }
            }
        }
        DesktopAction::CloseWindow { key } => {
            if let Some(entry) = state.entry_mut(&key) {
                if !entry.closing {
                    entry.closing = true;
                    effects.push(lifecycle(entry, AppLifecycleEvent::Closing));
                    effects.push(RuntimeEffect::ScheduleRemoval {
                        key,
                        instance: entry.instance,
                        delay: config.close_delay(),
                    });
                }
            }
        }
        DesktopAction::FinalizeClose { key, instance } => {
            if let Some(index) = state
                .windows
                .iter()
                .position(|w| w.key == key && w.instance == instance)
            {
                let removed = state.windows.remove(index);
                effects.push(lifecycle(&removed, AppLifecycleEvent::Closed));
            }
        }
        DesktopAction::MinimizeWindow { key } => {
            if let Some(entry) = state.entry_mut(&key) {
                if !entry.minimized {
                    entry.minimized = true;
                    effects.push(lifecycle(entry, AppLifecycleEvent::Minimized));
                }
            }
        }
        DesktopAction::ToggleMinimize { key } => {
            let allowed = state
                .entry(&key)
                .is_some_and(|entry| entry.minimized || holds_top_z_index(&state.windows, entry));
            if allowed {
                raise_to_top(state, &key);
                if let Some(entry) = state.entry_mut(&key) {
                    entry.minimized = !entry.minimized;
                    let event = if entry.minimized {
                        AppLifecycleEvent::Minimized
                    } else {
                        AppLifecycleEvent::Restored
                    };
                    effects.push(lifecycle(entry, event));
                }
            }
        }
        DesktopAction::FocusWindow { key } => {
            if raise_to_top(state, &key).is_some() {
                if let Some(entry) = state.entry_mut(&key) {
                    let event = if entry.minimized && config.focus_restores_minimized {
                        entry.minimized = false;
                        AppLifecycleEvent::Restored
                    } else {
                        AppLifecycleEvent::Focused
                    };
                    effects.push(lifecycle(entry, event));
                }
            }
        }
        DesktopAction::Boot => {
            for key in &config.boot_apps {
                catalog.resolve(key)?;
            }
            state.power = PowerState::Running;
            for key in &config.boot_apps {
                let opened = reduce_desktop(
                    state,
                    catalog,
                    config,
                    DesktopAction::OpenWindow(OpenWindowRequest::new(key.clone())),
                )?;
                effects.extend(opened);
            }
        }
        DesktopAction::BeginShutdown => {
            if state.power == PowerState::Running {
                state.power = PowerState::ShuttingDown;
                let epoch = next_shutdown_epoch(state);
                effects.push(RuntimeEffect::ScheduleShutdown {
                    delay: config.shutdown_delay(),
                    epoch,
                });
            }
        }
        DesktopAction::CompleteShutdown { epoch } => {
            if state.power == PowerState::ShuttingDown && state.shutdown_epoch == epoch {
                power_off(state);
            }
        }
        DesktopAction::Shutdown => power_off(state),
        DesktopAction::Reboot => {
            state.windows.clear();
            state.power = PowerState::Running;
            next_shutdown_epoch(state);
        }
    }

    Ok(effects)
}

fn power_off(state: &mut DesktopState) {
    state.windows.clear();
    state.power = PowerState::Off;
    state.shutdown_count = state.shutdown_count.saturating_add(1);
    next_shutdown_epoch(state);
}

fn next_shutdown_epoch(state: &mut DesktopState) -> u64 {
    state.shutdown_epoch = state.shutdown_epoch.wrapping_add(1);
    state.shutdown_epoch
}

fn next_instance(state: &mut DesktopState) -> InstanceId {
    let id = InstanceId(state.next_instance);
    state.next_instance = state.next_instance.saturating_add(1);
    id
}

fn lifecycle(entry: &WindowEntry, event: AppLifecycleEvent) -> RuntimeEffect {
    RuntimeEffect::DispatchLifecycle {
        key: entry.key.clone(),
        instance: entry.instance,
        content: entry.content.clone(),
        event,
    }
}
