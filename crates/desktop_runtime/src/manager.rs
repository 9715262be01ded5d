//! Owned window-manager store: reducer, effect execution, and the deferred timer queue in one
//! value that a rendering layer can hold without any UI harness.

use std::rc::Rc;

use desktop_app_contract::AppKey;
use leptos::logging;

use crate::{
    apps::AppCatalog,
    config::{ConfigError, RuntimeConfig},
    model::{DesktopState, DesktopSummary, OpenWindowRequest, TaskbarItem, WindowView},
    reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect},
    timers::{Clock, DeferredQueue, SystemClock},
    window_manager::{highest_z_index, render_order, taskbar_items},
};

pub struct WindowManager {
    state: DesktopState,
    catalog: AppCatalog,
    config: RuntimeConfig,
    clock: Rc<dyn Clock>,
    timers: DeferredQueue,
}

impl WindowManager {
    /// Creates a manager on the system clock.
    pub fn new(catalog: AppCatalog, config: RuntimeConfig) -> Result<Self, ConfigError> {
        Self::with_clock(catalog, config, Rc::new(SystemClock))
    }

    pub fn with_clock(
        catalog: AppCatalog,
        config: RuntimeConfig,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate(&catalog)?;
        Ok(Self {
            state: DesktopState::default(),
            catalog,
            config,
            clock,
            timers: DeferredQueue::default(),
        })
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    /// Applies `action` and executes the effects it produced.
    pub fn dispatch(&mut self, action: DesktopAction) -> Result<(), ReducerError> {
        let effects = reduce_desktop(&mut self.state, &self.catalog, &self.config, action)?;
        for effect in effects {
            self.run_effect(effect);
        }
        Ok(())
    }

    fn dispatch_logged(&mut self, action: DesktopAction) {
        if let Err(err) = self.dispatch(action) {
            logging::warn!("desktop reducer error: {err}");
        }
    }

    fn run_effect(&mut self, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::DispatchLifecycle { content, event, .. } => content.notify(event),
            RuntimeEffect::ScheduleRemoval {
                key,
                instance,
                delay,
            } => self.timers.schedule(
                self.clock.now_ms(),
                delay,
                DesktopAction::FinalizeClose { key, instance },
            ),
            RuntimeEffect::ScheduleShutdown { delay, epoch } => self.timers.schedule(
                self.clock.now_ms(),
                delay,
                DesktopAction::CompleteShutdown { epoch },
            ),
        }
    }

    /// Opens the app for `key`, or refocuses it when already open.
    ///
    /// # Errors
    ///
    /// [`ReducerError::InvalidKey`] for keys outside the catalog, [`ReducerError::PoweredOff`]
    /// while the desktop is off.
    pub fn open(&mut self, key: &AppKey) -> Result<(), ReducerError> {
        self.open_with(OpenWindowRequest::new(key.clone()))
    }

    /// [`WindowManager::open`] with launch parameters for a freshly mounted body.
    ///
    /// The parameters are ignored when the existing entry is refocused.
    pub fn open_with(&mut self, request: OpenWindowRequest) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::OpenWindow(request))
    }

    /// [`WindowManager::open`] for an unparsed key.
    pub fn open_str(&mut self, raw: &str) -> Result<(), ReducerError> {
        let key = self.catalog.resolve_str(raw)?.key.clone();
        self.open(&key)
    }

    pub fn close(&mut self, key: &AppKey) {
        self.dispatch_logged(DesktopAction::CloseWindow { key: key.clone() });
    }

    pub fn minimize(&mut self, key: &AppKey) {
        self.dispatch_logged(DesktopAction::MinimizeWindow { key: key.clone() });
    }

    pub fn toggle_minimize(&mut self, key: &AppKey) {
        self.dispatch_logged(DesktopAction::ToggleMinimize { key: key.clone() });
    }

    pub fn focus(&mut self, key: &AppKey) {
        self.dispatch_logged(DesktopAction::FocusWindow { key: key.clone() });
    }

    /// Powers on and opens the configured boot apps.
    pub fn boot(&mut self) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::Boot)
    }

    /// Starts the delayed shutdown; the registry is cleared once the delay fires.
    pub fn begin_shutdown(&mut self) {
        self.dispatch_logged(DesktopAction::BeginShutdown);
    }

    /// Clears the registry and powers off immediately.
    pub fn shutdown(&mut self) {
        self.dispatch_logged(DesktopAction::Shutdown);
    }

    /// Clears the registry and stays powered on.
    pub fn reboot(&mut self) {
        self.dispatch_logged(DesktopAction::Reboot);
    }

    /// Fires every deferred action that is due. Returns how many fired.
    pub fn run_due_timers(&mut self) -> usize {
        let due = self.timers.take_due(self.clock.now_ms());
        let fired = due.len();
        for action in due {
            self.dispatch_logged(action);
        }
        fired
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn next_timer_due_ms(&self) -> Option<u64> {
        self.timers.next_due_ms()
    }

    /// Highest z-index in the registry, recomputed on every call.
    pub fn current_max(&self) -> u32 {
        highest_z_index(&self.state.windows)
    }

    /// Windows in draw order for the rendering layer.
    pub fn windows(&self) -> Vec<WindowView> {
        render_order(&self.state)
    }

    pub fn taskbar(&self) -> Vec<TaskbarItem> {
        taskbar_items(&self.state)
    }

    pub fn summary(&self) -> DesktopSummary {
        self.state.summary()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use desktop_app_contract::InstanceId;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{model::PowerState, timers::ManualClock};

    fn key(raw: &str) -> AppKey {
        AppKey::trusted(raw)
    }

    fn manager() -> (WindowManager, ManualClock) {
        let clock = ManualClock::new(1_000);
        let manager = WindowManager::with_clock(
            AppCatalog::builtin(),
            RuntimeConfig::default(),
            Rc::new(clock.clone()),
        )
        .expect("manager");
        (manager, clock)
    }

    #[test]
    fn close_removes_entry_only_after_delay() {
        let (mut wm, clock) = manager();
        wm.open(&key("photos")).unwrap();
        wm.close(&key("photos"));

        clock.advance(Duration::from_millis(99));
        assert_eq!(wm.run_due_timers(), 0);
        assert!(wm.state().is_open(&key("photos")));
        assert_eq!(wm.next_timer_due_ms(), Some(1_100));

        clock.advance(Duration::from_millis(1));
        assert_eq!(wm.run_due_timers(), 1);
        assert!(wm.windows().is_empty());
        assert_eq!(wm.pending_timers(), 0);
    }

    #[test]
    fn open_str_rejects_unknown_keys() {
        let (mut wm, _) = manager();
        assert_eq!(
            wm.open_str("solitaire"),
            Err(ReducerError::InvalidKey("solitaire".to_string()))
        );
        assert!(wm.open_str("doom").is_ok());
        assert_eq!(wm.current_max(), 1);
    }

    #[test]
    fn begin_shutdown_powers_off_after_delay() {
        let (mut wm, clock) = manager();
        wm.boot().unwrap();
        assert!(wm.state().is_open(&key("showcase")));

        wm.begin_shutdown();
        clock.advance(Duration::from_millis(599));
        wm.run_due_timers();
        assert_eq!(wm.state().power, PowerState::ShuttingDown);
        assert_eq!(wm.taskbar().len(), 1);

        clock.advance(Duration::from_millis(1));
        wm.run_due_timers();
        assert_eq!(wm.state().power, PowerState::Off);
        assert!(wm.windows().is_empty());
        assert_eq!(wm.open(&key("doom")), Err(ReducerError::PoweredOff));

        wm.reboot();
        wm.open(&key("doom")).unwrap();
        assert_eq!(wm.summary().shutdown_count, 1);
    }

    #[test]
    fn power_off_scheduled_before_reboot_waits_for_the_new_shutdown() {
        let (mut wm, clock) = manager();
        wm.begin_shutdown();
        clock.advance(Duration::from_millis(300));
        wm.reboot();
        wm.open(&key("doom")).unwrap();
        wm.begin_shutdown();

        clock.advance(Duration::from_millis(300));
        assert_eq!(wm.run_due_timers(), 1);
        assert_eq!(wm.state().power, PowerState::ShuttingDown);
        assert!(wm.state().is_open(&key("doom")));

        clock.advance(Duration::from_millis(300));
        assert_eq!(wm.run_due_timers(), 1);
        assert_eq!(wm.state().power, PowerState::Off);
        assert_eq!(wm.summary().shutdown_count, 1);
    }

    #[test]
    fn summary_serializes_without_content() {
        let (mut wm, _) = manager();
        wm.open(&key("mspaint")).unwrap();
        wm.open(&key("photos")).unwrap();
        wm.minimize(&key("photos"));

        let json = serde_json::to_value(wm.summary()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "power": "running",
                "shutdown_count": 0,
                "windows": [
                    {
                        "key": "mspaint",
                        "instance": 1,
                        "z_index": 1,
                        "minimized": false,
                        "closing": false,
                        "focused": false
                    },
                    {
                        "key": "photos",
                        "instance": 2,
                        "z_index": 2,
                        "minimized": true,
                        "closing": false,
                        "focused": false
                    }
                ]
            })
        );
        assert_eq!(wm.windows()[1].instance, InstanceId(2));
    }
}
