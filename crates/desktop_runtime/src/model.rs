use desktop_app_contract::{AppKey, ContentHandle, InstanceId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerState {
    #[default]
    Running,
    /// Shutdown was requested and the delayed power-off is pending.
    ShuttingDown,
    Off,
}

/// One open application instance.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowEntry {
    pub key: AppKey,
    pub instance: InstanceId,
    pub z_index: u32,
    pub minimized: bool,
    /// Close was requested; the entry stays visible until its deferred removal fires.
    pub closing: bool,
    pub display_name: String,
    pub icon_ref: String,
    pub content: ContentHandle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub next_instance: u64,
    /// Registry entries in open order. Visual order comes from `z_index`.
    pub windows: Vec<WindowEntry>,
    pub power: PowerState,
    pub shutdown_count: u32,
    /// Bumped on every shutdown request, shutdown and reboot. A delayed power-off only applies
    /// while the epoch it was scheduled under is still current.
    pub shutdown_epoch: u64,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            next_instance: 1,
            windows: Vec::new(),
            power: PowerState::Running,
            shutdown_count: 0,
            shutdown_epoch: 0,
        }
    }
}

impl DesktopState {
    pub fn entry(&self, key: &AppKey) -> Option<&WindowEntry> {
        self.windows.iter().find(|w| &w.key == key)
    }

    pub fn entry_mut(&mut self, key: &AppKey) -> Option<&mut WindowEntry> {
        self.windows.iter_mut().find(|w| &w.key == key)
    }

    pub fn is_open(&self, key: &AppKey) -> bool {
        self.entry(key).is_some()
    }

    pub fn summary(&self) -> DesktopSummary {
        let focused = crate::window_manager::focused_window_key(self);
        DesktopSummary {
            power: self.power,
            shutdown_count: self.shutdown_count,
            windows: self
                .windows
                .iter()
                .map(|w| WindowSummary {
                    key: w.key.clone(),
                    instance: w.instance,
                    z_index: w.z_index,
                    minimized: w.minimized,
                    closing: w.closing,
                    focused: focused.as_ref() == Some(&w.key),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenWindowRequest {
    pub key: AppKey,
    pub launch_params: Value,
}

impl OpenWindowRequest {
    pub fn new(key: AppKey) -> Self {
        Self {
            key,
            launch_params: Value::Null,
        }
    }
}

/// Read-only projection of one entry handed to the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowView {
    pub key: AppKey,
    pub instance: InstanceId,
    pub z_index: u32,
    pub minimized: bool,
    pub closing: bool,
    pub focused: bool,
    pub display_name: String,
    pub icon_ref: String,
    pub content: ContentHandle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskbarItem {
    pub key: AppKey,
    pub display_name: String,
    pub icon_ref: String,
    pub minimized: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub key: AppKey,
    pub instance: InstanceId,
    pub z_index: u32,
    pub minimized: bool,
    pub closing: bool,
    pub focused: bool,
}

/// Content-free snapshot of the registry for logging and inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopSummary {
    pub power: PowerState,
    pub shutdown_count: u32,
    pub windows: Vec<WindowSummary>,
}
