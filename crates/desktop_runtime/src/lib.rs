pub mod apps;
pub mod config;
mod effect_executor;
pub mod manager;
pub mod model;
pub mod reducer;
mod runtime_context;
pub mod timers;
pub mod window_manager;

pub use apps::{desktop_shortcuts, AppCatalog, CatalogError, DesktopShortcut};
pub use config::{ConfigError, ReopenPolicy, RuntimeConfig};
pub use manager::WindowManager;
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};
pub use timers::{Clock, ManualClock, SystemClock};
