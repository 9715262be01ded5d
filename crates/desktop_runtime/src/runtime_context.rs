//! Runtime provider and context wiring for a Leptos rendering layer.
//!
//! The provider owns the reactive registry signal and the reducer dispatch callback. Window
//! chrome, the taskbar, and app bodies read from [`DesktopRuntimeContext`] and dispatch
//! [`DesktopAction`] values back; they never mutate the registry directly.
#![allow(clippy::clone_on_copy)]

use leptos::*;

use crate::{
    apps::AppCatalog,
    config::RuntimeConfig,
    effect_executor,
    model::{DesktopState, TaskbarItem, WindowView},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
    window_manager::{render_order, taskbar_items},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Installed application catalog.
    pub catalog: StoredValue<AppCatalog>,
    /// Runtime tuning.
    pub config: StoredValue<RuntimeConfig>,
    /// Reactive registry signal.
    pub state: RwSignal<DesktopState>,
    /// Queue of runtime effects emitted by the reducer and drained by the effect executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Tracked draw-order projection.
    pub fn windows(&self) -> Vec<WindowView> {
        self.state.with(render_order)
    }

    /// Tracked taskbar projection.
    pub fn taskbar(&self) -> Vec<TaskbarItem> {
        self.state.with(taskbar_items)
    }
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and boots the desktop.
pub fn DesktopProvider(
    /// Installed application catalog.
    catalog: AppCatalog,
    /// Runtime tuning. Boot apps missing from `catalog` are reported and the desktop starts
    /// empty.
    #[prop(optional)]
    config: RuntimeConfig,
    children: Children,
) -> impl IntoView {
    if let Err(err) = config.validate(&catalog) {
        logging::warn!("desktop config rejected: {err}");
    }

    let catalog = store_value(catalog);
    let config = store_value(config);
    let state = create_rw_signal(DesktopState::default());
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut desktop = state.get_untracked();
        let previous = desktop.clone();

        let result = catalog.with_value(|catalog| {
            config.with_value(|config| reduce_desktop(&mut desktop, catalog, config, action))
        });
        match result {
            Ok(new_effects) => {
                if desktop != previous {
                    state.set(desktop);
                }
                if !new_effects.is_empty() {
                    effects.update(|queue| queue.extend(new_effects));
                }
            }
            Err(err) => logging::warn!("desktop reducer error: {err}"),
        }
    });

    let runtime = DesktopRuntimeContext {
        catalog,
        config,
        state,
        effects,
        dispatch,
    };

    provide_context(runtime.clone());
    effect_executor::install(runtime);
    runtime.dispatch_action(DesktopAction::Boot);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
