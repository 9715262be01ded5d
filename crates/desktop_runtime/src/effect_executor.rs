//! Explicit runtime effect-queue executor for reducer-emitted side effects.

use leptos::*;

use crate::{
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

/// Installs the effect executor that drains reducer-emitted runtime effects in order.
pub fn install(runtime: DesktopRuntimeContext) {
    // Clear the queue before processing so nested dispatches enqueue a fresh batch instead of
    // being overwritten by the in-flight drain.
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        for effect in queued {
            run_runtime_effect(runtime, effect);
        }
    });
}

fn run_runtime_effect(runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
    match effect {
        RuntimeEffect::DispatchLifecycle { content, event, .. } => content.notify(event),
        RuntimeEffect::ScheduleRemoval {
            key,
            instance,
            delay,
        } => set_timeout(
            move || runtime.dispatch_action(DesktopAction::FinalizeClose { key, instance }),
            delay,
        ),
        RuntimeEffect::ScheduleShutdown { delay, epoch } => set_timeout(
            move || runtime.dispatch_action(DesktopAction::CompleteShutdown { epoch }),
            delay,
        ),
    }
}
