//! Built-in placeholder bodies for the catalog apps.
//!
//! Real app bodies (paint canvas, games, photo browser) live in the rendering layer. The
//! placeholder only reports what the window manager told it.

use desktop_app_contract::{
    AppContent, AppKey, AppLifecycleEvent, ContentHandle, InstanceId, LaunchContext,
};
use leptos::logging;

#[derive(Debug)]
struct PlaceholderApp {
    key: AppKey,
    instance: InstanceId,
}

impl AppContent for PlaceholderApp {
    fn app_key(&self) -> &AppKey {
        &self.key
    }

    fn on_lifecycle(&self, event: AppLifecycleEvent) {
        if matches!(event, AppLifecycleEvent::Closed) {
            logging::log!("{} {} closed", self.key, self.instance);
        }
    }
}

pub(super) fn mount_placeholder_app(context: &LaunchContext) -> ContentHandle {
    ContentHandle::new(PlaceholderApp {
        key: context.key.clone(),
        instance: context.instance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_body_for_launched_key() {
        let context = LaunchContext::new(AppKey::trusted("henordle"), InstanceId(2));
        let handle = mount_placeholder_app(&context);
        assert_eq!(handle.content().app_key().as_str(), "henordle");
    }

    #[test]
    fn each_launch_gets_its_own_body() {
        let context = LaunchContext::new(AppKey::trusted("music"), InstanceId(7));
        let first = mount_placeholder_app(&context);
        let second = mount_placeholder_app(&context);

        first.notify(AppLifecycleEvent::Mounted);
        first.notify(AppLifecycleEvent::Closed);
        assert!(!first.ptr_eq(&second));
        assert_eq!(first, first.clone());
    }
}
