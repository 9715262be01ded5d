//! Shared contract types between the desktop window manager and the application bodies it hosts.
//!
//! The window manager never interprets hosted content. It only needs a stable [`AppKey`] per
//! application type, a [`ShortcutDescriptor`] describing how to build a fresh body, and the
//! [`AppContent`] lifecycle hook used to notify a body about focus/minimize/close transitions.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{fmt, rc::Rc, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

const MAX_APP_KEY_LEN: usize = 32;

/// Stable identifier for an installable application type.
///
/// The desktop hosts at most one window per key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppKey(String);

impl AppKey {
    /// Returns a key when `raw` is a short lowercase slug (`mspaint`, `oregon-trail`).
    pub fn new(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        if is_valid_app_key(&raw) {
            Ok(Self(raw))
        } else {
            Err(format!(
                "invalid app key `{raw}`; expected a lowercase slug of at most {MAX_APP_KEY_LEN} bytes"
            ))
        }
    }

    /// Creates a key without validation for compile-time/runtime trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the string form of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AppKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AppKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AppKey> for String {
    fn from(value: AppKey) -> Self {
        value.0
    }
}

fn is_valid_app_key(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > MAX_APP_KEY_LEN {
        return false;
    }
    let bytes = raw.as_bytes();
    if !bytes[0].is_ascii_lowercase() || raw.ends_with('-') {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}

/// Stable identity of one created window entry.
///
/// Two entries opened under the same [`AppKey`] at different times never share an instance id,
/// which lets deferred work target the exact entry it was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Lifecycle events emitted by the desktop window manager.
pub enum AppLifecycleEvent {
    /// A fresh body has been created for a new window entry.
    Mounted,
    /// Window was raised to the top of the stack.
    Focused,
    /// Window was hidden while staying open.
    Minimized,
    /// Window was un-hidden and raised.
    Restored,
    /// Close was requested; removal is pending.
    Closing,
    /// Window entry has been removed from the registry.
    Closed,
}

impl AppLifecycleEvent {
    /// Returns a stable string token for debugging hooks.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Mounted => "mounted",
            Self::Focused => "focused",
            Self::Minimized => "minimized",
            Self::Restored => "restored",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }
}

/// Opaque application body hosted inside a managed window.
pub trait AppContent: fmt::Debug {
    /// Key of the application type this body belongs to.
    fn app_key(&self) -> &AppKey;

    /// Receives manager lifecycle notifications. Ignored by default.
    fn on_lifecycle(&self, _event: AppLifecycleEvent) {}
}

/// Shared handle to a hosted application body.
///
/// Equality is handle identity: two handles are equal only when they point at the same body.
#[derive(Clone)]
pub struct ContentHandle(Rc<dyn AppContent>);

impl ContentHandle {
    /// Wraps an application body.
    pub fn new(content: impl AppContent + 'static) -> Self {
        Self(Rc::new(content))
    }

    /// Returns the hosted body.
    pub fn content(&self) -> &dyn AppContent {
        self.0.as_ref()
    }

    /// Forwards a lifecycle notification to the hosted body.
    pub fn notify(&self, event: AppLifecycleEvent) {
        self.0.on_lifecycle(event);
    }

    /// Returns whether both handles refer to the same body.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ContentHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContentHandle").field(&self.0).finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Inputs handed to a [`ContentFactory`] when a window entry is created.
pub struct LaunchContext {
    /// Application key being launched.
    pub key: AppKey,
    /// Instance id assigned to the new entry.
    pub instance: InstanceId,
    /// Free-form launch parameters.
    pub launch_params: Value,
}

impl LaunchContext {
    /// Creates a launch context with no launch parameters.
    pub fn new(key: AppKey, instance: InstanceId) -> Self {
        Self {
            key,
            instance,
            launch_params: Value::Null,
        }
    }
}

/// Constructor for a fresh application body.
pub type ContentFactory = fn(&LaunchContext) -> ContentHandle;

#[derive(Clone)]
/// Static catalog entry describing an installable application.
pub struct ShortcutDescriptor {
    /// Stable application key.
    pub key: AppKey,
    /// Label shown on the desktop shortcut, window chrome, and taskbar.
    pub display_name: String,
    /// Icon identifier resolved by the rendering layer.
    pub icon_ref: String,
    /// Body constructor used on open.
    pub factory: ContentFactory,
}

impl ShortcutDescriptor {
    /// Creates a descriptor.
    pub fn new(
        key: AppKey,
        display_name: impl Into<String>,
        icon_ref: impl Into<String>,
        factory: ContentFactory,
    ) -> Self {
        Self {
            key,
            display_name: display_name.into(),
            icon_ref: icon_ref.into(),
            factory,
        }
    }

    /// Builds a fresh body for `context`.
    pub fn launch(&self, context: &LaunchContext) -> ContentHandle {
        (self.factory)(context)
    }
}

impl fmt::Debug for ShortcutDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcutDescriptor")
            .field("key", &self.key)
            .field("display_name", &self.display_name)
            .field("icon_ref", &self.icon_ref)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug)]
    struct Blank(AppKey);

    impl AppContent for Blank {
        fn app_key(&self) -> &AppKey {
            &self.0
        }
    }

    fn blank(context: &LaunchContext) -> ContentHandle {
        ContentHandle::new(Blank(context.key.clone()))
    }

    #[test]
    fn app_key_requires_lowercase_slug() {
        assert!(AppKey::new("mspaint").is_ok());
        assert!(AppKey::new("oregon-trail2").is_ok());
        assert!(AppKey::new("").is_err());
        assert!(AppKey::new("MsPaint").is_err());
        assert!(AppKey::new("2048").is_err());
        assert!(AppKey::new("trail-").is_err());
        assert!(AppKey::new("a".repeat(33)).is_err());
    }

    #[test]
    fn app_key_serializes_as_plain_string() {
        let key = AppKey::trusted("photos");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"photos\"");
        assert!(serde_json::from_str::<AppKey>("\"Not A Key\"").is_err());
    }

    #[test]
    fn content_handles_compare_by_identity() {
        let descriptor = ShortcutDescriptor::new(AppKey::trusted("doom"), "Doom", "doomIcon", blank);
        let context = LaunchContext::new(descriptor.key.clone(), InstanceId(1));
        let first = descriptor.launch(&context);
        let second = descriptor.launch(&context);

        assert_eq!(first, first.clone());
        assert_ne!(first, second);
        assert_eq!(first.content().app_key().as_str(), "doom");
    }

    #[test]
    fn lifecycle_tokens_are_stable() {
        assert_eq!(AppLifecycleEvent::Closing.token(), "closing");
        assert_eq!(
            serde_json::to_string(&AppLifecycleEvent::Minimized).unwrap(),
            "\"minimized\""
        );
    }
}
