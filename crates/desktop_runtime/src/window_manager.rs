//! Shared window-manager stacking helpers used by the desktop reducer and projections.

use desktop_app_contract::AppKey;

use crate::model::{DesktopState, TaskbarItem, WindowEntry, WindowView};

/// Returns the highest z-index over all entries, or `0` for an empty registry.
///
/// Always derived from the current entries, never cached.
pub fn highest_z_index(windows: &[WindowEntry]) -> u32 {
    windows.iter().map(|w| w.z_index).max().unwrap_or(0)
}

/// Returns the z-index the next raised or created entry receives.
///
/// When the top of the stack has reached `u32::MAX` the entries are first compacted to
/// `1..=n`, keeping their relative order, so the result always exceeds every existing entry.
pub fn next_z_index(windows: &mut [WindowEntry]) -> u32 {
    if highest_z_index(windows) == u32::MAX {
        compact_z_indices(windows);
    }
    highest_z_index(windows) + 1
}

/// Renumbers z-indices to `1..=n` in current stacking order.
pub fn compact_z_indices(windows: &mut [WindowEntry]) {
    let mut order: Vec<usize> = (0..windows.len()).collect();
    order.sort_by_key(|&index| (windows[index].z_index, windows[index].instance));
    for (rank, index) in order.into_iter().enumerate() {
        windows[index].z_index = (rank + 1) as u32;
    }
}

/// Returns whether `entry` currently holds the highest z-index, minimized or not.
pub fn holds_top_z_index(windows: &[WindowEntry], entry: &WindowEntry) -> bool {
    entry.z_index == highest_z_index(windows)
}

/// Raises `key` above every other entry.
///
/// Returns the new z-index, or `None` when no entry exists for `key`.
pub fn raise_to_top(state: &mut DesktopState, key: &AppKey) -> Option<u32> {
    let z_index = next_z_index(&mut state.windows);
    let entry = state.entry_mut(key)?;
    entry.z_index = z_index;
    Some(z_index)
}

/// Key of the visible entry on top of the stack, if any.
///
/// A minimized entry holding the top z-index means nothing is focused.
pub fn focused_window_key(state: &DesktopState) -> Option<AppKey> {
    let top = state.windows.iter().max_by_key(|w| (w.z_index, w.instance))?;
    (!top.minimized).then(|| top.key.clone())
}

/// Entries in draw order (bottom first).
pub fn render_order(state: &DesktopState) -> Vec<WindowView> {
    let focused = focused_window_key(state);
    let mut ordered: Vec<&WindowEntry> = state.windows.iter().collect();
    ordered.sort_by_key(|w| (w.z_index, w.instance));
    ordered
        .into_iter()
        .map(|w| WindowView {
            key: w.key.clone(),
            instance: w.instance,
            z_index: w.z_index,
            minimized: w.minimized,
            closing: w.closing,
            focused: focused.as_ref() == Some(&w.key),
            display_name: w.display_name.clone(),
            icon_ref: w.icon_ref.clone(),
            content: w.content.clone(),
        })
        .collect()
}

/// Taskbar buttons in open order.
pub fn taskbar_items(state: &DesktopState) -> Vec<TaskbarItem> {
    let focused = focused_window_key(state);
    state
        .windows
        .iter()
        .map(|w| TaskbarItem {
            key: w.key.clone(),
            display_name: w.display_name.clone(),
            icon_ref: w.icon_ref.clone(),
            minimized: w.minimized,
            active: focused.as_ref() == Some(&w.key),
        })
        .collect()
}
