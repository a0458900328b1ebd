//! Blocking browser dialogs. A dialog the browser refuses to show reads as "cancel".

use leptos::logging::warn;

pub(crate) fn alert(message: &str) {
    let Some(w) = web_sys::window() else {
        return;
    };
    if let Err(e) = w.alert_with_message(message) {
        warn!("alert suppressed: {e:?}");
    }
}

pub(crate) fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// `None` when the user cancels.
pub(crate) fn prompt(message: &str) -> Option<String> {
    web_sys::window()
        .and_then(|w| w.prompt_with_message(message).ok())
        .flatten()
}

pub(crate) fn reload_page() {
    let Some(w) = web_sys::window() else {
        return;
    };
    if let Err(e) = w.location().reload() {
        warn!("page reload failed: {e:?}");
    }
}
