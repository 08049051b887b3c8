use bevy::log::info;

/// Shows `message` in a modal the player has to acknowledge.
///
/// The browser `alert` blocks the page until dismissed; native builds have no
/// equivalent and only log it, the bit is expected to draw its own overlay.
#[cfg(target_arch = "wasm32")]
pub fn blocking_notice(message: &str) {
    info!("{message}");
    let Some(window) = web_sys::window() else {
        bevy::log::error!("no global `window` exists, notice not shown");
        return;
    };
    if let Err(err) = window.alert_with_message(message) {
        bevy::log::error!("Could not show notice {message:?}. {err:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn blocking_notice(message: &str) {
    info!("{message}");
}
