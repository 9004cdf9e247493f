#![forbid(unsafe_code)]

//! `wasm-bindgen` exports. Only compiled on `wasm32` targets.

use anchorscroll_core::{AnchorClickHandler, AnchorScrollConfig, TargetId};
use js_sys::Reflect;
use tracing::{trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dom_host::DomHost;
use crate::registration::ListenerRegistration;

thread_local! {
    static REGISTRATION: ListenerRegistration = const { ListenerRegistration::new() };
}

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "anchorscroll panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("anchorscroll panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

/// Register the document click listener. Returns `false` without a document.
fn register_click_listener() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let Some(document) = window.document() else {
        return false;
    };

    let handler = AnchorClickHandler::new(AnchorScrollConfig::default());
    let mut host = DomHost::new(window, document.clone());
    let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        let dispatch = handler.handle_click(&mut host, &event);
        trace!(
            target: "anchorscroll::web",
            outcome = ?dispatch.outcome,
            "click dispatched"
        );
    });

    if let Err(err) =
        document.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
    {
        warn!(target: "anchorscroll::web", error = ?err, "addEventListener failed");
        return false;
    }
    // The listener lives as long as the page.
    listener.forget();
    true
}

#[cfg(feature = "autostart")]
#[wasm_bindgen(start)]
pub fn start() {
    install_anchor_scroll();
}

/// Install the smooth-scroll click listener once.
///
/// Returns `true` when a listener is active after the call.
#[wasm_bindgen(js_name = installAnchorScroll)]
pub fn install_anchor_scroll() -> bool {
    install_panic_hook();
    REGISTRATION
        .with(|registration| registration.install_with(register_click_listener))
        .is_active()
}

#[wasm_bindgen(js_name = anchorScrollInstalled)]
pub fn anchor_scroll_installed() -> bool {
    REGISTRATION.with(ListenerRegistration::is_installed)
}

/// Decode a fragment the way the click handler does, raw on failure.
#[wasm_bindgen(js_name = decodeAnchorFragment)]
pub fn decode_anchor_fragment(raw: &str) -> String {
    let raw = raw.strip_prefix('#').unwrap_or(raw);
    TargetId::resolve(raw).resolved
}
