//! Browser entry points.
//!
//! The module mounts itself when the page embeds its configuration in a
//! `<script type="application/json" id="page-hooks-config">` element. Pages that build the
//! configuration in JavaScript call `mountPageHooks(json)` instead.

mod dom;
mod fetch;
mod listeners;
mod toast;

use std::cell::Cell;
use std::rc::Rc;

use page_hooks_protocol::config::CONFIG_ELEMENT_ID;
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::page::PageBindings;

thread_local! {
    static MOUNTED: Cell<bool> = const { Cell::new(false) };
}

#[wasm_bindgen(start)]
pub fn start() {
    init_console();
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    let lookup = document.clone();
    let result = when_dom_ready(&document, move || {
        let Some(element) = lookup.get_element_by_id(CONFIG_ELEMENT_ID) else {
            tracing::debug!("no #{CONFIG_ELEMENT_ID} element, waiting for mountPageHooks");
            return;
        };
        let config = element.text_content().unwrap_or_default();
        if let Err(err) = mount_page_hooks(&config) {
            tracing::error!("page hooks not mounted: {}", fetch::js_error_message(&err));
        }
    });
    if let Err(err) = result {
        tracing::error!("cannot wait for DOMContentLoaded: {}", fetch::js_error_message(&err));
    }
}

/// Validate `config_json` and bind every configured behavior once the DOM is ready.
/// A page is mounted at most once.
#[wasm_bindgen(js_name = mountPageHooks)]
pub fn mount_page_hooks(config_json: &str) -> Result<(), JsValue> {
    init_console();
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let page_url = Url::parse(&window.location().href()?)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    let bindings = PageBindings::from_json(config_json, page_url)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

    if MOUNTED.with(|mounted| mounted.replace(true)) {
        tracing::warn!("page hooks are already mounted");
        return Ok(());
    }

    let bindings = Rc::new(bindings);
    let target = document.clone();
    when_dom_ready(&document, move || {
        if let Err(err) = listeners::install(&target, bindings) {
            tracing::error!("cannot install listeners: {}", fetch::js_error_message(&err));
        }
    })
}

/// Route panics and `tracing` events (through `log`) to the browser console. Later calls are
/// no-ops.
fn init_console() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}

fn when_dom_ready<F>(document: &Document, ready: F) -> Result<(), JsValue>
where
    F: FnOnce() + 'static,
{
    if document.ready_state() != "loading" {
        ready();
        return Ok(());
    }
    let callback = Closure::once_into_js(ready);
    document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
}
