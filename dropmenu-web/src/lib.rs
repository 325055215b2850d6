#![forbid(unsafe_code)]
//! Browser host for dropmenu: a DOM binding for server-rendered markup and a
//! yew component for applications.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod components;
pub mod dom;
pub mod host;
pub mod keys;

pub use components::{DropMenu, MenuOption};
pub use host::{DomMenu, HostError, MenuHandle};

#[cfg(target_arch = "wasm32")]
thread_local! {
    static ATTACHED: std::cell::RefCell<Vec<host::DomMenu>> = const { std::cell::RefCell::new(Vec::new()) };
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Attach a menu to every element matching `selector`.
///
/// Attached menus close themselves on selection or cancel and live for the
/// rest of the page. Returns the number of menus attached.
///
/// # Errors
/// Returns an error if the selector is invalid or a container carries an
/// invalid `data-menu` configuration.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = enhanceAll)]
pub fn enhance_all(selector: &str) -> Result<u32, JsValue> {
    use wasm_bindgen::JsCast;

    let doc = dom::document().ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let nodes = doc.query_selector_all(selector)?;
    let mut attached = 0;
    for index in 0..nodes.length() {
        let Some(container) = nodes
            .item(index)
            .and_then(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            continue;
        };
        let menu =
            host::DomMenu::attach(container).map_err(|err| JsValue::from_str(&err.to_string()))?;
        menu.close_on_resolve();
        ATTACHED.with(|slot| slot.borrow_mut().push(menu));
        attached += 1;
    }
    log::debug!("enhanced {attached} menus for {selector}");
    Ok(attached)
}
