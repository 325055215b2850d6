//! DOM host: binds a container element and its children to a menu controller.
//!
//! The container's element children become the menu items (`data-value`
//! attribute, text content as label). Visual state is expressed with the
//! `is-open` and `is-focused` classes.
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use dropmenu_core::{
    ConfigError, ElementId, EventOutcome, FocusTicket, HostElement, InputEvent, ItemKey,
    MenuConfig, MenuController, Notification, Renderer, VariantPolicy,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, Event, EventTarget, HtmlElement, KeyboardEvent};

use crate::dom;
use crate::keys;

pub const OPEN_CLASS: &str = "is-open";
pub const FOCUSED_CLASS: &str = "is-focused";
pub const VALUE_ATTR: &str = "data-value";
pub const CONFIG_ATTR: &str = "data-menu";

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("DOM error: {0}")]
    Dom(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<JsValue> for HostError {
    fn from(value: JsValue) -> Self {
        Self::Dom(dom::js_error_message(&value))
    }
}

/// Materialise the container's element children, in document order.
#[must_use]
pub fn scan_children(container: &Element) -> Vec<(HostElement, Element)> {
    let children = container.children();
    (0..children.length())
        .filter_map(|index| children.item(index).map(|el| (index, el)))
        .map(|(index, el)| {
            let host = HostElement {
                id: ElementId(index),
                label: el.text_content().unwrap_or_default().trim().to_owned(),
                value: el.get_attribute(VALUE_ATTR),
            };
            (host, el)
        })
        .collect()
}

/// Menu configuration from the container's `data-menu` attribute, defaulting when absent.
///
/// # Errors
/// Returns an error if the attribute holds an invalid configuration document.
pub fn read_config(container: &Element) -> Result<MenuConfig, ConfigError> {
    container
        .get_attribute(CONFIG_ATTR)
        .map_or_else(|| Ok(MenuConfig::default()), |json| MenuConfig::from_json(&json))
}

fn set_class(el: &Element, class: &str, on: bool) {
    let list = el.class_list();
    let result = if on {
        list.add_1(class)
    } else {
        list.remove_1(class)
    };
    if let Err(err) = result {
        log::warn!(
            "failed to update class {class}: {}",
            dom::js_error_message(&err)
        );
    }
}

/// [`Renderer`] over real DOM nodes.
pub struct DomRenderer {
    container: HtmlElement,
    items: Vec<Element>,
}

impl DomRenderer {
    #[must_use]
    pub const fn new(container: HtmlElement, items: Vec<Element>) -> Self {
        Self { container, items }
    }

    pub fn set_items(&mut self, items: Vec<Element>) {
        self.items = items;
    }
}

impl Renderer for DomRenderer {
    fn mark_open(&mut self, open: bool) {
        set_class(&self.container, OPEN_CLASS, open);
    }

    fn mark_focused(&mut self, position: usize, focused: bool) {
        if let Some(el) = self.items.get(position) {
            set_class(el, FOCUSED_CLASS, focused);
        }
    }

    fn focus_container(&mut self) {
        if let Err(err) = self.container.focus() {
            dom::console_error(&dom::js_error_message(&err));
        }
    }
}

type Handler = Box<dyn FnMut(&MenuHandle, &Notification)>;

/// Shared handle to a DOM-bound menu.
///
/// Notifications raised while the controller is borrowed are queued and
/// handed to the registered handlers afterwards, so handlers may call back
/// into the handle (for example to close the menu on `select-item`).
/// DOM events dispatched synchronously from inside a transition are
/// replayed once it finishes. Container `focus` and `blur` only notify, so
/// those are queued straight away and keep their place: focusing the
/// container while opening yields `opening`, `focused`, `opened`.
#[derive(Clone)]
pub struct MenuHandle {
    controller: Rc<RefCell<MenuController<DomRenderer>>>,
    policy: VariantPolicy,
    queue: Rc<RefCell<VecDeque<Notification>>>,
    replay: Rc<RefCell<VecDeque<InputEvent>>>,
    handlers: Rc<RefCell<Vec<Handler>>>,
    draining: Rc<Cell<bool>>,
}

impl MenuHandle {
    fn new(mut controller: MenuController<DomRenderer>) -> Self {
        let queue: Rc<RefCell<VecDeque<Notification>>> = Rc::default();
        let sink = Rc::clone(&queue);
        controller.subscribe(move |n| sink.borrow_mut().push_back(n.clone()));
        Self {
            policy: controller.policy(),
            controller: Rc::new(RefCell::new(controller)),
            queue,
            replay: Rc::default(),
            handlers: Rc::default(),
            draining: Rc::default(),
        }
    }

    /// Register a notification handler.
    pub fn on<F>(&self, handler: F)
    where
        F: FnMut(&Self, &Notification) + 'static,
    {
        self.handlers.borrow_mut().push(Box::new(handler));
    }

    /// Read-only access to the controller.
    pub fn read<T>(&self, f: impl FnOnce(&MenuController<DomRenderer>) -> T) -> T {
        f(&*self.controller.borrow())
    }

    fn with<T>(&self, f: impl FnOnce(&mut MenuController<DomRenderer>) -> T) -> T {
        let out = f(&mut *self.controller.borrow_mut());
        self.settle();
        out
    }

    fn settle(&self) {
        loop {
            let Some(event) = self.replay.borrow_mut().pop_front() else {
                break;
            };
            let _ = self.controller.borrow_mut().handle_event(event);
        }
        self.drain();
    }

    fn drain(&self) {
        if self.draining.replace(true) {
            return;
        }
        loop {
            let Some(notification) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            let mut active = std::mem::take(&mut *self.handlers.borrow_mut());
            for handler in &mut active {
                handler(self, &notification);
            }
            let mut slot = self.handlers.borrow_mut();
            active.append(&mut slot);
            *slot = active;
        }
        self.draining.set(false);
    }

    pub fn open(&self) {
        if let Some(ticket) = self.with(MenuController::open) {
            self.schedule(ticket);
        }
    }

    pub fn close(&self) {
        self.with(MenuController::close);
    }

    pub fn toggle(&self) {
        if let Some(ticket) = self.with(MenuController::toggle) {
            self.schedule(ticket);
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.read(MenuController::is_open)
    }

    pub fn focus(&self, key: impl Into<ItemKey>) -> Option<usize> {
        let key = key.into();
        self.with(|menu| menu.focus(key))
    }

    pub fn clear_focus(&self) {
        self.with(MenuController::clear_focus);
    }

    pub fn handle_event(&self, event: InputEvent) -> EventOutcome {
        let Ok(mut menu) = self.controller.try_borrow_mut() else {
            if let Some(notification) = self.policy.container_notification(&event) {
                self.queue.borrow_mut().push_back(notification);
            } else {
                log::trace!("menu busy; replaying {event:?} afterwards");
                self.replay.borrow_mut().push_back(event);
            }
            return EventOutcome::IGNORED;
        };
        let outcome = menu.handle_event(event);
        drop(menu);
        self.settle();
        outcome
    }

    pub fn run_deferred(&self, ticket: FocusTicket) -> bool {
        self.with(|menu| menu.run_deferred(ticket))
    }

    fn rebuild(&self, scanned: Vec<(HostElement, Element)>) {
        let (elements, nodes): (Vec<HostElement>, Vec<Element>) = scanned.into_iter().unzip();
        self.with(|menu| {
            menu.rebuild(elements);
            menu.renderer_mut().set_items(nodes);
        });
    }

    fn schedule(&self, ticket: FocusTicket) {
        #[cfg(target_arch = "wasm32")]
        {
            log::debug!("deferred focus scheduled (epoch {})", ticket.epoch());
            let handle = self.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match dom::next_tick().await {
                    Ok(()) => {
                        handle.run_deferred(ticket);
                    }
                    Err(err) => dom::console_error(&dom::js_error_message(&err)),
                }
            });
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            log::debug!("no browser event loop; running deferred focus inline");
            self.run_deferred(ticket);
        }
    }
}

/// Event listener that unregisters itself when dropped.
struct DomListener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl DomListener {
    fn bind<F>(target: &EventTarget, kind: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for DomListener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.kind,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

fn bind_container(
    container: &HtmlElement,
    handle: &MenuHandle,
) -> Result<Vec<DomListener>, JsValue> {
    let target: &EventTarget = container.as_ref();
    let mut listeners = Vec::with_capacity(3);

    let h = handle.clone();
    listeners.push(DomListener::bind(target, "blur", move |_| {
        let _ = h.handle_event(InputEvent::Blur);
    })?);

    let h = handle.clone();
    listeners.push(DomListener::bind(target, "focus", move |_| {
        let _ = h.handle_event(InputEvent::Focus);
    })?);

    let h = handle.clone();
    listeners.push(DomListener::bind(target, "keydown", move |event: Event| {
        let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let Some(input) = keys::keydown_event(&keyboard.key(), keyboard.key_code()) else {
            return;
        };
        if h.handle_event(input).prevent_default {
            event.prevent_default();
        }
    })?);

    Ok(listeners)
}

fn bind_items(
    scanned: &[(HostElement, Element)],
    handle: &MenuHandle,
) -> Result<Vec<DomListener>, JsValue> {
    let mut listeners = Vec::with_capacity(scanned.len() * 3);
    for (host, node) in scanned {
        let element = host.id;
        let target: &EventTarget = node.as_ref();
        let events: [(&'static str, InputEvent); 3] = [
            ("mouseenter", InputEvent::PointerEnter { element }),
            ("mousemove", InputEvent::PointerMove { element }),
            ("mouseup", InputEvent::PointerUp { element }),
        ];
        for (kind, input) in events {
            let h = handle.clone();
            listeners.push(DomListener::bind(target, kind, move |_| {
                let _ = h.handle_event(input);
            })?);
        }
    }
    Ok(listeners)
}

/// A menu bound to a live DOM container.
pub struct DomMenu {
    handle: MenuHandle,
    container: HtmlElement,
    _container_listeners: Vec<DomListener>,
    item_listeners: Vec<DomListener>,
}

impl DomMenu {
    /// Attach using the configuration in the container's `data-menu` attribute.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or listeners cannot be bound.
    pub fn attach(container: HtmlElement) -> Result<Self, HostError> {
        let config = read_config(&container)?;
        Self::attach_with(container, &config)
    }

    /// Attach with an explicit configuration.
    ///
    /// # Errors
    /// Returns an error if DOM listeners cannot be bound.
    pub fn attach_with(container: HtmlElement, config: &MenuConfig) -> Result<Self, HostError> {
        container.set_tab_index(-1);
        let scanned = scan_children(&container);
        let nodes: Vec<Element> = scanned.iter().map(|(_, node)| node.clone()).collect();
        let elements = scanned.iter().map(|(host, _)| host.clone());
        let renderer = DomRenderer::new(container.clone(), nodes);
        let handle = MenuHandle::new(MenuController::new(elements, config, renderer));

        let container_listeners = bind_container(&container, &handle)?;
        let item_listeners = bind_items(&scanned, &handle)?;
        log::debug!("attached menu with {} items", scanned.len());

        Ok(Self {
            handle,
            container,
            _container_listeners: container_listeners,
            item_listeners,
        })
    }

    #[must_use]
    pub const fn handle(&self) -> &MenuHandle {
        &self.handle
    }

    /// Close the menu whenever an item is selected or the interaction is cancelled.
    pub fn close_on_resolve(&self) {
        self.handle.on(|handle, notification| {
            if matches!(
                notification,
                Notification::SelectItem { .. } | Notification::Cancel
            ) && handle.is_open()
            {
                handle.close();
            }
        });
    }

    /// Rescan the container after its children changed.
    ///
    /// # Errors
    /// Returns an error if listeners cannot be bound to the new children.
    pub fn refresh(&mut self) -> Result<(), HostError> {
        self.item_listeners.clear();
        let scanned = scan_children(&self.container);
        self.item_listeners = bind_items(&scanned, &self.handle)?;
        self.handle.rebuild(scanned);
        Ok(())
    }
}
