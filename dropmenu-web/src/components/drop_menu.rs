use std::cell::RefCell;
use std::rc::Rc;

use dropmenu_core::{
    ElementId, FocusTicket, HostElement, InputEvent, Item, MenuConfig, MenuController,
    Notification, Renderer,
};
use yew::prelude::*;

use crate::keys;

/// One entry handed to [`DropMenu`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MenuOption {
    pub label: AttrValue,
    pub value: Option<AttrValue>,
}

impl MenuOption {
    /// An option without a value, typically a placeholder.
    #[must_use]
    pub fn new(label: impl Into<AttrValue>) -> Self {
        Self {
            label: label.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<AttrValue>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub label: AttrValue,
    pub options: Vec<MenuOption>,
    #[prop_or_default]
    pub config: MenuConfig,
    /// Externally controlled open state.
    #[prop_or_default]
    pub open: Option<bool>,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub on_select: Callback<Item>,
    /// Fired when a cancel closes the menu.
    #[prop_or_default]
    pub on_cancel: Callback<()>,
    #[prop_or_default]
    pub on_toggle: Callback<bool>,
}

fn host_elements(options: &[MenuOption]) -> Vec<HostElement> {
    options
        .iter()
        .zip(0_u32..)
        .map(|(opt, id)| HostElement {
            id: ElementId(id),
            label: opt.label.to_string(),
            value: opt.value.as_ref().map(ToString::to_string),
        })
        .collect()
}

fn same_items(items: &[Item], options: &[MenuOption]) -> bool {
    items.len() == options.len()
        && items.iter().zip(options).all(|(item, opt)| {
            item.label == opt.label.as_str() && item.value.as_deref() == opt.value.as_deref()
        })
}

/// Renderer for the virtual DOM.
///
/// Open and focused markers are read back from the controller at render
/// time. Container focus is only recorded here: the list is hidden until the
/// next commit, so the request is applied by an effect after rendering.
#[derive(Default)]
struct ListRenderer {
    focus_requested: bool,
}

impl Renderer for ListRenderer {
    fn mark_open(&mut self, _open: bool) {}

    fn mark_focused(&mut self, _position: usize, _focused: bool) {}

    fn focus_container(&mut self) {
        self.focus_requested = true;
    }
}

/// What a settled transition reports to the component's callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outlet {
    Select(Item),
    Cancel,
    Toggle(bool),
}

struct MenuModel {
    controller: MenuController<ListRenderer>,
    outbox: Rc<RefCell<Vec<Notification>>>,
    scheduled: Option<FocusTicket>,
}

impl MenuModel {
    fn new(props: &Props) -> Self {
        let mut controller = MenuController::new(
            host_elements(&props.options),
            &props.config,
            ListRenderer::default(),
        );
        let outbox: Rc<RefCell<Vec<Notification>>> = Rc::default();
        let sink = Rc::clone(&outbox);
        controller.subscribe(move |n| sink.borrow_mut().push(n.clone()));
        if props.open == Some(true) {
            let _ = controller.open();
            outbox.borrow_mut().clear();
        }
        Self {
            controller,
            outbox,
            scheduled: None,
        }
    }

    fn take_outbox(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.outbox.borrow_mut())
    }

    /// Drain pending notifications. Select and cancel close the menu.
    fn settle(&mut self) -> Vec<Outlet> {
        let mut outlets = Vec::new();
        loop {
            let notes = self.take_outbox();
            if notes.is_empty() {
                break;
            }
            for note in notes {
                match note {
                    Notification::SelectItem { item, .. } => {
                        self.controller.close();
                        outlets.push(Outlet::Select(item));
                    }
                    Notification::Cancel if self.controller.is_open() => {
                        self.controller.close();
                        outlets.push(Outlet::Cancel);
                    }
                    Notification::Opened => outlets.push(Outlet::Toggle(true)),
                    Notification::Closed => outlets.push(Outlet::Toggle(false)),
                    _ => {}
                }
            }
        }
        outlets
    }

    /// The pending deferred-focus ticket, if it has not been scheduled yet.
    fn fresh_ticket(&mut self) -> Option<FocusTicket> {
        let ticket = self.controller.pending_focus()?;
        (self.scheduled.replace(ticket) != Some(ticket)).then_some(ticket)
    }

    fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.controller.renderer_mut().focus_requested)
    }

    fn shows(&self, options: &[MenuOption]) -> bool {
        same_items(self.controller.items(), options)
    }

    fn rebuild(&mut self, options: &[MenuOption]) {
        self.controller.rebuild(host_elements(options));
    }

    fn sync_open(&mut self, wanted: bool) {
        if self.controller.is_open() == wanted {
            return;
        }
        if wanted {
            let _ = self.controller.open();
        } else {
            self.controller.close();
        }
    }
}

/// Everything an event callback needs to drive the model.
#[derive(Clone)]
struct Driver {
    model: Rc<RefCell<MenuModel>>,
    list: NodeRef,
    redraw: UseForceUpdateHandle,
    on_select: Callback<Item>,
    on_cancel: Callback<()>,
    on_toggle: Callback<bool>,
}

impl Driver {
    /// Run `f` against the model, forward what it settled to, then redraw.
    ///
    /// Callbacks run after the model borrow is released so parents may
    /// re-render synchronously.
    fn act(&self, f: impl FnOnce(&mut MenuModel) -> bool) -> bool {
        let (prevent, outlets, ticket) = {
            let mut model = self.model.borrow_mut();
            let prevent = f(&mut model);
            let outlets = model.settle();
            (prevent, outlets, model.fresh_ticket())
        };
        for outlet in outlets {
            match outlet {
                Outlet::Select(item) => self.on_select.emit(item),
                Outlet::Cancel => self.on_cancel.emit(()),
                Outlet::Toggle(open) => self.on_toggle.emit(open),
            }
        }
        if let Some(ticket) = ticket {
            self.schedule_focus(ticket);
        }
        self.redraw.force_update();
        prevent
    }

    /// Focus the list if the controller asked for it. Runs after commit.
    fn flush_focus(&self) {
        let requested = self.model.borrow_mut().take_focus_request();
        if requested
            && let Some(list) = self.list.cast::<web_sys::HtmlElement>()
            && let Err(err) = list.focus()
        {
            crate::dom::console_error(&crate::dom::js_error_message(&err));
        }
    }

    fn schedule_focus(&self, ticket: FocusTicket) {
        #[cfg(target_arch = "wasm32")]
        {
            let driver = self.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if crate::dom::next_tick().await.is_ok() {
                    let ran = driver.model.borrow_mut().controller.run_deferred(ticket);
                    if ran {
                        driver.redraw.force_update();
                    }
                }
            });
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.model.borrow_mut().controller.run_deferred(ticket);
        }
    }
}

/// Menu with a trigger button and a keyboard-navigable list.
///
/// The list receives focus after the render that reveals it, so `opened`
/// reaches `on_toggle` before the list reports `focus`.
#[function_component(DropMenu)]
pub fn drop_menu(props: &Props) -> Html {
    let list = use_node_ref();
    let model = {
        let props = props.clone();
        use_mut_ref(move || MenuModel::new(&props))
    };
    let driver = Driver {
        model: model.clone(),
        list: list.clone(),
        redraw: use_force_update(),
        on_select: props.on_select.clone(),
        on_cancel: props.on_cancel.clone(),
        on_toggle: props.on_toggle.clone(),
    };

    {
        let driver = driver.clone();
        use_effect(move || {
            driver.flush_focus();
            || {}
        });
    }

    {
        let driver = driver.clone();
        use_effect_with(props.options.clone(), move |options| {
            let stale = !driver.model.borrow().shows(options);
            if stale {
                driver.act(|model| {
                    model.rebuild(options);
                    false
                });
            }
            || {}
        });
    }

    {
        let driver = driver.clone();
        use_effect_with(props.open, move |external| {
            if let Some(wanted) = *external {
                driver.act(|model| {
                    model.sync_open(wanted);
                    false
                });
            }
            || {}
        });
    }

    let on_trigger = {
        let driver = driver.clone();
        Callback::from(move |_: MouseEvent| {
            driver.act(|model| {
                let _ = model.controller.toggle();
                false
            });
        })
    };
    let on_keydown = {
        let driver = driver.clone();
        Callback::from(move |e: KeyboardEvent| {
            let Some(input) = keys::keydown_event(&e.key(), e.key_code()) else {
                return;
            };
            if driver.act(|model| model.controller.handle_event(input).prevent_default) {
                e.prevent_default();
            }
        })
    };
    let container_event = |input: InputEvent| {
        let driver = driver.clone();
        Callback::from(move |_: FocusEvent| {
            driver.act(|model| model.controller.handle_event(input).prevent_default);
        })
    };

    let snapshot = model.borrow();
    let menu = &snapshot.controller;
    let is_open = menu.is_open();
    let focused = menu.focused_position();

    let rows = menu.items().iter().map(|item| {
        let element = item.element;
        let pointer = |make: fn(ElementId) -> InputEvent| {
            let driver = driver.clone();
            Callback::from(move |_: MouseEvent| {
                driver.act(|model| model.controller.handle_event(make(element)).prevent_default);
            })
        };
        let row_class = classes!(
            "menu-item",
            (focused == Some(item.position)).then_some("is-focused")
        );
        html! {
            <li
                key={item.position}
                class={row_class}
                data-value={item.value.clone()}
                onmouseenter={pointer(|element| InputEvent::PointerEnter { element })}
                onmousemove={pointer(|element| InputEvent::PointerMove { element })}
                onmouseup={pointer(|element| InputEvent::PointerUp { element })}
            >
                { item.label.clone() }
            </li>
        }
    });

    html! {
        <div class={classes!("dropmenu", props.class.clone())}>
            <button type="button" class="btn" onclick={on_trigger}>
                { props.label.clone() }
            </button>
            <ul
                ref={list}
                class={classes!("menu", is_open.then_some("is-open"))}
                tabindex="-1"
                hidden={!is_open}
                onkeydown={on_keydown}
                onblur={container_event(InputEvent::Blur)}
                onfocus={container_event(InputEvent::Focus)}
            >
                { for rows }
            </ul>
        </div>
    }
}
