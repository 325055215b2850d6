use std::cell::RefCell;
use std::rc::Rc;

use dropmenu_core::Notification;
use dropmenu_web::dom;
use dropmenu_web::host::{DomMenu, FOCUSED_CLASS, OPEN_CLASS};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Event, EventTarget, HtmlElement, KeyboardEvent, MouseEvent};

fn mount(config: Option<&str>) -> HtmlElement {
    let doc = dom::document().expect("document");
    let root = doc.create_element("ul").expect("create container");
    if let Some(json) = config {
        root.set_attribute("data-menu", json).expect("set config");
    }
    root.set_inner_html(
        r#"<li>Select...</li>
           <li data-value="csharp">C#</li>
           <li data-value="go">Go</li>
           <li data-value="ruby">Ruby</li>"#,
    );
    doc.body()
        .expect("document body")
        .append_child(&root)
        .expect("append container");
    root.dyn_into::<HtmlElement>().expect("html element")
}

fn dispatch_key(el: &HtmlElement, key: &str) -> bool {
    let init = web_sys::KeyboardEventInit::new();
    init.set_key(key);
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    let target: &EventTarget = el.as_ref();
    target.dispatch_event(&event).unwrap()
}

fn dispatch_mouse(el: &web_sys::Element, kind: &str) {
    let event = MouseEvent::new(kind).unwrap();
    let target: &EventTarget = el.as_ref();
    let _ = target.dispatch_event(&event);
}

fn has_class(el: &web_sys::Element, class: &str) -> bool {
    el.class_list().contains(class)
}

#[wasm_bindgen_test]
fn arrow_down_marks_items_in_turn() {
    let container = mount(None);
    let menu = DomMenu::attach(container.clone()).expect("attach");
    menu.handle().open();
    assert!(has_class(&container, OPEN_CLASS));

    dispatch_key(&container, "ArrowDown");
    dispatch_key(&container, "ArrowDown");
    let items = container.children();
    assert!(!has_class(&items.item(0).unwrap(), FOCUSED_CLASS));
    assert!(has_class(&items.item(1).unwrap(), FOCUSED_CLASS));
}

#[wasm_bindgen_test]
fn enter_selects_and_closes() {
    let container = mount(None);
    let menu = DomMenu::attach(container.clone()).expect("attach");
    menu.close_on_resolve();
    let picked = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&picked);
    menu.handle().on(move |_, n| {
        if let Notification::SelectItem { item, .. } = n {
            *sink.borrow_mut() = item.value.clone();
        }
    });

    menu.handle().open();
    menu.handle().focus("go");
    let not_prevented = dispatch_key(&container, "Enter");
    assert!(!not_prevented);
    assert_eq!(picked.borrow().as_deref(), Some("go"));
    assert!(!has_class(&container, OPEN_CLASS));
}

#[wasm_bindgen_test]
fn pointer_enter_focuses_hovered_item() {
    let container = mount(None);
    let menu = DomMenu::attach(container.clone()).expect("attach");
    let ruby = container.children().item(3).unwrap();
    dispatch_mouse(&ruby, "mouseenter");
    assert!(has_class(&ruby, FOCUSED_CLASS));
    assert_eq!(menu.handle().read(|m| m.focused_position()), Some(3));
}

#[wasm_bindgen_test]
fn invalid_config_is_reported() {
    let container = mount(Some(r#"{"variant":"radio"}"#));
    assert!(DomMenu::attach(container).is_err());
}

fn record_names(menu: &DomMenu) -> Rc<RefCell<Vec<&'static str>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    menu.handle().on(move |_, n| sink.borrow_mut().push(n.name()));
    seen
}

#[wasm_bindgen_test]
fn refresh_binds_appended_children() {
    let container = mount(None);
    let mut menu = DomMenu::attach(container.clone()).expect("attach");
    let doc = dom::document().expect("document");
    let zig = doc.create_element("li").expect("create item");
    zig.set_attribute("data-value", "zig").expect("set value");
    zig.set_text_content(Some("Zig"));
    container.append_child(&zig).expect("append item");

    menu.refresh().expect("refresh");
    assert_eq!(menu.handle().read(|m| m.items().len()), 5);
    dispatch_mouse(&zig, "mouseenter");
    assert!(has_class(&zig, FOCUSED_CLASS));
    assert_eq!(menu.handle().read(|m| m.focused_position()), Some(4));
    assert_eq!(
        menu.handle().read(|m| m.focused().and_then(|item| item.value.clone())),
        Some("zig".to_string())
    );
}

#[wasm_bindgen_test]
fn select_blur_cancels_and_closes() {
    let container = mount(Some(r#"{"variant":"select"}"#));
    let menu = DomMenu::attach(container.clone()).expect("attach");
    menu.close_on_resolve();
    let seen = record_names(&menu);

    menu.handle().open();
    assert!(has_class(&container, OPEN_CLASS));
    let blur = Event::new("blur").unwrap();
    let target: &EventTarget = container.as_ref();
    let _ = target.dispatch_event(&blur);

    assert!(!menu.handle().is_open());
    assert!(!has_class(&container, OPEN_CLASS));
    assert_eq!(
        *seen.borrow(),
        ["opening", "opened", "cancel", "closing", "closed"]
    );
}

#[wasm_bindgen_test]
fn container_focus_during_open_is_reported_in_place() {
    let container = mount(None);
    let menu = DomMenu::attach(container.clone()).expect("attach");
    let seen = record_names(&menu);

    menu.handle().open();
    let active = dom::document()
        .and_then(|doc| doc.active_element())
        .is_some_and(|el| el.is_same_node(Some(&container)));
    assert!(active);
    assert_eq!(*seen.borrow(), ["opening", "focused", "opened"]);
}
