use std::cell::RefCell;
use std::rc::Rc;

use dropmenu_core::{Item, MenuConfig, MenuVariant};
use dropmenu_web::components::drop_menu::{DropMenu, MenuOption, Props};
use dropmenu_web::dom;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, EventTarget, HtmlElement, KeyboardEventInit};
use yew::prelude::*;

fn languages() -> Vec<MenuOption> {
    vec![
        MenuOption::new("Select..."),
        MenuOption::new("C#").with_value("csharp"),
        MenuOption::new("Go").with_value("go"),
        MenuOption::new("Ruby").with_value("ruby"),
    ]
}

fn props(variant: MenuVariant, open: Option<bool>) -> Props {
    Props {
        label: AttrValue::from("Language"),
        options: languages(),
        config: MenuConfig::for_variant(variant),
        open,
        class: Classes::new(),
        on_select: Callback::noop(),
        on_cancel: Callback::noop(),
        on_toggle: Callback::noop(),
    }
}

fn mount_root() -> Element {
    let doc = dom::document().expect("document");
    let root = doc.create_element("div").expect("create root");
    doc.body()
        .expect("document body")
        .append_child(&root)
        .expect("append root");
    root
}

/// Let scheduled renders, effects and deferred focus run.
async fn settle() {
    for _ in 0..3 {
        dom::next_tick().await.expect("next tick");
    }
}

fn find(root: &Element, selector: &str) -> Element {
    root.query_selector(selector)
        .expect("valid selector")
        .unwrap_or_else(|| panic!("{selector} rendered"))
}

fn click(root: &Element, selector: &str) {
    find(root, selector)
        .dyn_into::<HtmlElement>()
        .expect("html element")
        .click();
}

fn dispatch_key(el: &Element, key: &str) {
    let init = KeyboardEventInit::new();
    init.set_key(key);
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    let target: &EventTarget = el.as_ref();
    let _ = target.dispatch_event(&event);
}

fn is_active(el: &Element) -> bool {
    dom::document()
        .and_then(|doc| doc.active_element())
        .is_some_and(|active| active.is_same_node(Some(el)))
}

fn is_shown(list: &Element) -> bool {
    list.class_list().contains("is-open") && !list.has_attribute("hidden")
}

#[wasm_bindgen_test]
async fn trigger_opens_and_focuses_the_list() {
    let root = mount_root();
    yew::Renderer::<DropMenu>::with_root_and_props(root.clone(), props(MenuVariant::Button, None))
        .render();
    settle().await;

    let list = find(&root, "ul.menu");
    assert!(!is_shown(&list));
    click(&root, "button.btn");
    settle().await;

    assert!(is_shown(&list));
    assert!(is_active(&list));
}

#[wasm_bindgen_test]
async fn keyboard_selection_reports_item_and_closes() {
    let root = mount_root();
    let selected: Rc<RefCell<Vec<Item>>> = Rc::default();
    let toggles: Rc<RefCell<Vec<bool>>> = Rc::default();
    let mut menu_props = props(MenuVariant::Button, None);
    menu_props.on_select = {
        let selected = Rc::clone(&selected);
        Callback::from(move |item| selected.borrow_mut().push(item))
    };
    menu_props.on_toggle = {
        let toggles = Rc::clone(&toggles);
        Callback::from(move |open| toggles.borrow_mut().push(open))
    };
    yew::Renderer::<DropMenu>::with_root_and_props(root.clone(), menu_props).render();
    settle().await;

    click(&root, "button.btn");
    settle().await;
    let list = find(&root, "ul.menu");
    dispatch_key(&list, "ArrowDown");
    dispatch_key(&list, "ArrowDown");
    settle().await;
    assert!(find(&root, "li.is-focused").text_content().unwrap_or_default().contains("C#"));

    dispatch_key(&list, "Enter");
    settle().await;

    let selected = selected.borrow();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].position, 1);
    assert_eq!(selected[0].value.as_deref(), Some("csharp"));
    assert_eq!(*toggles.borrow(), [true, false]);
    assert!(!is_shown(&list));
}

#[wasm_bindgen_test]
async fn select_variant_focuses_late_and_cancels_on_escape() {
    let root = mount_root();
    let cancels = Rc::new(RefCell::new(0_u32));
    let mut menu_props = props(MenuVariant::Select, Some(true));
    menu_props.on_cancel = {
        let cancels = Rc::clone(&cancels);
        Callback::from(move |()| *cancels.borrow_mut() += 1)
    };
    yew::Renderer::<DropMenu>::with_root_and_props(root.clone(), menu_props).render();
    settle().await;

    let list = find(&root, "ul.menu");
    assert!(is_shown(&list));
    assert!(is_active(&list));

    dispatch_key(&list, "Escape");
    settle().await;
    assert_eq!(*cancels.borrow(), 1);
    assert!(!is_shown(&list));
}

#[function_component(SwapHost)]
fn swap_host() -> Html {
    let short = use_state(|| false);
    let options = if *short {
        vec![MenuOption::new("Zig").with_value("zig")]
    } else {
        languages()
    };
    let onclick = {
        let short = short.clone();
        Callback::from(move |_: MouseEvent| short.set(true))
    };
    html! {
        <>
            <button class="swap" {onclick}>{ "swap" }</button>
            <DropMenu label="Language" {options} />
        </>
    }
}

#[wasm_bindgen_test]
async fn changed_options_rebuild_the_list() {
    let root = mount_root();
    yew::Renderer::<SwapHost>::with_root(root.clone()).render();
    settle().await;
    let rows = || root.query_selector_all("li.menu-item").expect("rows").length();
    assert_eq!(rows(), 4);

    click(&root, "button.swap");
    settle().await;
    assert_eq!(rows(), 1);
    assert_eq!(
        find(&root, "li.menu-item").get_attribute("data-value").as_deref(),
        Some("zig")
    );
}

#[function_component(ControlledHost)]
fn controlled_host() -> Html {
    let open = use_state(|| false);
    let onclick = {
        let open = open.clone();
        Callback::from(move |_: MouseEvent| open.set(!*open))
    };
    html! {
        <>
            <button class="external" {onclick}>{ "toggle" }</button>
            <DropMenu label="Language" options={languages()} open={Some(*open)} />
        </>
    }
}

#[wasm_bindgen_test]
async fn open_prop_drives_the_menu() {
    let root = mount_root();
    yew::Renderer::<ControlledHost>::with_root(root.clone()).render();
    settle().await;
    let list = find(&root, "ul.menu");
    assert!(!is_shown(&list));

    click(&root, "button.external");
    settle().await;
    assert!(is_shown(&list));

    click(&root, "button.external");
    settle().await;
    assert!(!is_shown(&list));
}
