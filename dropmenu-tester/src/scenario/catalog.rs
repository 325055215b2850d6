use dropmenu_core::{ElementId, InputEvent, Key, MenuConfig, MenuVariant, PolicyOverrides};

use super::{ItemSpec, Scenario, Step};

fn languages() -> Vec<ItemSpec> {
    vec![
        ItemSpec::new("Select...", None),
        ItemSpec::new("C#", Some("c#")),
        ItemSpec::new("Go", Some("go")),
        ItemSpec::new("JavaScript", Some("js")),
        ItemSpec::new("PHP", Some("php")),
        ItemSpec::new("Ruby", Some("ruby")),
    ]
}

fn button() -> MenuConfig {
    MenuConfig::for_variant(MenuVariant::Button)
}

fn select() -> MenuConfig {
    MenuConfig::for_variant(MenuVariant::Select)
}

const fn enter_item(position: u32) -> Step {
    Step::Event {
        event: InputEvent::PointerEnter {
            element: ElementId(position),
        },
    }
}

const fn move_over(position: u32) -> Step {
    Step::Event {
        event: InputEvent::PointerMove {
            element: ElementId(position),
        },
    }
}

const fn release_on(position: u32) -> Step {
    Step::Event {
        event: InputEvent::PointerUp {
            element: ElementId(position),
        },
    }
}

const fn container(event: InputEvent) -> Step {
    Step::Event { event }
}

#[allow(clippy::too_many_lines)]
pub fn catalog_scenarios() -> Vec<Scenario> {
    let mut no_wrap_start = button();
    no_wrap_start.overrides = PolicyOverrides {
        down_from_none: Some(false),
        ..PolicyOverrides::default()
    };
    let mut decoupled = button();
    decoupled.commit_focus = false;

    vec![
        Scenario::new(
            "keyboard-walk",
            "Arrow-down walks every item once and stops at the last",
            button(),
            languages(),
        )
        .with_steps(
            std::iter::once(Step::Open)
                .chain(std::iter::repeat_n(Step::key(Key::ArrowDown), 7))
                .collect(),
        )
        .expect_notifications(&[
            "opening",
            "opened",
            "focus-item(0)",
            "focus-item(1)",
            "focus-item(2)",
            "focus-item(3)",
            "focus-item(4)",
            "focus-item(5)",
        ])
        .expect_focused(Some(5))
        .expect_open(true)
        .expect_prevented(&[false; 7]),
        Scenario::new(
            "arrow-up-stops-at-first",
            "Arrow-up never moves above the first item",
            button(),
            languages(),
        )
        .with_steps(vec![
            Step::key(Key::ArrowUp),
            Step::focus(1),
            Step::key(Key::ArrowUp),
            Step::key(Key::ArrowUp),
        ])
        .expect_notifications(&["focus-item(0)"])
        .expect_focused(Some(0)),
        Scenario::new(
            "arrow-down-needs-focus",
            "With down_from_none disabled, arrows do nothing until an item is focused",
            no_wrap_start,
            languages(),
        )
        .with_steps(vec![
            Step::Open,
            Step::key(Key::ArrowDown),
            Step::key(Key::ArrowUp),
        ])
        .expect_notifications(&["opening", "opened"])
        .expect_focused(None),
        Scenario::new(
            "enter-without-focus",
            "Enter is suppressed even when nothing can be selected",
            button(),
            languages(),
        )
        .with_steps(vec![Step::Open, Step::key(Key::Enter), Step::key(Key::Tab)])
        .expect_notifications(&["opening", "opened"])
        .expect_prevented(&[true, true])
        .expect_open(true),
        Scenario::new(
            "select-deferred-keyboard",
            "Select menu focuses after the deferred tick, then Enter picks",
            select(),
            languages(),
        )
        .with_steps(vec![
            Step::Open,
            Step::RunDeferred,
            Step::key(Key::ArrowDown),
            Step::key(Key::ArrowDown),
            Step::key(Key::Enter),
        ])
        .expect_notifications(&[
            "opening",
            "opened",
            "focus-item(0)",
            "focus-item(1)",
            "select-item(1)",
        ])
        .expect_focused(Some(1))
        .expect_prevented(&[false, false, true]),
        Scenario::new(
            "stale-deferred-focus",
            "A ticket issued before a close is skipped",
            select(),
            languages(),
        )
        .with_steps(vec![Step::Open, Step::Close, Step::RunDeferred])
        .expect_notifications(&["opening", "opened", "closing", "closed"])
        .expect_open(false),
        Scenario::new(
            "escape-cancels-select",
            "Escape on an open select menu reports cancel",
            select(),
            languages(),
        )
        .with_steps(vec![Step::Open, Step::key(Key::Escape)])
        .expect_notifications(&["opening", "opened", "cancel"]),
        Scenario::new(
            "escape-ignored-by-button",
            "The button menu leaves Escape to the host",
            button(),
            languages(),
        )
        .with_steps(vec![Step::Open, Step::key(Key::Escape)])
        .expect_notifications(&["opening", "opened"]),
        Scenario::new(
            "blur-by-variant",
            "Blur cancels a select menu",
            select(),
            languages(),
        )
        .with_steps(vec![
            Step::Open,
            container(InputEvent::Focus),
            container(InputEvent::Blur),
        ])
        .expect_notifications(&["opening", "opened", "cancel"]),
        Scenario::new(
            "button-focus-and-blur",
            "The button menu reports container focus and blur",
            button(),
            languages(),
        )
        .with_steps(vec![
            Step::Open,
            container(InputEvent::Focus),
            container(InputEvent::Blur),
        ])
        .expect_notifications(&["opening", "opened", "focused", "blurred"]),
        Scenario::new(
            "hover-enter-repeats",
            "Every pointer-enter notifies, even on the focused item",
            button(),
            languages(),
        )
        .with_steps(vec![enter_item(2), enter_item(2), enter_item(4)])
        .expect_notifications(&["focus-item(2)", "focus-item(2)", "focus-item(4)"])
        .expect_focused(Some(4)),
        Scenario::new(
            "hover-move-on-change",
            "Pointer-move only notifies when the hovered item changes",
            select(),
            languages(),
        )
        .with_steps(vec![move_over(2), move_over(2), move_over(3), move_over(3)])
        .expect_notifications(&["focus-item(2)", "focus-item(3)"])
        .expect_focused(Some(3)),
        Scenario::new(
            "pointer-up-selects",
            "Releasing over an item selects the focused item",
            button(),
            languages(),
        )
        .with_steps(vec![Step::Open, enter_item(3), release_on(3)])
        .expect_notifications(&["opening", "opened", "focus-item(3)", "select-item(3)"])
        .expect_focused(Some(3)),
        Scenario::new(
            "focus-by-value",
            "Focus addressed by value, the placeholder included",
            button(),
            languages(),
        )
        .with_steps(vec![
            Step::focus("ruby"),
            Step::key(Key::Tab),
            Step::focus(None::<&str>),
        ])
        .expect_notifications(&["select-item(5)"])
        .expect_focused(Some(0))
        .expect_prevented(&[true]),
        Scenario::new(
            "decoupled-navigation",
            "Without committed focus, navigation only reports intent",
            decoupled,
            languages(),
        )
        .with_steps(vec![Step::key(Key::ArrowDown), Step::key(Key::ArrowDown)])
        .expect_notifications(&["focus-item(0)", "focus-item(0)"])
        .expect_focused(None),
    ]
}

pub fn find_catalog_scenario(name: &str) -> Option<Scenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.name == name)
}

pub fn list_scenarios() -> Vec<(String, String)> {
    catalog_scenarios()
        .into_iter()
        .map(|scenario| (scenario.name, scenario.description))
        .collect()
}
