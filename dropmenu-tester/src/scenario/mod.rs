use std::path::Path;

use anyhow::{Context, Result};
use dropmenu_core::{HostElement, InputEvent, ItemKey, Key, MenuConfig};
use serde::{Deserialize, Deserializer, Serialize};

pub mod catalog;

pub use catalog::{catalog_scenarios, find_catalog_scenario, list_scenarios};

/// A scripted interaction against one menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: MenuConfig,
    pub items: Vec<ItemSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub expect: Expectations,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemSpec {
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl ItemSpec {
    #[must_use]
    pub fn new(label: &str, value: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            value: value.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "kebab-case")]
pub enum Step {
    Open,
    Close,
    Toggle,
    Focus { key: ItemKey },
    ClearFocus,
    Event { event: InputEvent },
    /// Run the ticket handed out by the most recent open, if any.
    RunDeferred,
}

impl Step {
    #[must_use]
    pub const fn key(key: Key) -> Self {
        Self::Event {
            event: InputEvent::key(key),
        }
    }

    #[must_use]
    pub fn focus(key: impl Into<ItemKey>) -> Self {
        Self::Focus { key: key.into() }
    }
}

/// What must hold once every step ran. Absent fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Expectations {
    /// Exact notification sequence, in display form (`opening`, `focus-item(2)`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Vec<String>>,
    /// Final focused position; `null` means nothing focused.
    #[serde(
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub focused: Option<Option<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
    /// Default-action suppression reported for each `event` step, in order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevented: Option<Vec<bool>>,
}

// Distinguishes an explicit `null` from a missing field.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<usize>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<usize>::deserialize(deserializer).map(Some)
}

impl Scenario {
    #[must_use]
    pub fn new(name: &str, description: &str, config: MenuConfig, items: Vec<ItemSpec>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            config,
            items,
            steps: Vec::new(),
            expect: Expectations::default(),
        }
    }

    #[must_use]
    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    #[must_use]
    pub fn expect_notifications(mut self, names: &[&str]) -> Self {
        self.expect.notifications = Some(names.iter().map(ToString::to_string).collect());
        self
    }

    #[must_use]
    pub const fn expect_focused(mut self, position: Option<usize>) -> Self {
        self.expect.focused = Some(position);
        self
    }

    #[must_use]
    pub const fn expect_open(mut self, open: bool) -> Self {
        self.expect.open = Some(open);
        self
    }

    #[must_use]
    pub fn expect_prevented(mut self, prevented: &[bool]) -> Self {
        self.expect.prevented = Some(prevented.to_vec());
        self
    }

    /// Host elements for the item list; handles are the item positions.
    #[must_use]
    pub fn host_elements(&self) -> Vec<HostElement> {
        self.items
            .iter()
            .zip(0_u32..)
            .map(|(spec, id)| HostElement::new(id, spec.label.as_str(), spec.value.as_deref()))
            .collect()
    }
}

/// Load scenarios from a JSON file holding either one scenario or an array.
pub fn load_scenario_file(path: &Path) -> Result<Vec<Scenario>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_scenarios(&raw).with_context(|| format!("invalid scenario file {}", path.display()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScenarioDocument {
    Many(Vec<Scenario>),
    One(Box<Scenario>),
}

pub fn parse_scenarios(raw: &str) -> Result<Vec<Scenario>> {
    let doc: ScenarioDocument = serde_json::from_str(raw)?;
    Ok(match doc {
        ScenarioDocument::Many(list) => list,
        ScenarioDocument::One(one) => vec![*one],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropmenu_core::{ElementId, MenuVariant};

    #[test]
    fn parses_a_single_scenario_document() {
        let raw = r#"{
            "name": "pick-go",
            "config": { "variant": "select" },
            "items": [{ "label": "Select..." }, { "label": "Go", "value": "go" }],
            "steps": [
                { "step": "open" },
                { "step": "focus", "key": { "value": "go" } },
                { "step": "event", "event": { "type": "key-down", "key": "enter" } },
                { "step": "event", "event": { "type": "pointer-up", "element": 1 } }
            ],
            "expect": { "focused": 1, "open": true }
        }"#;
        let scenarios = parse_scenarios(raw).unwrap();
        assert_eq!(scenarios.len(), 1);
        let scenario = &scenarios[0];
        assert_eq!(scenario.config.variant, MenuVariant::Select);
        assert_eq!(scenario.items[0].value, None);
        assert_eq!(scenario.steps[1], Step::focus("go"));
        assert_eq!(scenario.steps[2], Step::key(Key::Enter));
        assert_eq!(
            scenario.steps[3],
            Step::Event {
                event: InputEvent::PointerUp {
                    element: ElementId(1)
                }
            }
        );
        assert_eq!(scenario.expect.focused, Some(Some(1)));
        assert_eq!(scenario.expect.notifications, None);
    }

    #[test]
    fn explicit_null_focus_differs_from_absent() {
        let with_null = r#"{"name":"a","items":[],"expect":{"focused":null}}"#;
        let without = r#"{"name":"b","items":[]}"#;
        assert_eq!(parse_scenarios(with_null).unwrap()[0].expect.focused, Some(None));
        assert_eq!(parse_scenarios(without).unwrap()[0].expect.focused, None);
    }

    #[test]
    fn parses_arrays_and_rejects_unknown_steps() {
        let raw = r#"[{"name":"a","items":[]},{"name":"b","items":[]}]"#;
        assert_eq!(parse_scenarios(raw).unwrap().len(), 2);
        let bad = r#"{"name":"a","items":[],"steps":[{"step":"explode"}]}"#;
        assert!(parse_scenarios(bad).is_err());
    }

    #[test]
    fn host_elements_use_positions_as_handles() {
        let scenario = Scenario::new(
            "x",
            "",
            MenuConfig::default(),
            vec![ItemSpec::new("A", None), ItemSpec::new("B", Some("b"))],
        );
        let elements = scenario.host_elements();
        assert_eq!(elements[1], HostElement::new(1, "B", Some("b")));
    }

    #[test]
    fn built_in_scenarios_survive_json() {
        let scenarios = catalog_scenarios();
        let json = serde_json::to_string(&scenarios).unwrap();
        assert_eq!(parse_scenarios(&json).unwrap(), scenarios);
    }
}
