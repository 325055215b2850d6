//! Item records and the ordered index built from host elements.
use serde::{Deserialize, Serialize};

use crate::error::MenuError;

/// Opaque handle the host uses to identify one of its item elements.
///
/// The core never dereferences it; it only maps it back to a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

/// An already-materialised host element: text label, optional value and handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostElement {
    pub id: ElementId,
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl HostElement {
    #[must_use]
    pub fn new(id: u32, label: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            id: ElementId(id),
            label: label.into(),
            value: value.map(str::to_owned),
        }
    }
}

/// One selectable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub label: String,
    /// `None` is a legitimate value, typically a placeholder entry.
    pub value: Option<String>,
    pub position: usize,
    #[serde(default = "Item::detached")]
    pub element: ElementId,
}

impl Item {
    const fn detached() -> ElementId {
        ElementId(u32::MAX)
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Addresses an item either by position or by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKey {
    Position(usize),
    Value(Option<String>),
}

impl From<usize> for ItemKey {
    fn from(position: usize) -> Self {
        Self::Position(position)
    }
}

impl From<&str> for ItemKey {
    fn from(value: &str) -> Self {
        Self::Value(Some(value.to_owned()))
    }
}

impl From<String> for ItemKey {
    fn from(value: String) -> Self {
        Self::Value(Some(value))
    }
}

impl From<Option<&str>> for ItemKey {
    fn from(value: Option<&str>) -> Self {
        Self::Value(value.map(str::to_owned))
    }
}

impl From<Option<String>> for ItemKey {
    fn from(value: Option<String>) -> Self {
        Self::Value(value)
    }
}

/// Ordered item list for one render of the menu.
///
/// Positions are contiguous from zero. Values need not be unique; value
/// lookups return the lowest-position match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemIndex {
    items: Vec<Item>,
}

impl ItemIndex {
    /// Map host elements to items in input order. No filtering, no deduplication.
    #[must_use]
    pub fn build<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = HostElement>,
    {
        let items = elements
            .into_iter()
            .enumerate()
            .map(|(position, el)| Item {
                label: el.label,
                value: el.value,
                position,
                element: el.id,
            })
            .collect();
        Self { items }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Item> {
        self.items.get(position)
    }

    /// Item at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::OutOfRange`] when `position >= len()`.
    pub fn item_at(&self, position: usize) -> Result<&Item, MenuError> {
        self.items.get(position).ok_or(MenuError::OutOfRange {
            position,
            len: self.items.len(),
        })
    }

    /// First item whose value equals `value`; `None` matches placeholder items.
    #[must_use]
    pub fn item_by_value(&self, value: Option<&str>) -> Option<&Item> {
        self.items.iter().find(|item| item.value.as_deref() == value)
    }

    /// Resolve a key.
    ///
    /// # Errors
    ///
    /// Position keys fail with [`MenuError::OutOfRange`]; value keys never fail.
    pub fn resolve(&self, key: &ItemKey) -> Result<Option<&Item>, MenuError> {
        match key {
            ItemKey::Position(position) => self.item_at(*position).map(Some),
            ItemKey::Value(value) => Ok(self.item_by_value(value.as_deref())),
        }
    }

    /// Position of the item backed by the host element `id`.
    #[must_use]
    pub fn position_of(&self, id: ElementId) -> Option<usize> {
        self.items.iter().position(|item| item.element == id)
    }

    #[must_use]
    pub fn last_position(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.label.as_str()).collect()
    }

    #[must_use]
    pub fn values(&self) -> Vec<Option<&str>> {
        self.items.iter().map(Item::value).collect()
    }
}

impl<'a> IntoIterator for &'a ItemIndex {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
