//! Outbound notifications and the listener registry.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Observable menu events, delivered to listeners in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Notification {
    Opening,
    Opened,
    Closing,
    Closed,
    Focused,
    Blurred,
    Cancel,
    /// Navigational highlight intent.
    FocusItem { item: Item, position: usize },
    /// Confirmed selection.
    SelectItem { item: Item, position: usize },
}

impl Notification {
    /// Wire name of the notification.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Opened => "opened",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Focused => "focused",
            Self::Blurred => "blurred",
            Self::Cancel => "cancel",
            Self::FocusItem { .. } => "focus-item",
            Self::SelectItem { .. } => "select-item",
        }
    }

    /// Item position carried by `focus-item` / `select-item`.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::FocusItem { position, .. } | Self::SelectItem { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }

    pub(crate) fn focus_item(item: &Item) -> Self {
        Self::FocusItem {
            item: item.clone(),
            position: item.position,
        }
    }

    pub(crate) fn select_item(item: &Item) -> Self {
        Self::SelectItem {
            item: item.clone(),
            position: item.position,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position() {
            Some(position) => write!(f, "{}({position})", self.name()),
            None => f.write_str(self.name()),
        }
    }
}

/// Handle returned by [`Emitter::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(&Notification)>;

/// Ordered listener registry.
///
/// Listeners must not call back into the menu that owns the emitter; hosts
/// that need to react by mutating the menu should queue the notification and
/// act on it once the current event has been handled.
#[derive(Default)]
pub struct Emitter {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Emitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Notification) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, notification: &Notification) {
        log::trace!("menu notification: {notification}");
        for (_, listener) in &mut self.listeners {
            listener(notification);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
