//! Logical focus tracking.
use crate::item::{Item, ItemIndex};
use crate::render::Renderer;

/// Holds which item, if any, currently has logical focus.
///
/// Focus is stored as a position into the owning [`ItemIndex`], never as a
/// copy of the item. At most one item carries the focused marker, and a
/// change only touches the previously and newly focused items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusTracker {
    focused: Option<usize>,
}

impl FocusTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { focused: None }
    }

    /// Focus the item at `position`. `None` or an out-of-range position clears focus.
    ///
    /// Returns the position focused afterwards.
    pub fn focus_by_position<R>(
        &mut self,
        items: &ItemIndex,
        position: Option<usize>,
        renderer: &mut R,
    ) -> Option<usize>
    where
        R: Renderer + ?Sized,
    {
        let next = position.filter(|p| *p < items.len());
        if next == self.focused {
            return next;
        }
        if let Some(previous) = self.focused {
            renderer.mark_focused(previous, false);
        }
        if let Some(position) = next {
            renderer.mark_focused(position, true);
        }
        self.focused = next;
        next
    }

    /// Focus the first item whose value equals `value`, or clear focus when none match.
    pub fn focus_by_value<R>(
        &mut self,
        items: &ItemIndex,
        value: Option<&str>,
        renderer: &mut R,
    ) -> Option<usize>
    where
        R: Renderer + ?Sized,
    {
        let position = items.item_by_value(value).map(|item| item.position);
        self.focus_by_position(items, position, renderer)
    }

    /// Drop focus without asking the renderer to unmark anything.
    ///
    /// Only valid when the marked elements are being discarded anyway.
    pub const fn forget(&mut self) {
        self.focused = None;
    }

    #[must_use]
    pub fn current<'a>(&self, items: &'a ItemIndex) -> Option<&'a Item> {
        self.focused.and_then(|position| items.get(position))
    }

    /// Position of the focused item; `None` when nothing is focused.
    #[must_use]
    pub const fn index_of_current(&self) -> Option<usize> {
        self.focused
    }
}
