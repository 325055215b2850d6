//! Rendering capability the controller drives.
//!
//! The core never touches presentation state directly; every visual change is
//! requested through [`Renderer`].
use std::collections::BTreeSet;

/// Visual side effects requested by the menu core.
pub trait Renderer {
    /// Show or hide the menu container.
    fn mark_open(&mut self, open: bool);

    /// Add or remove the focused marker on the item at `position`.
    fn mark_focused(&mut self, position: usize, focused: bool);

    /// Give logical input focus to the menu container.
    fn focus_container(&mut self) {}
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn mark_open(&mut self, open: bool) {
        (**self).mark_open(open);
    }

    fn mark_focused(&mut self, position: usize, focused: bool) {
        (**self).mark_focused(position, focused);
    }

    fn focus_container(&mut self) {
        (**self).focus_container();
    }
}

/// Renderer that discards every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn mark_open(&mut self, _open: bool) {}

    fn mark_focused(&mut self, _position: usize, _focused: bool) {}
}

/// One request received by a [`RecordingRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOp {
    Open(bool),
    Focused(usize, bool),
    FocusContainer,
}

/// Renderer that keeps the resulting visual state plus the request log.
///
/// Used by tests and by the scenario tester to observe exactly which items
/// were touched.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    open: bool,
    focused: BTreeSet<usize>,
    container_focus_requests: usize,
    ops: Vec<RenderOp>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Positions currently carrying the focused marker.
    #[must_use]
    pub fn focused_positions(&self) -> Vec<usize> {
        self.focused.iter().copied().collect()
    }

    #[must_use]
    pub const fn container_focus_requests(&self) -> usize {
        self.container_focus_requests
    }

    #[must_use]
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn mark_open(&mut self, open: bool) {
        self.open = open;
        self.ops.push(RenderOp::Open(open));
    }

    fn mark_focused(&mut self, position: usize, focused: bool) {
        if focused {
            self.focused.insert(position);
        } else {
            self.focused.remove(&position);
        }
        self.ops.push(RenderOp::Focused(position, focused));
    }

    fn focus_container(&mut self) {
        self.container_focus_requests += 1;
        self.ops.push(RenderOp::FocusContainer);
    }
}
