//! Menu controller: composes the item index, focus tracker and open state,
//! and interprets raw input events into transitions and notifications.
use crate::config::MenuConfig;
use crate::error::MenuError;
use crate::event::{EventOutcome, InputEvent, Key};
use crate::focus::FocusTracker;
use crate::item::{ElementId, HostElement, Item, ItemIndex, ItemKey};
use crate::notify::{Emitter, Notification, SubscriptionId};
use crate::open_state::{FocusTicket, OpenState};
use crate::policy::{HoverPolicy, VariantPolicy};
use crate::render::Renderer;

/// The menu state machine.
///
/// All transitions happen synchronously inside the call that triggered them.
/// The only deferred step is the container focus of variants configured with
/// [`FocusTiming::Deferred`](crate::FocusTiming::Deferred), which the host
/// runs later through [`MenuController::run_deferred`].
#[derive(Debug)]
pub struct MenuController<R: Renderer> {
    items: ItemIndex,
    focus: FocusTracker,
    lifecycle: OpenState,
    policy: VariantPolicy,
    commit_focus: bool,
    emitter: Emitter,
    renderer: R,
}

impl<R: Renderer> MenuController<R> {
    /// Scan host elements into items and start closed with nothing focused.
    pub fn new<I>(elements: I, config: &MenuConfig, renderer: R) -> Self
    where
        I: IntoIterator<Item = HostElement>,
    {
        Self::with_policy(elements, config.policy(), config.commit_focus, renderer)
    }

    pub fn with_policy<I>(
        elements: I,
        policy: VariantPolicy,
        commit_focus: bool,
        renderer: R,
    ) -> Self
    where
        I: IntoIterator<Item = HostElement>,
    {
        let items = ItemIndex::build(elements);
        log::debug!(
            "menu constructed with {} items ({:?} hover, {:?} blur)",
            items.len(),
            policy.hover,
            policy.blur
        );
        Self {
            items,
            focus: FocusTracker::new(),
            lifecycle: OpenState::new(),
            policy,
            commit_focus,
            emitter: Emitter::new(),
            renderer,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> VariantPolicy {
        self.policy
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub const fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Notification) + 'static,
    {
        self.emitter.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.emitter.unsubscribe(id)
    }

    // Lifecycle

    /// Open the menu. Returns a ticket when container focus is deferred.
    pub fn open(&mut self) -> Option<FocusTicket> {
        self.lifecycle
            .open(self.policy.open_focus, &mut self.emitter, &mut self.renderer)
    }

    pub fn close(&mut self) {
        self.lifecycle.close(&mut self.emitter, &mut self.renderer);
    }

    pub fn toggle(&mut self) -> Option<FocusTicket> {
        self.lifecycle
            .toggle(self.policy.open_focus, &mut self.emitter, &mut self.renderer)
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.lifecycle.is_open()
    }

    /// Run a deferred container focus. Stale tickets are skipped.
    pub fn run_deferred(&mut self, ticket: FocusTicket) -> bool {
        self.lifecycle.run_deferred(ticket, &mut self.renderer)
    }

    #[must_use]
    pub const fn pending_focus(&self) -> Option<FocusTicket> {
        self.lifecycle.pending_ticket()
    }

    /// Replace the items after the host's element list changed.
    ///
    /// Focus is cleared; the open state is kept.
    pub fn rebuild<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = HostElement>,
    {
        self.focus
            .focus_by_position(&self.items, None, &mut self.renderer);
        self.items = ItemIndex::build(elements);
        self.focus.forget();
        log::debug!("menu rebuilt with {} items", self.items.len());
    }

    // Focus

    /// Focus by position or by value. Out-of-range positions and unmatched
    /// values clear focus.
    pub fn focus(&mut self, key: impl Into<ItemKey>) -> Option<usize> {
        match key.into() {
            ItemKey::Position(position) => self.focus_position(Some(position)),
            ItemKey::Value(value) => self.focus_value(value.as_deref()),
        }
    }

    pub fn focus_position(&mut self, position: Option<usize>) -> Option<usize> {
        self.focus
            .focus_by_position(&self.items, position, &mut self.renderer)
    }

    pub fn focus_value(&mut self, value: Option<&str>) -> Option<usize> {
        self.focus
            .focus_by_value(&self.items, value, &mut self.renderer)
    }

    pub fn clear_focus(&mut self) {
        self.focus_position(None);
    }

    #[must_use]
    pub fn focused(&self) -> Option<&Item> {
        self.focus.current(&self.items)
    }

    #[must_use]
    pub const fn focused_position(&self) -> Option<usize> {
        self.focus.index_of_current()
    }

    // Queries

    #[must_use]
    pub fn items(&self) -> &[Item] {
        self.items.as_slice()
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.items.labels()
    }

    #[must_use]
    pub fn values(&self) -> Vec<Option<&str>> {
        self.items.values()
    }

    /// Item by position or value.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::OutOfRange`] for a position past the end. A value
    /// with no match is `Ok(None)`.
    pub fn item(&self, key: impl Into<ItemKey>) -> Result<Option<&Item>, MenuError> {
        self.items.resolve(&key.into())
    }

    /// Label by position or value.
    ///
    /// # Errors
    ///
    /// Same policy as [`MenuController::item`].
    pub fn label(&self, key: impl Into<ItemKey>) -> Result<Option<&str>, MenuError> {
        Ok(self.item(key)?.map(|item| item.label.as_str()))
    }

    /// Value at `index`; `None` both for placeholder items and out-of-range indexes.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&str> {
        self.items.get(index).and_then(Item::value)
    }

    /// Value at `index`, failing for out-of-range indexes.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::OutOfRange`] when `index >= items().len()`.
    pub fn try_value(&self, index: usize) -> Result<Option<&str>, MenuError> {
        self.items.item_at(index).map(Item::value)
    }

    // Event interpretation

    pub fn handle_event(&mut self, event: InputEvent) -> EventOutcome {
        log::trace!("menu event: {event:?}");
        match event {
            InputEvent::Blur | InputEvent::Focus => {
                if let Some(notification) = self.policy.container_notification(&event) {
                    self.emitter.emit(&notification);
                }
                EventOutcome::IGNORED
            }
            InputEvent::PointerEnter { element } => {
                if self.policy.hover == HoverPolicy::Enter
                    && let Some(position) = self.resolve_element(element)
                {
                    self.navigate(position);
                }
                EventOutcome::IGNORED
            }
            InputEvent::PointerMove { element } => {
                if self.policy.hover == HoverPolicy::MoveOnChange
                    && let Some(position) = self.resolve_element(element)
                    && self.focus.index_of_current() != Some(position)
                {
                    self.navigate(position);
                }
                EventOutcome::IGNORED
            }
            InputEvent::PointerUp { element } => {
                if self.resolve_element(element).is_some() {
                    self.select_focused();
                }
                EventOutcome::IGNORED
            }
            InputEvent::KeyDown { key } => self.handle_key(key),
        }
    }

    fn handle_key(&mut self, key: Key) -> EventOutcome {
        match key {
            Key::Tab | Key::Enter => {
                self.select_focused();
                EventOutcome::SUPPRESS
            }
            Key::ArrowUp => {
                if let Some(current) = self.focus.index_of_current()
                    && current > 0
                {
                    self.navigate(current - 1);
                }
                EventOutcome::IGNORED
            }
            Key::ArrowDown => {
                let target = match self.focus.index_of_current() {
                    Some(current) => Some(current + 1),
                    None if self.policy.down_from_none => Some(0),
                    None => None,
                };
                if let Some(target) = target.filter(|t| *t < self.items.len()) {
                    self.navigate(target);
                }
                EventOutcome::IGNORED
            }
            Key::Escape => {
                if self.policy.escape_cancels && self.lifecycle.is_open() {
                    self.emitter.emit(&Notification::Cancel);
                }
                EventOutcome::IGNORED
            }
        }
    }

    fn resolve_element(&self, element: ElementId) -> Option<usize> {
        let position = self.items.position_of(element);
        if position.is_none() {
            log::warn!("ignoring pointer event for unknown element {element:?}");
        }
        position
    }

    /// Commit focus (when authoritative) and notify `focus-item`.
    fn navigate(&mut self, position: usize) {
        if self.commit_focus {
            self.focus
                .focus_by_position(&self.items, Some(position), &mut self.renderer);
        }
        if let Some(item) = self.items.get(position) {
            self.emitter.emit(&Notification::focus_item(item));
        }
    }

    fn select_focused(&mut self) {
        if let Some(item) = self.focus.current(&self.items) {
            self.emitter.emit(&Notification::select_item(item));
        }
    }
}
