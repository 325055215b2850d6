//! Open/closed lifecycle.
use serde::{Deserialize, Serialize};

use crate::notify::{Emitter, Notification};
use crate::render::Renderer;

/// When the container receives input focus after opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusTiming {
    /// Focus synchronously inside `open()`.
    #[default]
    Immediate,
    /// Hand back a [`FocusTicket`] for the host to run on its next event-loop
    /// turn, after any blur triggered by the same user action has settled.
    Deferred,
}

/// Single-shot deferred focus request, keyed by the lifecycle epoch that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FocusTicket {
    epoch: u64,
}

impl FocusTicket {
    #[must_use]
    pub const fn epoch(self) -> u64 {
        self.epoch
    }
}

/// `Closed` (initial) and `Open`, with no intermediate states.
///
/// Every transition bumps the epoch so that a focus ticket issued by an
/// earlier `open()` can be recognised as stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenState {
    open: bool,
    epoch: u64,
    pending: Option<u64>,
}

impl OpenState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            open: false,
            epoch: 0,
            pending: None,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub const fn pending_ticket(&self) -> Option<FocusTicket> {
        match self.pending {
            Some(epoch) => Some(FocusTicket { epoch }),
            None => None,
        }
    }

    /// `opening`, show, focus (now or via ticket), `opened`.
    pub fn open<R>(
        &mut self,
        timing: FocusTiming,
        emitter: &mut Emitter,
        renderer: &mut R,
    ) -> Option<FocusTicket>
    where
        R: Renderer + ?Sized,
    {
        emitter.emit(&Notification::Opening);
        self.open = true;
        self.epoch += 1;
        renderer.mark_open(true);
        let ticket = match timing {
            FocusTiming::Immediate => {
                self.pending = None;
                renderer.focus_container();
                None
            }
            FocusTiming::Deferred => {
                self.pending = Some(self.epoch);
                Some(FocusTicket { epoch: self.epoch })
            }
        };
        log::debug!("menu opened (epoch {}, timing {timing:?})", self.epoch);
        emitter.emit(&Notification::Opened);
        ticket
    }

    /// `closing`, hide, `closed`. Cancels any outstanding focus ticket.
    pub fn close<R>(&mut self, emitter: &mut Emitter, renderer: &mut R)
    where
        R: Renderer + ?Sized,
    {
        emitter.emit(&Notification::Closing);
        self.open = false;
        self.epoch += 1;
        if self.pending.take().is_some() {
            log::debug!("menu closed with a deferred focus outstanding; cancelled");
        }
        renderer.mark_open(false);
        log::debug!("menu closed (epoch {})", self.epoch);
        emitter.emit(&Notification::Closed);
    }

    pub fn toggle<R>(
        &mut self,
        timing: FocusTiming,
        emitter: &mut Emitter,
        renderer: &mut R,
    ) -> Option<FocusTicket>
    where
        R: Renderer + ?Sized,
    {
        if self.open {
            self.close(emitter, renderer);
            None
        } else {
            self.open(timing, emitter, renderer)
        }
    }

    /// Execute a deferred focus request. Returns `false` for stale tickets.
    pub fn run_deferred<R>(&mut self, ticket: FocusTicket, renderer: &mut R) -> bool
    where
        R: Renderer + ?Sized,
    {
        if !self.open || self.pending != Some(ticket.epoch) {
            log::warn!(
                "skipping stale deferred focus (ticket epoch {}, current epoch {}, open {})",
                ticket.epoch,
                self.epoch,
                self.open
            );
            return false;
        }
        self.pending = None;
        renderer.focus_container();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_emitter() -> (Emitter, Rc<RefCell<Vec<&'static str>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new();
        let sink = Rc::clone(&seen);
        emitter.subscribe(move |n| sink.borrow_mut().push(n.name()));
        (emitter, seen)
    }

    #[test]
    fn open_then_close_emits_each_transition_once() {
        let (mut emitter, seen) = recording_emitter();
        let mut renderer = RecordingRenderer::new();
        let mut state = OpenState::new();

        state.open(FocusTiming::Immediate, &mut emitter, &mut renderer);
        assert!(state.is_open());
        state.close(&mut emitter, &mut renderer);

        assert!(!state.is_open());
        assert_eq!(*seen.borrow(), ["opening", "opened", "closing", "closed"]);
        assert_eq!(renderer.container_focus_requests(), 1);
    }

    #[test]
    fn toggle_alternates() {
        let (mut emitter, _seen) = recording_emitter();
        let mut renderer = RecordingRenderer::new();
        let mut state = OpenState::new();

        state.toggle(FocusTiming::Immediate, &mut emitter, &mut renderer);
        assert!(renderer.is_open());
        state.toggle(FocusTiming::Immediate, &mut emitter, &mut renderer);
        assert!(!renderer.is_open());
    }

    #[test]
    fn deferred_focus_runs_once() {
        let (mut emitter, _seen) = recording_emitter();
        let mut renderer = RecordingRenderer::new();
        let mut state = OpenState::new();

        let ticket = state
            .open(FocusTiming::Deferred, &mut emitter, &mut renderer)
            .expect("deferred open issues a ticket");
        assert_eq!(renderer.container_focus_requests(), 0);
        assert!(state.run_deferred(ticket, &mut renderer));
        assert!(!state.run_deferred(ticket, &mut renderer));
        assert_eq!(renderer.container_focus_requests(), 1);
    }

    #[test]
    fn close_cancels_outstanding_ticket() {
        let (mut emitter, _seen) = recording_emitter();
        let mut renderer = RecordingRenderer::new();
        let mut state = OpenState::new();

        let stale = state
            .open(FocusTiming::Deferred, &mut emitter, &mut renderer)
            .unwrap();
        state.close(&mut emitter, &mut renderer);
        assert!(state.pending_ticket().is_none());
        assert!(!state.run_deferred(stale, &mut renderer));

        let fresh = state
            .open(FocusTiming::Deferred, &mut emitter, &mut renderer)
            .unwrap();
        assert!(!state.run_deferred(stale, &mut renderer));
        assert!(state.run_deferred(fresh, &mut renderer));
        assert_eq!(renderer.container_focus_requests(), 1);
    }

    #[test]
    fn reopening_issues_a_newer_ticket() {
        let (mut emitter, _seen) = recording_emitter();
        let mut renderer = RecordingRenderer::new();
        let mut state = OpenState::new();

        let first = state
            .open(FocusTiming::Deferred, &mut emitter, &mut renderer)
            .unwrap();
        state.close(&mut emitter, &mut renderer);
        let second = state
            .open(FocusTiming::Deferred, &mut emitter, &mut renderer)
            .unwrap();
        assert_ne!(first, second);
        assert!(second.epoch() > first.epoch());
        assert_eq!(state.pending_ticket(), Some(second));
    }
}
