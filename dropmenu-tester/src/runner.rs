use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use colored::Colorize;
use dropmenu_core::{FocusTicket, MenuController, RecordingRenderer};
use serde::Serialize;
use thiserror::Error;

use crate::scenario::{Scenario, Step};

/// One way a run can disagree with its scenario.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
    #[error("notifications: expected [{}], got [{}]", .expected.join(", "), .actual.join(", "))]
    Notifications {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("focused position: expected {expected:?}, got {actual:?}")]
    Focused {
        expected: Option<usize>,
        actual: Option<usize>,
    },
    #[error("open state: expected {expected}, got {actual}")]
    Open { expected: bool, actual: bool },
    #[error("default suppression: expected {expected:?}, got {actual:?}")]
    Prevented { expected: Vec<bool>, actual: Vec<bool> },
    #[error("step {step}: renderer marks {marked:?} while the menu focuses {focused:?}")]
    FocusMarkers {
        step: usize,
        marked: Vec<usize>,
        focused: Option<usize>,
    },
    #[error("step {step}: renderer shows open={shown} while the menu is open={open}")]
    OpenMarker { step: usize, shown: bool, open: bool },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub description: String,
    pub passed: bool,
    pub steps_run: usize,
    pub notifications: Vec<String>,
    pub failures: Vec<String>,
    pub duration: Duration,
}

pub struct ScenarioRunner {
    verbose: bool,
}

struct Trace {
    notifications: Vec<String>,
    prevented: Vec<bool>,
    focused: Option<usize>,
    open: bool,
    drift: Vec<Mismatch>,
}

impl ScenarioRunner {
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn run(&self, scenario: &Scenario) -> ScenarioResult {
        let start = Instant::now();
        let trace = self.replay(scenario);
        let failures: Vec<String> = check(scenario, &trace)
            .iter()
            .map(ToString::to_string)
            .collect();
        ScenarioResult {
            scenario_name: scenario.name.clone(),
            description: scenario.description.clone(),
            passed: failures.is_empty(),
            steps_run: scenario.steps.len(),
            notifications: trace.notifications,
            failures,
            duration: start.elapsed(),
        }
    }

    fn replay(&self, scenario: &Scenario) -> Trace {
        let mut menu = MenuController::new(
            scenario.host_elements(),
            &scenario.config,
            RecordingRenderer::new(),
        );
        let seen: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&seen);
        menu.subscribe(move |n| sink.borrow_mut().push(n.to_string()));

        let mut last_ticket: Option<FocusTicket> = None;
        let mut prevented = Vec::new();
        let mut drift = Vec::new();

        for (index, step) in scenario.steps.iter().enumerate() {
            let before = seen.borrow().len();
            match step {
                Step::Open => last_ticket = menu.open().or(last_ticket),
                Step::Close => menu.close(),
                Step::Toggle => last_ticket = menu.toggle().or(last_ticket),
                Step::Focus { key } => {
                    menu.focus(key.clone());
                }
                Step::ClearFocus => menu.clear_focus(),
                Step::Event { event } => prevented.push(menu.handle_event(*event).prevent_default),
                Step::RunDeferred => match last_ticket {
                    Some(ticket) => {
                        if !menu.run_deferred(ticket) {
                            log::info!("{}: deferred focus skipped", scenario.name);
                        }
                    }
                    None => log::warn!("{}: run-deferred with no ticket issued", scenario.name),
                },
            }

            if self.verbose {
                let emitted = seen.borrow()[before..].join(", ");
                println!(
                    "   {} {step:?} -> [{emitted}] focused={:?}",
                    format!("#{index}").dimmed(),
                    menu.focused_position()
                );
            }

            let marked = menu.renderer().focused_positions();
            let focused = menu.focused_position();
            if marked != focused.into_iter().collect::<Vec<_>>() {
                drift.push(Mismatch::FocusMarkers {
                    step: index,
                    marked,
                    focused,
                });
            }
            if menu.renderer().is_open() != menu.is_open() {
                drift.push(Mismatch::OpenMarker {
                    step: index,
                    shown: menu.renderer().is_open(),
                    open: menu.is_open(),
                });
            }
        }

        let notifications = seen.borrow().clone();
        Trace {
            notifications,
            prevented,
            focused: menu.focused_position(),
            open: menu.is_open(),
            drift,
        }
    }
}

fn check(scenario: &Scenario, trace: &Trace) -> Vec<Mismatch> {
    let expect = &scenario.expect;
    let mut mismatches = trace.drift.clone();

    if let Some(expected) = &expect.notifications
        && *expected != trace.notifications
    {
        mismatches.push(Mismatch::Notifications {
            expected: expected.clone(),
            actual: trace.notifications.clone(),
        });
    }
    if let Some(expected) = expect.focused
        && expected != trace.focused
    {
        mismatches.push(Mismatch::Focused {
            expected,
            actual: trace.focused,
        });
    }
    if let Some(expected) = expect.open
        && expected != trace.open
    {
        mismatches.push(Mismatch::Open {
            expected,
            actual: trace.open,
        });
    }
    if let Some(expected) = &expect.prevented
        && *expected != trace.prevented
    {
        mismatches.push(Mismatch::Prevented {
            expected: expected.clone(),
            actual: trace.prevented.clone(),
        });
    }
    mismatches
}
