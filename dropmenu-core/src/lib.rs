//! Dropmenu Core
//!
//! Platform-agnostic state machine for an interactive selection menu: item
//! lookup, logical focus, open/closed lifecycle and keyboard/pointer event
//! interpretation. Rendering is delegated to a host-provided [`Renderer`].

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod focus;
pub mod item;
pub mod notify;
pub mod open_state;
pub mod policy;
pub mod render;

pub use config::{MenuConfig, PolicyOverrides};
pub use controller::MenuController;
pub use error::{ConfigError, MenuError};
pub use event::{EventOutcome, InputEvent, Key};
pub use focus::FocusTracker;
pub use item::{ElementId, HostElement, Item, ItemIndex, ItemKey};
pub use notify::{Emitter, Notification, SubscriptionId};
pub use open_state::{FocusTicket, FocusTiming, OpenState};
pub use policy::{BlurPolicy, HoverPolicy, MenuVariant, VariantPolicy};
pub use render::{NullRenderer, RecordingRenderer, RenderOp, Renderer};
