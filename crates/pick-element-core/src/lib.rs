//! pick-element Core Library
//!
//! Platform-agnostic element picking: a capture surface over a page region,
//! press-and-hold hit testing through that surface, keyboard confirm/cancel
//! and an accumulating selection. The page itself is reached through the
//! [`Host`] trait; `pick-element-web` implements it on the DOM.

pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod input;
pub mod memory;
pub mod picker;
pub mod preview;
pub mod scroll;
pub mod session;
pub mod surface;

pub use config::{KeyAction, KeyBindings, OverlayStyle, PickerConfig, PositionMode, PRESS_SETTLE_DELAY};
pub use error::{PickError, PickResult};
pub use geometry::Geometry;
pub use host::{Host, SurfaceSpec};
pub use input::{InputStrategy, RawPress, is_mobile_user_agent};
pub use memory::{MemoryHost, NodeId};
pub use picker::{Picker, PickerState, PressToken};
pub use preview::{OUTLINE_MARKER, Preview};
pub use scroll::ScrollLock;
pub use session::{KeyOutcome, SelectCallback, Session};
pub use surface::CaptureSurface;
