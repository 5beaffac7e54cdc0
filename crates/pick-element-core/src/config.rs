//! Session configuration.
//!
//! Every field has a default so a host can pass a partial options object
//! (or nothing at all) and still get the full-viewport translucent overlay.

use crate::error::{PickError, PickResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay between a press and the hit test it triggers.
///
/// Touch coordinates settle during this window before being sampled.
pub const PRESS_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Default target selector.
pub const DEFAULT_SELECTOR: &str = "body";

/// Default outline applied to the previewed element.
pub const DEFAULT_SELECTED_STYLE: &str = "2px solid orange";

/// Default stroke color for borders drawn on the capture surface.
pub const DEFAULT_BORDER_COLOR: &str = "orange";

/// How the overlay is positioned relative to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    Absolute,
    /// Pinned to the viewport; does not scroll with the page.
    #[default]
    Fixed,
}

impl PositionMode {
    /// CSS keyword for this mode.
    pub fn as_css(self) -> &'static str {
        match self {
            PositionMode::Absolute => "absolute",
            PositionMode::Fixed => "fixed",
        }
    }
}

/// Style of the capture surface wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayStyle {
    pub position: PositionMode,
    pub background_color: String,
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
    pub z_index: i32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            position: PositionMode::Fixed,
            background_color: "rgba(238, 238, 238, 0.5)".to_string(),
            top: "0px".to_string(),
            bottom: "0px".to_string(),
            left: "0px".to_string(),
            right: "0px".to_string(),
            z_index: 9999,
        }
    }
}

impl OverlayStyle {
    /// CSS property/value pairs to apply to the surface element.
    pub fn css_declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("position", self.position.as_css().to_string()),
            ("top", self.top.clone()),
            ("bottom", self.bottom.clone()),
            ("left", self.left.clone()),
            ("right", self.right.clone()),
            ("background-color", self.background_color.clone()),
            ("z-index", self.z_index.to_string()),
        ]
    }
}

/// Key names (as reported by `KeyboardEvent.key`) bound to picking actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            confirm: vec!["Enter".to_string()],
            cancel: vec!["Backspace".to_string()],
        }
    }
}

/// Action a released key maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Confirm,
    Cancel,
}

impl KeyBindings {
    /// Resolve a key name to an action. Confirm wins if a key is bound twice.
    pub fn action_for(&self, key: &str) -> Option<KeyAction> {
        if self.confirm.iter().any(|k| k == key) {
            Some(KeyAction::Confirm)
        } else if self.cancel.iter().any(|k| k == key) {
            Some(KeyAction::Cancel)
        } else {
            None
        }
    }
}

/// Options for a picking session.
///
/// The selection callback is not part of this struct; it is passed to
/// [`Session::start`](crate::Session::start) directly since it is not data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PickerConfig {
    /// Selector of the root element that scopes hit testing and the overlay.
    pub selector: String,
    /// Outline applied to the previewed element.
    pub selected_style: String,
    /// Style of the overlay wrapper.
    pub layer_wrapper_style: OverlayStyle,
    /// Stroke color of borders drawn on the surface.
    pub border_color: String,
    pub keys: KeyBindings,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            selector: DEFAULT_SELECTOR.to_string(),
            selected_style: DEFAULT_SELECTED_STYLE.to_string(),
            layer_wrapper_style: OverlayStyle::default(),
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            keys: KeyBindings::default(),
        }
    }
}

impl PickerConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> PickResult<Self> {
        serde_json::from_str(json).map_err(|e| PickError::Config(e.to_string()))
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> PickResult<String> {
        serde_json::to_string(self).map_err(|e| PickError::Config(e.to_string()))
    }
}
