//! Picking state machine.
//!
//! ```text
//! Idle -> Armed -> PreviewPending -> Previewing -> (confirm | cancel) -> Armed
//!           \______________________________________________________/
//!                                  |
//!                          Closing -> Idle
//! ```
//!
//! A press clears the current preview and records a position. The hit test
//! runs later, when the host reports the settle delay has elapsed for that
//! press. Only the latest press is honoured.

use crate::host::Host;
use crate::preview::Preview;
use crate::surface::CaptureSurface;
use kurbo::{Point, Rect};
use std::rc::Rc;

/// State of a picking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerState {
    /// Not listening.
    #[default]
    Idle,
    /// Surface mounted, waiting for a press.
    Armed,
    /// Press recorded, settle delay running.
    PreviewPending,
    /// An element is highlighted, awaiting confirm or cancel.
    Previewing,
    /// Names the `close` transition. `close` runs it to completion, so a
    /// picker is never left in this state.
    Closing,
}

impl PickerState {
    /// Whether the machine reacts to input.
    pub fn is_listening(self) -> bool {
        matches!(self, Self::Armed | Self::PreviewPending | Self::Previewing)
    }
}

/// Identifies one press; handed back when its settle delay elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PressToken(u64);

#[derive(Debug, Clone, Copy)]
struct PendingPress {
    token: PressToken,
    position: Point,
}

/// Press/preview/confirm loop plus the selection cache.
pub struct Picker<H: Host> {
    host: Rc<H>,
    state: PickerState,
    next_token: u64,
    pending: Option<PendingPress>,
    preview: Option<Preview<H>>,
    /// Confirmed picks in confirm order. Duplicates are kept.
    selection: Vec<H::Element>,
    highlight_style: String,
    border_color: String,
}

impl<H: Host> Picker<H> {
    pub fn new(host: Rc<H>, highlight_style: impl Into<String>, border_color: impl Into<String>) -> Self {
        Self {
            host,
            state: PickerState::Idle,
            next_token: 0,
            pending: None,
            preview: None,
            selection: Vec::new(),
            highlight_style: highlight_style.into(),
            border_color: border_color.into(),
        }
    }

    /// Start listening.
    pub fn arm(&mut self) {
        if self.state == PickerState::Idle {
            self.state = PickerState::Armed;
        }
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn selection(&self) -> &[H::Element] {
        &self.selection
    }

    /// Element currently previewed, if any.
    pub fn preview(&self) -> Option<&H::Element> {
        self.preview.as_ref().map(Preview::element)
    }

    /// Record a press at `position`, dropping any live preview.
    ///
    /// Returns the token to settle once the delay elapses, or `None` when
    /// the machine is not listening.
    pub fn press(&mut self, position: Point, surface: &CaptureSurface<H>) -> Option<PressToken> {
        if !self.state.is_listening() {
            return None;
        }
        if self.preview.take().is_some() {
            surface.clear(&self.host);
        }

        let token = PressToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(PendingPress { token, position });
        self.state = PickerState::PreviewPending;
        log::debug!("Press at ({}, {}) -> {:?}", position.x, position.y, token);
        Some(token)
    }

    /// Resolve the hit test for `token` and highlight what lies beneath.
    ///
    /// Stale tokens (superseded by a later press) are ignored. Returns the
    /// newly previewed element.
    pub fn settle(&mut self, token: PressToken, surface: &CaptureSurface<H>) -> Option<H::Element> {
        match self.pending {
            Some(pending) if pending.token == token => {}
            _ => {
                log::debug!("Ignoring stale {:?}", token);
                return None;
            }
        }
        let pending = self.pending.take()?;

        let Some(element) = surface.element_beneath(&self.host, pending.position) else {
            log::debug!("No element at ({}, {})", pending.position.x, pending.position.y);
            self.state = PickerState::Armed;
            return None;
        };

        let preview = Preview::acquire(self.host.clone(), element.clone(), &self.highlight_style);
        self.preview = Some(preview);
        self.draw_border_around(&element, surface);
        self.state = PickerState::Previewing;
        Some(element)
    }

    /// Promote the preview into the selection.
    ///
    /// Returns `false` when there was nothing to confirm.
    pub fn confirm(&mut self, surface: &CaptureSurface<H>) -> bool {
        let Some(preview) = self.preview.take() else {
            return false;
        };
        let element = preview.commit();
        self.draw_border_around(&element, surface);
        self.selection.push(element);
        self.state = PickerState::Armed;
        log::debug!("Confirmed pick #{}", self.selection.len());
        true
    }

    /// Revert the preview without selecting it.
    ///
    /// Returns `false` when there was nothing to cancel.
    pub fn cancel(&mut self, surface: &CaptureSurface<H>) -> bool {
        if self.preview.take().is_none() {
            return false;
        }
        surface.clear(&self.host);
        self.state = PickerState::Armed;
        log::debug!("Preview cancelled");
        true
    }

    /// Stop listening, revert any live preview and hand back the selection.
    pub fn close(&mut self) -> Vec<H::Element> {
        self.pending = None;
        self.preview = None;
        self.state = PickerState::Idle;
        self.selection.clone()
    }

    fn draw_border_around(&self, element: &H::Element, surface: &CaptureSurface<H>) {
        let element_box = match self.host.bounding_box(element) {
            Ok(rect) => rect,
            Err(e) => {
                log::warn!("Cannot measure picked element: {}", e);
                Rect::ZERO
            }
        };
        if let Err(e) = surface.draw_border(&self.host, element_box, &self.border_color) {
            log::warn!("Failed to draw border: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayStyle;
    use crate::memory::{MemoryHost, NodeId};
    use kurbo::Size;

    struct Fixture {
        host: Rc<MemoryHost>,
        surface: CaptureSurface<MemoryHost>,
        picker: Picker<MemoryHost>,
        left: NodeId,
        right: NodeId,
    }

    fn fixture() -> Fixture {
        let host = Rc::new(MemoryHost::new(Size::new(800.0, 600.0)));
        let body = host.body();
        let left = host.add_element(body, "div", Rect::new(0.0, 0.0, 400.0, 600.0));
        let right = host.add_element(body, "section", Rect::new(400.0, 0.0, 800.0, 600.0));
        let surface = CaptureSurface::create(&*host, &body, host.viewport(), &OverlayStyle::default()).unwrap();
        let mut picker = Picker::new(host.clone(), "2px solid orange", "orange");
        picker.arm();
        Fixture {
            host,
            surface,
            picker,
            left,
            right,
        }
    }

    #[test]
    fn test_press_then_settle_previews() {
        let mut f = fixture();
        let token = f.picker.press(Point::new(100.0, 100.0), &f.surface).unwrap();
        assert_eq!(f.picker.state(), PickerState::PreviewPending);

        let hit = f.picker.settle(token, &f.surface);
        assert_eq!(hit, Some(f.left));
        assert_eq!(f.picker.state(), PickerState::Previewing);
        assert_eq!(f.picker.preview(), Some(&f.left));
        assert_eq!(f.host.outline(&f.left), "2px solid orange");
        assert_eq!(f.host.strokes(f.surface.handle()).len(), 1);
    }

    #[test]
    fn test_last_press_wins() {
        let mut f = fixture();
        let first = f.picker.press(Point::new(100.0, 100.0), &f.surface).unwrap();
        let second = f.picker.press(Point::new(500.0, 100.0), &f.surface).unwrap();

        assert_eq!(f.picker.settle(first, &f.surface), None);
        assert_eq!(f.picker.state(), PickerState::PreviewPending);
        assert_eq!(f.picker.settle(second, &f.surface), Some(f.right));
        assert_eq!(f.host.outline(&f.left), "none");
    }

    #[test]
    fn test_settle_twice_is_ignored() {
        let mut f = fixture();
        let token = f.picker.press(Point::new(100.0, 100.0), &f.surface).unwrap();
        assert!(f.picker.settle(token, &f.surface).is_some());
        assert_eq!(f.picker.settle(token, &f.surface), None);
        assert_eq!(f.picker.preview(), Some(&f.left));
    }

    #[test]
    fn test_no_hit_returns_to_armed() {
        let mut f = fixture();
        let token = f.picker.press(Point::new(-20.0, 900.0), &f.surface).unwrap();

        assert_eq!(f.picker.settle(token, &f.surface), None);
        assert_eq!(f.picker.state(), PickerState::Armed);
        assert_eq!(f.picker.preview(), None);
        assert!(!f.picker.confirm(&f.surface));
        assert!(f.picker.selection().is_empty());
    }

    #[test]
    fn test_new_press_reverts_previous_preview() {
        let mut f = fixture();
        let token = f.picker.press(Point::new(100.0, 100.0), &f.surface).unwrap();
        f.picker.settle(token, &f.surface);

        f.picker.press(Point::new(500.0, 100.0), &f.surface);
        assert_eq!(f.picker.preview(), None);
        assert_eq!(f.host.outline(&f.left), "none");
        assert!(f.host.strokes(f.surface.handle()).is_empty());
    }

    #[test]
    fn test_confirm_appends_and_keeps_highlight() {
        let mut f = fixture();
        let token = f.picker.press(Point::new(100.0, 100.0), &f.surface).unwrap();
        f.picker.settle(token, &f.surface);

        assert!(f.picker.confirm(&f.surface));
        assert_eq!(f.picker.selection(), &[f.left]);
        assert_eq!(f.picker.preview(), None);
        assert_eq!(f.picker.state(), PickerState::Armed);
        assert_eq!(f.host.outline(&f.left), "2px solid orange");
        assert_eq!(f.host.strokes(f.surface.handle()).len(), 1);

        // Confirm clears the slot, so repeating it does nothing.
        assert!(!f.picker.confirm(&f.surface));
        assert_eq!(f.picker.selection().len(), 1);
    }

    #[test]
    fn test_cancel_reverts() {
        let mut f = fixture();
        f.host.set_outline(&f.left, "3px dotted green");
        let token = f.picker.press(Point::new(100.0, 100.0), &f.surface).unwrap();
        f.picker.settle(token, &f.surface);

        assert!(f.picker.cancel(&f.surface));
        assert!(f.picker.selection().is_empty());
        assert_eq!(f.host.outline(&f.left), "3px dotted green");
        assert!(f.host.strokes(f.surface.handle()).is_empty());
        assert!(!f.picker.cancel(&f.surface));
    }

    #[test]
    fn test_same_element_twice() {
        let mut f = fixture();
        for _ in 0..2 {
            let token = f.picker.press(Point::new(100.0, 100.0), &f.surface).unwrap();
            f.picker.settle(token, &f.surface);
            assert!(f.picker.confirm(&f.surface));
        }
        assert_eq!(f.picker.selection(), &[f.left, f.left]);
    }

    #[test]
    fn test_close_reverts_pending_preview() {
        let mut f = fixture();
        let token = f.picker.press(Point::new(500.0, 100.0), &f.surface).unwrap();
        f.picker.settle(token, &f.surface);

        let result = f.picker.close();
        assert!(result.is_empty());
        assert_eq!(f.picker.state(), PickerState::Idle);
        assert_eq!(f.host.outline(&f.right), "none");
        assert_eq!(f.picker.press(Point::new(1.0, 1.0), &f.surface), None);
    }

    #[test]
    fn test_close_drops_pending_press() {
        let mut f = fixture();
        let token = f.picker.press(Point::new(100.0, 100.0), &f.surface).unwrap();
        f.picker.close();
        assert_eq!(f.picker.settle(token, &f.surface), None);
        assert_eq!(f.host.outline(&f.left), "none");
    }

    #[test]
    fn test_close_lands_in_idle() {
        let mut f = fixture();
        let token = f.picker.press(Point::new(100.0, 100.0), &f.surface).unwrap();
        f.picker.settle(token, &f.surface);
        f.picker.close();
        assert_eq!(f.picker.state(), PickerState::Idle);
        assert!(!PickerState::Closing.is_listening());
    }
}
