//! Session controller: start/end lifecycle and input dispatch.

use crate::config::{KeyAction, KeyBindings, PickerConfig};
use crate::error::{PickError, PickResult};
use crate::host::Host;
use crate::input::{InputStrategy, RawPress};
use crate::picker::{Picker, PickerState, PressToken};
use crate::scroll::ScrollLock;
use crate::surface::CaptureSurface;
use std::rc::Rc;

/// Invoked with the whole selection, in confirm order, after every confirm.
pub type SelectCallback<E> = Box<dyn FnMut(&[E])>;

/// What a released key did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The preview was appended to the selection.
    Confirmed,
    /// The preview was reverted.
    Cancelled,
    /// Unbound key, nothing to act on, or session ended.
    Ignored,
}

/// One picking session over a target root.
///
/// The host wires its press and key events to [`handle_press`],
/// [`handle_settled`] and [`handle_key`]. Dropping a session that was never
/// ended ends it.
///
/// [`handle_press`]: Session::handle_press
/// [`handle_settled`]: Session::handle_settled
/// [`handle_key`]: Session::handle_key
pub struct Session<H: Host> {
    host: Rc<H>,
    root: H::Element,
    strategy: InputStrategy,
    keys: KeyBindings,
    surface: CaptureSurface<H>,
    picker: Picker<H>,
    scroll_lock: ScrollLock,
    on_select: Option<SelectCallback<H::Element>>,
    /// Frozen selection once the session has ended.
    result: Option<Vec<H::Element>>,
}

impl<H: Host> Session<H> {
    /// Mount the capture surface over the configured root and lock page scroll.
    ///
    /// Selector failures abort before the page is touched.
    pub fn start(
        host: Rc<H>,
        config: PickerConfig,
        on_select: Option<SelectCallback<H::Element>>,
    ) -> PickResult<Self> {
        let PickerConfig {
            selector,
            selected_style,
            layer_wrapper_style,
            border_color,
            keys,
        } = config;

        let root = host
            .query_selector(&selector)?
            .ok_or_else(|| PickError::InvalidSelector(selector.clone()))?;
        let target_box = host.bounding_box(&root)?;
        let strategy = InputStrategy::detect(host.is_touch_platform());

        let surface = CaptureSurface::create(&*host, &root, target_box, &layer_wrapper_style)?;
        let scroll_lock = ScrollLock::engage(&*host);

        let mut picker = Picker::new(host.clone(), selected_style, border_color);
        picker.arm();

        log::info!("Picking session started on '{}' ({:?} input)", selector, strategy);

        Ok(Self {
            host,
            root,
            strategy,
            keys,
            surface,
            picker,
            scroll_lock,
            on_select,
            result: None,
        })
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    /// The resolved target root.
    pub fn root(&self) -> &H::Element {
        &self.root
    }

    pub fn strategy(&self) -> InputStrategy {
        self.strategy
    }

    /// Press-start event the host should listen for on the surface.
    pub fn press_event_name(&self) -> &'static str {
        self.strategy.press_event_name()
    }

    pub fn surface(&self) -> &CaptureSurface<H> {
        &self.surface
    }

    pub fn state(&self) -> PickerState {
        self.picker.state()
    }

    pub fn is_active(&self) -> bool {
        self.result.is_none()
    }

    /// Confirmed picks so far, in confirm order.
    pub fn selection(&self) -> &[H::Element] {
        self.picker.selection()
    }

    /// Element currently previewed, if any.
    pub fn preview(&self) -> Option<&H::Element> {
        self.picker.preview()
    }

    /// Handle a press-start event.
    ///
    /// Returns the token to pass to [`Session::handle_settled`] once
    /// [`PRESS_SETTLE_DELAY`](crate::PRESS_SETTLE_DELAY) has elapsed.
    /// Malformed touch events are ignored.
    pub fn handle_press(&mut self, press: &RawPress) -> Option<PressToken> {
        if !self.is_active() {
            return None;
        }
        match self.strategy.extract_position(press) {
            Ok(position) => self.picker.press(position, &self.surface),
            Err(e) => {
                log::debug!("Ignoring press: {}", e);
                None
            }
        }
    }

    /// Run the hit test for a settled press.
    ///
    /// Safe to call after the session has ended; it then does nothing.
    pub fn handle_settled(&mut self, token: PressToken) -> Option<H::Element> {
        if !self.is_active() || !self.surface.is_live(&self.host) {
            log::debug!("Settle after teardown ignored");
            return None;
        }
        self.picker.settle(token, &self.surface)
    }

    /// Handle a released key.
    pub fn handle_key(&mut self, key: &str) -> KeyOutcome {
        if !self.is_active() {
            return KeyOutcome::Ignored;
        }
        match self.keys.action_for(key) {
            Some(KeyAction::Confirm) => {
                if !self.picker.confirm(&self.surface) {
                    return KeyOutcome::Ignored;
                }
                if let Some(on_select) = self.on_select.as_mut() {
                    on_select(self.picker.selection());
                }
                KeyOutcome::Confirmed
            }
            Some(KeyAction::Cancel) => {
                if self.picker.cancel(&self.surface) {
                    KeyOutcome::Cancelled
                } else {
                    KeyOutcome::Ignored
                }
            }
            None => KeyOutcome::Ignored,
        }
    }

    /// Tear down and return the selection.
    ///
    /// Removes the surface, reverts a live preview and restores page
    /// overflow. Repeated calls return the same selection without touching
    /// the page.
    pub fn end(&mut self) -> Vec<H::Element> {
        if let Some(result) = &self.result {
            return result.clone();
        }

        self.surface.destroy(&self.host);
        let selection = self.picker.close();
        self.scroll_lock.release(&*self.host);

        log::info!("Picking session ended with {} element(s)", selection.len());
        self.result = Some(selection.clone());
        selection
    }
}

impl<H: Host> Drop for Session<H> {
    fn drop(&mut self) {
        if self.is_active() {
            self.end();
        }
    }
}
