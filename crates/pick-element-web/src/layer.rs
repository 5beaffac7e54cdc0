//! The `Layer` class exported to JavaScript.

use crate::dom::DomHost;
use crate::press::{pointer_press, touch_press};
use crate::style::settle_delay_ms;
use js_sys::{Array, Function, Reflect};
use pick_element_core::{KeyOutcome, PickerConfig, PressToken, RawPress, Session};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, KeyboardEvent, MouseEvent, TouchEvent};

type SharedSession = Rc<RefCell<Option<Session<DomHost>>>>;

/// Convert a press-start DOM event into the picker's neutral form.
fn raw_press(event: &Event) -> RawPress {
    if let Some(touch) = event.dyn_ref::<TouchEvent>() {
        let list = touch.touches();
        return touch_press(
            (0..list.length())
                .filter_map(|i| list.get(i))
                .map(|t| (t.client_x(), t.client_y())),
        );
    }
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        return pointer_press(mouse.client_x(), mouse.client_y());
    }
    RawPress::default()
}

fn to_array(elements: &[Element]) -> Array {
    elements.iter().collect()
}

/// Hand the cumulative selection to the page's `onSelectElement`.
///
/// Called with no session borrow held, so the callback may end the layer.
fn notify(callback: Option<&Function>, picked: &[Element]) {
    if let Some(callback) = callback {
        if let Err(e) = callback.call1(&JsValue::NULL, &to_array(picked)) {
            log::warn!("onSelectElement threw: {:?}", e);
        }
    }
}

/// Pending settle timeout for the most recent press.
#[derive(Default)]
struct SettleTimer {
    handle: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl SettleTimer {
    /// Schedule the hit test for `token`, replacing any pending one.
    fn schedule(&self, session: &SharedSession, token: PressToken) {
        self.cancel();
        let Some(window) = web_sys::window() else {
            return;
        };

        let session = session.clone();
        let callback = Closure::wrap(Box::new(move || {
            let mut slot = session.borrow_mut();
            if let Some(session) = slot.as_mut() {
                if let Some(element) = session.handle_settled(token) {
                    log::debug!("Previewing <{}>", element.tag_name().to_lowercase());
                }
            }
        }) as Box<dyn FnMut()>);

        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            settle_delay_ms(),
        ) {
            Ok(handle) => {
                self.handle.set(Some(handle));
                *self.callback.borrow_mut() = Some(callback);
            }
            Err(e) => log::warn!("Failed to schedule hit test: {:?}", e),
        }
    }

    fn cancel(&self) {
        if let Some(handle) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }
}

/// DOM listeners for one session. Dropping them unbinds them.
struct Listeners {
    surface: EventTarget,
    press_event: &'static str,
    document: EventTarget,
    on_press: Closure<dyn FnMut(Event)>,
    on_keyup: Closure<dyn FnMut(Event)>,
}

impl Listeners {
    fn bind(
        surface: EventTarget,
        press_event: &'static str,
        document: EventTarget,
        session: &SharedSession,
        timer: &Rc<SettleTimer>,
        on_select: Option<Function>,
    ) -> Result<Self, JsValue> {
        let on_press = {
            let session = session.clone();
            let timer = timer.clone();
            Closure::wrap(Box::new(move |event: Event| {
                let press = raw_press(&event);
                let token = {
                    let mut slot = session.borrow_mut();
                    slot.as_mut().and_then(|s| s.handle_press(&press))
                };
                if let Some(token) = token {
                    timer.schedule(&session, token);
                }
            }) as Box<dyn FnMut(Event)>)
        };

        let on_keyup = {
            let session = session.clone();
            Closure::wrap(Box::new(move |event: Event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                    return;
                };
                let picked = {
                    let mut slot = session.borrow_mut();
                    let Some(session) = slot.as_mut() else {
                        return;
                    };
                    match session.handle_key(&key) {
                        KeyOutcome::Confirmed => session.selection().to_vec(),
                        KeyOutcome::Cancelled | KeyOutcome::Ignored => return,
                    }
                };
                notify(on_select.as_ref(), &picked);
            }) as Box<dyn FnMut(Event)>)
        };

        surface.add_event_listener_with_callback(press_event, on_press.as_ref().unchecked_ref())?;
        let listeners = Self {
            surface,
            press_event,
            document,
            on_press,
            on_keyup,
        };
        listeners
            .document
            .add_event_listener_with_callback("keyup", listeners.on_keyup.as_ref().unchecked_ref())?;
        Ok(listeners)
    }

    fn unbind(&self) {
        if let Err(e) = self
            .surface
            .remove_event_listener_with_callback(self.press_event, self.on_press.as_ref().unchecked_ref())
        {
            log::warn!("Failed to unbind {}: {:?}", self.press_event, e);
        }
        if let Err(e) = self
            .document
            .remove_event_listener_with_callback("keyup", self.on_keyup.as_ref().unchecked_ref())
        {
            log::warn!("Failed to unbind keyup: {:?}", e);
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.unbind();
    }
}

/// Element picker overlay.
///
/// Options: `selector`, `selectedStyle`, `layerWrapperStyle`, `borderColor`,
/// `keys` and the `onSelectElement(elements)` callback.
#[wasm_bindgen]
pub struct Layer {
    config: PickerConfig,
    on_select: Option<Function>,
    session: SharedSession,
    timer: Rc<SettleTimer>,
    listeners: RefCell<Option<Listeners>>,
}

#[wasm_bindgen]
impl Layer {
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<Layer, JsError> {
        let (config, on_select) = if options.is_undefined() || options.is_null() {
            (PickerConfig::default(), None)
        } else {
            let config: PickerConfig = serde_wasm_bindgen::from_value(options.clone())
                .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))?;
            let on_select = Reflect::get(&options, &JsValue::from_str("onSelectElement"))
                .ok()
                .and_then(|f| f.dyn_into::<Function>().ok());
            (config, on_select)
        };

        Ok(Layer {
            config,
            on_select,
            session: Rc::new(RefCell::new(None)),
            timer: Rc::new(SettleTimer::default()),
            listeners: RefCell::new(None),
        })
    }

    /// Mount the overlay and start listening.
    pub fn start(&self) -> Result<(), JsError> {
        if self.is_active() {
            return Err(JsError::new("Layer already started"));
        }

        let host = Rc::new(DomHost::new()?);
        let document: EventTarget = host.document().clone().unchecked_into();
        let session = Session::start(host, self.config.clone(), None)?;
        let surface: EventTarget = session.surface().handle().clone().unchecked_into();
        let press_event = session.press_event_name();
        *self.session.borrow_mut() = Some(session);

        match Listeners::bind(
            surface,
            press_event,
            document,
            &self.session,
            &self.timer,
            self.on_select.clone(),
        ) {
            Ok(listeners) => {
                *self.listeners.borrow_mut() = Some(listeners);
                Ok(())
            }
            Err(e) => {
                if let Some(session) = self.session.borrow_mut().as_mut() {
                    session.end();
                }
                Err(JsError::new(&format!("Failed to bind listeners: {:?}", e)))
            }
        }
    }

    /// Tear down the overlay and return the picked elements.
    ///
    /// Calling it again returns the same elements.
    pub fn end(&self) -> Array {
        self.timer.cancel();
        self.listeners.borrow_mut().take();
        let picked = self
            .session
            .borrow_mut()
            .as_mut()
            .map(Session::end)
            .unwrap_or_default();
        to_array(&picked)
    }

    /// Elements confirmed so far.
    #[wasm_bindgen(getter)]
    pub fn selection(&self) -> Array {
        match self.session.borrow().as_ref() {
            Some(session) => to_array(session.selection()),
            None => Array::new(),
        }
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.session.borrow().as_ref().is_some_and(Session::is_active)
    }
}
