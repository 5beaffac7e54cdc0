//! pick-element for the browser
//!
//! A DOM implementation of the picking host and the `Layer` class exported
//! to JavaScript:
//!
//! ```js
//! const layer = new Layer({ selector: 'body', onSelectElement: els => console.log(els) })
//! layer.start()
//! // ... press and hold, Enter to confirm, Backspace to cancel ...
//! const picked = layer.end()
//! ```

pub mod press;
pub mod style;

#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
mod layer;

#[cfg(target_arch = "wasm32")]
pub use dom::DomHost;

#[cfg(target_arch = "wasm32")]
pub use layer::Layer;

/// Install the panic hook and console logger.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    // The page may have initialised a logger already.
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::debug!("pick-element logger ready");
    }
}
