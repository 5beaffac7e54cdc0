//! Page scroll lock.

use crate::host::Host;

/// Overflow value that keeps the page from scrolling under the overlay.
pub const LOCKED_OVERFLOW: &str = "hidden";

/// Saved page overflow, restored exactly once.
#[derive(Debug, Default)]
pub struct ScrollLock {
    saved: Option<String>,
}

impl ScrollLock {
    /// Record the current page overflow and lock scrolling.
    pub fn engage<H: Host>(host: &H) -> Self {
        let saved = host.page_overflow();
        host.set_page_overflow(LOCKED_OVERFLOW);
        log::debug!("Page overflow locked (was {:?})", saved);
        Self { saved: Some(saved) }
    }

    pub fn is_engaged(&self) -> bool {
        self.saved.is_some()
    }

    /// Restore the recorded overflow. Later calls do nothing.
    pub fn release<H: Host>(&mut self, host: &H) {
        if let Some(saved) = self.saved.take() {
            host.set_page_overflow(&saved);
        }
    }
}
