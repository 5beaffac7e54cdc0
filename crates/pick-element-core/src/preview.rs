//! The transient highlight on the element under the pointer.

use crate::host::Host;
use std::rc::Rc;

/// Attribute holding the element's original outline while it is previewed.
pub const OUTLINE_MARKER: &str = "data-soutline";

/// A highlighted element awaiting confirm or cancel.
///
/// The page owns the element; the preview only annotates it. Dropping a
/// preview reverts the annotation, while [`Preview::commit`] keeps the
/// highlight and removes only the marker.
pub struct Preview<H: Host> {
    host: Rc<H>,
    element: H::Element,
    saved_outline: String,
    committed: bool,
}

impl<H: Host> Preview<H> {
    /// Save the element's outline and apply `highlight` to it.
    pub fn acquire(host: Rc<H>, element: H::Element, highlight: &str) -> Self {
        let saved_outline = host.outline(&element);
        host.set_attribute(&element, OUTLINE_MARKER, &saved_outline);
        host.set_outline(&element, highlight);
        Self {
            host,
            element,
            saved_outline,
            committed: false,
        }
    }

    pub fn element(&self) -> &H::Element {
        &self.element
    }

    /// Outline the element had before it was highlighted.
    pub fn saved_outline(&self) -> &str {
        &self.saved_outline
    }

    /// Confirm the pick: the highlight stays, the marker goes.
    pub fn commit(mut self) -> H::Element {
        self.host.remove_attribute(&self.element, OUTLINE_MARKER);
        self.committed = true;
        self.element.clone()
    }
}

impl<H: Host> Drop for Preview<H> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        self.host.set_outline(&self.element, &self.saved_outline);
        self.host.remove_attribute(&self.element, OUTLINE_MARKER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;
    use kurbo::{Rect, Size};

    fn setup() -> (Rc<MemoryHost>, crate::memory::NodeId) {
        let host = Rc::new(MemoryHost::new(Size::new(800.0, 600.0)));
        let div = host.add_element(host.body(), "div", Rect::new(0.0, 0.0, 100.0, 100.0));
        host.set_outline(&div, "1px dashed blue");
        (host, div)
    }

    #[test]
    fn test_acquire_highlights_and_marks() {
        let (host, div) = setup();
        let preview = Preview::acquire(host.clone(), div, "2px solid orange");

        assert_eq!(preview.saved_outline(), "1px dashed blue");
        assert_eq!(host.outline(&div), "2px solid orange");
        assert_eq!(host.attribute(div, OUTLINE_MARKER).as_deref(), Some("1px dashed blue"));
    }

    #[test]
    fn test_drop_reverts() {
        let (host, div) = setup();
        drop(Preview::acquire(host.clone(), div, "2px solid orange"));

        assert_eq!(host.outline(&div), "1px dashed blue");
        assert_eq!(host.attribute(div, OUTLINE_MARKER), None);
    }

    #[test]
    fn test_commit_keeps_highlight() {
        let (host, div) = setup();
        let element = Preview::acquire(host.clone(), div, "2px solid orange").commit();

        assert_eq!(element, div);
        assert_eq!(host.outline(&div), "2px solid orange");
        assert_eq!(host.attribute(div, OUTLINE_MARKER), None);
    }
}
