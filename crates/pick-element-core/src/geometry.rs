//! Geometry provider: element boxes, hit testing and scroll offset.

use crate::error::PickResult;
use kurbo::{Point, Rect, Vec2};
use std::fmt::Debug;

/// Host geometry primitives.
///
/// All coordinates are viewport-relative CSS pixels.
pub trait Geometry {
    /// A page element. Cloning must be cheap and must not copy the element.
    type Element: Clone + PartialEq + Debug;

    /// Viewport-relative bounding box.
    ///
    /// Fails with [`PickError::InvalidTarget`](crate::PickError::InvalidTarget)
    /// when the element is not attached to the document.
    fn bounding_box(&self, element: &Self::Element) -> PickResult<Rect>;

    /// Topmost element at a viewport point, or `None` outside the viewport.
    fn element_at_point(&self, point: Point) -> Option<Self::Element>;

    /// Every element at a viewport point, topmost first.
    ///
    /// Hosts that cannot enumerate the stack return `None`; hit testing then
    /// falls back to hiding the capture surface around [`element_at_point`].
    ///
    /// [`element_at_point`]: Geometry::element_at_point
    fn elements_at_point(&self, _point: Point) -> Option<Vec<Self::Element>> {
        None
    }

    /// Current scroll position of the document.
    fn scroll_offset(&self) -> Vec2;
}

/// Whether a box can be stroked: finite and with a non-zero area.
pub fn is_drawable(rect: Rect) -> bool {
    rect.is_finite() && rect.width() > 0.0 && rect.height() > 0.0
}

/// Translate a viewport box into capture surface space.
///
/// Only the vertical axis is adjusted so the border tracks page content.
pub fn to_surface_space(rect: Rect, scroll: Vec2) -> Rect {
    rect + Vec2::new(0.0, scroll.y)
}
