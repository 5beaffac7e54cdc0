//! Host environment abstraction.
//!
//! Everything the picker needs from the page goes through [`Host`]:
//! tree queries, style reads and writes, and the drawable capture surface.
//! Hosts are single-threaded, so every method takes `&self` and
//! implementations use interior mutability where they need it.

use crate::config::OverlayStyle;
use crate::error::PickResult;
use crate::geometry::Geometry;
use kurbo::{Rect, Vec2};
use std::fmt::Debug;

/// Everything a host needs to build a capture surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSpec {
    /// Element id given to the surface.
    pub id: String,
    /// Box of the target root; the surface drawing buffer gets its size.
    pub rect: Rect,
    pub style: OverlayStyle,
}

/// Host page collaborators consumed by a picking session.
pub trait Host: Geometry {
    /// Handle to a drawable overlay surface.
    type Surface: Clone + Debug;

    /// Resolve a selector to its first matching element.
    ///
    /// `Ok(None)` when nothing matches; an error when the selector is malformed.
    fn query_selector(&self, selector: &str) -> PickResult<Option<Self::Element>>;

    /// Platform capability probe: does input arrive as touches?
    fn is_touch_platform(&self) -> bool;

    /// Computed outline of an element.
    fn outline(&self, element: &Self::Element) -> String;

    /// Set the inline outline of an element.
    fn set_outline(&self, element: &Self::Element, value: &str);

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);

    fn remove_attribute(&self, element: &Self::Element, name: &str);

    /// Computed overflow of the page body.
    fn page_overflow(&self) -> String;

    /// Set the inline overflow of the page body.
    fn set_page_overflow(&self, value: &str);

    /// Create a surface and append it as the last child of `parent`.
    fn create_surface(&self, parent: &Self::Element, spec: &SurfaceSpec) -> PickResult<Self::Surface>;

    /// Detach a surface from its parent. No-op when already detached.
    fn remove_surface(&self, surface: &Self::Surface);

    fn is_surface_attached(&self, surface: &Self::Surface) -> bool;

    /// Whether `element` is the surface itself.
    fn is_surface(&self, surface: &Self::Surface, element: &Self::Element) -> bool;

    /// Translate the surface by `offset` (zero puts it back in place).
    fn set_surface_offset(&self, surface: &Self::Surface, offset: Vec2);

    /// Erase every stroke on the surface.
    fn clear_surface(&self, surface: &Self::Surface);

    /// Stroke a closed rectangle in surface space.
    fn stroke_rect(&self, surface: &Self::Surface, rect: Rect, color: &str) -> PickResult<()>;
}
