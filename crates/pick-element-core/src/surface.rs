//! Capture surface manager.
//!
//! The surface is a translucent layer appended to the target root. It
//! receives every press, so hit testing has to look through it.

use crate::config::OverlayStyle;
use crate::error::PickResult;
use crate::geometry::{is_drawable, to_surface_space};
use crate::host::{Host, SurfaceSpec};
use kurbo::{Point, Rect, Vec2};

/// Id prefix of surface elements.
pub const SURFACE_ID_PREFIX: &str = "__layer__";

/// Translation that moves the surface out of the hit-testing path.
pub const HIDDEN_OFFSET: Vec2 = Vec2::new(-100_000.0, 0.0);

/// An overlay surface mounted on the page.
pub struct CaptureSurface<H: Host> {
    handle: H::Surface,
    id: String,
}

impl<H: Host> CaptureSurface<H> {
    /// Build a surface over `target_box` and append it as the last child of `root`.
    pub fn create(host: &H, root: &H::Element, target_box: Rect, style: &OverlayStyle) -> PickResult<Self> {
        let id = format!("{}-{}", SURFACE_ID_PREFIX, uuid::Uuid::new_v4());
        let spec = SurfaceSpec {
            id: id.clone(),
            rect: target_box,
            style: style.clone(),
        };
        let handle = host.create_surface(root, &spec)?;
        log::debug!("Mounted capture surface {} ({}x{})", id, target_box.width(), target_box.height());
        Ok(Self { handle, id })
    }

    /// Remove the surface from the page. Safe to call repeatedly.
    pub fn destroy(&self, host: &H) {
        if host.is_surface_attached(&self.handle) {
            host.remove_surface(&self.handle);
            log::debug!("Removed capture surface {}", self.id);
        }
    }

    /// Whether the surface is still mounted.
    pub fn is_live(&self, host: &H) -> bool {
        host.is_surface_attached(&self.handle)
    }

    pub fn handle(&self) -> &H::Surface {
        &self.handle
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Replace any previous stroke with a border around `element_box`.
    ///
    /// Degenerate boxes (detached elements, NaN geometry) clear the surface
    /// without drawing.
    pub fn draw_border(&self, host: &H, element_box: Rect, color: &str) -> PickResult<()> {
        host.clear_surface(&self.handle);
        if !is_drawable(element_box) {
            log::debug!("Skipping border for degenerate box {:?}", element_box);
            return Ok(());
        }
        let rect = to_surface_space(element_box, host.scroll_offset());
        host.stroke_rect(&self.handle, rect, color)
    }

    /// Erase all strokes.
    pub fn clear(&self, host: &H) {
        host.clear_surface(&self.handle);
    }

    /// Move the surface out of the hit-testing path without unmounting it.
    ///
    /// Not re-entrant: every `hide` must be followed by [`restore`] before
    /// the next one.
    ///
    /// [`restore`]: CaptureSurface::restore
    pub fn hide(&self, host: &H) {
        host.set_surface_offset(&self.handle, HIDDEN_OFFSET);
    }

    pub fn restore(&self, host: &H) {
        host.set_surface_offset(&self.handle, Vec2::ZERO);
    }

    /// Topmost page element at `point`, ignoring the surface itself.
    ///
    /// Uses the host's hit stack when available. Otherwise the surface is
    /// moved aside, queried through and restored within this call.
    pub fn element_beneath(&self, host: &H, point: Point) -> Option<H::Element> {
        if let Some(stack) = host.elements_at_point(point) {
            return stack.into_iter().find(|e| !host.is_surface(&self.handle, e));
        }

        self.hide(host);
        let hit = host.element_at_point(point);
        self.restore(host);

        hit.filter(|e| !host.is_surface(&self.handle, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::memory::MemoryHost;
    use kurbo::Size;

    fn setup() -> (MemoryHost, CaptureSurface<MemoryHost>) {
        let host = MemoryHost::new(Size::new(800.0, 600.0));
        let body = host.body();
        let surface = CaptureSurface::create(&host, &body, host.viewport(), &OverlayStyle::default()).unwrap();
        (host, surface)
    }

    #[test]
    fn test_create_appends_last_child() {
        let host = MemoryHost::new(Size::new(800.0, 600.0));
        let body = host.body();
        host.add_element(body, "div", Rect::new(0.0, 0.0, 100.0, 100.0));
        let surface = CaptureSurface::create(&host, &body, host.viewport(), &OverlayStyle::default()).unwrap();

        assert_eq!(host.children(body).last(), Some(surface.handle()));
        assert!(surface.id().starts_with(SURFACE_ID_PREFIX));
        assert!(surface.is_live(&host));
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let (host, surface) = setup();
        surface.destroy(&host);
        assert!(!surface.is_live(&host));
        surface.destroy(&host);
        assert!(!surface.is_live(&host));
        assert!(host.children(host.body()).is_empty());
    }

    #[test]
    fn test_draw_border_clears_previous_stroke() {
        let (host, surface) = setup();
        host.set_scroll(Vec2::new(40.0, 100.0));

        surface.draw_border(&host, Rect::new(10.0, 10.0, 50.0, 50.0), "orange").unwrap();
        surface.draw_border(&host, Rect::new(20.0, 30.0, 60.0, 70.0), "red").unwrap();

        let strokes = host.strokes(surface.handle());
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].0, Rect::new(20.0, 130.0, 60.0, 170.0));
        assert_eq!(strokes[0].1, "red");
    }

    #[test]
    fn test_draw_border_skips_degenerate_box() {
        let (host, surface) = setup();
        surface.draw_border(&host, Rect::new(10.0, 10.0, 50.0, 50.0), "orange").unwrap();
        surface.draw_border(&host, Rect::ZERO, "orange").unwrap();
        assert!(host.strokes(surface.handle()).is_empty());
    }

    #[test]
    fn test_element_beneath_with_hit_stack() {
        let (host, surface) = setup();
        let div = host.add_element(host.body(), "div", Rect::new(0.0, 0.0, 200.0, 200.0));
        // The surface was created first, move it back on top.
        host.raise(*surface.handle());

        assert_eq!(host.element_at_point(Point::new(50.0, 50.0)), Some(*surface.handle()));
        assert_eq!(surface.element_beneath(&host, Point::new(50.0, 50.0)), Some(div));
    }

    #[test]
    fn test_element_beneath_by_hiding() {
        let (host, surface) = setup();
        host.set_hit_stack_supported(false);
        let div = host.add_element(host.body(), "div", Rect::new(0.0, 0.0, 200.0, 200.0));
        host.raise(*surface.handle());

        assert_eq!(surface.element_beneath(&host, Point::new(50.0, 50.0)), Some(div));
        // Restored afterwards.
        assert_eq!(host.element_at_point(Point::new(50.0, 50.0)), Some(*surface.handle()));
        assert_eq!(host.surface_offset(surface.handle()), Vec2::ZERO);
    }

    #[test]
    fn test_element_beneath_outside_viewport() {
        let (host, surface) = setup();
        assert_eq!(surface.element_beneath(&host, Point::new(-10.0, 5000.0)), None);
    }
}
