//! In-memory host implementation.
//!
//! Models a small page: a tree of boxes painted in insertion order, a
//! viewport, scroll offset, styles and surface strokes. Used for testing and
//! for driving the picker without a browser.

use crate::error::{PickError, PickResult};
use crate::geometry::Geometry;
use crate::host::{Host, SurfaceSpec};
use kurbo::{Point, Rect, Size, Vec2};
use std::cell::RefCell;
use std::collections::HashMap;

/// Handle to a node of a [`MemoryHost`] page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    rect: Rect,
    parent: Option<NodeId>,
    attached: bool,
    outline: String,
    attributes: HashMap<String, String>,
    style: Vec<(String, String)>,
    offset: Vec2,
    strokes: Vec<(Rect, String)>,
    is_surface: bool,
}

impl Node {
    fn new(tag: &str, id: Option<String>, rect: Rect, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_string(),
            id,
            rect,
            parent,
            attached: true,
            outline: "none".to_string(),
            attributes: HashMap::new(),
            style: Vec::new(),
            offset: Vec2::ZERO,
            strokes: Vec::new(),
            is_surface: false,
        }
    }
}

#[derive(Debug)]
struct Page {
    nodes: Vec<Node>,
    /// Bottom to top.
    paint_order: Vec<NodeId>,
    viewport: Size,
    scroll: Vec2,
    overflow: String,
    touch: bool,
    hit_stack_supported: bool,
    surface_failure: Option<String>,
}

impl Page {
    fn is_connected(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            if !node.attached {
                return false;
            }
            current = node.parent;
        }
        true
    }

    fn hit_stack(&self, point: Point) -> Vec<NodeId> {
        let viewport = self.viewport.to_rect();
        if !viewport.contains(point) {
            return Vec::new();
        }
        self.paint_order
            .iter()
            .rev()
            .copied()
            .filter(|&id| self.is_connected(id))
            .filter(|&id| {
                let node = &self.nodes[id.0];
                (node.rect + node.offset).contains(point)
            })
            .collect()
    }
}

/// A page held in memory.
#[derive(Debug)]
pub struct MemoryHost {
    page: RefCell<Page>,
}

impl MemoryHost {
    /// Create a page whose body fills a viewport of `viewport` size.
    pub fn new(viewport: Size) -> Self {
        let body = Node::new("body", None, viewport.to_rect(), None);
        Self {
            page: RefCell::new(Page {
                nodes: vec![body],
                paint_order: vec![NodeId(0)],
                viewport,
                scroll: Vec2::ZERO,
                overflow: "visible".to_string(),
                touch: false,
                hit_stack_supported: true,
                surface_failure: None,
            }),
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    pub fn viewport(&self) -> Rect {
        self.page.borrow().viewport.to_rect()
    }

    /// Append an element painted above everything added so far.
    ///
    /// `name` is a tag name, or `#id` for a `div` with that id.
    pub fn add_element(&self, parent: NodeId, name: &str, rect: Rect) -> NodeId {
        let (tag, id) = match name.strip_prefix('#') {
            Some(id) => ("div", Some(id.to_string())),
            None => (name, None),
        };
        self.push_node(Node::new(tag, id, rect, Some(parent)))
    }

    fn push_node(&self, node: Node) -> NodeId {
        let mut page = self.page.borrow_mut();
        let id = NodeId(page.nodes.len());
        page.nodes.push(node);
        page.paint_order.push(id);
        id
    }

    /// Detach a node (and with it, its subtree) from the document.
    pub fn detach(&self, id: NodeId) {
        self.page.borrow_mut().nodes[id.0].attached = false;
    }

    /// Paint a node above every other node.
    pub fn raise(&self, id: NodeId) {
        let mut page = self.page.borrow_mut();
        page.paint_order.retain(|&n| n != id);
        page.paint_order.push(id);
    }

    /// Attached children of `parent`, in child order.
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        let page = self.page.borrow();
        page.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent == Some(parent) && node.attached)
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// Number of surfaces currently attached to the document.
    pub fn surface_count(&self) -> usize {
        let page = self.page.borrow();
        (0..page.nodes.len())
            .filter(|&i| page.nodes[i].is_surface && page.is_connected(NodeId(i)))
            .count()
    }

    pub fn set_scroll(&self, scroll: Vec2) {
        self.page.borrow_mut().scroll = scroll;
    }

    pub fn set_touch_platform(&self, touch: bool) {
        self.page.borrow_mut().touch = touch;
    }

    /// Toggle support for [`Geometry::elements_at_point`].
    pub fn set_hit_stack_supported(&self, supported: bool) {
        self.page.borrow_mut().hit_stack_supported = supported;
    }

    /// Make every following surface creation fail with `reason`.
    pub fn fail_surface_creation(&self, reason: &str) {
        self.page.borrow_mut().surface_failure = Some(reason.to_string());
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.page.borrow().nodes[id.0].attributes.get(name).cloned()
    }

    /// Strokes currently on a surface: rectangle and color.
    pub fn strokes(&self, surface: &NodeId) -> Vec<(Rect, String)> {
        self.page.borrow().nodes[surface.0].strokes.clone()
    }

    /// CSS declarations applied to a surface.
    pub fn surface_style(&self, surface: &NodeId) -> Vec<(String, String)> {
        self.page.borrow().nodes[surface.0].style.clone()
    }

    pub fn surface_offset(&self, surface: &NodeId) -> Vec2 {
        self.page.borrow().nodes[surface.0].offset
    }
}

impl Geometry for MemoryHost {
    type Element = NodeId;

    fn bounding_box(&self, element: &NodeId) -> PickResult<Rect> {
        let page = self.page.borrow();
        if !page.is_connected(*element) {
            return Err(PickError::InvalidTarget);
        }
        let node = &page.nodes[element.0];
        Ok(node.rect + node.offset)
    }

    fn element_at_point(&self, point: Point) -> Option<NodeId> {
        self.page.borrow().hit_stack(point).first().copied()
    }

    fn elements_at_point(&self, point: Point) -> Option<Vec<NodeId>> {
        let page = self.page.borrow();
        page.hit_stack_supported.then(|| page.hit_stack(point))
    }

    fn scroll_offset(&self) -> Vec2 {
        self.page.borrow().scroll
    }
}

impl Host for MemoryHost {
    type Surface = NodeId;

    fn query_selector(&self, selector: &str) -> PickResult<Option<NodeId>> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(PickError::InvalidSelector(selector.to_string()));
        }
        let page = self.page.borrow();
        let found = (0..page.nodes.len()).map(NodeId).find(|&id| {
            let node = &page.nodes[id.0];
            let matches = match selector.strip_prefix('#') {
                Some(wanted) => node.id.as_deref() == Some(wanted),
                None => node.tag == selector,
            };
            matches && page.is_connected(id)
        });
        Ok(found)
    }

    fn is_touch_platform(&self) -> bool {
        self.page.borrow().touch
    }

    fn outline(&self, element: &NodeId) -> String {
        self.page.borrow().nodes[element.0].outline.clone()
    }

    fn set_outline(&self, element: &NodeId, value: &str) {
        self.page.borrow_mut().nodes[element.0].outline = value.to_string();
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) {
        self.page.borrow_mut().nodes[element.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, element: &NodeId, name: &str) {
        self.page.borrow_mut().nodes[element.0].attributes.remove(name);
    }

    fn page_overflow(&self) -> String {
        self.page.borrow().overflow.clone()
    }

    fn set_page_overflow(&self, value: &str) {
        self.page.borrow_mut().overflow = value.to_string();
    }

    fn create_surface(&self, parent: &NodeId, spec: &SurfaceSpec) -> PickResult<NodeId> {
        if let Some(reason) = self.page.borrow().surface_failure.clone() {
            return Err(PickError::SurfaceUnavailable(reason));
        }
        let mut node = Node::new("canvas", Some(spec.id.clone()), spec.rect, Some(*parent));
        node.is_surface = true;
        node.style = spec
            .style
            .css_declarations()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        Ok(self.push_node(node))
    }

    fn remove_surface(&self, surface: &NodeId) {
        self.page.borrow_mut().nodes[surface.0].attached = false;
    }

    fn is_surface_attached(&self, surface: &NodeId) -> bool {
        self.page.borrow().is_connected(*surface)
    }

    fn is_surface(&self, surface: &NodeId, element: &NodeId) -> bool {
        surface == element
    }

    fn set_surface_offset(&self, surface: &NodeId, offset: Vec2) {
        self.page.borrow_mut().nodes[surface.0].offset = offset;
    }

    fn clear_surface(&self, surface: &NodeId) {
        self.page.borrow_mut().nodes[surface.0].strokes.clear();
    }

    fn stroke_rect(&self, surface: &NodeId, rect: Rect, color: &str) -> PickResult<()> {
        let mut page = self.page.borrow_mut();
        if !page.is_connected(*surface) {
            return Err(PickError::SurfaceUnavailable("surface is detached".to_string()));
        }
        page.nodes[surface.0].strokes.push((rect, color.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayStyle;

    #[test]
    fn test_topmost_wins() {
        let host = MemoryHost::new(Size::new(800.0, 600.0));
        let outer = host.add_element(host.body(), "div", Rect::new(0.0, 0.0, 300.0, 300.0));
        let inner = host.add_element(outer, "span", Rect::new(10.0, 10.0, 50.0, 50.0));

        assert_eq!(host.element_at_point(Point::new(20.0, 20.0)), Some(inner));
        assert_eq!(host.element_at_point(Point::new(100.0, 100.0)), Some(outer));
        assert_eq!(host.element_at_point(Point::new(700.0, 500.0)), Some(host.body()));
        assert_eq!(host.element_at_point(Point::new(900.0, 100.0)), None);
    }

    #[test]
    fn test_detached_subtree() {
        let host = MemoryHost::new(Size::new(800.0, 600.0));
        let outer = host.add_element(host.body(), "div", Rect::new(0.0, 0.0, 300.0, 300.0));
        let inner = host.add_element(outer, "span", Rect::new(10.0, 10.0, 50.0, 50.0));
        host.detach(outer);

        assert!(matches!(host.bounding_box(&inner), Err(PickError::InvalidTarget)));
        assert_eq!(host.element_at_point(Point::new(20.0, 20.0)), Some(host.body()));
        assert_eq!(host.query_selector("span").unwrap(), None);
    }

    #[test]
    fn test_query_selector() {
        let host = MemoryHost::new(Size::new(800.0, 600.0));
        let app = host.add_element(host.body(), "#app", Rect::new(0.0, 0.0, 10.0, 10.0));

        assert_eq!(host.query_selector("body").unwrap(), Some(host.body()));
        assert_eq!(host.query_selector("#app").unwrap(), Some(app));
        assert_eq!(host.query_selector("#nope").unwrap(), None);
        assert!(host.query_selector("").is_err());
    }

    #[test]
    fn test_surface_style_applied() {
        let host = MemoryHost::new(Size::new(800.0, 600.0));
        let spec = SurfaceSpec {
            id: "__layer__-test".to_string(),
            rect: host.viewport(),
            style: OverlayStyle::default(),
        };
        let surface = host.create_surface(&host.body(), &spec).unwrap();

        let style = host.surface_style(&surface);
        assert!(style.contains(&("position".to_string(), "fixed".to_string())));
        assert_eq!(host.surface_count(), 1);

        host.remove_surface(&surface);
        assert!(host.stroke_rect(&surface, Rect::new(0.0, 0.0, 1.0, 1.0), "red").is_err());
    }
}
