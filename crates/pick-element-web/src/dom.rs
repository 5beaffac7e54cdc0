//! DOM host: the picker's view of a live browser page.

use crate::style;
use kurbo::{Point, Rect, Vec2};
use pick_element_core::{Geometry, Host, PickError, PickResult, SurfaceSpec, is_mobile_user_agent};
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, CssStyleDeclaration, Document, Element, HtmlCanvasElement, HtmlElement,
    SvgElement, Window,
};

/// Host backed by `window.document`.
pub struct DomHost {
    window: Window,
    document: Document,
}

impl DomHost {
    /// Bind to the current window and document.
    pub fn new() -> PickResult<Self> {
        let window = web_sys::window().ok_or_else(|| PickError::Host("No window object".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| PickError::Host("No document".to_string()))?;
        Ok(Self { window, document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Computed value of a CSS property, empty when unavailable.
    fn computed(&self, element: &Element, property: &str) -> String {
        self.window
            .get_computed_style(element)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value(property).ok())
            .unwrap_or_default()
    }

    /// Inline style of HTML and SVG elements.
    fn inline_style(element: &Element) -> Option<CssStyleDeclaration> {
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            Some(html.style())
        } else {
            element.dyn_ref::<SvgElement>().map(SvgElement::style)
        }
    }

    fn set_inline(element: &Element, property: &str, value: &str) {
        match Self::inline_style(element) {
            Some(style) => {
                if let Err(e) = style.set_property(property, value) {
                    log::warn!("Failed to set {}: {:?}", property, e);
                }
            }
            None => log::debug!("Element has no inline style; {} left unchanged", property),
        }
    }

    fn context_2d(canvas: &HtmlCanvasElement) -> PickResult<CanvasRenderingContext2d> {
        canvas
            .get_context("2d")
            .map_err(|e| PickError::SurfaceUnavailable(format!("{:?}", e)))?
            .ok_or_else(|| PickError::SurfaceUnavailable("2d context not supported".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PickError::SurfaceUnavailable("Unexpected context type".to_string()))
    }
}

impl Geometry for DomHost {
    type Element = Element;

    fn bounding_box(&self, element: &Element) -> PickResult<Rect> {
        if !element.is_connected() {
            return Err(PickError::InvalidTarget);
        }
        let r = element.get_bounding_client_rect();
        Ok(Rect::new(r.left(), r.top(), r.right(), r.bottom()))
    }

    fn element_at_point(&self, point: Point) -> Option<Element> {
        self.document.element_from_point(point.x as f32, point.y as f32)
    }

    fn elements_at_point(&self, point: Point) -> Option<Vec<Element>> {
        let stack = self.document.elements_from_point(point.x as f32, point.y as f32);
        Some(stack.iter().filter_map(|value| value.dyn_into::<Element>().ok()).collect())
    }

    fn scroll_offset(&self) -> Vec2 {
        match self.document.document_element() {
            Some(root) => Vec2::new(root.scroll_left() as f64, root.scroll_top() as f64),
            None => Vec2::ZERO,
        }
    }
}

impl Host for DomHost {
    type Surface = HtmlCanvasElement;

    fn query_selector(&self, selector: &str) -> PickResult<Option<Element>> {
        self.document
            .query_selector(selector)
            .map_err(|_| PickError::InvalidSelector(selector.to_string()))
    }

    fn is_touch_platform(&self) -> bool {
        self.window
            .navigator()
            .user_agent()
            .map(|ua| is_mobile_user_agent(&ua))
            .unwrap_or(false)
    }

    fn outline(&self, element: &Element) -> String {
        self.computed(element, "outline")
    }

    fn set_outline(&self, element: &Element, value: &str) {
        Self::set_inline(element, "outline", value);
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) {
        if let Err(e) = element.set_attribute(name, value) {
            log::warn!("Failed to set attribute {}: {:?}", name, e);
        }
    }

    fn remove_attribute(&self, element: &Element, name: &str) {
        if let Err(e) = element.remove_attribute(name) {
            log::warn!("Failed to remove attribute {}: {:?}", name, e);
        }
    }

    fn page_overflow(&self) -> String {
        match self.document.body() {
            Some(body) => self.computed(&body, "overflow"),
            None => String::new(),
        }
    }

    fn set_page_overflow(&self, value: &str) {
        if let Some(body) = self.document.body() {
            Self::set_inline(&body, "overflow", value);
        }
    }

    fn create_surface(&self, parent: &Element, spec: &SurfaceSpec) -> PickResult<HtmlCanvasElement> {
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(|e| PickError::SurfaceUnavailable(format!("{:?}", e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| PickError::SurfaceUnavailable("Created element is not a canvas".to_string()))?;

        canvas.set_id(&spec.id);
        canvas.set_width(spec.rect.width().max(0.0) as u32);
        canvas.set_height(spec.rect.height().max(0.0) as u32);

        let css = canvas.style();
        for (property, value) in spec.style.css_declarations() {
            css.set_property(property, &value)
                .map_err(|e| PickError::Host(format!("Failed to set {}: {:?}", property, e)))?;
        }

        // Fail before touching the page if the surface cannot be drawn on.
        Self::context_2d(&canvas)?;

        parent
            .append_child(&canvas)
            .map_err(|e| PickError::Host(format!("Failed to mount surface: {:?}", e)))?;
        Ok(canvas)
    }

    fn remove_surface(&self, surface: &HtmlCanvasElement) {
        if let Some(parent) = surface.parent_node() {
            if let Err(e) = parent.remove_child(surface) {
                log::warn!("Failed to remove surface: {:?}", e);
            }
        }
    }

    fn is_surface_attached(&self, surface: &HtmlCanvasElement) -> bool {
        surface.is_connected()
    }

    fn is_surface(&self, surface: &HtmlCanvasElement, element: &Element) -> bool {
        AsRef::<Element>::as_ref(surface) == element
    }

    fn set_surface_offset(&self, surface: &HtmlCanvasElement, offset: Vec2) {
        if let Err(e) = surface.style().set_property("transform", &style::translate(offset)) {
            log::warn!("Failed to move surface: {:?}", e);
        }
    }

    fn clear_surface(&self, surface: &HtmlCanvasElement) {
        match Self::context_2d(surface) {
            Ok(ctx) => {
                ctx.clear_rect(0.0, 0.0, surface.width() as f64, surface.height() as f64);
                ctx.begin_path();
            }
            Err(e) => log::warn!("Cannot clear surface: {}", e),
        }
    }

    fn stroke_rect(&self, surface: &HtmlCanvasElement, rect: Rect, color: &str) -> PickResult<()> {
        let ctx = Self::context_2d(surface)?;
        ctx.begin_path();
        ctx.set_stroke_style_str(color);
        ctx.stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
        Ok(())
    }
}
