//! Conversion from DOM client coordinates to [`RawPress`].

use kurbo::Point;
use pick_element_core::RawPress;

fn client_point(x: i32, y: i32) -> Point {
    Point::new(f64::from(x), f64::from(y))
}

/// A `mousedown` at `clientX`/`clientY`.
pub fn pointer_press(x: i32, y: i32) -> RawPress {
    RawPress::pointer(client_point(x, y))
}

/// A `touchstart` with its `touches` list, in list order.
pub fn touch_press(touches: impl IntoIterator<Item = (i32, i32)>) -> RawPress {
    RawPress::touch(touches.into_iter().map(|(x, y)| client_point(x, y)).collect())
}
