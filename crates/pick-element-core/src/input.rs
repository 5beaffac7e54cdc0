//! Input classification for touch and pointer platforms.

use crate::error::{PickError, PickResult};
use kurbo::Point;

/// Platform-neutral view of a press-start event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPress {
    /// The event's own client coordinates (pointer events).
    pub position: Point,
    /// Client coordinates of the active touch points (touch events).
    pub touches: Vec<Point>,
}

impl RawPress {
    /// A mouse/pointer press at `position`.
    pub fn pointer(position: Point) -> Self {
        Self {
            position,
            touches: Vec::new(),
        }
    }

    /// A touch press with the given active touch points.
    pub fn touch(touches: Vec<Point>) -> Self {
        Self {
            position: Point::ZERO,
            touches,
        }
    }
}

/// Press-to-position strategy, chosen once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStrategy {
    Touch,
    Pointer,
}

impl InputStrategy {
    /// Pick the strategy from the platform capability probe.
    pub fn detect(platform_is_touch: bool) -> Self {
        if platform_is_touch {
            InputStrategy::Touch
        } else {
            InputStrategy::Pointer
        }
    }

    /// Name of the press-start event to listen for.
    pub fn press_event_name(self) -> &'static str {
        match self {
            InputStrategy::Touch => "touchstart",
            InputStrategy::Pointer => "mousedown",
        }
    }

    /// Viewport coordinate of a press.
    ///
    /// Touch presses read the first active touch point and fail with
    /// [`PickError::NoActiveTouch`] when there is none.
    pub fn extract_position(self, press: &RawPress) -> PickResult<Point> {
        match self {
            InputStrategy::Touch => press.touches.first().copied().ok_or(PickError::NoActiveTouch),
            InputStrategy::Pointer => Ok(press.position),
        }
    }
}

/// User-agent fragments of phones and tablets.
const MOBILE_MARKERS: &[&str] = &[
    "iphone",
    "ipod",
    "ipad",
    "android",
    "windows phone",
    "iemobile",
    "blackberry",
    "bb10",
    "opera mini",
    "kindle",
    "silk/",
    "mobile",
];

/// Classify a user agent string as a touch-first device.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_MARKERS.iter().any(|marker| ua.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(InputStrategy::detect(true).press_event_name(), "touchstart");
        assert_eq!(InputStrategy::detect(false).press_event_name(), "mousedown");
    }

    #[test]
    fn test_pointer_position() {
        let press = RawPress::pointer(Point::new(12.0, 34.0));
        let pos = InputStrategy::Pointer.extract_position(&press).unwrap();
        assert_eq!(pos, Point::new(12.0, 34.0));
    }

    #[test]
    fn test_touch_uses_first_touch() {
        let press = RawPress::touch(vec![Point::new(5.0, 6.0), Point::new(50.0, 60.0)]);
        let pos = InputStrategy::Touch.extract_position(&press).unwrap();
        assert_eq!(pos, Point::new(5.0, 6.0));
    }

    #[test]
    fn test_touch_without_touches() {
        let press = RawPress::touch(Vec::new());
        let result = InputStrategy::Touch.extract_position(&press);
        assert!(matches!(result, Err(PickError::NoActiveTouch)));
    }

    #[test]
    fn test_mobile_user_agents() {
        assert!(is_mobile_user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15"
        ));
        assert!(is_mobile_user_agent(
            "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/120.0 Mobile Safari/537.36"
        ));
        assert!(!is_mobile_user_agent(
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
        ));
    }
}
