//! CSS helpers shared by the DOM host.

use kurbo::Vec2;
use pick_element_core::PRESS_SETTLE_DELAY;

/// CSS `transform` value moving an element by `offset`.
pub fn translate(offset: Vec2) -> String {
    if offset == Vec2::ZERO {
        "none".to_string()
    } else {
        format!("translate({}px, {}px)", offset.x, offset.y)
    }
}

/// Settle delay in the unit `setTimeout` expects.
pub fn settle_delay_ms() -> i32 {
    i32::try_from(PRESS_SETTLE_DELAY.as_millis()).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        assert_eq!(translate(Vec2::ZERO), "none");
        assert_eq!(translate(Vec2::new(-100000.0, 0.0)), "translate(-100000px, 0px)");
    }

    #[test]
    fn test_settle_delay() {
        assert_eq!(settle_delay_ms(), 200);
    }
}
