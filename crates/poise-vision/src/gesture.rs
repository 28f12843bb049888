//! Hand gesture activity from hand visibility

use serde::{Deserialize, Serialize};

use crate::HandLandmarks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureType {
    None,
    Subtle,
    Expressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandGestureResult {
    pub left_visible: bool,
    pub right_visible: bool,
    pub gesture_type: GestureType,
    /// Gesture intensity [0.0 - 1.0]
    pub intensity: f32,
    pub confidence: f32,
}

impl HandGestureResult {
    pub fn from_visibility(left_visible: bool, right_visible: bool) -> Self {
        let (gesture_type, intensity, confidence) = match (left_visible, right_visible) {
            (false, false) => (GestureType::None, 0.0, 0.0),
            (true, true) => (GestureType::Expressive, 0.8, 0.7),
            _ => (GestureType::Subtle, 0.4, 0.6),
        };

        Self {
            left_visible,
            right_visible,
            gesture_type,
            intensity,
            confidence,
        }
    }
}

pub fn analyze_hands(hands: &HandLandmarks) -> HandGestureResult {
    HandGestureResult::from_visibility(hands.left_visible(), hands.right_visible())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn test_visibility_table() {
        let none = HandGestureResult::from_visibility(false, false);
        assert_eq!(none.gesture_type, GestureType::None);
        assert_eq!(none.intensity, 0.0);

        let one = HandGestureResult::from_visibility(false, true);
        assert_eq!(one.gesture_type, GestureType::Subtle);
        assert_eq!(one.intensity, 0.4);
        assert_eq!(one.confidence, 0.6);

        let both = HandGestureResult::from_visibility(true, true);
        assert_eq!(both.gesture_type, GestureType::Expressive);
        assert_eq!(both.intensity, 0.8);
        assert_eq!(both.confidence, 0.7);
    }

    #[test]
    fn test_analyze_hands() {
        let hands = HandLandmarks {
            left: Some(vec![Point::new(0.2, 0.7)]),
            right: None,
        };
        let result = analyze_hands(&hands);
        assert!(result.left_visible);
        assert!(!result.right_visible);
        assert_eq!(result.gesture_type, GestureType::Subtle);
    }
}
