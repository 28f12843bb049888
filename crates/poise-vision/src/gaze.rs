//! Eye contact estimation from eye-corner positions

use serde::{Deserialize, Serialize};

use crate::Point;

/// Horizontal band of the frame the eyes sit in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyePosition {
    Center,
    Left,
    Right,
}

/// Eye contact result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeContactResult {
    pub looking_at_camera: bool,
    pub confidence: f32,
    pub position: EyePosition,
}

impl EyeContactResult {
    /// Classify from the mean horizontal eye position
    pub fn from_eye_x(eye_x_position: f32) -> Self {
        let looking_at_camera = eye_x_position > 0.4 && eye_x_position < 0.6;
        let position = if looking_at_camera {
            EyePosition::Center
        } else if eye_x_position <= 0.4 {
            EyePosition::Left
        } else {
            EyePosition::Right
        };

        Self {
            looking_at_camera,
            confidence: if looking_at_camera { 0.7 } else { 0.6 },
            position,
        }
    }
}

/// Estimate eye contact from the eye region points.
///
/// Points 0-1 are averaged into the left eye centre and 2-3 into the
/// right; returns `None` with fewer than four points.
pub fn analyze_eye_contact(eyes: &[Point]) -> Option<EyeContactResult> {
    let [l0, l1, r0, r1] = eyes.get(..4)? else {
        return None;
    };
    let left_center = l0.midpoint(l1);
    let right_center = r0.midpoint(r1);
    let eye_x_position = (left_center.x + right_center.x) / 2.0;

    Some(EyeContactResult::from_eye_x(eye_x_position))
}
