//! Posture assessment from shoulder, hip and nose keypoints

use serde::{Deserialize, Serialize};

use crate::PoseKeypoints;

/// Vertical shoulder difference above which shoulders count as uneven
pub const SHOULDER_SLOPE_LIMIT: f32 = 0.03;
/// Spine tilt from vertical, in degrees, above which the subject leans
pub const SPINE_ANGLE_LIMIT_DEG: f32 = 10.0;
/// How far left of the shoulder midpoint the nose may drift
pub const HEAD_FORWARD_OFFSET: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostureQuality {
    Good,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureIssue {
    UnevenShoulders,
    Leaning,
    HeadForward,
}

impl PostureIssue {
    /// Improvement suggestion for this issue
    pub fn suggestion(self) -> &'static str {
        match self {
            PostureIssue::UnevenShoulders => "keep shoulders level",
            PostureIssue::Leaning => "maintain upright posture",
            PostureIssue::HeadForward => "keep head aligned with shoulders",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureMetrics {
    pub shoulder_slope: f32,
    pub spine_angle_degrees: f32,
}

/// Posture result; `issues` keeps detection order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureResult {
    pub quality: PostureQuality,
    pub confidence: f32,
    pub issues: Vec<PostureIssue>,
    pub metrics: PostureMetrics,
}

/// Angle in degrees between the shoulder→hip vector and straight down
pub fn spine_angle_degrees(keypoints: &PoseKeypoints) -> f32 {
    let shoulders = keypoints.shoulder_midpoint();
    let hips = keypoints.hip_midpoint();

    let (dx, dy) = (hips.x - shoulders.x, hips.y - shoulders.y);
    let magnitude = (dx * dx + dy * dy).sqrt();
    let (nx, ny) = if magnitude > 0.0 {
        (dx / magnitude, dy / magnitude)
    } else {
        (0.0, 0.0)
    };

    // dot with (0, 1)
    let dot = nx * 0.0 + ny * 1.0;
    dot.clamp(-1.0, 1.0).acos().to_degrees()
}

pub fn analyze_posture(keypoints: &PoseKeypoints) -> PostureResult {
    let shoulder_slope = (keypoints.left_shoulder.y - keypoints.right_shoulder.y).abs();
    let spine_angle = spine_angle_degrees(keypoints);
    let shoulder_mid = keypoints.shoulder_midpoint();

    let mut issues = Vec::new();
    if shoulder_slope > SHOULDER_SLOPE_LIMIT {
        issues.push(PostureIssue::UnevenShoulders);
    }
    if spine_angle > SPINE_ANGLE_LIMIT_DEG {
        issues.push(PostureIssue::Leaning);
    }
    if keypoints.nose.x < shoulder_mid.x - HEAD_FORWARD_OFFSET {
        issues.push(PostureIssue::HeadForward);
    }

    let poor = !issues.is_empty();
    PostureResult {
        quality: if poor {
            PostureQuality::Poor
        } else {
            PostureQuality::Good
        },
        confidence: if poor { 0.8 } else { 0.7 },
        issues,
        metrics: PostureMetrics {
            shoulder_slope,
            spine_angle_degrees: spine_angle,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    fn upright() -> PoseKeypoints {
        PoseKeypoints {
            nose: Point::new(0.5, 0.2),
            left_shoulder: Point::new(0.4, 0.4),
            right_shoulder: Point::new(0.6, 0.4),
            left_hip: Point::new(0.42, 0.8),
            right_hip: Point::new(0.58, 0.8),
        }
    }

    #[test]
    fn test_good_posture() {
        let result = analyze_posture(&upright());
        assert_eq!(result.quality, PostureQuality::Good);
        assert!(result.issues.is_empty());
        assert_eq!(result.confidence, 0.7);
        assert!(result.metrics.spine_angle_degrees.abs() < 0.01);
    }

    #[test]
    fn test_all_issues_in_order() {
        let mut pose = upright();
        pose.left_shoulder.y = 0.45;
        pose.left_hip.x = 0.7;
        pose.right_hip.x = 0.9;
        pose.nose.x = 0.3;

        let result = analyze_posture(&pose);
        assert_eq!(result.quality, PostureQuality::Poor);
        assert_eq!(result.confidence, 0.8);
        assert_eq!(
            result.issues,
            vec![
                PostureIssue::UnevenShoulders,
                PostureIssue::Leaning,
                PostureIssue::HeadForward,
            ]
        );
    }

    #[test]
    fn test_spine_angle_45_degrees() {
        let mut pose = upright();
        pose.left_hip = Point::new(0.8, 0.8);
        pose.right_hip = Point::new(0.8, 0.8);
        pose.left_shoulder = Point::new(0.4, 0.4);
        pose.right_shoulder = Point::new(0.4, 0.4);
        assert!((spine_angle_degrees(&pose) - 45.0).abs() < 0.01);
    }

    #[test]
    fn test_degenerate_spine_is_perpendicular() {
        let p = Point::new(0.5, 0.5);
        let pose = PoseKeypoints {
            nose: p,
            left_shoulder: p,
            right_shoulder: p,
            left_hip: p,
            right_hip: p,
        };
        assert!((spine_angle_degrees(&pose) - 90.0).abs() < 0.01);
        assert!(analyze_posture(&pose).issues.contains(&PostureIssue::Leaning));
    }

    #[test]
    fn test_issue_serialization() {
        let json = serde_json::to_string(&PostureIssue::UnevenShoulders).unwrap();
        assert_eq!(json, "\"uneven_shoulders\"");
    }
}
