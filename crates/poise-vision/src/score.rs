//! Confidence scoring and improvement suggestions
//!
//! The score is a synthetic 0-100 rating, not a statistical confidence.
//! It starts at [`BASE_SCORE`] and each detected aspect nudges it up or
//! down. Undetected aspects contribute nothing.

use serde::{Deserialize, Serialize};

use crate::{
    Expression, ExpressionResult, EyeContactResult, GestureType, HandGestureResult,
    PostureQuality, PostureResult,
};

pub const BASE_SCORE: f32 = 60.0;
pub const HIGH_THRESHOLD: u8 = 80;
pub const MODERATE_THRESHOLD: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Moderate,
    High,
}

impl ConfidenceLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_THRESHOLD {
            ConfidenceLevel::High
        } else if score >= MODERATE_THRESHOLD {
            ConfidenceLevel::Moderate
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// Per-aspect results of one frame; `None` means not detected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorAspects {
    pub facial_expression: Option<ExpressionResult>,
    pub eye_contact: Option<EyeContactResult>,
    pub posture: Option<PostureResult>,
    pub hand_gestures: Option<HandGestureResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    pub score: u8,
    pub level: ConfidenceLevel,
    pub improvement_areas: Vec<String>,
}

impl ConfidenceScore {
    pub fn evaluate(aspects: &BehaviorAspects) -> Self {
        let score = raw_score(aspects).clamp(0.0, 100.0).round() as u8;
        Self {
            score,
            level: ConfidenceLevel::from_score(score),
            improvement_areas: improvement_areas(aspects),
        }
    }
}

/// Unclamped score
pub fn raw_score(aspects: &BehaviorAspects) -> f32 {
    let mut score = BASE_SCORE;

    if let Some(expression) = &aspects.facial_expression {
        score += match expression.dominant {
            Expression::Engaged => 15.0,
            Expression::Happy => 10.0,
            Expression::Neutral => 5.0,
            Expression::Concerned => -5.0,
            Expression::Surprised => 0.0,
        };
    }

    if let Some(eye_contact) = &aspects.eye_contact {
        score += if eye_contact.looking_at_camera { 15.0 } else { -10.0 };
    }

    if let Some(posture) = &aspects.posture {
        match posture.quality {
            PostureQuality::Good => score += 10.0,
            PostureQuality::Poor => {
                score -= 10.0;
                score -= 5.0 * posture.issues.len() as f32;
            }
        }
    }

    if let Some(hands) = &aspects.hand_gestures {
        if hands.gesture_type == GestureType::Expressive {
            score += 5.0 * hands.intensity;
        }
    }

    score
}

/// Suggestions in fixed order, one per triggered condition
pub fn improvement_areas(aspects: &BehaviorAspects) -> Vec<String> {
    let mut areas = Vec::new();

    if let Some(expression) = &aspects.facial_expression {
        if matches!(expression.dominant, Expression::Neutral | Expression::Concerned) {
            areas.push("show more engagement".to_owned());
        }
    }

    if let Some(eye_contact) = &aspects.eye_contact {
        if !eye_contact.looking_at_camera {
            areas.push("maintain better eye contact".to_owned());
        }
    }

    if let Some(posture) = &aspects.posture {
        areas.extend(posture.issues.iter().map(|issue| issue.suggestion().to_owned()));
    }

    if let Some(hands) = &aspects.hand_gestures {
        if hands.gesture_type == GestureType::None {
            areas.push("use more hand gestures".to_owned());
        }
        if hands.intensity > 0.8 {
            areas.push("reduce excessive hand movements".to_owned());
        }
    }

    areas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        classify_expression, EyeContactResult, PostureIssue, PostureMetrics,
    };
    use proptest::prelude::*;

    fn poor_posture(issues: Vec<PostureIssue>) -> PostureResult {
        PostureResult {
            quality: PostureQuality::Poor,
            confidence: 0.8,
            issues,
            metrics: PostureMetrics {
                shoulder_slope: 0.05,
                spine_angle_degrees: 20.0,
            },
        }
    }

    #[test]
    fn test_nothing_detected_is_base_score() {
        let score = ConfidenceScore::evaluate(&BehaviorAspects::default());
        assert_eq!(score.score, 60);
        assert_eq!(score.level, ConfidenceLevel::Moderate);
        assert!(score.improvement_areas.is_empty());
    }

    #[test]
    fn test_most_negative_aggregate() {
        let aspects = BehaviorAspects {
            facial_expression: Some(classify_expression(0.05, 0.01)),
            eye_contact: Some(EyeContactResult::from_eye_x(0.2)),
            posture: Some(poor_posture(vec![
                PostureIssue::UnevenShoulders,
                PostureIssue::Leaning,
                PostureIssue::HeadForward,
            ])),
            hand_gestures: Some(HandGestureResult::from_visibility(false, false)),
        };

        let score = ConfidenceScore::evaluate(&aspects);
        assert_eq!(score.score, 20);
        assert_eq!(score.level, ConfidenceLevel::Low);
        assert_eq!(
            score.improvement_areas,
            vec![
                "show more engagement",
                "maintain better eye contact",
                "keep shoulders level",
                "maintain upright posture",
                "keep head aligned with shoulders",
                "use more hand gestures",
            ]
        );
    }

    #[test]
    fn test_best_aggregate() {
        let aspects = BehaviorAspects {
            facial_expression: Some(classify_expression(0.025, 0.03)),
            eye_contact: Some(EyeContactResult::from_eye_x(0.5)),
            posture: Some(PostureResult {
                quality: PostureQuality::Good,
                confidence: 0.7,
                issues: Vec::new(),
                metrics: PostureMetrics {
                    shoulder_slope: 0.0,
                    spine_angle_degrees: 0.0,
                },
            }),
            hand_gestures: Some(HandGestureResult::from_visibility(true, true)),
        };

        // 60 + 15 + 15 + 10 + 4
        let score = ConfidenceScore::evaluate(&aspects);
        assert_eq!(score.score, 100);
        assert_eq!(score.level, ConfidenceLevel::High);
        assert!(score.improvement_areas.is_empty());
        assert!((raw_score(&aspects) - 104.0).abs() < 1e-4);
    }

    #[test]
    fn test_surprised_has_no_adjustment() {
        let aspects = BehaviorAspects {
            facial_expression: Some(classify_expression(0.04, 0.06)),
            ..Default::default()
        };
        let score = ConfidenceScore::evaluate(&aspects);
        assert_eq!(score.score, 60);
        assert!(score.improvement_areas.is_empty());
    }

    #[test]
    fn test_levels() {
        assert_eq!(ConfidenceLevel::from_score(80), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(79), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_score(60), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_score(59), ConfidenceLevel::Low);
    }

    fn arb_aspects() -> impl Strategy<Value = BehaviorAspects> {
        (
            proptest::option::of((-0.1f32..0.1, 0.0f32..0.1)),
            proptest::option::of(0.0f32..1.0),
            proptest::option::of(0usize..=3),
            proptest::option::of((any::<bool>(), any::<bool>())),
        )
            .prop_map(|(expr, eye, issues, hands)| BehaviorAspects {
                facial_expression: expr.map(|(d, m)| classify_expression(d, m)),
                eye_contact: eye.map(EyeContactResult::from_eye_x),
                posture: issues.map(|n| {
                    let all = [
                        PostureIssue::UnevenShoulders,
                        PostureIssue::Leaning,
                        PostureIssue::HeadForward,
                    ];
                    if n == 0 {
                        PostureResult {
                            quality: PostureQuality::Good,
                            confidence: 0.7,
                            issues: Vec::new(),
                            metrics: PostureMetrics {
                                shoulder_slope: 0.0,
                                spine_angle_degrees: 0.0,
                            },
                        }
                    } else {
                        poor_posture(all[..n].to_vec())
                    }
                }),
                hand_gestures: hands.map(|(l, r)| HandGestureResult::from_visibility(l, r)),
            })
    }

    proptest! {
        #[test]
        fn prop_score_in_range_and_level_consistent(aspects in arb_aspects()) {
            let score = ConfidenceScore::evaluate(&aspects);
            prop_assert!(score.score <= 100);
            prop_assert_eq!(score.level, ConfidenceLevel::from_score(score.score));
        }
    }
}
