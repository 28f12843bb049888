//! Facial expression classification
//!
//! Two scalar features drive the classifier: how far the brows sit above
//! the eyes, and how open the mouth is.

use serde::{Deserialize, Serialize};

use crate::{FacialLandmarkSet, Point};

/// Expression labels, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    Neutral,
    Happy,
    Surprised,
    Concerned,
    Engaged,
}

impl Expression {
    pub fn all() -> &'static [Expression] {
        &[
            Expression::Neutral,
            Expression::Happy,
            Expression::Surprised,
            Expression::Concerned,
            Expression::Engaged,
        ]
    }
}

/// Per-expression scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpressionScores {
    pub neutral: f32,
    pub happy: f32,
    pub surprised: f32,
    pub concerned: f32,
    pub engaged: f32,
}

impl ExpressionScores {
    pub fn get(&self, expression: Expression) -> f32 {
        match expression {
            Expression::Neutral => self.neutral,
            Expression::Happy => self.happy,
            Expression::Surprised => self.surprised,
            Expression::Concerned => self.concerned,
            Expression::Engaged => self.engaged,
        }
    }

    pub fn set(&mut self, expression: Expression, score: f32) {
        match expression {
            Expression::Neutral => self.neutral = score,
            Expression::Happy => self.happy = score,
            Expression::Surprised => self.surprised = score,
            Expression::Concerned => self.concerned = score,
            Expression::Engaged => self.engaged = score,
        }
    }

    /// Highest-scoring expression; ties go to the earlier label
    pub fn dominant(&self) -> (Expression, f32) {
        Expression::all()
            .iter()
            .fold((Expression::Neutral, f32::NEG_INFINITY), |best, &e| {
                let score = self.get(e);
                if score > best.1 {
                    (e, score)
                } else {
                    best
                }
            })
    }
}

/// Derived facial features
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacialFeatures {
    /// Mean eye y minus mean eyebrow y; larger means raised brows
    pub eyebrow_eye_distance: f32,
    /// Vertical extent of the mouth points
    pub mouth_openness: f32,
}

impl FacialFeatures {
    pub fn from_landmarks(face: &FacialLandmarkSet) -> Self {
        let avg_eyebrow_height = mean_y(&face.eyebrows);
        let avg_eye_height = mean_y(&face.eyes);

        let (min_y, max_y) = face
            .mouth
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let mouth_openness = if face.mouth.is_empty() { 0.0 } else { max_y - min_y };

        Self {
            eyebrow_eye_distance: avg_eye_height - avg_eyebrow_height,
            mouth_openness,
        }
    }
}

fn mean_y(points: &[Point]) -> f32 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.y).sum::<f32>() / points.len() as f32
}

/// Expression classification result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpressionResult {
    pub dominant: Expression,
    pub confidence: f32,
    pub all_scores: ExpressionScores,
}

impl ExpressionResult {
    fn from_scores(all_scores: ExpressionScores) -> Self {
        let (dominant, confidence) = all_scores.dominant();
        Self {
            dominant,
            confidence,
            all_scores,
        }
    }
}

/// Classify an expression from brow/eye distance and mouth openness.
///
/// Rules are checked in order; the first match wins.
pub fn classify_expression(eyebrow_eye_distance: f32, mouth_openness: f32) -> ExpressionResult {
    let d = eyebrow_eye_distance;
    let m = mouth_openness;

    let assigned: &[(Expression, f32)] = if d > 0.03 && m > 0.05 {
        &[(Expression::Surprised, 0.7), (Expression::Neutral, 0.2)]
    } else if d > 0.03 && m < 0.03 {
        &[(Expression::Concerned, 0.6), (Expression::Neutral, 0.3)]
    } else if d < 0.03 && m > 0.04 {
        &[(Expression::Happy, 0.8), (Expression::Neutral, 0.2)]
    } else if d > 0.02 && d < 0.03 && m > 0.02 && m < 0.04 {
        &[(Expression::Engaged, 0.7), (Expression::Neutral, 0.3)]
    } else {
        &[(Expression::Neutral, 0.8)]
    };

    let mut scores = ExpressionScores::default();
    for &(expression, score) in assigned {
        scores.set(expression, score);
    }
    ExpressionResult::from_scores(scores)
}

/// Classify straight from a facial landmark set
pub fn analyze_expression(face: &FacialLandmarkSet) -> ExpressionResult {
    let features = FacialFeatures::from_landmarks(face);
    classify_expression(features.eyebrow_eye_distance, features.mouth_openness)
}
