//! Frame analysis pipeline

use std::fmt;
use std::sync::Arc;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    analyze_expression, analyze_eye_contact, analyze_hands, analyze_posture, decode_base64_image,
    BehaviorAspects, ConfidenceScore, DecodeError, DetectedLandmarks, FacialLandmarkSet,
    LandmarkDetector, PoseKeypoints,
};

/// Result of analyzing one frame. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    pub face_detected: bool,
    #[serde(flatten)]
    pub aspects: BehaviorAspects,
    pub confidence_score: ConfidenceScore,
}

impl FrameAnalysis {
    /// Aggregate already-classified aspects
    pub fn from_aspects(face_detected: bool, aspects: BehaviorAspects) -> Self {
        let confidence_score = ConfidenceScore::evaluate(&aspects);
        Self {
            face_detected,
            aspects,
            confidence_score,
        }
    }
}

/// Classify every aspect the landmarks support.
///
/// Face-derived aspects need a usable face mesh; posture needs the pose
/// keypoints. Hand gestures are reported once anything is in frame, so
/// a detected person with no visible hands still gets a `none` result.
pub fn analyze_landmarks(landmarks: &DetectedLandmarks) -> FrameAnalysis {
    let face = landmarks
        .face
        .as_deref()
        .and_then(FacialLandmarkSet::from_mesh);
    let pose = landmarks.pose.as_deref().and_then(PoseKeypoints::from_pose);

    let aspects = BehaviorAspects {
        facial_expression: face.as_ref().map(analyze_expression),
        eye_contact: face.as_ref().and_then(|f| analyze_eye_contact(&f.eyes)),
        posture: pose.as_ref().map(analyze_posture),
        hand_gestures: (landmarks.hands.visible_count() > 0 || face.is_some() || pose.is_some())
            .then(|| analyze_hands(&landmarks.hands)),
    };

    FrameAnalysis::from_aspects(face.is_some(), aspects)
}

/// Stateless analyzer bound to a landmark detector
#[derive(Clone)]
pub struct FrameAnalyzer {
    detector: Arc<dyn LandmarkDetector>,
}

impl FrameAnalyzer {
    pub fn new(detector: Arc<dyn LandmarkDetector>) -> Self {
        Self { detector }
    }

    /// Decode a base64 frame and analyze it
    pub fn analyze(&self, payload: &str) -> Result<FrameAnalysis, DecodeError> {
        let image = decode_base64_image(payload)?;
        Ok(self.analyze_image(&image))
    }

    pub fn analyze_image(&self, image: &DynamicImage) -> FrameAnalysis {
        let landmarks = self.detector.detect(image);
        let analysis = analyze_landmarks(&landmarks);

        debug!(
            width = image.width(),
            height = image.height(),
            face_detected = analysis.face_detected,
            score = analysis.confidence_score.score,
            "frame analyzed"
        );
        analysis
    }
}

impl fmt::Debug for FrameAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameAnalyzer").finish_non_exhaustive()
    }
}
