//! Landmark detector seam
//!
//! The keypoint model itself lives outside this crate. Anything that can
//! turn a decoded image into normalized points implements
//! [`LandmarkDetector`].

use image::DynamicImage;

use crate::{DetectedLandmarks, HandLandmarks, Point};

/// External landmark-detection capability.
///
/// Each category is queried independently; a miss in one category does
/// not affect the others.
pub trait LandmarkDetector: Send + Sync {
    /// Full face mesh, if a face was found
    fn detect_face(&self, image: &DynamicImage) -> Option<Vec<Point>>;

    /// Body pose keypoints, if a body was found
    fn detect_pose(&self, image: &DynamicImage) -> Option<Vec<Point>>;

    /// Left and right hand keypoints
    fn detect_hands(&self, image: &DynamicImage) -> HandLandmarks;

    /// Run every category once
    fn detect(&self, image: &DynamicImage) -> DetectedLandmarks {
        DetectedLandmarks {
            face: self.detect_face(image),
            pose: self.detect_pose(image),
            hands: self.detect_hands(image),
        }
    }
}

/// Detector that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDetector;

impl LandmarkDetector for NoopDetector {
    fn detect_face(&self, _image: &DynamicImage) -> Option<Vec<Point>> {
        None
    }

    fn detect_pose(&self, _image: &DynamicImage) -> Option<Vec<Point>> {
        None
    }

    fn detect_hands(&self, _image: &DynamicImage) -> HandLandmarks {
        HandLandmarks::none()
    }
}

/// Detector that returns the same landmarks for every image
#[derive(Debug, Clone, Default)]
pub struct FixedLandmarks {
    landmarks: DetectedLandmarks,
}

impl FixedLandmarks {
    pub fn new(landmarks: DetectedLandmarks) -> Self {
        Self { landmarks }
    }
}

impl LandmarkDetector for FixedLandmarks {
    fn detect_face(&self, _image: &DynamicImage) -> Option<Vec<Point>> {
        self.landmarks.face.clone()
    }

    fn detect_pose(&self, _image: &DynamicImage) -> Option<Vec<Point>> {
        self.landmarks.pose.clone()
    }

    fn detect_hands(&self, _image: &DynamicImage) -> HandLandmarks {
        self.landmarks.hands.clone()
    }
}
