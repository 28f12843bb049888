//! Landmark model - normalized keypoints produced by the detector
//!
//! Coordinates are in `[0, 1]` relative to frame width/height, with `y`
//! growing downward. Index sets follow the MediaPipe face mesh (468
//! points) and pose (33 points) layouts.

use serde::{Deserialize, Serialize};

/// Eyebrow points of the face mesh (left brow then right brow)
pub const EYEBROW_INDICES: [usize; 10] = [70, 63, 105, 66, 107, 336, 296, 334, 293, 300];

/// Eye corners: left eye outer/inner, then right eye inner/outer
pub const EYE_INDICES: [usize; 4] = [33, 133, 362, 263];

/// Inner lip top/bottom, then mouth corners
pub const MOUTH_INDICES: [usize; 4] = [13, 14, 78, 308];

/// Normalized landmark point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: &Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            z: (self.z + other.z) / 2.0,
        }
    }
}

/// Named facial regions used by the classifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacialRegion {
    Eyebrows,
    Eyes,
    Mouth,
}

impl FacialRegion {
    /// Mesh indices that make up this region
    pub fn indices(self) -> &'static [usize] {
        match self {
            FacialRegion::Eyebrows => &EYEBROW_INDICES,
            FacialRegion::Eyes => &EYE_INDICES,
            FacialRegion::Mouth => &MOUTH_INDICES,
        }
    }
}

/// Facial landmark set - region points picked out of a face mesh
#[derive(Debug, Clone, PartialEq)]
pub struct FacialLandmarkSet {
    pub eyebrows: Vec<Point>,
    pub eyes: Vec<Point>,
    pub mouth: Vec<Point>,
}

impl FacialLandmarkSet {
    /// Extract region points from a full mesh.
    ///
    /// Returns `None` when the mesh is too short to contain every index.
    pub fn from_mesh(mesh: &[Point]) -> Option<Self> {
        Some(Self {
            eyebrows: pick(mesh, FacialRegion::Eyebrows.indices())?,
            eyes: pick(mesh, FacialRegion::Eyes.indices())?,
            mouth: pick(mesh, FacialRegion::Mouth.indices())?,
        })
    }

    pub fn region(&self, region: FacialRegion) -> &[Point] {
        match region {
            FacialRegion::Eyebrows => &self.eyebrows,
            FacialRegion::Eyes => &self.eyes,
            FacialRegion::Mouth => &self.mouth,
        }
    }
}

fn pick(mesh: &[Point], indices: &[usize]) -> Option<Vec<Point>> {
    indices.iter().map(|&i| mesh.get(i).copied()).collect()
}

/// Pose keypoints consumed by the posture classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseLandmark {
    Nose = 0,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftHip = 23,
    RightHip = 24,
}

impl PoseLandmark {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The five pose points needed for posture analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseKeypoints {
    pub nose: Point,
    pub left_shoulder: Point,
    pub right_shoulder: Point,
    pub left_hip: Point,
    pub right_hip: Point,
}

impl PoseKeypoints {
    /// Extract keypoints from a full pose set; `None` if any is missing
    pub fn from_pose(pose: &[Point]) -> Option<Self> {
        let get = |landmark: PoseLandmark| pose.get(landmark.index()).copied();
        Some(Self {
            nose: get(PoseLandmark::Nose)?,
            left_shoulder: get(PoseLandmark::LeftShoulder)?,
            right_shoulder: get(PoseLandmark::RightShoulder)?,
            left_hip: get(PoseLandmark::LeftHip)?,
            right_hip: get(PoseLandmark::RightHip)?,
        })
    }

    pub fn shoulder_midpoint(&self) -> Point {
        self.left_shoulder.midpoint(&self.right_shoulder)
    }

    pub fn hip_midpoint(&self) -> Point {
        self.left_hip.midpoint(&self.right_hip)
    }
}

/// Hand landmark sets, at most one per side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandLandmarks {
    pub left: Option<Vec<Point>>,
    pub right: Option<Vec<Point>>,
}

impl HandLandmarks {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn left_visible(&self) -> bool {
        self.left.as_ref().is_some_and(|points| !points.is_empty())
    }

    pub fn right_visible(&self) -> bool {
        self.right.as_ref().is_some_and(|points| !points.is_empty())
    }

    /// Number of hands that produced landmarks (0, 1 or 2)
    pub fn visible_count(&self) -> usize {
        usize::from(self.left_visible()) + usize::from(self.right_visible())
    }
}

/// Everything the detector found in one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectedLandmarks {
    pub face: Option<Vec<Point>>,
    pub pose: Option<Vec<Point>>,
    pub hands: HandLandmarks,
}

impl DetectedLandmarks {
    /// Nothing detected
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_face(mut self, mesh: Vec<Point>) -> Self {
        self.face = Some(mesh);
        self
    }

    pub fn with_pose(mut self, pose: Vec<Point>) -> Self {
        self.pose = Some(pose);
        self
    }

    pub fn with_hands(mut self, hands: HandLandmarks) -> Self {
        self.hands = hands;
        self
    }
}
