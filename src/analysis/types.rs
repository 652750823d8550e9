use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Body joints the landmark model reports and the classifiers read.
///
/// Names serialise in the MediaPipe `PoseLandmark` style (`LEFT_SHOULDER`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Joint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    /// Joints a detected snapshot must carry. `Nose` is optional.
    pub const REQUIRED: [Joint; 12] = [
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Joint::Nose => "NOSE",
            Joint::LeftShoulder => "LEFT_SHOULDER",
            Joint::RightShoulder => "RIGHT_SHOULDER",
            Joint::LeftElbow => "LEFT_ELBOW",
            Joint::RightElbow => "RIGHT_ELBOW",
            Joint::LeftWrist => "LEFT_WRIST",
            Joint::RightWrist => "RIGHT_WRIST",
            Joint::LeftHip => "LEFT_HIP",
            Joint::RightHip => "RIGHT_HIP",
            Joint::LeftKnee => "LEFT_KNEE",
            Joint::RightKnee => "RIGHT_KNEE",
            Joint::LeftAnkle => "LEFT_ANKLE",
            Joint::RightAnkle => "RIGHT_ANKLE",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tracked joint in normalized image coordinates.
///
/// `y` grows downward, so "above" means a smaller `y`. `visibility` is required on the wire:
/// a joint of unknown confidence must never pass the confidence floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            visibility,
        }
    }

    pub fn with_depth(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            visibility,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.z.map_or(true, f64::is_finite)
            && self.visibility.is_finite()
    }
}

/// All landmarks for one decoded frame.
///
/// `landmarks == None` marks a frame where the model found no subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    pub frame_index: u64,
    #[serde(default)]
    pub landmarks: Option<BTreeMap<Joint, Landmark>>,
}

impl FrameSnapshot {
    pub fn detected(frame_index: u64, landmarks: BTreeMap<Joint, Landmark>) -> Self {
        Self {
            frame_index,
            landmarks: Some(landmarks),
        }
    }

    pub fn undetected(frame_index: u64) -> Self {
        Self {
            frame_index,
            landmarks: None,
        }
    }

    pub fn is_detected(&self) -> bool {
        self.landmarks.is_some()
    }

    pub fn landmark(&self, joint: Joint) -> Option<&Landmark> {
        self.landmarks.as_ref().and_then(|lm| lm.get(&joint))
    }
}

/// Closed pose vocabulary. Variant names are the wire identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PoseType {
    HandsUp,
    TPose,
    Squat,
    StepForward,
    LegRaise,
    Rotation,
}

impl PoseType {
    pub const ALL: [PoseType; 6] = [
        PoseType::HandsUp,
        PoseType::TPose,
        PoseType::Squat,
        PoseType::StepForward,
        PoseType::LegRaise,
        PoseType::Rotation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoseType::HandsUp => "HandsUp",
            PoseType::TPose => "TPose",
            PoseType::Squat => "Squat",
            PoseType::StepForward => "StepForward",
            PoseType::LegRaise => "LegRaise",
            PoseType::Rotation => "Rotation",
        }
    }
}

impl fmt::Display for PoseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame verdict of one classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Classification {
    Active,
    Inactive,
    /// Required joints missing or below the confidence floor.
    Undetermined,
}

impl From<bool> for Classification {
    fn from(active: bool) -> Self {
        if active {
            Classification::Active
        } else {
            Classification::Inactive
        }
    }
}

/// A confirmed, sustained pose activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseEvent {
    pub pose: PoseType,
    pub onset_frame: u64,
    /// Last frame the pose was active; `None` while still held.
    #[serde(default)]
    pub end_frame: Option<u64>,
}
