use std::collections::BTreeMap;

use serde_json::Value;

use dance_pose_backend::analysis::types::Joint;
use dance_pose_backend::analysis::{FrameSnapshot, Landmark};

/// Upright subject facing the camera, arms hanging.
pub fn neutral_landmarks() -> BTreeMap<Joint, Landmark> {
    let mut lm = BTreeMap::new();
    let mut put = |joint, x, y| {
        lm.insert(joint, Landmark::with_depth(x, y, 0.0, 0.95));
    };
    put(Joint::Nose, 0.50, 0.15);
    put(Joint::LeftShoulder, 0.60, 0.30);
    put(Joint::RightShoulder, 0.40, 0.30);
    put(Joint::LeftElbow, 0.62, 0.42);
    put(Joint::RightElbow, 0.38, 0.42);
    put(Joint::LeftWrist, 0.63, 0.54);
    put(Joint::RightWrist, 0.37, 0.54);
    put(Joint::LeftHip, 0.56, 0.60);
    put(Joint::RightHip, 0.44, 0.60);
    put(Joint::LeftKnee, 0.56, 0.75);
    put(Joint::RightKnee, 0.44, 0.75);
    put(Joint::LeftAnkle, 0.56, 0.90);
    put(Joint::RightAnkle, 0.44, 0.90);
    lm
}

pub fn neutral(frame: u64) -> FrameSnapshot {
    FrameSnapshot::detected(frame, neutral_landmarks())
}

pub fn edited(frame: u64, edit: impl FnOnce(&mut BTreeMap<Joint, Landmark>)) -> FrameSnapshot {
    let mut lm = neutral_landmarks();
    edit(&mut lm);
    FrameSnapshot::detected(frame, lm)
}

pub fn move_joint(lm: &mut BTreeMap<Joint, Landmark>, joint: Joint, x: f64, y: f64) {
    let entry = lm.get_mut(&joint).expect("fixture joint");
    entry.x = x;
    entry.y = y;
}

pub fn hands_up(frame: u64) -> FrameSnapshot {
    edited(frame, |lm| {
        move_joint(lm, Joint::LeftElbow, 0.62, 0.20);
        move_joint(lm, Joint::RightElbow, 0.38, 0.20);
        move_joint(lm, Joint::LeftWrist, 0.62, 0.10);
        move_joint(lm, Joint::RightWrist, 0.38, 0.10);
    })
}

pub fn t_pose(frame: u64) -> FrameSnapshot {
    edited(frame, |lm| {
        move_joint(lm, Joint::LeftElbow, 0.75, 0.30);
        move_joint(lm, Joint::RightElbow, 0.25, 0.30);
        move_joint(lm, Joint::LeftWrist, 0.90, 0.30);
        move_joint(lm, Joint::RightWrist, 0.10, 0.30);
    })
}

/// Hips dropped toward knee height, knees pushed out, torso upright.
pub fn squat(frame: u64) -> FrameSnapshot {
    edited(frame, |lm| {
        move_joint(lm, Joint::LeftShoulder, 0.60, 0.45);
        move_joint(lm, Joint::RightShoulder, 0.40, 0.45);
        move_joint(lm, Joint::LeftElbow, 0.62, 0.55);
        move_joint(lm, Joint::RightElbow, 0.38, 0.55);
        move_joint(lm, Joint::LeftWrist, 0.63, 0.62);
        move_joint(lm, Joint::RightWrist, 0.37, 0.62);
        move_joint(lm, Joint::LeftHip, 0.56, 0.72);
        move_joint(lm, Joint::RightHip, 0.44, 0.72);
        move_joint(lm, Joint::LeftKnee, 0.66, 0.75);
        move_joint(lm, Joint::RightKnee, 0.34, 0.75);
        move_joint(lm, Joint::LeftAnkle, 0.58, 0.90);
        move_joint(lm, Joint::RightAnkle, 0.42, 0.90);
    })
}

/// Shoulders turned by `yaw_deg` around the vertical axis.
pub fn facing(frame: u64, yaw_deg: f64) -> FrameSnapshot {
    let half_width = 0.10;
    let rad = yaw_deg.to_radians();
    edited(frame, |lm| {
        let left = lm.get_mut(&Joint::LeftShoulder).expect("left shoulder");
        left.x = 0.5 + half_width * rad.cos();
        left.z = Some(half_width * rad.sin());
        let right = lm.get_mut(&Joint::RightShoulder).expect("right shoulder");
        right.x = 0.5 - half_width * rad.cos();
        right.z = Some(-half_width * rad.sin());
    })
}

/// Same turn as seen by a 2D-only model: no depth on any joint, the shoulder
/// span foreshortens instead.
pub fn facing_without_depth(frame: u64, yaw_deg: f64) -> FrameSnapshot {
    let half_width = 0.10 * yaw_deg.to_radians().cos();
    edited(frame, |lm| {
        for landmark in lm.values_mut() {
            landmark.z = None;
        }
        move_joint(lm, Joint::LeftShoulder, 0.5 + half_width, 0.30);
        move_joint(lm, Joint::RightShoulder, 0.5 - half_width, 0.30);
    })
}

/// Wrists raised but reported below the confidence floor.
pub fn hands_up_low_confidence(frame: u64) -> FrameSnapshot {
    let mut snapshot = hands_up(frame);
    if let Some(lm) = snapshot.landmarks.as_mut() {
        for joint in [Joint::LeftWrist, Joint::RightWrist] {
            if let Some(entry) = lm.get_mut(&joint) {
                entry.visibility = 0.2;
            }
        }
    }
    snapshot
}

/// Frames `0..total`, hands up on `active`, neutral elsewhere.
pub fn hands_up_sequence(total: u64, active: std::ops::Range<u64>) -> Vec<FrameSnapshot> {
    (0..total)
        .map(|i| if active.contains(&i) { hands_up(i) } else { neutral(i) })
        .collect()
}

pub fn frames_json(frames: &[FrameSnapshot]) -> Value {
    serde_json::to_value(frames).expect("encode frames")
}
