use crate::analysis::classifier::{verdict, Joints, PoseClassifier};
use crate::analysis::config::{HandsUpConfig, TPoseConfig};
use crate::analysis::geometry::{self, Projection};
use crate::analysis::types::{Classification, FrameSnapshot, Joint, PoseType};
use crate::analysis::AnalysisError;

/// Both wrists above their shoulders.
pub struct HandsUpClassifier {
    floor: f64,
    config: HandsUpConfig,
}

impl HandsUpClassifier {
    pub fn new(floor: f64, config: HandsUpConfig) -> Self {
        Self { floor, config }
    }

    pub fn evaluate(&self, snapshot: &FrameSnapshot) -> Result<bool, AnalysisError> {
        let joints = Joints::new(snapshot, self.floor);
        let left_shoulder = joints.get(Joint::LeftShoulder)?;
        let right_shoulder = joints.get(Joint::RightShoulder)?;
        let left_wrist = joints.get(Joint::LeftWrist)?;
        let right_wrist = joints.get(Joint::RightWrist)?;

        let margin = self.config.min_margin;
        let left_up = left_shoulder.y - left_wrist.y >= margin;
        let right_up = right_shoulder.y - right_wrist.y >= margin;
        Ok(left_up && right_up)
    }
}

impl PoseClassifier for HandsUpClassifier {
    fn pose(&self) -> PoseType {
        PoseType::HandsUp
    }

    fn classify(&mut self, snapshot: &FrameSnapshot) -> Classification {
        verdict(self.evaluate(snapshot))
    }
}

/// Arms straight and held out level with the shoulder line.
pub struct TPoseClassifier {
    floor: f64,
    config: TPoseConfig,
}

impl TPoseClassifier {
    pub fn new(floor: f64, config: TPoseConfig) -> Self {
        Self { floor, config }
    }

    pub fn evaluate(&self, snapshot: &FrameSnapshot) -> Result<bool, AnalysisError> {
        let joints = Joints::new(snapshot, self.floor);
        let left_shoulder = joints.get(Joint::LeftShoulder)?;
        let right_shoulder = joints.get(Joint::RightShoulder)?;
        let left_elbow = joints.get(Joint::LeftElbow)?;
        let right_elbow = joints.get(Joint::RightElbow)?;
        let left_wrist = joints.get(Joint::LeftWrist)?;
        let right_wrist = joints.get(Joint::RightWrist)?;
        let floor = joints.floor();

        let left_angle =
            geometry::angle_at(left_shoulder, left_elbow, left_wrist, floor, Projection::Planar)?;
        let right_angle = geometry::angle_at(
            right_shoulder,
            right_elbow,
            right_wrist,
            floor,
            Projection::Planar,
        )?;
        let straight = left_angle >= self.config.min_arm_angle
            && right_angle >= self.config.min_arm_angle;

        // Tilt is measured against the shoulder line, not the image axis,
        // so a slightly rolled camera does not break the pose.
        let shoulder_line = (left_shoulder, right_shoulder);
        let left_tilt = geometry::line_angle((left_shoulder, left_elbow), shoulder_line, floor)?;
        let right_tilt = geometry::line_angle((right_shoulder, right_elbow), shoulder_line, floor)?;
        let level = left_tilt <= self.config.max_arm_tilt && right_tilt <= self.config.max_arm_tilt;

        let mid_x = geometry::midpoint(left_shoulder, right_shoulder).x;
        let reach = self.config.min_outward_reach;
        let left_out = (left_wrist.x - mid_x).abs() >= (left_shoulder.x - mid_x).abs() + reach;
        let right_out = (right_wrist.x - mid_x).abs() >= (right_shoulder.x - mid_x).abs() + reach;

        Ok(straight && level && left_out && right_out)
    }
}

impl PoseClassifier for TPoseClassifier {
    fn pose(&self) -> PoseType {
        PoseType::TPose
    }

    fn classify(&mut self, snapshot: &FrameSnapshot) -> Classification {
        verdict(self.evaluate(snapshot))
    }
}
