use crate::analysis::classifier::{verdict, Joints, PoseClassifier};
use crate::analysis::config::{LegRaiseConfig, SquatConfig, StepForwardConfig};
use crate::analysis::geometry::{self, Projection};
use crate::analysis::types::{Classification, FrameSnapshot, Joint, PoseType};
use crate::analysis::AnalysisError;

/// Both knees flexed with the torso kept upright.
pub struct SquatClassifier {
    floor: f64,
    config: SquatConfig,
}

impl SquatClassifier {
    pub fn new(floor: f64, config: SquatConfig) -> Self {
        Self { floor, config }
    }

    pub fn evaluate(&self, snapshot: &FrameSnapshot) -> Result<bool, AnalysisError> {
        let joints = Joints::new(snapshot, self.floor);
        let left_shoulder = joints.get(Joint::LeftShoulder)?;
        let right_shoulder = joints.get(Joint::RightShoulder)?;
        let left_hip = joints.get(Joint::LeftHip)?;
        let right_hip = joints.get(Joint::RightHip)?;
        let left_knee = joints.get(Joint::LeftKnee)?;
        let right_knee = joints.get(Joint::RightKnee)?;
        let left_ankle = joints.get(Joint::LeftAnkle)?;
        let right_ankle = joints.get(Joint::RightAnkle)?;
        let floor = joints.floor();

        let left_knee_angle =
            geometry::angle_at(left_hip, left_knee, left_ankle, floor, Projection::Planar)?;
        let right_knee_angle =
            geometry::angle_at(right_hip, right_knee, right_ankle, floor, Projection::Planar)?;
        let flexed = left_knee_angle < self.config.max_knee_angle
            && right_knee_angle < self.config.max_knee_angle;

        let left_lean = 90.0 - geometry::inclination(left_shoulder, left_hip, floor)?;
        let right_lean = 90.0 - geometry::inclination(right_shoulder, right_hip, floor)?;
        let upright = left_shoulder.y < left_hip.y
            && right_shoulder.y < right_hip.y
            && left_lean <= self.config.max_torso_lean
            && right_lean <= self.config.max_torso_lean;

        Ok(flexed && upright)
    }
}

impl PoseClassifier for SquatClassifier {
    fn pose(&self) -> PoseType {
        PoseType::Squat
    }

    fn classify(&mut self, snapshot: &FrameSnapshot) -> Classification {
        verdict(self.evaluate(snapshot))
    }
}

/// Ankles spread wide relative to torso height.
pub struct StepForwardClassifier {
    floor: f64,
    config: StepForwardConfig,
}

impl StepForwardClassifier {
    pub fn new(floor: f64, config: StepForwardConfig) -> Self {
        Self { floor, config }
    }

    pub fn evaluate(&self, snapshot: &FrameSnapshot) -> Result<bool, AnalysisError> {
        let joints = Joints::new(snapshot, self.floor);
        let left_shoulder = joints.get(Joint::LeftShoulder)?;
        let right_shoulder = joints.get(Joint::RightShoulder)?;
        let left_hip = joints.get(Joint::LeftHip)?;
        let right_hip = joints.get(Joint::RightHip)?;
        let left_ankle = joints.get(Joint::LeftAnkle)?;
        let right_ankle = joints.get(Joint::RightAnkle)?;
        let floor = joints.floor();

        let torso_height = (geometry::distance(left_shoulder, left_hip, floor, Projection::Planar)?
            + geometry::distance(right_shoulder, right_hip, floor, Projection::Planar)?)
            / 2.0;
        if torso_height <= f64::EPSILON {
            return Err(AnalysisError::DegenerateSegment);
        }

        let stance = (left_ankle.x - right_ankle.x).abs();
        Ok(stance > self.config.min_stance_ratio * torso_height)
    }
}

impl PoseClassifier for StepForwardClassifier {
    fn pose(&self) -> PoseType {
        PoseType::StepForward
    }

    fn classify(&mut self, snapshot: &FrameSnapshot) -> Classification {
        verdict(self.evaluate(snapshot))
    }
}

/// One ankle lifted above the opposite hip, the other leg planted.
pub struct LegRaiseClassifier {
    floor: f64,
    config: LegRaiseConfig,
}

impl LegRaiseClassifier {
    pub fn new(floor: f64, config: LegRaiseConfig) -> Self {
        Self { floor, config }
    }

    pub fn evaluate(&self, snapshot: &FrameSnapshot) -> Result<bool, AnalysisError> {
        let joints = Joints::new(snapshot, self.floor);
        let left_hip = joints.get(Joint::LeftHip)?;
        let right_hip = joints.get(Joint::RightHip)?;
        let left_knee = joints.get(Joint::LeftKnee)?;
        let right_knee = joints.get(Joint::RightKnee)?;
        let left_ankle = joints.get(Joint::LeftAnkle)?;
        let right_ankle = joints.get(Joint::RightAnkle)?;

        let lift = self.config.min_lift;
        let grounded = self.config.grounded_margin;

        let left_raised = right_hip.y - left_ankle.y >= lift
            && right_ankle.y >= right_knee.y + grounded;
        let right_raised = left_hip.y - right_ankle.y >= lift
            && left_ankle.y >= left_knee.y + grounded;

        Ok(left_raised || right_raised)
    }
}

impl PoseClassifier for LegRaiseClassifier {
    fn pose(&self) -> PoseType {
        PoseType::LegRaise
    }

    fn classify(&mut self, snapshot: &FrameSnapshot) -> Classification {
        verdict(self.evaluate(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::test_support::{set, snapshot_with};

    fn squat() -> SquatClassifier {
        SquatClassifier::new(0.5, SquatConfig::default())
    }

    fn squat_frame(lm: &mut std::collections::BTreeMap<Joint, crate::analysis::types::Landmark>) {
        // hips drop and knees push forward
        set(lm, Joint::LeftShoulder, 0.60, 0.45);
        set(lm, Joint::RightShoulder, 0.40, 0.45);
        set(lm, Joint::LeftHip, 0.58, 0.72);
        set(lm, Joint::RightHip, 0.42, 0.72);
        set(lm, Joint::LeftKnee, 0.68, 0.78);
        set(lm, Joint::RightKnee, 0.32, 0.78);
        set(lm, Joint::LeftAnkle, 0.60, 0.90);
        set(lm, Joint::RightAnkle, 0.40, 0.90);
    }

    #[test]
    fn deep_knee_bend_with_upright_torso_is_squat() {
        let snapshot = snapshot_with(0, squat_frame);
        assert_eq!(squat().classify(&snapshot), Classification::Active);
    }

    #[test]
    fn bending_over_is_not_squat() {
        let snapshot = snapshot_with(0, |lm| {
            squat_frame(lm);
            set(lm, Joint::LeftShoulder, 0.90, 0.62);
            set(lm, Joint::RightShoulder, 0.75, 0.62);
        });
        assert_eq!(squat().classify(&snapshot), Classification::Inactive);
    }

    #[test]
    fn one_straight_leg_is_not_squat() {
        let snapshot = snapshot_with(0, |lm| {
            squat_frame(lm);
            set(lm, Joint::RightKnee, 0.42, 0.81);
        });
        assert_eq!(squat().classify(&snapshot), Classification::Inactive);
    }

    #[test]
    fn wide_stance_is_step_forward() {
        let classifier = StepForwardClassifier::new(0.5, StepForwardConfig::default());
        let snapshot = snapshot_with(0, |lm| {
            set(lm, Joint::LeftAnkle, 0.72, 0.90);
            set(lm, Joint::RightAnkle, 0.40, 0.88);
        });
        assert!(classifier.evaluate(&snapshot).unwrap());

        let neutral = snapshot_with(1, |_| {});
        assert!(!classifier.evaluate(&neutral).unwrap());
    }

    #[test]
    fn weak_ankle_makes_step_undetermined() {
        let mut classifier = StepForwardClassifier::new(0.5, StepForwardConfig::default());
        let snapshot = snapshot_with(0, |lm| {
            lm.get_mut(&Joint::RightAnkle).unwrap().visibility = 0.3;
        });
        assert_eq!(classifier.classify(&snapshot), Classification::Undetermined);
    }

    #[test]
    fn kick_above_opposite_hip_is_leg_raise() {
        let mut classifier = LegRaiseClassifier::new(0.5, LegRaiseConfig::default());
        let snapshot = snapshot_with(0, |lm| {
            set(lm, Joint::LeftKnee, 0.66, 0.55);
            set(lm, Joint::LeftAnkle, 0.80, 0.45);
        });
        assert_eq!(classifier.classify(&snapshot), Classification::Active);
    }

    #[test]
    fn jump_with_both_feet_up_is_not_leg_raise() {
        let mut classifier = LegRaiseClassifier::new(0.5, LegRaiseConfig::default());
        let snapshot = snapshot_with(0, |lm| {
            set(lm, Joint::LeftKnee, 0.66, 0.55);
            set(lm, Joint::LeftAnkle, 0.80, 0.45);
            set(lm, Joint::RightKnee, 0.34, 0.55);
            set(lm, Joint::RightAnkle, 0.20, 0.45);
        });
        assert_eq!(classifier.classify(&snapshot), Classification::Inactive);
    }
}
