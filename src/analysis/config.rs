use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebounceConfig {
    /// Consecutive `Active` frames needed before an event is confirmed.
    pub confirm_frames: u32,
    /// Consecutive `Inactive` frames needed to release a confirmed pose.
    pub release_frames: u32,
    /// Consecutive `Undetermined` frames tolerated before the run is dropped.
    /// 0 = never drop, dropout only freezes the state machine.
    #[serde(default)]
    pub undetermined_tolerance: u32,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            confirm_frames: 3,
            release_frames: 3,
            undetermined_tolerance: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandsUpConfig {
    /// Minimum normalized height of each wrist above its shoulder.
    pub min_margin: f64,
}

impl Default for HandsUpConfig {
    fn default() -> Self {
        Self { min_margin: 0.08 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TPoseConfig {
    /// Shoulder-elbow-wrist angle (degrees) at or above which an arm counts as straight.
    pub min_arm_angle: f64,
    /// Maximum angle (degrees) between an upper arm and the shoulder line.
    pub max_arm_tilt: f64,
    /// Minimum horizontal reach of each wrist beyond its shoulder.
    #[serde(default = "default_min_outward_reach")]
    pub min_outward_reach: f64,
}

fn default_min_outward_reach() -> f64 {
    0.05
}

impl Default for TPoseConfig {
    fn default() -> Self {
        Self {
            min_arm_angle: 155.0,
            max_arm_tilt: 20.0,
            min_outward_reach: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquatConfig {
    /// Hip-knee-ankle angle (degrees) below which a knee counts as flexed.
    pub max_knee_angle: f64,
    /// Maximum lean (degrees) of each shoulder-hip segment away from vertical.
    pub max_torso_lean: f64,
}

impl Default for SquatConfig {
    fn default() -> Self {
        Self {
            max_knee_angle: 120.0,
            max_torso_lean: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepForwardConfig {
    /// Ankle separation as a fraction of torso height.
    pub min_stance_ratio: f64,
}

impl Default for StepForwardConfig {
    fn default() -> Self {
        Self {
            min_stance_ratio: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegRaiseConfig {
    /// Height of the raised ankle above the opposite hip.
    pub min_lift: f64,
    /// Supporting ankle must sit at least this far below its own knee.
    #[serde(default)]
    pub grounded_margin: f64,
}

impl Default for LegRaiseConfig {
    fn default() -> Self {
        Self {
            min_lift: 0.10,
            grounded_margin: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationConfig {
    /// Number of prior shoulder orientations kept as the baseline.
    pub window_frames: usize,
    /// Baseline samples required before the classifier may report `Active`.
    pub min_baseline_frames: usize,
    /// Yaw change (degrees) against the baseline that counts as rotation.
    pub min_yaw_change: f64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            window_frames: 5,
            min_baseline_frames: 2,
            min_yaw_change: 25.0,
        }
    }
}

/// Tunables for one analysis run. Built once per video and owned by that run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f64,
    #[serde(default)]
    pub debounce: DebounceConfig,
    #[serde(default)]
    pub hands_up: HandsUpConfig,
    #[serde(default)]
    pub t_pose: TPoseConfig,
    #[serde(default)]
    pub squat: SquatConfig,
    #[serde(default)]
    pub step_forward: StepForwardConfig,
    #[serde(default)]
    pub leg_raise: LegRaiseConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
}

fn default_confidence_floor() -> f64 {
    0.5
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            confidence_floor: default_confidence_floor(),
            debounce: DebounceConfig::default(),
            hands_up: HandsUpConfig::default(),
            t_pose: TPoseConfig::default(),
            squat: SquatConfig::default(),
            step_forward: StepForwardConfig::default(),
            leg_raise: LegRaiseConfig::default(),
            rotation: RotationConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_env(env_config: &crate::config::AnalysisEnvConfig) -> Self {
        let mut config = Self::default();
        config.confidence_floor = env_config.confidence_floor;
        config.debounce.confirm_frames = env_config.confirm_frames;
        config.debounce.release_frames = env_config.release_frames;
        config.debounce.undetermined_tolerance = env_config.undetermined_tolerance;
        config.rotation.window_frames = env_config.rotation_window;
        config
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        let invalid = |msg: &str| Err(AnalysisError::InvalidConfig(msg.to_string()));

        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return invalid("confidenceFloor must be in [0,1]");
        }
        if self.debounce.confirm_frames == 0 {
            return invalid("debounce.confirmFrames must be >= 1");
        }
        if self.debounce.release_frames == 0 {
            return invalid("debounce.releaseFrames must be >= 1");
        }
        if !self.hands_up.min_margin.is_finite() || self.hands_up.min_margin < 0.0 {
            return invalid("handsUp.minMargin must be >= 0");
        }
        if !(0.0..=180.0).contains(&self.t_pose.min_arm_angle) {
            return invalid("tPose.minArmAngle must be in [0,180]");
        }
        if !(0.0..=90.0).contains(&self.t_pose.max_arm_tilt) {
            return invalid("tPose.maxArmTilt must be in [0,90]");
        }
        if !self.t_pose.min_outward_reach.is_finite() {
            return invalid("tPose.minOutwardReach must be finite");
        }
        if !(0.0..=180.0).contains(&self.squat.max_knee_angle) {
            return invalid("squat.maxKneeAngle must be in [0,180]");
        }
        if !(0.0..=90.0).contains(&self.squat.max_torso_lean) {
            return invalid("squat.maxTorsoLean must be in [0,90]");
        }
        if !self.step_forward.min_stance_ratio.is_finite()
            || self.step_forward.min_stance_ratio <= 0.0
        {
            return invalid("stepForward.minStanceRatio must be > 0");
        }
        if !self.leg_raise.min_lift.is_finite() || !self.leg_raise.grounded_margin.is_finite() {
            return invalid("legRaise thresholds must be finite");
        }
        if self.rotation.window_frames == 0 {
            return invalid("rotation.windowFrames must be >= 1");
        }
        if self.rotation.min_baseline_frames == 0
            || self.rotation.min_baseline_frames > self.rotation.window_frames
        {
            return invalid("rotation.minBaselineFrames must be in [1, windowFrames]");
        }
        if !(0.0..=180.0).contains(&self.rotation.min_yaw_change) {
            return invalid("rotation.minYawChange must be in [0,180]");
        }
        Ok(())
    }
}
