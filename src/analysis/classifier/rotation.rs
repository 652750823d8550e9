//! 转体判定
//!
//! 维护最近若干帧的肩线样本作为基线，当前朝向与基线之差超过阈值即视为转体。
//! 两侧肩部都带深度时比较 x-z 平面偏航角（圆周均值）；
//! 缺少深度时改用肩宽的透视缩短估算转角。
//! 不确定帧不进入窗口。

use std::collections::VecDeque;

use crate::analysis::classifier::{Joints, PoseClassifier};
use crate::analysis::config::RotationConfig;
use crate::analysis::geometry;
use crate::analysis::types::{Classification, FrameSnapshot, Joint, PoseType};
use crate::analysis::AnalysisError;

#[derive(Debug, Clone, Copy)]
struct ShoulderSample {
    /// x-z yaw, only when both shoulders carry depth.
    yaw: Option<f64>,
    /// Signed image-plane shoulder span.
    span: f64,
}

pub struct RotationClassifier {
    floor: f64,
    config: RotationConfig,
    history: VecDeque<ShoulderSample>,
}

impl RotationClassifier {
    pub fn new(floor: f64, config: RotationConfig) -> Self {
        let capacity = config.window_frames.max(1);
        Self {
            floor,
            config,
            history: VecDeque::with_capacity(capacity),
        }
    }

    fn has_baseline(&self) -> bool {
        self.history.len() >= self.config.min_baseline_frames.max(1)
    }

    /// Circular mean yaw of the window, `None` until enough samples exist or
    /// when any sample lacks depth.
    pub fn yaw_baseline(&self) -> Option<f64> {
        if !self.has_baseline() {
            return None;
        }
        let (mut sin_sum, mut cos_sum) = (0.0_f64, 0.0_f64);
        for sample in &self.history {
            let rad = sample.yaw?.to_radians();
            sin_sum += rad.sin();
            cos_sum += rad.cos();
        }
        Some(sin_sum.atan2(cos_sum).to_degrees())
    }

    /// Mean signed shoulder span of the window, `None` until enough samples exist.
    pub fn span_baseline(&self) -> Option<f64> {
        if !self.has_baseline() {
            return None;
        }
        let total: f64 = self.history.iter().map(|sample| sample.span).sum();
        Some(total / self.history.len() as f64)
    }

    pub fn window_len(&self) -> usize {
        self.history.len()
    }

    fn sample(&self, snapshot: &FrameSnapshot) -> Result<ShoulderSample, AnalysisError> {
        let joints = Joints::new(snapshot, self.floor);
        let left = joints.get(Joint::LeftShoulder)?;
        let right = joints.get(Joint::RightShoulder)?;
        let yaw = match geometry::shoulder_yaw(left, right, joints.floor()) {
            Ok(yaw) => Some(yaw),
            Err(AnalysisError::MissingDepth) => None,
            Err(e) => return Err(e),
        };
        let span = geometry::shoulder_span(left, right, joints.floor())?;
        Ok(ShoulderSample { yaw, span })
    }

    /// Degrees turned against the baseline.
    fn turn(&self, sample: &ShoulderSample) -> Option<f64> {
        if let (Some(yaw), Some(baseline)) = (sample.yaw, self.yaw_baseline()) {
            return Some(geometry::angular_difference(yaw, baseline).abs());
        }
        let reference = self.span_baseline()?;
        geometry::foreshortened_turn(sample.span, reference).ok()
    }

    fn push_history(&mut self, sample: ShoulderSample) {
        self.history.push_back(sample);
        while self.history.len() > self.config.window_frames.max(1) {
            self.history.pop_front();
        }
    }
}

impl PoseClassifier for RotationClassifier {
    fn pose(&self) -> PoseType {
        PoseType::Rotation
    }

    fn classify(&mut self, snapshot: &FrameSnapshot) -> Classification {
        let sample = match self.sample(snapshot) {
            Ok(sample) => sample,
            Err(e) => {
                tracing::trace!(frame = snapshot.frame_index, error = %e, "Rotation undetermined");
                return Classification::Undetermined;
            }
        };

        let result = match self.turn(&sample) {
            Some(turn) => Classification::from(turn > self.config.min_yaw_change),
            None => Classification::Inactive,
        };

        self.push_history(sample);
        result
    }

    fn reset(&mut self) {
        self.history.clear();
    }
}
