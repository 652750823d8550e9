//! 姿势判定器
//!
//! 每个判定器对单帧快照给出 Active / Inactive / Undetermined。
//! 关键点缺失或低于置信度下限时返回 Undetermined，绝不当作 Inactive，
//! 以免跟踪丢失被误记为"姿势结束"。
//!
//! 只有 `RotationClassifier` 持有跨帧状态（朝向滚动窗口），
//! 其余判定器对同一快照的结果恒定。

pub mod arms;
pub mod legs;
pub mod rotation;

use crate::analysis::config::AnalysisConfig;
use crate::analysis::geometry;
use crate::analysis::types::{Classification, FrameSnapshot, Joint, Landmark, PoseType};
use crate::analysis::AnalysisError;

pub use arms::{HandsUpClassifier, TPoseClassifier};
pub use legs::{LegRaiseClassifier, SquatClassifier, StepForwardClassifier};
pub use rotation::RotationClassifier;

/// Per-frame pose predicate.
///
/// Takes `&mut self` so that classifiers with a history window share the
/// interface with single-frame ones; the debouncer never needs to tell them apart.
pub trait PoseClassifier: Send {
    fn pose(&self) -> PoseType;

    fn classify(&mut self, snapshot: &FrameSnapshot) -> Classification;

    /// Drop any cross-frame state.
    fn reset(&mut self) {}
}

/// Confidence-checked landmark lookup over one snapshot.
pub struct Joints<'a> {
    snapshot: &'a FrameSnapshot,
    floor: f64,
}

impl<'a> Joints<'a> {
    pub fn new(snapshot: &'a FrameSnapshot, floor: f64) -> Self {
        Self { snapshot, floor }
    }

    pub fn get(&self, joint: Joint) -> Result<&'a Landmark, AnalysisError> {
        let landmark = self
            .snapshot
            .landmark(joint)
            .ok_or(AnalysisError::MissingJoint(joint))?;
        geometry::ensure_visible(landmark, self.floor)?;
        Ok(landmark)
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }
}

/// Maps a predicate result onto the three-valued verdict.
pub fn verdict(result: Result<bool, AnalysisError>) -> Classification {
    match result {
        Ok(active) => Classification::from(active),
        Err(e) => {
            tracing::trace!(error = %e, "Classifier undetermined");
            Classification::Undetermined
        }
    }
}

/// Fresh classifier set for one analysis run, one per pose type.
pub fn build_classifiers(config: &AnalysisConfig) -> Vec<Box<dyn PoseClassifier>> {
    let floor = config.confidence_floor;
    vec![
        Box::new(HandsUpClassifier::new(floor, config.hands_up.clone())),
        Box::new(TPoseClassifier::new(floor, config.t_pose.clone())),
        Box::new(SquatClassifier::new(floor, config.squat.clone())),
        Box::new(StepForwardClassifier::new(floor, config.step_forward.clone())),
        Box::new(LegRaiseClassifier::new(floor, config.leg_raise.clone())),
        Box::new(RotationClassifier::new(floor, config.rotation.clone())),
    ]
}
