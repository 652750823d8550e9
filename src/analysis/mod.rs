//! 舞蹈姿势分析引擎
//!
//! 输入为外部姿态模型逐帧给出的人体关键点，输出为去抖后的姿势事件报告。
//!
//! ## 模块
//! - `types`: 关键点、帧快照、姿势类型与事件
//! - `config`: 每次分析独立持有的阈值配置
//! - `geometry`: 距离、夹角等纯几何计算
//! - `classifier`: 各姿势的判定器
//! - `debounce`: 每种姿势独立的去抖状态机
//! - `report`: 事件汇总与报告
//! - `engine`: 串联以上模块的单次分析流程

pub mod classifier;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod geometry;
pub mod report;
pub mod types;

use thiserror::Error;

use crate::analysis::types::Joint;

pub use config::AnalysisConfig;
pub use engine::{analyze_frames, PoseAnalyzer};
pub use report::AnalysisReport;
pub use types::{Classification, FrameSnapshot, Landmark, PoseEvent, PoseType};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("landmark visibility {visibility:.2} below confidence floor {floor:.2}")]
    InsufficientConfidence { visibility: f64, floor: f64 },
    #[error("joint {0} missing from snapshot")]
    MissingJoint(Joint),
    #[error("3D geometry requested on a landmark without depth")]
    MissingDepth,
    #[error("degenerate segment: endpoints coincide")]
    DegenerateSegment,
    #[error("malformed snapshot at frame {frame_index}: {reason}")]
    MalformedSnapshot { frame_index: u64, reason: String },
    #[error("no frames were classified")]
    EmptyVideo,
    #[error("invalid analysis config: {0}")]
    InvalidConfig(String),
}
