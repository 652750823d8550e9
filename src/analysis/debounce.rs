//! 去抖状态机
//!
//! 每种姿势一台，互不影响：Inactive → Pending → Confirmed → Inactive。
//! - Pending 连续 Active 达到 `confirm_frames` 帧后确认，事件帧号取起始帧
//! - Pending 期间出现 Inactive 视为噪声，直接回到 Inactive，不产生事件
//! - Confirmed 连续 Inactive 达到 `release_frames` 帧后释放（滞回）
//! - Undetermined 冻结状态，既不推进也不清零计数；
//!   仅当 `undetermined_tolerance > 0` 且连续不确定帧数超过该值时才放弃当前过程
//!
//! 状态机只认识三值判定结果，与具体姿势无关。

use crate::analysis::config::DebounceConfig;
use crate::analysis::types::Classification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Inactive,
    Pending,
    Confirmed,
}

/// Transition worth reporting to the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceSignal {
    /// Activation confirmed; `onset_frame` is where the run began.
    Onset { onset_frame: u64 },
    /// Confirmed activation released; `end_frame` is its last active frame.
    Release { onset_frame: u64, end_frame: u64 },
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Inactive,
    Pending {
        onset: u64,
        active_run: u32,
    },
    Confirmed {
        onset: u64,
        last_active: u64,
        inactive_run: u32,
    },
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    config: DebounceConfig,
    phase: Phase,
    undetermined_run: u32,
}

impl Debouncer {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            phase: Phase::Inactive,
            undetermined_run: 0,
        }
    }

    pub fn state(&self) -> DebounceState {
        match self.phase {
            Phase::Inactive => DebounceState::Inactive,
            Phase::Pending { .. } => DebounceState::Pending,
            Phase::Confirmed { .. } => DebounceState::Confirmed,
        }
    }

    /// Onset frame of the activation being tracked, pending or confirmed.
    pub fn onset_frame(&self) -> Option<u64> {
        match self.phase {
            Phase::Inactive => None,
            Phase::Pending { onset, .. } | Phase::Confirmed { onset, .. } => Some(onset),
        }
    }

    pub fn update(
        &mut self,
        frame_index: u64,
        classification: Classification,
    ) -> Option<DebounceSignal> {
        match classification {
            Classification::Undetermined => self.on_undetermined(),
            Classification::Active => {
                self.undetermined_run = 0;
                self.on_active(frame_index)
            }
            Classification::Inactive => {
                self.undetermined_run = 0;
                self.on_inactive()
            }
        }
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Inactive;
        self.undetermined_run = 0;
    }

    fn on_active(&mut self, frame_index: u64) -> Option<DebounceSignal> {
        let (onset, active_run) = match self.phase {
            Phase::Inactive => (frame_index, 1),
            Phase::Pending { onset, active_run } => (onset, active_run.saturating_add(1)),
            Phase::Confirmed { onset, .. } => {
                self.phase = Phase::Confirmed {
                    onset,
                    last_active: frame_index,
                    inactive_run: 0,
                };
                return None;
            }
        };

        if active_run >= self.config.confirm_frames {
            self.phase = Phase::Confirmed {
                onset,
                last_active: frame_index,
                inactive_run: 0,
            };
            Some(DebounceSignal::Onset { onset_frame: onset })
        } else {
            self.phase = Phase::Pending { onset, active_run };
            None
        }
    }

    fn on_inactive(&mut self) -> Option<DebounceSignal> {
        match self.phase {
            Phase::Inactive => None,
            Phase::Pending { .. } => {
                self.phase = Phase::Inactive;
                None
            }
            Phase::Confirmed {
                onset,
                last_active,
                inactive_run,
            } => {
                let inactive_run = inactive_run.saturating_add(1);
                if inactive_run >= self.config.release_frames {
                    self.phase = Phase::Inactive;
                    Some(DebounceSignal::Release {
                        onset_frame: onset,
                        end_frame: last_active,
                    })
                } else {
                    self.phase = Phase::Confirmed {
                        onset,
                        last_active,
                        inactive_run,
                    };
                    None
                }
            }
        }
    }

    fn on_undetermined(&mut self) -> Option<DebounceSignal> {
        self.undetermined_run = self.undetermined_run.saturating_add(1);
        let tolerance = self.config.undetermined_tolerance;
        if tolerance == 0 || self.undetermined_run <= tolerance {
            return None;
        }

        match std::mem::replace(&mut self.phase, Phase::Inactive) {
            Phase::Confirmed {
                onset, last_active, ..
            } => Some(DebounceSignal::Release {
                onset_frame: onset,
                end_frame: last_active,
            }),
            Phase::Pending { .. } | Phase::Inactive => None,
        }
    }
}
