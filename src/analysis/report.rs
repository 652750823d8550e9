use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::debounce::DebounceSignal;
use crate::analysis::types::{PoseEvent, PoseType};
use crate::analysis::AnalysisError;

/// Final result for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub total_frames: u64,
    pub undetected_frames: u64,
    pub malformed_frames: u64,
    /// Confirmed activations ordered by onset frame.
    pub events: Vec<PoseEvent>,
    /// Events per pose; every pose type is present.
    pub counts: BTreeMap<PoseType, u32>,
    /// Raw per-frame `Active` verdicts per pose, before debouncing.
    pub active_frames: BTreeMap<PoseType, u64>,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn count(&self, pose: PoseType) -> u32 {
        self.counts.get(&pose).copied().unwrap_or(0)
    }

    pub fn events_for(&self, pose: PoseType) -> impl Iterator<Item = &PoseEvent> {
        self.events.iter().filter(move |e| e.pose == pose)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Detected,
    Undetected,
    Malformed,
}

/// Incremental report assembly. Owned by a single analysis run.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    source: Option<String>,
    total_frames: u64,
    undetected_frames: u64,
    malformed_frames: u64,
    events: Vec<PoseEvent>,
    open: BTreeMap<PoseType, usize>,
    active_frames: BTreeMap<PoseType, u64>,
}

impl ReportBuilder {
    pub fn new(source: Option<String>) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    pub fn record_frame(&mut self, kind: FrameKind) {
        self.total_frames += 1;
        match kind {
            FrameKind::Detected => {}
            FrameKind::Undetected => self.undetected_frames += 1,
            FrameKind::Malformed => self.malformed_frames += 1,
        }
    }

    pub fn record_active(&mut self, pose: PoseType) {
        *self.active_frames.entry(pose).or_insert(0) += 1;
    }

    /// Applies a debouncer transition, returning the event it opened or closed.
    pub fn apply(&mut self, pose: PoseType, signal: DebounceSignal) -> Option<PoseEvent> {
        match signal {
            DebounceSignal::Onset { onset_frame } => {
                let event = PoseEvent {
                    pose,
                    onset_frame,
                    end_frame: None,
                };
                self.open.insert(pose, self.events.len());
                self.events.push(event);
                Some(event)
            }
            DebounceSignal::Release {
                onset_frame,
                end_frame,
            } => match self.open.remove(&pose) {
                Some(idx) => {
                    let event = &mut self.events[idx];
                    event.end_frame = Some(end_frame);
                    Some(*event)
                }
                None => {
                    tracing::warn!(pose = %pose, onset_frame, end_frame, "Release without open event, ignored");
                    None
                }
            },
        }
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Partial report of everything confirmed so far. Never fails.
    pub fn snapshot(&self) -> AnalysisReport {
        let mut events = self.events.clone();
        // confirmations can land out of onset order when one pose was frozen by dropout
        events.sort_by_key(|e| (e.onset_frame, e.pose));

        let mut counts: BTreeMap<PoseType, u32> = PoseType::ALL.iter().map(|p| (*p, 0)).collect();
        for event in &events {
            *counts.entry(event.pose).or_insert(0) += 1;
        }
        let mut active_frames: BTreeMap<PoseType, u64> =
            PoseType::ALL.iter().map(|p| (*p, 0)).collect();
        for (pose, n) in &self.active_frames {
            active_frames.insert(*pose, *n);
        }

        AnalysisReport {
            source: self.source.clone(),
            total_frames: self.total_frames,
            undetected_frames: self.undetected_frames,
            malformed_frames: self.malformed_frames,
            events,
            counts,
            active_frames,
            generated_at: Utc::now(),
        }
    }

    pub fn finish(self) -> Result<AnalysisReport, AnalysisError> {
        if self.total_frames == 0 {
            return Err(AnalysisError::EmptyVideo);
        }
        Ok(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stream_is_an_error() {
        let builder = ReportBuilder::new(None);
        assert_eq!(builder.finish().unwrap_err(), AnalysisError::EmptyVideo);
    }

    #[test]
    fn frames_without_poses_is_valid() {
        let mut builder = ReportBuilder::new(Some("clip.mp4".to_string()));
        builder.record_frame(FrameKind::Detected);
        builder.record_frame(FrameKind::Undetected);
        let report = builder.finish().unwrap();
        assert_eq!(report.total_frames, 2);
        assert_eq!(report.undetected_frames, 1);
        assert!(report.events.is_empty());
        assert_eq!(report.counts.len(), PoseType::ALL.len());
        assert!(report.counts.values().all(|n| *n == 0));
    }

    #[test]
    fn release_closes_matching_event() {
        let mut builder = ReportBuilder::new(None);
        builder.record_frame(FrameKind::Detected);
        builder.apply(PoseType::Squat, DebounceSignal::Onset { onset_frame: 4 });
        builder.apply(PoseType::HandsUp, DebounceSignal::Onset { onset_frame: 5 });
        let closed = builder
            .apply(
                PoseType::Squat,
                DebounceSignal::Release {
                    onset_frame: 4,
                    end_frame: 9,
                },
            )
            .unwrap();
        assert_eq!(closed.end_frame, Some(9));

        let report = builder.finish().unwrap();
        assert_eq!(report.events[0].end_frame, Some(9));
        assert_eq!(report.events[1].end_frame, None);
        assert_eq!(report.count(PoseType::Squat), 1);
        assert_eq!(report.count(PoseType::HandsUp), 1);
    }

    #[test]
    fn events_are_ordered_by_onset() {
        let mut builder = ReportBuilder::new(None);
        builder.record_frame(FrameKind::Detected);
        builder.apply(PoseType::HandsUp, DebounceSignal::Onset { onset_frame: 8 });
        builder.apply(PoseType::Rotation, DebounceSignal::Onset { onset_frame: 3 });
        let report = builder.snapshot();
        let onsets: Vec<u64> = report.events.iter().map(|e| e.onset_frame).collect();
        assert_eq!(onsets, vec![3, 8]);
    }

    #[test]
    fn report_json_uses_pose_identifiers() {
        let mut builder = ReportBuilder::new(None);
        builder.record_frame(FrameKind::Detected);
        builder.apply(PoseType::TPose, DebounceSignal::Onset { onset_frame: 0 });
        let json = serde_json::to_value(builder.finish().unwrap()).unwrap();
        assert_eq!(json["events"][0]["pose"], "TPose");
        assert_eq!(json["events"][0]["onsetFrame"], 0);
        assert_eq!(json["counts"]["TPose"], 1);
        assert_eq!(json["counts"]["StepForward"], 0);
        assert!(json.get("source").is_none());
    }
}
