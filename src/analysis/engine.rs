use crate::analysis::classifier::{build_classifiers, PoseClassifier};
use crate::analysis::config::AnalysisConfig;
use crate::analysis::debounce::{DebounceState, Debouncer};
use crate::analysis::report::{AnalysisReport, FrameKind, ReportBuilder};
use crate::analysis::types::{Classification, FrameSnapshot, Joint, PoseEvent, PoseType};
use crate::analysis::AnalysisError;

struct PoseTrack {
    classifier: Box<dyn PoseClassifier>,
    debouncer: Debouncer,
}

/// What one frame contributed to the run.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub frame_index: u64,
    pub kind: FrameKind,
    pub classifications: Vec<(PoseType, Classification)>,
    /// Events opened or closed on this frame.
    pub events: Vec<PoseEvent>,
}

/// One video's worth of classifier and debouncer state.
///
/// Not shared between streams: build a new analyzer per video.
pub struct PoseAnalyzer {
    tracks: Vec<PoseTrack>,
    source: Option<String>,
    report: ReportBuilder,
    last_frame: Option<u64>,
}

impl PoseAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        Self::with_classifiers(config, build_classifiers(config))
    }

    /// Analyzer over a custom classifier set; each gets its own debouncer.
    pub fn with_classifiers(
        config: &AnalysisConfig,
        classifiers: Vec<Box<dyn PoseClassifier>>,
    ) -> Result<Self, AnalysisError> {
        config.validate()?;
        let tracks = classifiers
            .into_iter()
            .map(|classifier| PoseTrack {
                classifier,
                debouncer: Debouncer::new(config.debounce.clone()),
            })
            .collect();
        Ok(Self {
            tracks,
            source: None,
            report: ReportBuilder::new(None),
            last_frame: None,
        })
    }

    /// Labels the report; call before pushing frames.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self.report = ReportBuilder::new(self.source.clone());
        self
    }

    /// Drops all per-stream state so the analyzer can take a new video.
    pub fn reset(&mut self) {
        for track in self.tracks.iter_mut() {
            track.classifier.reset();
            track.debouncer.reset();
        }
        self.report = ReportBuilder::new(self.source.clone());
        self.last_frame = None;
    }

    pub fn frames_seen(&self) -> u64 {
        self.report.total_frames()
    }

    pub fn state_of(&self, pose: PoseType) -> Option<DebounceState> {
        self.tracks
            .iter()
            .find(|t| t.classifier.pose() == pose)
            .map(|t| t.debouncer.state())
    }

    pub fn push(&mut self, snapshot: &FrameSnapshot) -> FrameOutcome {
        let frame_index = snapshot.frame_index;
        let kind = match validate_snapshot(snapshot, self.last_frame) {
            Ok(()) if snapshot.is_detected() => FrameKind::Detected,
            Ok(()) => FrameKind::Undetected,
            Err(e) => {
                tracing::warn!(frame = frame_index, error = %e, "Malformed snapshot, treating frame as undetermined");
                FrameKind::Malformed
            }
        };
        if self.last_frame.map_or(true, |last| frame_index > last) {
            self.last_frame = Some(frame_index);
        }
        self.report.record_frame(kind);

        let mut classifications = Vec::with_capacity(self.tracks.len());
        let mut events = Vec::new();
        for track in self.tracks.iter_mut() {
            let pose = track.classifier.pose();
            let classification = match kind {
                FrameKind::Malformed => Classification::Undetermined,
                _ => track.classifier.classify(snapshot),
            };
            if classification == Classification::Active {
                self.report.record_active(pose);
            }
            if let Some(signal) = track.debouncer.update(frame_index, classification) {
                tracing::debug!(frame = frame_index, pose = %pose, ?signal, "Pose transition");
                if let Some(event) = self.report.apply(pose, signal) {
                    events.push(event);
                }
            }
            classifications.push((pose, classification));
        }

        FrameOutcome {
            frame_index,
            kind,
            classifications,
            events,
        }
    }

    /// Everything confirmed so far; valid even if the stream is abandoned.
    pub fn partial_report(&self) -> AnalysisReport {
        self.report.snapshot()
    }

    pub fn finish(self) -> Result<AnalysisReport, AnalysisError> {
        self.report.finish()
    }
}

/// Checks a snapshot against the landmark-source contract.
pub fn validate_snapshot(
    snapshot: &FrameSnapshot,
    last_frame: Option<u64>,
) -> Result<(), AnalysisError> {
    let malformed = |reason: String| AnalysisError::MalformedSnapshot {
        frame_index: snapshot.frame_index,
        reason,
    };

    if let Some(last) = last_frame {
        if snapshot.frame_index <= last {
            return Err(malformed(format!(
                "frame index not increasing (previous {last})"
            )));
        }
    }

    let Some(landmarks) = snapshot.landmarks.as_ref() else {
        return Ok(());
    };

    let missing: Vec<&str> = Joint::REQUIRED
        .iter()
        .filter(|j| !landmarks.contains_key(*j))
        .map(|j| j.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(malformed(format!("missing joints: {}", missing.join(", "))));
    }

    for (joint, landmark) in landmarks {
        if !landmark.is_finite() {
            return Err(malformed(format!("{joint} has non-finite coordinates")));
        }
        if !(0.0..=1.0).contains(&landmark.visibility) {
            return Err(malformed(format!(
                "{joint} visibility {} outside [0,1]",
                landmark.visibility
            )));
        }
    }
    Ok(())
}

/// Runs a full analysis over a forward-only frame sequence.
pub fn analyze_frames<I>(
    frames: I,
    config: &AnalysisConfig,
    source: Option<String>,
) -> Result<AnalysisReport, AnalysisError>
where
    I: IntoIterator<Item = FrameSnapshot>,
{
    let mut analyzer = PoseAnalyzer::new(config)?;
    if let Some(source) = source {
        analyzer = analyzer.with_source(source);
    }
    for snapshot in frames {
        analyzer.push(&snapshot);
    }
    let report = analyzer.finish()?;
    tracing::info!(
        total_frames = report.total_frames,
        undetected_frames = report.undetected_frames,
        malformed_frames = report.malformed_frames,
        events = report.events.len(),
        "Pose analysis complete"
    );
    Ok(report)
}
