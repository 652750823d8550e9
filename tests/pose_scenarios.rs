mod common;

use dance_pose_backend::analysis::debounce::DebounceState;
use dance_pose_backend::analysis::{
    analyze_frames, AnalysisConfig, Classification, FrameSnapshot, PoseAnalyzer, PoseType,
};

use common::fixtures::{
    facing, facing_without_depth, hands_up, hands_up_low_confidence, hands_up_sequence, neutral,
    squat, t_pose,
};

fn run(frames: Vec<FrameSnapshot>) -> dance_pose_backend::analysis::AnalysisReport {
    analyze_frames(frames, &AnalysisConfig::default(), None).expect("analysis succeeds")
}

fn classification_of(
    outcome: &dance_pose_backend::analysis::engine::FrameOutcome,
    pose: PoseType,
) -> Classification {
    outcome
        .classifications
        .iter()
        .find(|(p, _)| *p == pose)
        .map(|(_, c)| *c)
        .expect("pose classified")
}

#[test]
fn each_fixture_triggers_only_its_pose() {
    let cases: [(fn(u64) -> FrameSnapshot, PoseType); 3] = [
        (hands_up, PoseType::HandsUp),
        (t_pose, PoseType::TPose),
        (squat, PoseType::Squat),
    ];

    for (fixture, expected) in cases {
        let mut analyzer = PoseAnalyzer::new(&AnalysisConfig::default()).unwrap();
        let outcome = analyzer.push(&fixture(0));
        for (pose, classification) in &outcome.classifications {
            let want = if *pose == expected {
                Classification::Active
            } else {
                Classification::Inactive
            };
            assert_eq!(*classification, want, "{pose} on {expected} fixture");
        }
    }
}

#[test]
fn neutral_frames_produce_no_events() {
    let report = run((0..30).map(neutral).collect());
    assert!(report.events.is_empty());
    assert_eq!(report.total_frames, 30);
    for pose in PoseType::ALL {
        assert_eq!(report.count(pose), 0);
    }
}

#[test]
fn low_confidence_wrists_are_undetermined_not_inactive() {
    let mut analyzer = PoseAnalyzer::new(&AnalysisConfig::default()).unwrap();
    for frame in 0..2 {
        analyzer.push(&hands_up(frame));
    }
    assert_eq!(analyzer.state_of(PoseType::HandsUp), Some(DebounceState::Pending));

    let outcome = analyzer.push(&hands_up_low_confidence(2));
    assert_eq!(
        classification_of(&outcome, PoseType::HandsUp),
        Classification::Undetermined
    );
    // frozen, not reset
    assert_eq!(analyzer.state_of(PoseType::HandsUp), Some(DebounceState::Pending));

    let outcome = analyzer.push(&hands_up(3));
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].onset_frame, 0);
}

#[test]
fn same_input_same_report() {
    let frames = hands_up_sequence(40, 5..20);
    let a = run(frames.clone());
    let b = run(frames);
    assert_eq!(a.events, b.events);
    assert_eq!(a.counts, b.counts);
    assert_eq!(a.active_frames, b.active_frames);
}

#[test]
fn repeated_holds_are_counted_separately() {
    let frames: Vec<FrameSnapshot> = (0..30)
        .map(|i| match i {
            2..=6 | 15..=20 => hands_up(i),
            _ => neutral(i),
        })
        .collect();
    let report = run(frames);
    assert_eq!(report.count(PoseType::HandsUp), 2);
    let onsets: Vec<u64> = report
        .events_for(PoseType::HandsUp)
        .map(|e| e.onset_frame)
        .collect();
    assert_eq!(onsets, vec![2, 15]);
}

#[test]
fn brief_relapse_does_not_release() {
    let frames: Vec<FrameSnapshot> = (0..20)
        .map(|i| match i {
            2..=6 | 9..=12 => hands_up(i),
            _ => neutral(i),
        })
        .collect();
    let report = run(frames);
    assert_eq!(report.count(PoseType::HandsUp), 1);
    let event = report.events_for(PoseType::HandsUp).next().unwrap();
    assert_eq!(event.onset_frame, 2);
    assert_eq!(event.end_frame, Some(12));
}

#[test]
fn co_occurring_poses_are_both_reported() {
    // Hands up while turning: both debouncers run independently.
    let frames: Vec<FrameSnapshot> = (0..12)
        .map(|i| {
            let mut frame = if i >= 4 { facing(i, 45.0) } else { facing(i, 0.0) };
            if (4..10).contains(&i) {
                let raised = hands_up(i);
                if let (Some(lm), Some(src)) = (frame.landmarks.as_mut(), raised.landmarks) {
                    for joint in [
                        dance_pose_backend::analysis::types::Joint::LeftWrist,
                        dance_pose_backend::analysis::types::Joint::RightWrist,
                        dance_pose_backend::analysis::types::Joint::LeftElbow,
                        dance_pose_backend::analysis::types::Joint::RightElbow,
                    ] {
                        lm.insert(joint, src[&joint]);
                    }
                }
            }
            frame
        })
        .collect();

    let report = run(frames);
    assert_eq!(report.count(PoseType::HandsUp), 1);
    assert_eq!(report.count(PoseType::Rotation), 1);
    let rotation = report.events_for(PoseType::Rotation).next().unwrap();
    assert_eq!(rotation.onset_frame, 4);
    assert_eq!(rotation.end_frame, Some(6));
    // events sorted by onset, ties broken by pose order
    assert_eq!(report.events[0].pose, PoseType::HandsUp);
    assert_eq!(report.events[1].pose, PoseType::Rotation);
}

#[test]
fn rotation_is_detected_without_depth() {
    // Square to the camera for four frames, then turned ~80 degrees and held.
    let frames: Vec<FrameSnapshot> = (0..12)
        .map(|i| facing_without_depth(i, if i >= 4 { 80.0 } else { 0.0 }))
        .collect();
    assert!(frames[0].landmarks.as_ref().unwrap().values().all(|lm| lm.z.is_none()));

    let report = run(frames);
    assert_eq!(report.events.len(), 1);
    let rotation = report.events_for(PoseType::Rotation).next().unwrap();
    assert_eq!(rotation.onset_frame, 4);
    // the rolling baseline catches up once the window holds only turned samples
    assert_eq!(rotation.end_frame, Some(8));
    assert_eq!(report.active_frames[&PoseType::Rotation], 5);
}

#[test]
fn partial_report_reflects_progress() {
    let mut analyzer = PoseAnalyzer::new(&AnalysisConfig::default())
        .unwrap()
        .with_source("live");
    for frame in hands_up_sequence(6, 1..6) {
        analyzer.push(&frame);
    }
    let partial = analyzer.partial_report();
    assert_eq!(partial.source.as_deref(), Some("live"));
    assert_eq!(partial.count(PoseType::HandsUp), 1);
    assert_eq!(partial.events[0].end_frame, None);
    assert_eq!(analyzer.frames_seen(), 6);
}
