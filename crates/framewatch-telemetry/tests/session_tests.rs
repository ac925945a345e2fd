// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for the recording session lifecycle, driven frame by
//! frame the way a host application would.

mod common;

use std::fs;

use approx::assert_relative_eq;
use common::{config_in, FixedSource};
use framewatch_core::MetricCategories;
use framewatch_telemetry::{
    ConfigError, ExportError, ParsedArtifact, RecordingSession, SamplerConfig, SessionError,
    SessionState, StopReason, ViolationKind,
};

const DELTA: f64 = 0.0167;

fn run_frames(session: &mut RecordingSession, source: &FixedSource, frames: usize, delta: f64) {
    for _ in 0..frames {
        session
            .on_host_frame(delta, source)
            .expect("frame should not fail");
    }
}

fn artifact_count(dir: &std::path::Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Sampling
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_frame_only_session_of_thirty_frames() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), MetricCategories::EMPTY);
    config.profiling.sampling_interval = 10;
    let mut session = RecordingSession::new(config);
    let source = FixedSource::default();

    session.on_toggle_requested().unwrap();
    run_frames(&mut session, &source, 30, DELTA);

    let frames: Vec<u64> = session.samples().iter().map(|s| s.frame).collect();
    assert_eq!(frames, vec![10, 20, 30]);

    let outcome = session
        .on_toggle_requested()
        .unwrap()
        .expect("toggle while recording stops the session");
    assert_eq!(outcome.reason, StopReason::Manual);

    let text = fs::read_to_string(&outcome.artifact_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Frame,Time (s),FPS,Frame Time (ms)");
    for row in &lines[1..] {
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), 4, "row '{row}'");
        assert_eq!(fields[2], "59.88");
        assert_eq!(fields[3], "16.70");
    }
}

#[test]
fn test_sample_count_is_frames_divided_by_interval() {
    let source = FixedSource::default();
    for (frames, interval) in [(0, 1), (1, 1), (7, 3), (25, 5), (99, 10), (9, 10)] {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), MetricCategories::EMPTY);
        config.profiling.sampling_interval = interval;
        let mut session = RecordingSession::new(config);

        session.start_recording().unwrap();
        run_frames(&mut session, &source, frames, DELTA);

        assert_eq!(
            session.samples().len(),
            frames / interval as usize,
            "{frames} frames at interval {interval}"
        );
        assert_eq!(session.frame_counter(), frames as u64);
    }
}

#[test]
fn test_zero_delta_frames_record_zero_fps() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), MetricCategories::EMPTY);
    config.profiling.sampling_interval = 1;
    let mut session = RecordingSession::new(config);

    session.start_recording().unwrap();
    run_frames(&mut session, &FixedSource::default(), 2, 0.0);
    let outcome = session.stop_recording().unwrap().unwrap();

    let text = fs::read_to_string(&outcome.artifact_path).unwrap();
    assert_eq!(
        text,
        "Frame,Time (s),FPS,Frame Time (ms)\n1,0.00,0.00,0.00\n2,0.00,0.00,0.00\n"
    );
    assert!(outcome.report.is_within_thresholds());
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_restart_discards_previous_samples() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), MetricCategories::ALL);
    config.profiling.sampling_interval = 2;
    let mut session = RecordingSession::new(config);
    let source = FixedSource::default();

    session.start_recording().unwrap();
    run_frames(&mut session, &source, 10, DELTA);
    session.stop_recording().unwrap();
    assert_eq!(session.samples().len(), 5);

    session.start_recording().unwrap();
    assert!(session.samples().is_empty());
    assert_eq!(session.frame_counter(), 0);

    run_frames(&mut session, &source, 4, DELTA);
    let frames: Vec<u64> = session.samples().iter().map(|s| s.frame).collect();
    assert_eq!(frames, vec![2, 4]);
    assert_relative_eq!(session.samples()[0].elapsed_secs, 2.0 * DELTA, epsilon = 1e-9);
}

#[test]
fn test_stop_while_idle_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), MetricCategories::EMPTY);
    config.profiling.sampling_interval = 1;
    let mut session = RecordingSession::new(config);

    assert!(session.stop_recording().unwrap().is_none());
    assert_eq!(artifact_count(dir.path()), 0);

    session.start_recording().unwrap();
    run_frames(&mut session, &FixedSource::default(), 3, DELTA);
    assert!(session.stop_recording().unwrap().is_some());
    assert_eq!(artifact_count(dir.path()), 1);

    assert!(session.stop_recording().unwrap().is_none());
    assert_eq!(session.samples().len(), 3);
    assert_eq!(artifact_count(dir.path()), 1);
}

#[test]
fn test_immediate_stop_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = RecordingSession::new(config_in(dir.path(), MetricCategories::ALL));

    session.on_toggle_requested().unwrap();
    let outcome = session.on_toggle_requested().unwrap().unwrap();

    let text = fs::read_to_string(&outcome.artifact_path).unwrap();
    assert_eq!(text, format!("{}\n", session.header()));
    assert_eq!(outcome.report.sample_count, 0);
}

#[test]
fn test_auto_stop_after_configured_duration() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), MetricCategories::EMPTY);
    config.profiling.sampling_interval = 1;
    config.profiling.auto_stop_enabled = true;
    config.profiling.recording_duration_secs = 2.0;
    let mut session = RecordingSession::new(config);
    let source = FixedSource::default();

    // Idle frames before the start do not count against the duration.
    run_frames(&mut session, &source, 3, 0.5);
    session.start_recording().unwrap();

    let mut stopped_at = None;
    for frame in 1..=10 {
        if let Some(outcome) = session.on_host_frame(0.5, &source).unwrap() {
            stopped_at = Some((frame, outcome));
            break;
        }
    }

    let (frame, outcome) = stopped_at.expect("session should stop by itself");
    assert_eq!(frame, 4);
    assert_eq!(outcome.reason, StopReason::AutoStop);
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.elapsed_secs() >= 2.0);
    assert_eq!(session.samples().len(), 3);
    assert_eq!(artifact_count(dir.path()), 1);
}

#[test]
fn test_double_start_is_rejected_without_losing_samples() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), MetricCategories::EMPTY);
    config.profiling.sampling_interval = 1;
    let mut session = RecordingSession::new(config);

    session.start_recording().unwrap();
    run_frames(&mut session, &FixedSource::default(), 2, DELTA);

    let err = session.start_recording().unwrap_err();
    assert!(matches!(err, SessionError::InvalidTransition { .. }));
    assert!(session.is_recording());
    assert_eq!(session.samples().len(), 2);
}

#[test]
fn test_malformed_template_refuses_to_start() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), MetricCategories::EMPTY);
    config.profiling.output_file_name_template = "profile.csv".to_string();
    let mut session = RecordingSession::new(config);

    let err = session.on_toggle_requested().unwrap_err();
    assert!(matches!(
        err,
        SessionError::Config(ConfigError::InvalidFileNameTemplate { .. })
    ));
    assert_eq!(session.state(), SessionState::Idle);
}

// ─────────────────────────────────────────────────────────────────────────────
// Export and analysis
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_failed_export_keeps_samples_for_retry() {
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("profiles");
    fs::write(&blocked, "a file where the directory should be").unwrap();

    let mut config = config_in(&blocked, MetricCategories::EMPTY);
    config.profiling.sampling_interval = 1;
    let mut session = RecordingSession::new(config);

    session.start_recording().unwrap();
    run_frames(&mut session, &FixedSource::default(), 3, DELTA);

    let err = session.stop_recording().unwrap_err();
    assert!(matches!(err, SessionError::Export(ExportError::Io { .. })));
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.samples().len(), 3);

    fs::remove_file(&blocked).unwrap();
    let path = session.export_last_session().unwrap();
    let parsed = ParsedArtifact::read(&path).unwrap();
    assert_eq!(parsed.samples.len(), 3);
}

#[test]
fn test_export_while_recording_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = RecordingSession::new(config_in(dir.path(), MetricCategories::EMPTY));
    session.start_recording().unwrap();

    assert!(matches!(
        session.export_last_session(),
        Err(SessionError::InvalidTransition {
            state: SessionState::Recording,
            ..
        })
    ));
}

#[test]
fn test_exported_rows_parse_back_to_the_same_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), MetricCategories::ALL);
    config.profiling.sampling_interval = 5;
    let mut session = RecordingSession::new(config);
    let source = FixedSource::default();

    session.start_recording().unwrap();
    run_frames(&mut session, &source, 15, DELTA);
    let outcome = session.stop_recording().unwrap().unwrap();

    let parsed = ParsedArtifact::read(&outcome.artifact_path).unwrap();
    assert_eq!(&parsed.layout, session.layout());
    assert_eq!(parsed.samples.len(), session.samples().len());

    for (parsed, recorded) in parsed.samples.iter().zip(session.samples()) {
        assert_eq!(parsed.frame, recorded.frame);
        assert_eq!(parsed.categories(), recorded.categories());
        assert_relative_eq!(parsed.fps, recorded.fps, epsilon = 0.005);
        assert_relative_eq!(parsed.elapsed_secs, recorded.elapsed_secs, epsilon = 0.005);
        assert_eq!(parsed.draw_counters, recorded.draw_counters);
        assert_eq!(parsed.physics, recorded.physics);
        assert_eq!(parsed.quality, recorded.quality);
        assert_eq!(parsed.audio, recorded.audio);

        let memory = parsed.memory.unwrap();
        assert_relative_eq!(memory.allocated_mb, 300.0);
        assert_relative_eq!(memory.reserved_mb, 512.0);
        assert_relative_eq!(parsed.gpu_time_ms.unwrap(), 4.25);

        let timings = parsed.script_timings.as_ref().unwrap();
        assert_eq!(timings.len(), 2);
        assert_relative_eq!(timings.get("EnemyAi").unwrap(), 33.4, epsilon = 1e-9);
        assert_relative_eq!(timings.get("PlayerController").unwrap(), 16.7, epsilon = 1e-9);
    }
}

#[test]
fn test_analysis_report_written_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), MetricCategories::DRAW_COUNTERS);
    config.profiling.sampling_interval = 1;
    config.profiling.write_analysis_report = true;
    config.thresholds.max_acceptable_draw_calls = 100;
    let mut session = RecordingSession::new(config);

    session.start_recording().unwrap();
    run_frames(&mut session, &FixedSource::default(), 3, DELTA);
    let outcome = session.stop_recording().unwrap().unwrap();

    assert_eq!(
        outcome
            .report
            .violations_of(ViolationKind::ExcessiveDrawCalls)
            .count(),
        3
    );
    assert_eq!(outcome.report.max_draw_calls, Some(140));

    let report_path = outcome.report_path.expect("report should be written");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
    assert_eq!(json["violations"][0]["kind"], "excessive_draw_calls");
    assert_eq!(json["violations"][0]["frame"], 1);
}

#[test]
fn test_session_driven_by_a_ron_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), MetricCategories::AUDIO | MetricCategories::PHYSICS);
    config.profiling.sampling_interval = 3;
    let config_path = dir.path().join("sampler.ron");
    config.to_file(&config_path).unwrap();

    let loaded = SamplerConfig::from_file(&config_path).unwrap();
    assert_eq!(loaded, config);

    let mut session = RecordingSession::new(loaded);
    session.start_recording().unwrap();
    run_frames(&mut session, &FixedSource::default(), 6, DELTA);
    assert_eq!(
        session.header(),
        "Frame,Time (s),FPS,Frame Time (ms),\
         Physics Simulation Mode,Fixed Delta Time,Auto Simulation,\
         Audio Sample Rate,Speaker Mode,Audio Listener Volume"
    );
    assert_eq!(session.samples().len(), 2);
}
