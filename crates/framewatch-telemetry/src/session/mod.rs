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

//! The recording session state machine.

pub mod timer;

use std::fmt::{self, Display};
use std::path::PathBuf;

use chrono::Local;
use framewatch_core::MetricSource;

use crate::analysis::{analyze, AnalysisReport};
use crate::config::SamplerConfig;
use crate::error::{SessionError, SessionResult};
use crate::export::CsvExporter;
use crate::sample::{Sample, SampleComposer, SampleLayout};

pub use self::timer::{AutoStopTimer, FrameClock};

/// The two states of a [`RecordingSession`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Not recording. Initial state, re-entered after every stop.
    #[default]
    Idle,
    /// Capturing samples.
    Recording,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Recording => write!(f, "recording"),
        }
    }
}

/// Why a recording ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Toggled or stopped by the host.
    Manual,
    /// The auto-stop duration elapsed.
    AutoStop,
}

/// The result of a completed session.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// Why the session ended.
    pub reason: StopReason,
    /// Where the CSV artifact was written.
    pub artifact_path: PathBuf,
    /// Where the analysis report was written, if enabled and successful.
    pub report_path: Option<PathBuf>,
    /// The threshold analysis of the session.
    pub report: AnalysisReport,
}

/// Owns the Idle/Recording state and the sample buffer of a profiler.
///
/// The host calls [`on_host_frame`](Self::on_host_frame) once per rendered
/// frame and [`on_toggle_requested`](Self::on_toggle_requested) on each
/// toggle key press. Everything runs synchronously on the caller's thread.
///
/// The sample buffer is unbounded: it grows for the whole session and is only
/// cleared when the next session starts. Pick `sampling_interval` and the
/// recording duration with the expected session length in mind.
#[derive(Debug)]
pub struct RecordingSession {
    config: SamplerConfig,
    active: SamplerConfig,
    state: SessionState,
    clock: FrameClock,
    start_timestamp: f64,
    frame_counter: u64,
    composer: SampleComposer,
    samples: Vec<Sample>,
    auto_stop: Option<AutoStopTimer>,
    last_report: Option<AnalysisReport>,
}

impl RecordingSession {
    /// Creates an idle session. The configuration is validated on start.
    pub fn new(config: SamplerConfig) -> Self {
        let composer = SampleComposer::new(config.profiling.categories());
        Self {
            active: config.clone(),
            config,
            state: SessionState::Idle,
            clock: FrameClock::new(),
            start_timestamp: 0.0,
            frame_counter: 0,
            composer,
            samples: Vec::new(),
            auto_stop: None,
            last_report: None,
        }
    }

    /// The configuration the next session will use.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Replaces the configuration. A session already recording keeps the
    /// settings it started with.
    pub fn set_config(&mut self, config: SamplerConfig) {
        if self.is_recording() {
            log::debug!("Configuration changed while recording; applies to the next session");
        }
        self.config = config;
    }

    /// The current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns `true` while recording.
    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Frames seen since the current (or last) session started.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Samples of the current (or last) session.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The column layout of the current (or last) session.
    pub fn layout(&self) -> &SampleLayout {
        self.composer.layout()
    }

    /// The header line of the current (or last) session.
    pub fn header(&self) -> String {
        self.layout().header()
    }

    /// Seconds since the current (or last) session started, on the frame clock.
    pub fn elapsed_secs(&self) -> f64 {
        self.clock.now() - self.start_timestamp
    }

    /// Seconds before the pending auto-stop fires, if one is scheduled.
    pub fn auto_stop_remaining(&self) -> Option<f64> {
        self.auto_stop
            .map(|timer| timer.remaining(self.clock.now()))
    }

    /// Handles the host's edge-triggered toggle signal.
    ///
    /// Starts a session when idle and stops it when recording. Returns the
    /// outcome when this call ended a session.
    pub fn on_toggle_requested(&mut self) -> SessionResult<Option<SessionOutcome>> {
        match self.state {
            SessionState::Idle => {
                self.start_recording()?;
                Ok(None)
            }
            SessionState::Recording => self.stop_recording(),
        }
    }

    /// Starts a new session, discarding the samples of the previous one.
    ///
    /// Fails without changing anything if already recording or if the
    /// configuration is invalid.
    pub fn start_recording(&mut self) -> SessionResult<()> {
        if self.is_recording() {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                action: "start recording",
            });
        }
        if let Err(err) = self.config.profiling.validate() {
            log::warn!("Refusing to start profiling: {err}");
            return Err(err.into());
        }

        self.active = self.config.clone();
        let profiling = &self.active.profiling;
        self.composer = SampleComposer::new(profiling.categories());
        self.samples.clear();
        self.last_report = None;
        self.frame_counter = 0;
        self.start_timestamp = self.clock.now();
        self.auto_stop = profiling
            .auto_stop_enabled
            .then(|| AutoStopTimer::schedule(self.clock.now(), profiling.recording_duration_secs));
        self.state = SessionState::Recording;

        self.announce(format_args!(
            "Profiling started. Press {} again to stop and export the data.",
            self.active.profiling.toggle_key
        ));
        log::debug!("Profiling columns: {}", self.composer.layout().header());
        if let Some(timer) = self.auto_stop {
            log::debug!("Auto-stop scheduled in {:.2}s", timer.remaining(self.clock.now()));
        }
        Ok(())
    }

    /// Advances the session by one host frame.
    ///
    /// While recording, every frame is counted and a sample is captured when
    /// the frame counter is a multiple of the sampling interval. If the
    /// auto-stop timer is due, the session stops instead and the outcome is
    /// returned.
    pub fn on_host_frame(
        &mut self,
        delta_secs: f64,
        source: &dyn MetricSource,
    ) -> SessionResult<Option<SessionOutcome>> {
        self.clock.advance(delta_secs);
        if !self.is_recording() {
            return Ok(None);
        }

        if self
            .auto_stop
            .is_some_and(|timer| timer.is_due(self.clock.now()))
        {
            log::debug!("Auto-stop reached after {:.2}s", self.elapsed_secs());
            return self.stop(StopReason::AutoStop);
        }

        self.frame_counter += 1;
        let interval = u64::from(self.active.profiling.sampling_interval);
        if self.frame_counter % interval != 0 {
            return Ok(None);
        }

        let elapsed = self.elapsed_secs();
        let sample = self
            .composer
            .compose(source, self.frame_counter, elapsed, delta_secs);
        log::trace!("Captured sample at frame {}", self.frame_counter);
        self.samples.push(sample);
        Ok(None)
    }

    /// Stops the session, exports the buffer and analyzes it.
    ///
    /// Does nothing and returns `Ok(None)` when already idle. The analysis
    /// runs and is logged before the export, so it is available from
    /// [`last_report`](Self::last_report) even when the export fails. On
    /// export failure the session is still idle and the samples stay buffered
    /// for [`export_last_session`](Self::export_last_session).
    pub fn stop_recording(&mut self) -> SessionResult<Option<SessionOutcome>> {
        self.stop(StopReason::Manual)
    }

    /// Writes the samples of the last session again, e.g. after a failed export.
    ///
    /// Uses the output directory and file name template of the current
    /// configuration, so a failing destination can be changed with
    /// [`set_config`](Self::set_config) before retrying.
    pub fn export_last_session(&self) -> SessionResult<PathBuf> {
        if self.is_recording() {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                action: "export",
            });
        }
        self.config.profiling.validate()?;
        let exporter = CsvExporter::from_config(&self.config.profiling);
        let path = exporter.export(
            self.composer.layout(),
            &self.samples,
            Local::now().naive_local(),
        )?;
        self.announce(format_args!("Profiling data exported to: {}", path.display()));
        Ok(path)
    }

    /// The analysis produced when the last session stopped, whether or not its
    /// export succeeded. `None` while recording or before the first stop.
    pub fn last_report(&self) -> Option<&AnalysisReport> {
        self.last_report.as_ref()
    }

    /// Runs the threshold analysis over the current (or last) session's samples.
    pub fn analyze_last_session(&self) -> AnalysisReport {
        analyze(&self.samples, &self.active.thresholds)
    }

    fn stop(&mut self, reason: StopReason) -> SessionResult<Option<SessionOutcome>> {
        if !self.is_recording() {
            log::debug!("Stop requested while idle; nothing to do");
            return Ok(None);
        }

        self.state = SessionState::Idle;
        if self.auto_stop.take().is_some() && reason == StopReason::Manual {
            log::debug!("Cancelled pending auto-stop");
        }

        let report = self.analyze_last_session();
        report.log_summary(!self.active.profiling.suppress_console_log);
        self.last_report = Some(report.clone());

        let exporter = CsvExporter::from_config(&self.active.profiling);
        let artifact_path = match exporter.export(
            self.composer.layout(),
            &self.samples,
            Local::now().naive_local(),
        ) {
            Ok(path) => path,
            Err(err) => {
                log::error!(
                    "Failed to export {} samples: {err}. They remain buffered for re-export.",
                    self.samples.len()
                );
                return Err(err.into());
            }
        };
        self.announce(format_args!(
            "Profiling data exported to: {}",
            artifact_path.display()
        ));

        let report_path = if self.active.profiling.write_analysis_report {
            match exporter.write_report(&artifact_path, &report) {
                Ok(path) => Some(path),
                Err(err) => {
                    log::warn!("Failed to write analysis report: {err}");
                    None
                }
            }
        } else {
            None
        };

        Ok(Some(SessionOutcome {
            reason,
            artifact_path,
            report_path,
            report,
        }))
    }

    fn announce(&self, message: fmt::Arguments<'_>) {
        if !self.active.profiling.suppress_console_log {
            log::info!("{message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    struct Headless;
    impl MetricSource for Headless {}

    fn session_in(dir: &std::path::Path) -> RecordingSession {
        let mut config = SamplerConfig::default();
        config.profiling.output_directory = dir.to_path_buf();
        config.profiling.auto_stop_enabled = false;
        config.profiling.sampling_interval = 1;
        RecordingSession::new(config)
    }

    #[test]
    fn test_toggle_cycles_between_states() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        assert_eq!(session.state(), SessionState::Idle);

        assert!(session.on_toggle_requested().unwrap().is_none());
        assert_eq!(session.state(), SessionState::Recording);

        let outcome = session.on_toggle_requested().unwrap().unwrap();
        assert_eq!(outcome.reason, StopReason::Manual);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_double_start_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.start_recording().unwrap();
        session.on_host_frame(0.016, &Headless).unwrap();

        let err = session.start_recording().unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                state: SessionState::Recording,
                ..
            }
        ));
        assert_eq!(session.samples().len(), 1);
        assert_eq!(err.to_string(), "cannot start recording while recording");
    }

    #[test]
    fn test_invalid_config_refuses_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        let mut config = session.config().clone();
        config.profiling.sampling_interval = 0;
        session.set_config(config);

        let err = session.start_recording().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Config(ConfigError::InvalidSamplingInterval(0))
        ));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_frames_are_ignored_while_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        for _ in 0..5 {
            assert!(session.on_host_frame(0.016, &Headless).unwrap().is_none());
        }
        assert_eq!(session.frame_counter(), 0);
        assert!(session.samples().is_empty());
    }

    #[test]
    fn test_manual_stop_cancels_auto_stop() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        let mut config = session.config().clone();
        config.profiling.auto_stop_enabled = true;
        config.profiling.recording_duration_secs = 1.0;
        session.set_config(config);

        session.start_recording().unwrap();
        assert_eq!(session.auto_stop_remaining(), Some(1.0));
        session.on_host_frame(0.5, &Headless).unwrap();
        session.stop_recording().unwrap();
        assert_eq!(session.auto_stop_remaining(), None);

        // Frames past the old deadline must not produce a second stop.
        for _ in 0..4 {
            assert!(session.on_host_frame(0.5, &Headless).unwrap().is_none());
        }
        let artifacts = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(artifacts, 1);
    }

    #[test]
    fn test_failed_export_still_produces_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-directory");
        std::fs::write(&blocker, b"").unwrap();
        let mut session = session_in(&blocker);

        session.start_recording().unwrap();
        for _ in 0..3 {
            session.on_host_frame(0.1, &Headless).unwrap();
        }
        assert!(session.last_report().is_none());

        assert!(session.stop_recording().is_err());
        let report = session.last_report().unwrap();
        assert_eq!(report.sample_count, 3);
        assert_eq!(report.violations_of(crate::ViolationKind::LowFps).count(), 3);

        session.start_recording().unwrap();
        assert!(session.last_report().is_none());
    }

    #[test]
    fn test_config_changes_apply_to_next_session_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.start_recording().unwrap();

        let mut config = session.config().clone();
        config.profiling.sampling_interval = 2;
        session.set_config(config);

        for _ in 0..4 {
            session.on_host_frame(0.016, &Headless).unwrap();
        }
        assert_eq!(session.samples().len(), 4);
    }
}
