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

//! # Framewatch Telemetry
//!
//! The sampling session engine. A host drives a [`RecordingSession`] once per
//! frame; while recording, the session gathers a [`Sample`] every
//! `sampling_interval` frames from a [`MetricSource`], and on stop writes the
//! buffer as a CSV artifact and runs a threshold analysis over it.
//!
//! [`MetricSource`]: framewatch_core::MetricSource

#![warn(missing_docs)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod sample;
pub mod session;

pub use analysis::{analyze, AnalysisReport, ThresholdViolation, ViolationKind};
pub use config::{PerformanceThresholds, ProfilingConfig, SamplerConfig};
pub use error::{ArtifactError, ConfigError, ExportError, SessionError, SessionResult};
pub use export::{CsvExporter, ParsedArtifact};
pub use sample::{Column, MemoryMetrics, Sample, SampleComposer, SampleLayout, ScriptTimings};
pub use session::{RecordingSession, SessionOutcome, SessionState, StopReason};
