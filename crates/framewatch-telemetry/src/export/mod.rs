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

//! Writes session buffers as delimited text artifacts.
//!
//! An artifact is a header line followed by one line per sample, every line
//! terminated by `\n`, comma-delimited, UTF-8. [`ParsedArtifact`] reads one
//! back.

mod artifact;

pub use self::artifact::ParsedArtifact;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::analysis::AnalysisReport;
use crate::config::ProfilingConfig;
use crate::error::ExportError;
use crate::sample::{Sample, SampleLayout};

/// The placeholder replaced by the stop-time timestamp in file name templates.
pub const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

/// The `chrono` format of the timestamp inserted into file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Renders the full artifact text for a session.
pub fn render_artifact(layout: &SampleLayout, samples: &[Sample]) -> String {
    let mut text = layout.header();
    text.push('\n');
    for sample in samples {
        text.push_str(&layout.render_row(sample));
        text.push('\n');
    }
    text
}

/// Writes artifacts into a directory under a timestamped file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExporter {
    output_directory: PathBuf,
    file_name_template: String,
}

impl CsvExporter {
    /// Creates an exporter. The template should contain [`TIMESTAMP_PLACEHOLDER`].
    pub fn new(output_directory: impl Into<PathBuf>, file_name_template: impl Into<String>) -> Self {
        Self {
            output_directory: output_directory.into(),
            file_name_template: file_name_template.into(),
        }
    }

    /// Creates an exporter from the output settings of a configuration.
    pub fn from_config(config: &ProfilingConfig) -> Self {
        Self::new(
            config.output_directory.clone(),
            config.output_file_name_template.clone(),
        )
    }

    /// The directory artifacts are written to.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Renders the file name for an export made at `at`.
    pub fn file_name(&self, at: NaiveDateTime) -> String {
        let timestamp = at.format(TIMESTAMP_FORMAT).to_string();
        self.file_name_template
            .replacen(TIMESTAMP_PLACEHOLDER, &timestamp, 1)
    }

    /// Writes the artifact and returns its path.
    ///
    /// The output directory is created if missing. An existing file with the
    /// same name is overwritten. Failures are returned, never retried.
    pub fn export(
        &self,
        layout: &SampleLayout,
        samples: &[Sample],
        at: NaiveDateTime,
    ) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.output_directory).map_err(|source| ExportError::Io {
            path: self.output_directory.clone(),
            source,
        })?;

        let path = self.output_directory.join(self.file_name(at));
        fs::write(&path, render_artifact(layout, samples)).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!("Wrote {} samples to {}", samples.len(), path.display());
        Ok(path)
    }

    /// Writes `report` as pretty JSON next to an artifact, as `<stem>.analysis.json`.
    pub fn write_report(
        &self,
        artifact_path: &Path,
        report: &AnalysisReport,
    ) -> Result<PathBuf, ExportError> {
        let stem = artifact_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let path = artifact_path.with_file_name(format!("{stem}.analysis.json"));

        let json = serde_json::to_string_pretty(report).map_err(|source| ExportError::Report {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
