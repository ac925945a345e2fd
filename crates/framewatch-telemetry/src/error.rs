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

//! Error types for the sampling engine.
//!
//! Every error here is local and recoverable: a failed start leaves the
//! session idle, a failed export leaves the samples buffered for another
//! attempt, and a rejected transition changes nothing.

use std::path::PathBuf;

use thiserror::Error;

use crate::export::TIMESTAMP_PLACEHOLDER;
use crate::session::SessionState;

/// A specialized `Result` type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// An invalid or unreadable sampler configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The sampling interval must be at least one frame.
    #[error("sampling interval must be at least 1 frame, got {0}")]
    InvalidSamplingInterval(u32),

    /// The recording duration must be a finite, non-negative number of seconds.
    #[error("recording duration must be finite and >= 0 seconds, got {0}")]
    InvalidRecordingDuration(f64),

    /// The output file name template cannot produce a valid file name.
    #[error("invalid output file name template '{template}': {reason}")]
    InvalidFileNameTemplate {
        /// The offending template.
        template: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The configuration file could not be read or written.
    #[error("failed to access configuration file '{}': {source}", .path.display())]
    Io {
        /// The configuration file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for this schema.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file is not valid RON for this schema.
    #[error("invalid RON configuration: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// The configuration could not be serialized as RON.
    #[error("failed to serialize RON configuration: {0}")]
    RonSerialize(#[from] ron::Error),

    /// The configuration file extension is neither `.json` nor `.ron`.
    #[error("unsupported configuration format for '{}' (expected .json or .ron)", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl ConfigError {
    pub(crate) fn template(template: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidFileNameTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing_placeholder(template: &str) -> Self {
        Self::template(
            template,
            format!("expected exactly one '{TIMESTAMP_PLACEHOLDER}' placeholder"),
        )
    }
}

/// A failure while writing an export artifact or analysis report.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing the file failed (disk full, invalid path, permission denied...).
    #[error("failed to write '{}': {source}", .path.display())]
    Io {
        /// The path that was being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The analysis report could not be serialized.
    #[error("failed to serialize analysis report for '{}': {source}", .path.display())]
    Report {
        /// The report path that was being written.
        path: PathBuf,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// A malformed export artifact.
#[derive(Debug, Error, PartialEq)]
pub enum ArtifactError {
    /// The artifact has no header line.
    #[error("artifact is empty")]
    Empty,

    /// The header names a column this version does not know.
    #[error("unknown column '{0}' in header")]
    UnknownColumn(String),

    /// The header's columns are not a valid layout.
    #[error("header columns are not in canonical order or do not form whole metric groups")]
    InvalidHeader,

    /// A data line has a different number of fields than the header.
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        /// The 1-based line number in the artifact.
        line: usize,
        /// The number of header columns.
        expected: usize,
        /// The number of fields found.
        found: usize,
    },

    /// A field could not be parsed as its column's type.
    #[error("line {line}: invalid value '{value}' for column '{column}'")]
    InvalidField {
        /// The 1-based line number in the artifact.
        line: usize,
        /// The column title.
        column: &'static str,
        /// The raw field text.
        value: String,
    },
}

/// An error returned by a [`RecordingSession`](crate::RecordingSession) operation.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configuration was rejected; the session did not start.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The session stopped but its artifact could not be written.
    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    /// The operation is not valid in the session's current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        /// The state the session was in.
        state: SessionState,
        /// The rejected operation.
        action: &'static str,
    },
}
