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

//! Declarative settings read by the recording session.

use std::path::{Path, PathBuf};

use framewatch_core::MetricCategories;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::export::TIMESTAMP_PLACEHOLDER;

/// Settings for recording sessions.
///
/// A session copies these at start; changes made while recording only apply
/// to the next session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilingConfig {
    /// Name of the key the host maps to the toggle signal (e.g. "F8").
    pub toggle_key: String,
    /// Number of frames between two samples. Must be at least 1.
    pub sampling_interval: u32,
    /// How long a session runs before auto-stop, in seconds.
    pub recording_duration_secs: f64,
    /// Whether the session stops by itself after `recording_duration_secs`.
    pub auto_stop_enabled: bool,
    /// Include reserved, allocated and managed-heap memory.
    pub include_memory_details: bool,
    /// Include the GPU render time.
    pub include_gpu_timings: bool,
    /// Include batches, set-pass calls, draw calls, triangles and vertices.
    pub include_draw_counters: bool,
    /// Include the physics settings.
    pub include_physics_stats: bool,
    /// Include the render pipeline, vsync and anti-aliasing settings.
    pub include_rendering_stats: bool,
    /// Include the audio settings.
    pub include_audio_stats: bool,
    /// Include the approximate per-component-type update cost.
    pub include_script_timings: bool,
    /// Artifact file name, containing exactly one `{timestamp}` placeholder.
    pub output_file_name_template: String,
    /// Directory artifacts are written to. Created on first export.
    pub output_directory: PathBuf,
    /// Silences the session lifecycle messages. Warnings and errors are still logged.
    pub suppress_console_log: bool,
    /// Also write the analysis report as JSON next to each artifact.
    pub write_analysis_report: bool,
}

impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            toggle_key: "F8".to_string(),
            sampling_interval: 10,
            recording_duration_secs: 60.0,
            auto_stop_enabled: true,
            include_memory_details: true,
            include_gpu_timings: true,
            include_draw_counters: true,
            include_physics_stats: true,
            include_rendering_stats: true,
            include_audio_stats: true,
            include_script_timings: true,
            output_file_name_template: format!("Profile_{TIMESTAMP_PLACEHOLDER}.csv"),
            output_directory: PathBuf::from("profiles"),
            suppress_console_log: false,
            write_analysis_report: false,
        }
    }
}

impl ProfilingConfig {
    /// Checks the invariants a session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling_interval == 0 {
            return Err(ConfigError::InvalidSamplingInterval(self.sampling_interval));
        }
        if !self.recording_duration_secs.is_finite() || self.recording_duration_secs < 0.0 {
            return Err(ConfigError::InvalidRecordingDuration(
                self.recording_duration_secs,
            ));
        }
        validate_file_name_template(&self.output_file_name_template)
    }

    /// Returns the metric groups enabled by the `include_*` flags.
    pub fn categories(&self) -> MetricCategories {
        let mut categories = MetricCategories::EMPTY;
        categories.set(MetricCategories::MEMORY, self.include_memory_details);
        categories.set(MetricCategories::GPU, self.include_gpu_timings);
        categories.set(MetricCategories::DRAW_COUNTERS, self.include_draw_counters);
        categories.set(MetricCategories::PHYSICS, self.include_physics_stats);
        categories.set(MetricCategories::RENDERING, self.include_rendering_stats);
        categories.set(MetricCategories::AUDIO, self.include_audio_stats);
        categories.set(MetricCategories::SCRIPT_TIMINGS, self.include_script_timings);
        categories
    }

    /// Sets every `include_*` flag from a category set.
    pub fn set_categories(&mut self, categories: MetricCategories) {
        self.include_memory_details = categories.contains(MetricCategories::MEMORY);
        self.include_gpu_timings = categories.contains(MetricCategories::GPU);
        self.include_draw_counters = categories.contains(MetricCategories::DRAW_COUNTERS);
        self.include_physics_stats = categories.contains(MetricCategories::PHYSICS);
        self.include_rendering_stats = categories.contains(MetricCategories::RENDERING);
        self.include_audio_stats = categories.contains(MetricCategories::AUDIO);
        self.include_script_timings = categories.contains(MetricCategories::SCRIPT_TIMINGS);
    }
}

fn validate_file_name_template(template: &str) -> Result<(), ConfigError> {
    if template.matches(TIMESTAMP_PLACEHOLDER).count() != 1 {
        return Err(ConfigError::missing_placeholder(template));
    }
    let rest = template.replacen(TIMESTAMP_PLACEHOLDER, "", 1);
    if rest.contains(['{', '}']) {
        return Err(ConfigError::template(template, "unbalanced or unknown braces"));
    }
    if rest.contains(['/', '\\']) {
        return Err(ConfigError::template(
            template,
            "must be a file name, not a path",
        ));
    }
    if rest.chars().any(char::is_control) {
        return Err(ConfigError::template(template, "contains control characters"));
    }
    Ok(())
}

/// Performance bounds consulted by the analysis pass. Never mutated by a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceThresholds {
    /// Samples below this frame rate are reported.
    pub min_acceptable_fps: f64,
    /// Samples allocating more than this many megabytes are reported.
    pub max_acceptable_memory_mb: f64,
    /// Samples issuing more draw calls than this are reported.
    pub max_acceptable_draw_calls: u32,
    /// Samples with a longer frame time than this are reported.
    pub max_acceptable_frame_time_ms: f64,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            min_acceptable_fps: 30.0,
            max_acceptable_memory_mb: 1000.0,
            max_acceptable_draw_calls: 1000,
            max_acceptable_frame_time_ms: 33.33,
        }
    }
}

/// The complete configuration surface of the sampler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Session settings.
    pub profiling: ProfilingConfig,
    /// Analysis bounds.
    pub thresholds: PerformanceThresholds,
}

impl SamplerConfig {
    /// Loads a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a RON string.
    pub fn from_ron(ron: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(ron)?)
    }

    /// Loads a configuration file, picking the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match format {
            ConfigFormat::Json => Self::from_json(&content)?,
            ConfigFormat::Ron => Self::from_ron(&content)?,
        };
        log::debug!("Loaded sampler configuration from {}", path.display());
        Ok(config)
    }

    /// Saves the configuration, picking the format from the file extension.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Ron => {
                let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
                ron::ser::to_string_pretty(self, pretty)?
            }
        };
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

enum ConfigFormat {
    Json,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(ConfigFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Ok(ConfigFormat::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ProfilingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.categories(), MetricCategories::ALL);
        assert_eq!(config.toggle_key, "F8");
        assert_eq!(config.sampling_interval, 10);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let config = ProfilingConfig {
            sampling_interval: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSamplingInterval(0))
        ));
    }

    #[test]
    fn test_negative_or_nan_duration_is_rejected() {
        for duration in [-1.0, f64::NAN, f64::INFINITY] {
            let config = ProfilingConfig {
                recording_duration_secs: duration,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidRecordingDuration(_))
            ));
        }
    }

    #[test]
    fn test_malformed_templates_are_rejected() {
        for template in [
            "profile.csv",
            "{timestamp}_{timestamp}.csv",
            "profile_{0}.csv",
            "run/{timestamp}.csv",
            "run\\{timestamp}.csv",
            "{timestamp}}.csv",
        ] {
            let config = ProfilingConfig {
                output_file_name_template: template.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::InvalidFileNameTemplate { .. })
                ),
                "template {template:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_categories_round_trip_through_flags() {
        let mut config = ProfilingConfig::default();
        let wanted = MetricCategories::GPU | MetricCategories::SCRIPT_TIMINGS;
        config.set_categories(wanted);
        assert!(!config.include_memory_details);
        assert!(config.include_gpu_timings);
        assert_eq!(config.categories(), wanted);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"
        {
            "profiling": { "sampling_interval": 5, "include_audio_stats": false },
            "thresholds": { "min_acceptable_fps": 55.0 }
        }"#;

        let config = SamplerConfig::from_json(json).unwrap();
        assert_eq!(config.profiling.sampling_interval, 5);
        assert!(!config.profiling.include_audio_stats);
        assert!(config.profiling.include_memory_details);
        assert_eq!(config.thresholds.min_acceptable_fps, 55.0);
        assert_eq!(config.thresholds.max_acceptable_draw_calls, 1000);
    }

    #[test]
    fn test_ron_parsing() {
        let ron = r#"(
            profiling: (toggle_key: "F9", auto_stop_enabled: false),
        )"#;

        let config = SamplerConfig::from_ron(ron).unwrap();
        assert_eq!(config.profiling.toggle_key, "F9");
        assert!(!config.profiling.auto_stop_enabled);
        assert_eq!(config.thresholds, PerformanceThresholds::default());
    }

    #[test]
    fn test_file_round_trip_in_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SamplerConfig::default();
        config.profiling.sampling_interval = 3;
        config.thresholds.max_acceptable_draw_calls = 250;

        for name in ["sampler.json", "sampler.ron"] {
            let path = dir.path().join(name);
            config.to_file(&path).unwrap();
            assert_eq!(SamplerConfig::from_file(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = SamplerConfig::from_file("sampler.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
