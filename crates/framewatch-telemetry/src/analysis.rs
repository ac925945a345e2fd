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

//! Threshold analysis of a finished session.

use std::fmt::{self, Display};

use serde::Serialize;

use crate::config::PerformanceThresholds;
use crate::sample::Sample;

/// The bound a sample exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// FPS below `min_acceptable_fps`.
    LowFps,
    /// Allocated memory above `max_acceptable_memory_mb`.
    HighMemory,
    /// Draw calls above `max_acceptable_draw_calls`.
    ExcessiveDrawCalls,
    /// Frame time above `max_acceptable_frame_time_ms`.
    LongFrameTime,
}

impl ViolationKind {
    const ALL: [ViolationKind; 4] = [
        ViolationKind::LowFps,
        ViolationKind::HighMemory,
        ViolationKind::ExcessiveDrawCalls,
        ViolationKind::LongFrameTime,
    ];

    /// Whether a larger value is worse for this kind.
    fn higher_is_worse(self) -> bool {
        !matches!(self, ViolationKind::LowFps)
    }
}

impl Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ViolationKind::LowFps => "low FPS",
            ViolationKind::HighMemory => "high memory",
            ViolationKind::ExcessiveDrawCalls => "excessive draw calls",
            ViolationKind::LongFrameTime => "long frame time",
        };
        f.write_str(label)
    }
}

/// One sample exceeding one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdViolation {
    /// Frame index of the offending sample.
    pub frame: u64,
    /// Which bound was exceeded.
    pub kind: ViolationKind,
    /// The measured value.
    pub value: f64,
    /// The configured bound.
    pub limit: f64,
}

/// Summary statistics and threshold violations of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Number of samples analyzed.
    pub sample_count: usize,
    /// Elapsed seconds at the last sample.
    pub duration_secs: f64,
    /// Lowest FPS, ignoring samples with a degenerate delta time.
    pub min_fps: Option<f64>,
    /// Mean FPS, ignoring samples with a degenerate delta time.
    pub avg_fps: Option<f64>,
    /// Highest FPS, ignoring samples with a degenerate delta time.
    pub max_fps: Option<f64>,
    /// Longest frame time, in milliseconds.
    pub max_frame_time_ms: Option<f64>,
    /// Highest allocated memory, when the memory group was recorded.
    pub peak_allocated_memory_mb: Option<f64>,
    /// Highest draw-call count, when draw counters were recorded.
    pub max_draw_calls: Option<u32>,
    /// Every violation, in sample order.
    pub violations: Vec<ThresholdViolation>,
}

impl AnalysisReport {
    /// Returns `true` if no sample exceeded any threshold.
    pub fn is_within_thresholds(&self) -> bool {
        self.violations.is_empty()
    }

    /// Iterates over the violations of one kind.
    pub fn violations_of(
        &self,
        kind: ViolationKind,
    ) -> impl Iterator<Item = &ThresholdViolation> + '_ {
        self.violations.iter().filter(move |v| v.kind == kind)
    }

    /// Logs the report. Violations are always logged as warnings; the summary
    /// line only when `announce` is set.
    pub fn log_summary(&self, announce: bool) {
        for kind in ViolationKind::ALL {
            let mut of_kind = self.violations_of(kind);
            let Some(first) = of_kind.next() else {
                continue;
            };
            let (count, worst) = of_kind.fold((1usize, first), |(count, worst), v| {
                let worse = if kind.higher_is_worse() {
                    v.value > worst.value
                } else {
                    v.value < worst.value
                };
                (count + 1, if worse { v } else { worst })
            });
            log::warn!(
                "{count} sample(s) with {kind}: worst {:.2} at frame {} (limit {:.2})",
                worst.value,
                worst.frame,
                worst.limit
            );
        }

        if announce {
            match (self.min_fps, self.avg_fps, self.max_fps) {
                (Some(min), Some(avg), Some(max)) => log::info!(
                    "Performance analysis complete: {} samples over {:.2}s, FPS min {min:.2} / avg {avg:.2} / max {max:.2}",
                    self.sample_count,
                    self.duration_secs
                ),
                _ => log::info!(
                    "Performance analysis complete: {} samples",
                    self.sample_count
                ),
            }
        }
    }
}

/// Compares every sample against the thresholds and summarizes the session.
///
/// Samples with a degenerate delta time (recorded FPS and frame time of `0`)
/// are excluded from the FPS statistics and the FPS check. Memory and draw
/// calls are only checked when their group was recorded.
pub fn analyze(samples: &[Sample], thresholds: &PerformanceThresholds) -> AnalysisReport {
    let mut report = AnalysisReport {
        sample_count: samples.len(),
        duration_secs: samples.last().map_or(0.0, |s| s.elapsed_secs),
        ..Default::default()
    };

    let mut fps_sum = 0.0;
    let mut fps_count = 0usize;

    for sample in samples {
        let mut violate = |kind: ViolationKind, value: f64, limit: f64| {
            report.violations.push(ThresholdViolation {
                frame: sample.frame,
                kind,
                value,
                limit,
            });
        };

        let timed = sample.frame_time_ms > 0.0;
        if timed {
            if sample.fps < thresholds.min_acceptable_fps {
                violate(ViolationKind::LowFps, sample.fps, thresholds.min_acceptable_fps);
            }
            if sample.frame_time_ms > thresholds.max_acceptable_frame_time_ms {
                violate(
                    ViolationKind::LongFrameTime,
                    sample.frame_time_ms,
                    thresholds.max_acceptable_frame_time_ms,
                );
            }
        }
        if let Some(memory) = &sample.memory {
            if memory.allocated_mb > thresholds.max_acceptable_memory_mb {
                violate(
                    ViolationKind::HighMemory,
                    memory.allocated_mb,
                    thresholds.max_acceptable_memory_mb,
                );
            }
        }
        if let Some(counters) = &sample.draw_counters {
            if counters.draw_calls > thresholds.max_acceptable_draw_calls {
                violate(
                    ViolationKind::ExcessiveDrawCalls,
                    f64::from(counters.draw_calls),
                    f64::from(thresholds.max_acceptable_draw_calls),
                );
            }
        }

        if timed {
            fps_sum += sample.fps;
            fps_count += 1;
            report.min_fps = Some(report.min_fps.map_or(sample.fps, |m| m.min(sample.fps)));
            report.max_fps = Some(report.max_fps.map_or(sample.fps, |m| m.max(sample.fps)));
            report.max_frame_time_ms = Some(
                report
                    .max_frame_time_ms
                    .map_or(sample.frame_time_ms, |m| m.max(sample.frame_time_ms)),
            );
        }
        if let Some(memory) = &sample.memory {
            report.peak_allocated_memory_mb = Some(
                report
                    .peak_allocated_memory_mb
                    .map_or(memory.allocated_mb, |m| m.max(memory.allocated_mb)),
            );
        }
        if let Some(counters) = &sample.draw_counters {
            report.max_draw_calls = Some(
                report
                    .max_draw_calls
                    .map_or(counters.draw_calls, |m| m.max(counters.draw_calls)),
            );
        }
    }

    if fps_count > 0 {
        report.avg_fps = Some(fps_sum / fps_count as f64);
    }
    report
}
