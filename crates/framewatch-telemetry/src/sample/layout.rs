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

//! Column layout shared by the header and every data row.
//!
//! [`CANONICAL_ORDER`] is the single definition of field order. Both the
//! header and each row are produced by walking the same filtered column list,
//! so a session's header and rows can never disagree on count or position.

use framewatch_core::MetricCategories;

use crate::error::ArtifactError;
use crate::sample::record::{sanitize_field, Sample, ScriptTimings};

/// One column of the exported artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Frame index since recording start.
    Frame,
    /// Seconds since recording start.
    ElapsedSeconds,
    /// Instantaneous frame rate.
    Fps,
    /// Frame duration in milliseconds.
    FrameTimeMs,
    /// Reserved memory in MB.
    ReservedMemoryMb,
    /// Allocated memory in MB.
    AllocatedMemoryMb,
    /// Managed heap memory in MB.
    ManagedHeapMb,
    /// GPU render time in milliseconds.
    GpuTimeMs,
    /// Batch count.
    Batches,
    /// Set-pass call count.
    SetPassCalls,
    /// Draw call count.
    DrawCalls,
    /// Triangle count.
    Triangles,
    /// Vertex count.
    Vertices,
    /// Physics simulation mode.
    SimulationMode,
    /// Physics fixed timestep in seconds.
    FixedDeltaTime,
    /// Physics auto-simulation flag.
    AutoSimulation,
    /// Render pipeline identifier.
    RenderPipeline,
    /// Vsync count.
    VSyncCount,
    /// Anti-aliasing level.
    AntiAliasing,
    /// Audio output sample rate.
    AudioSampleRate,
    /// Audio speaker mode.
    SpeakerMode,
    /// Audio listener volume.
    ListenerVolume,
    /// Per-type script timings.
    ScriptTimings,
}

/// Every column, in the order they appear in an artifact.
pub const CANONICAL_ORDER: [Column; 23] = [
    Column::Frame,
    Column::ElapsedSeconds,
    Column::Fps,
    Column::FrameTimeMs,
    Column::ReservedMemoryMb,
    Column::AllocatedMemoryMb,
    Column::ManagedHeapMb,
    Column::GpuTimeMs,
    Column::Batches,
    Column::SetPassCalls,
    Column::DrawCalls,
    Column::Triangles,
    Column::Vertices,
    Column::SimulationMode,
    Column::FixedDeltaTime,
    Column::AutoSimulation,
    Column::RenderPipeline,
    Column::VSyncCount,
    Column::AntiAliasing,
    Column::AudioSampleRate,
    Column::SpeakerMode,
    Column::ListenerVolume,
    Column::ScriptTimings,
];

impl Column {
    /// The header title of the column.
    pub const fn title(self) -> &'static str {
        match self {
            Column::Frame => "Frame",
            Column::ElapsedSeconds => "Time (s)",
            Column::Fps => "FPS",
            Column::FrameTimeMs => "Frame Time (ms)",
            Column::ReservedMemoryMb => "Total Reserved Memory (MB)",
            Column::AllocatedMemoryMb => "Total Allocated Memory (MB)",
            Column::ManagedHeapMb => "Managed Heap Memory (MB)",
            Column::GpuTimeMs => "GPU Time (ms)",
            Column::Batches => "Batches Count",
            Column::SetPassCalls => "SetPass Calls Count",
            Column::DrawCalls => "Draw Calls Count",
            Column::Triangles => "Triangles Count",
            Column::Vertices => "Vertices Count",
            Column::SimulationMode => "Physics Simulation Mode",
            Column::FixedDeltaTime => "Fixed Delta Time",
            Column::AutoSimulation => "Auto Simulation",
            Column::RenderPipeline => "Render Pipeline",
            Column::VSyncCount => "VSync Count",
            Column::AntiAliasing => "Anti-Aliasing",
            Column::AudioSampleRate => "Audio Sample Rate",
            Column::SpeakerMode => "Speaker Mode",
            Column::ListenerVolume => "Audio Listener Volume",
            Column::ScriptTimings => "Script Timings",
        }
    }

    /// The category gating this column, or `None` for the always-present frame fields.
    pub const fn category(self) -> Option<MetricCategories> {
        match self {
            Column::Frame | Column::ElapsedSeconds | Column::Fps | Column::FrameTimeMs => None,
            Column::ReservedMemoryMb | Column::AllocatedMemoryMb | Column::ManagedHeapMb => {
                Some(MetricCategories::MEMORY)
            }
            Column::GpuTimeMs => Some(MetricCategories::GPU),
            Column::Batches
            | Column::SetPassCalls
            | Column::DrawCalls
            | Column::Triangles
            | Column::Vertices => Some(MetricCategories::DRAW_COUNTERS),
            Column::SimulationMode | Column::FixedDeltaTime | Column::AutoSimulation => {
                Some(MetricCategories::PHYSICS)
            }
            Column::RenderPipeline | Column::VSyncCount | Column::AntiAliasing => {
                Some(MetricCategories::RENDERING)
            }
            Column::AudioSampleRate | Column::SpeakerMode | Column::ListenerVolume => {
                Some(MetricCategories::AUDIO)
            }
            Column::ScriptTimings => Some(MetricCategories::SCRIPT_TIMINGS),
        }
    }

    /// Looks a column up by its header title.
    pub fn from_title(title: &str) -> Option<Self> {
        CANONICAL_ORDER
            .into_iter()
            .find(|column| column.title() == title)
    }

    /// Formats this column's value for `sample`.
    ///
    /// Floats use 2 decimals, except the fixed timestep (4 decimals) and
    /// script timings (3 decimals). A column whose group is missing from the
    /// sample renders as an empty field.
    pub fn render(self, sample: &Sample) -> String {
        fn or_empty<T>(group: Option<&T>, f: impl FnOnce(&T) -> String) -> String {
            group.map(f).unwrap_or_default()
        }

        let memory = sample.memory.as_ref();
        let draw = sample.draw_counters.as_ref();
        let physics = sample.physics.as_ref();
        let quality = sample.quality.as_ref();
        let audio = sample.audio.as_ref();

        match self {
            Column::Frame => sample.frame.to_string(),
            Column::ElapsedSeconds => format!("{:.2}", sample.elapsed_secs),
            Column::Fps => format!("{:.2}", sample.fps),
            Column::FrameTimeMs => format!("{:.2}", sample.frame_time_ms),
            Column::ReservedMemoryMb => or_empty(memory, |m| format!("{:.2}", m.reserved_mb)),
            Column::AllocatedMemoryMb => or_empty(memory, |m| format!("{:.2}", m.allocated_mb)),
            Column::ManagedHeapMb => or_empty(memory, |m| format!("{:.2}", m.managed_heap_mb)),
            Column::GpuTimeMs => or_empty(sample.gpu_time_ms.as_ref(), |ms| format!("{ms:.2}")),
            Column::Batches => or_empty(draw, |d| d.batches.to_string()),
            Column::SetPassCalls => or_empty(draw, |d| d.set_pass_calls.to_string()),
            Column::DrawCalls => or_empty(draw, |d| d.draw_calls.to_string()),
            Column::Triangles => or_empty(draw, |d| d.triangles.to_string()),
            Column::Vertices => or_empty(draw, |d| d.vertices.to_string()),
            Column::SimulationMode => or_empty(physics, |p| p.simulation_mode.to_string()),
            Column::FixedDeltaTime => or_empty(physics, |p| format!("{:.4}", p.fixed_delta_time)),
            Column::AutoSimulation => or_empty(physics, |p| p.auto_simulation.to_string()),
            Column::RenderPipeline => or_empty(quality, |q| sanitize_field(&q.render_pipeline)),
            Column::VSyncCount => or_empty(quality, |q| q.vsync_count.to_string()),
            Column::AntiAliasing => or_empty(quality, |q| q.anti_aliasing.to_string()),
            Column::AudioSampleRate => or_empty(audio, |a| a.output_sample_rate.to_string()),
            Column::SpeakerMode => or_empty(audio, |a| a.speaker_mode.to_string()),
            Column::ListenerVolume => or_empty(audio, |a| format!("{:.2}", a.listener_volume)),
            Column::ScriptTimings => or_empty(sample.script_timings.as_ref(), |t| t.to_field()),
        }
    }

    /// Parses `field` into this column's slot of `sample`. The column's group
    /// must already be present in `sample`.
    fn apply(self, sample: &mut Sample, field: &str) -> Option<()> {
        match self {
            Column::Frame => sample.frame = field.parse().ok()?,
            Column::ElapsedSeconds => sample.elapsed_secs = field.parse().ok()?,
            Column::Fps => sample.fps = field.parse().ok()?,
            Column::FrameTimeMs => sample.frame_time_ms = field.parse().ok()?,
            Column::ReservedMemoryMb => sample.memory.as_mut()?.reserved_mb = field.parse().ok()?,
            Column::AllocatedMemoryMb => {
                sample.memory.as_mut()?.allocated_mb = field.parse().ok()?
            }
            Column::ManagedHeapMb => sample.memory.as_mut()?.managed_heap_mb = field.parse().ok()?,
            Column::GpuTimeMs => sample.gpu_time_ms = Some(field.parse().ok()?),
            Column::Batches => sample.draw_counters.as_mut()?.batches = field.parse().ok()?,
            Column::SetPassCalls => {
                sample.draw_counters.as_mut()?.set_pass_calls = field.parse().ok()?
            }
            Column::DrawCalls => sample.draw_counters.as_mut()?.draw_calls = field.parse().ok()?,
            Column::Triangles => sample.draw_counters.as_mut()?.triangles = field.parse().ok()?,
            Column::Vertices => sample.draw_counters.as_mut()?.vertices = field.parse().ok()?,
            Column::SimulationMode => {
                sample.physics.as_mut()?.simulation_mode = field.parse().ok()?
            }
            Column::FixedDeltaTime => {
                sample.physics.as_mut()?.fixed_delta_time = field.parse().ok()?
            }
            Column::AutoSimulation => {
                sample.physics.as_mut()?.auto_simulation = field.parse().ok()?
            }
            Column::RenderPipeline => sample.quality.as_mut()?.render_pipeline = field.to_string(),
            Column::VSyncCount => sample.quality.as_mut()?.vsync_count = field.parse().ok()?,
            Column::AntiAliasing => sample.quality.as_mut()?.anti_aliasing = field.parse().ok()?,
            Column::AudioSampleRate => {
                sample.audio.as_mut()?.output_sample_rate = field.parse().ok()?
            }
            Column::SpeakerMode => sample.audio.as_mut()?.speaker_mode = field.parse().ok()?,
            Column::ListenerVolume => {
                sample.audio.as_mut()?.listener_volume = field.parse().ok()?
            }
            Column::ScriptTimings => {
                sample.script_timings = Some(ScriptTimings::parse_field(field)?)
            }
        }
        Some(())
    }
}

/// The ordered columns of a session, derived from its enabled categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleLayout {
    categories: MetricCategories,
    columns: Vec<Column>,
}

impl SampleLayout {
    /// Builds the layout for a set of enabled categories.
    pub fn new(categories: MetricCategories) -> Self {
        let columns = CANONICAL_ORDER
            .into_iter()
            .filter(|column| {
                column
                    .category()
                    .is_none_or(|category| categories.contains(category))
            })
            .collect();
        Self {
            categories,
            columns,
        }
    }

    /// Rebuilds a layout from an artifact header line.
    ///
    /// The header must name whole groups in canonical order, exactly as
    /// [`SampleLayout::header`] produces them.
    pub fn from_header(header: &str) -> Result<Self, ArtifactError> {
        let mut categories = MetricCategories::EMPTY;
        let mut columns = Vec::new();
        for title in header.split(',') {
            let column = Column::from_title(title)
                .ok_or_else(|| ArtifactError::UnknownColumn(title.to_string()))?;
            if let Some(category) = column.category() {
                categories.insert(category);
            }
            columns.push(column);
        }

        let layout = Self::new(categories);
        if layout.columns != columns {
            return Err(ArtifactError::InvalidHeader);
        }
        Ok(layout)
    }

    /// The categories this layout was built from.
    pub fn categories(&self) -> MetricCategories {
        self.categories
    }

    /// The columns, in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The number of fields per line.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always `false`: the frame fields are part of every layout.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Renders the header line.
    pub fn header(&self) -> String {
        self.columns
            .iter()
            .map(|column| column.title())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Renders one data line for `sample`.
    pub fn render_row(&self, sample: &Sample) -> String {
        self.columns
            .iter()
            .map(|column| column.render(sample))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parses one data line. `line_number` is only used in errors.
    pub fn parse_row(&self, line_number: usize, line: &str) -> Result<Sample, ArtifactError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != self.columns.len() {
            return Err(ArtifactError::FieldCount {
                line: line_number,
                expected: self.columns.len(),
                found: fields.len(),
            });
        }

        let mut sample = Sample::with_defaults(self.categories);
        for (column, field) in self.columns.iter().zip(fields) {
            column
                .apply(&mut sample, field)
                .ok_or_else(|| ArtifactError::InvalidField {
                    line: line_number,
                    column: column.title(),
                    value: field.to_string(),
                })?;
        }
        Ok(sample)
    }
}
