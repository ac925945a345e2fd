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

//! The read-only interface through which host metrics are sampled.

use std::fmt::{self, Display};
use std::str::FromStr;

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// A read-only view of the host application's metric counters.
///
/// The sampling engine queries a `MetricSource` once per sampled frame, and
/// only for the groups enabled in the session's [`MetricCategories`]. An
/// implementation must not have side effects visible to the engine: asking
/// twice in the same frame returns the same values.
///
/// Every method has a default returning an all-zero snapshot, so a host
/// lacking a subsystem (e.g. no audio) only implements what it can report.
///
/// [`MetricCategories`]: crate::telemetry::MetricCategories
pub trait MetricSource {
    /// Returns the current memory usage of the host.
    fn memory(&self) -> MemorySnapshot {
        MemorySnapshot::default()
    }

    /// Returns the GPU render time of the last frame, in milliseconds.
    fn gpu_frame_time_ms(&self) -> f64 {
        0.0
    }

    /// Returns the draw statistics of the last rendered frame.
    fn render_counters(&self) -> RenderCounters {
        RenderCounters::default()
    }

    /// Returns the current physics settings.
    fn physics(&self) -> PhysicsSnapshot {
        PhysicsSnapshot::default()
    }

    /// Returns the current rendering quality settings.
    fn quality(&self) -> QualitySnapshot {
        QualitySnapshot::default()
    }

    /// Returns the current audio settings.
    fn audio(&self) -> AudioSnapshot {
        AudioSnapshot::default()
    }

    /// Returns every live behaviour the host has registered for observation.
    fn behaviours(&self) -> Vec<BehaviourInfo> {
        Vec::new()
    }
}

/// A snapshot of host memory usage, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemorySnapshot {
    /// Memory reserved from the operating system.
    pub reserved_bytes: u64,
    /// Memory actually in use out of the reserved amount.
    pub allocated_bytes: u64,
    /// Memory used by the managed (scripting) heap.
    pub managed_heap_bytes: u64,
}

impl MemorySnapshot {
    /// Returns the reserved memory in megabytes (MB).
    pub fn reserved_mb(&self) -> f64 {
        self.reserved_bytes as f64 / BYTES_PER_MEGABYTE
    }

    /// Returns the allocated memory in megabytes (MB).
    pub fn allocated_mb(&self) -> f64 {
        self.allocated_bytes as f64 / BYTES_PER_MEGABYTE
    }

    /// Returns the managed heap usage in megabytes (MB).
    pub fn managed_heap_mb(&self) -> f64 {
        self.managed_heap_bytes as f64 / BYTES_PER_MEGABYTE
    }
}

/// Draw statistics for a single rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderCounters {
    /// The number of batches submitted.
    pub batches: u32,
    /// The number of shader pass (set-pass) changes.
    pub set_pass_calls: u32,
    /// The number of draw calls encoded.
    pub draw_calls: u32,
    /// The number of triangles submitted.
    pub triangles: u64,
    /// The number of vertices submitted.
    pub vertices: u64,
}

/// When the physics world is stepped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SimulationMode {
    /// Stepped on the fixed-timestep loop.
    #[default]
    FixedUpdate,
    /// Stepped once per rendered frame.
    Update,
    /// Stepped manually by user code.
    Script,
}

impl SimulationMode {
    const VARIANTS: [Self; 3] = [Self::FixedUpdate, Self::Update, Self::Script];

    fn as_str(self) -> &'static str {
        match self {
            SimulationMode::FixedUpdate => "FixedUpdate",
            SimulationMode::Update => "Update",
            SimulationMode::Script => "Script",
        }
    }
}

/// A snapshot of the physics settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSnapshot {
    /// When the physics world is stepped.
    pub simulation_mode: SimulationMode,
    /// The fixed timestep, in seconds.
    pub fixed_delta_time: f64,
    /// Whether the host steps physics automatically.
    pub auto_simulation: bool,
}

impl Default for PhysicsSnapshot {
    fn default() -> Self {
        Self {
            simulation_mode: SimulationMode::FixedUpdate,
            fixed_delta_time: 0.02,
            auto_simulation: true,
        }
    }
}

/// A snapshot of the rendering quality settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualitySnapshot {
    /// Identifier of the active render pipeline. Empty for the built-in one.
    pub render_pipeline: String,
    /// Number of vertical blanks to wait between frames (0 = vsync off).
    pub vsync_count: u32,
    /// Multisample anti-aliasing level (0, 2, 4 or 8).
    pub anti_aliasing: u32,
}

/// The speaker configuration of the audio output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpeakerMode {
    /// A single channel.
    Mono,
    /// Two channels.
    #[default]
    Stereo,
    /// Four channels.
    Quad,
    /// Five channels.
    Surround,
    /// Five channels plus a subwoofer.
    Mode5point1,
    /// Seven channels plus a subwoofer.
    Mode7point1,
    /// Stereo encoded with surround information.
    Prologic,
}

impl SpeakerMode {
    const VARIANTS: [Self; 7] = [
        Self::Mono,
        Self::Stereo,
        Self::Quad,
        Self::Surround,
        Self::Mode5point1,
        Self::Mode7point1,
        Self::Prologic,
    ];

    fn as_str(self) -> &'static str {
        match self {
            SpeakerMode::Mono => "Mono",
            SpeakerMode::Stereo => "Stereo",
            SpeakerMode::Quad => "Quad",
            SpeakerMode::Surround => "Surround",
            SpeakerMode::Mode5point1 => "Mode5point1",
            SpeakerMode::Mode7point1 => "Mode7point1",
            SpeakerMode::Prologic => "Prologic",
        }
    }
}

/// A snapshot of the audio settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioSnapshot {
    /// The output sample rate, in Hz.
    pub output_sample_rate: u32,
    /// The speaker configuration.
    pub speaker_mode: SpeakerMode,
    /// The master listener volume, from 0.0 to 1.0.
    pub listener_volume: f32,
}

impl Default for AudioSnapshot {
    fn default() -> Self {
        Self {
            output_sample_rate: 48_000,
            speaker_mode: SpeakerMode::Stereo,
            listener_volume: 1.0,
        }
    }
}

/// A live component instance observed for script timings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviourInfo {
    /// The name of the component's type.
    pub type_name: String,
    /// Whether the component currently receives updates.
    pub enabled: bool,
}

impl BehaviourInfo {
    /// Creates a new enabled behaviour description.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            enabled: true,
        }
    }
}

/// Returned when parsing a [`SimulationMode`] or [`SpeakerMode`] from an unknown name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    /// The type that was being parsed.
    pub type_name: &'static str,
    /// The text that matched no variant.
    pub value: String,
}

impl Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {} '{}'", self.type_name, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! named_enum_impls {
    ($ty:ident) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::VARIANTS
                    .into_iter()
                    .find(|variant| variant.as_str() == s)
                    .ok_or_else(|| UnknownVariant {
                        type_name: stringify!($ty),
                        value: s.to_string(),
                    })
            }
        }
    };
}

named_enum_impls!(SimulationMode);
named_enum_impls!(SpeakerMode);
