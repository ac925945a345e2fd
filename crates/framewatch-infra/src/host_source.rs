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

//! A [`MetricSource`] assembled from host-pushed frame statistics.

use framewatch_core::memory::currently_allocated_bytes;
use framewatch_core::{
    AudioSnapshot, BehaviourInfo, MemorySnapshot, MetricSource, PhysicsSnapshot, QualitySnapshot,
    RenderCounters,
};

use crate::behaviour::BehaviourRegistry;
use crate::memory_monitor::ProcessMemoryMonitor;

/// Holds the latest statistics reported by the host's subsystems.
///
/// The renderer, physics and audio layers push their values through the
/// setters before the session's per-frame call; the session then reads them
/// through [`MetricSource`]. Memory is read live, either from a
/// [`ProcessMemoryMonitor`] or, without one, from the tracked heap only.
#[derive(Debug, Default)]
pub struct HostMetricSource {
    memory_monitor: Option<ProcessMemoryMonitor>,
    behaviours: BehaviourRegistry,
    gpu_frame_time_ms: f64,
    render_counters: RenderCounters,
    physics: PhysicsSnapshot,
    quality: QualitySnapshot,
    audio: AudioSnapshot,
}

impl HostMetricSource {
    /// Creates a source reporting default settings and tracked heap memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads process memory through `monitor`.
    pub fn with_memory_monitor(mut self, monitor: ProcessMemoryMonitor) -> Self {
        self.memory_monitor = Some(monitor);
        self
    }

    /// Reports the instances of `registry` for script timings.
    pub fn with_behaviours(mut self, registry: BehaviourRegistry) -> Self {
        self.behaviours = registry;
        self
    }

    /// The registry whose instances are reported.
    pub fn behaviour_registry(&self) -> &BehaviourRegistry {
        &self.behaviours
    }

    /// Sets the GPU time of the last frame, in milliseconds.
    pub fn set_gpu_frame_time_ms(&mut self, ms: f64) {
        self.gpu_frame_time_ms = ms;
    }

    /// Sets the draw statistics of the last frame.
    pub fn set_render_counters(&mut self, counters: RenderCounters) {
        self.render_counters = counters;
    }

    /// Sets the current physics settings.
    pub fn set_physics(&mut self, physics: PhysicsSnapshot) {
        self.physics = physics;
    }

    /// Sets the current rendering quality settings.
    pub fn set_quality(&mut self, quality: QualitySnapshot) {
        self.quality = quality;
    }

    /// Sets the current audio configuration.
    pub fn set_audio(&mut self, audio: AudioSnapshot) {
        self.audio = audio;
    }
}

impl MetricSource for HostMetricSource {
    fn memory(&self) -> MemorySnapshot {
        match &self.memory_monitor {
            Some(monitor) => monitor.snapshot(),
            None => {
                let heap = currently_allocated_bytes();
                MemorySnapshot {
                    reserved_bytes: heap,
                    allocated_bytes: heap,
                    managed_heap_bytes: heap,
                }
            }
        }
    }

    fn gpu_frame_time_ms(&self) -> f64 {
        self.gpu_frame_time_ms
    }

    fn render_counters(&self) -> RenderCounters {
        self.render_counters
    }

    fn physics(&self) -> PhysicsSnapshot {
        self.physics
    }

    fn quality(&self) -> QualitySnapshot {
        self.quality.clone()
    }

    fn audio(&self) -> AudioSnapshot {
        self.audio
    }

    fn behaviours(&self) -> Vec<BehaviourInfo> {
        self.behaviours.snapshot()
    }
}
