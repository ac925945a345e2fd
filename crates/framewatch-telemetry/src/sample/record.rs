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

//! The sample record captured for one sampled frame.

use framewatch_core::{
    AudioSnapshot, MemorySnapshot, MetricCategories, PhysicsSnapshot, QualitySnapshot,
    RenderCounters,
};

/// One row of metrics for a single sampled frame.
///
/// The frame-level fields are always present. Each optional group is `Some`
/// exactly when its category was enabled for the session, so every sample of
/// a session carries the same set of groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Index of the frame since recording started, counting every frame.
    pub frame: u64,
    /// Seconds elapsed since recording started.
    pub elapsed_secs: f64,
    /// Instantaneous frame rate. `0.0` when the frame's delta time was degenerate.
    pub fps: f64,
    /// Duration of the frame, in milliseconds.
    pub frame_time_ms: f64,
    /// Memory usage, in megabytes.
    pub memory: Option<MemoryMetrics>,
    /// GPU render time, in milliseconds.
    pub gpu_time_ms: Option<f64>,
    /// Draw statistics.
    pub draw_counters: Option<RenderCounters>,
    /// Physics settings.
    pub physics: Option<PhysicsSnapshot>,
    /// Rendering quality settings.
    pub quality: Option<QualitySnapshot>,
    /// Audio settings.
    pub audio: Option<AudioSnapshot>,
    /// Approximate update cost per component type.
    pub script_timings: Option<ScriptTimings>,
}

impl Sample {
    /// Creates a sample whose enabled groups hold default values.
    pub fn with_defaults(categories: MetricCategories) -> Self {
        let enabled = |category| categories.contains(category);
        Self {
            frame: 0,
            elapsed_secs: 0.0,
            fps: 0.0,
            frame_time_ms: 0.0,
            memory: enabled(MetricCategories::MEMORY).then(MemoryMetrics::default),
            gpu_time_ms: enabled(MetricCategories::GPU).then_some(0.0),
            draw_counters: enabled(MetricCategories::DRAW_COUNTERS)
                .then(RenderCounters::default),
            physics: enabled(MetricCategories::PHYSICS).then(PhysicsSnapshot::default),
            quality: enabled(MetricCategories::RENDERING).then(QualitySnapshot::default),
            audio: enabled(MetricCategories::AUDIO).then(AudioSnapshot::default),
            script_timings: enabled(MetricCategories::SCRIPT_TIMINGS)
                .then(ScriptTimings::default),
        }
    }

    /// Returns the set of groups present in this sample.
    pub fn categories(&self) -> MetricCategories {
        let mut categories = MetricCategories::EMPTY;
        categories.set(MetricCategories::MEMORY, self.memory.is_some());
        categories.set(MetricCategories::GPU, self.gpu_time_ms.is_some());
        categories.set(MetricCategories::DRAW_COUNTERS, self.draw_counters.is_some());
        categories.set(MetricCategories::PHYSICS, self.physics.is_some());
        categories.set(MetricCategories::RENDERING, self.quality.is_some());
        categories.set(MetricCategories::AUDIO, self.audio.is_some());
        categories.set(MetricCategories::SCRIPT_TIMINGS, self.script_timings.is_some());
        categories
    }
}

/// Memory usage in megabytes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemoryMetrics {
    /// Memory reserved from the operating system.
    pub reserved_mb: f64,
    /// Memory in use.
    pub allocated_mb: f64,
    /// Memory used by the managed heap.
    pub managed_heap_mb: f64,
}

impl From<MemorySnapshot> for MemoryMetrics {
    fn from(snapshot: MemorySnapshot) -> Self {
        Self {
            reserved_mb: snapshot.reserved_mb(),
            allocated_mb: snapshot.allocated_mb(),
            managed_heap_mb: snapshot.managed_heap_mb(),
        }
    }
}

/// Approximate update cost per component type, in milliseconds.
///
/// Entries keep the order in which each type name was first recorded.
/// Recording a name twice adds to the existing entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptTimings {
    entries: Vec<(String, f64)>,
}

impl ScriptTimings {
    /// Creates an empty set of timings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Adds `cost_ms` to the entry for `type_name`, creating it if needed.
    pub fn record(&mut self, type_name: &str, cost_ms: f64) {
        let key = sanitize_field(type_name);
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some((_, total)) => *total += cost_ms,
            None => self.entries.push((key, cost_ms)),
        }
    }

    /// Returns the accumulated cost of a type, if recorded.
    pub fn get(&self, type_name: &str) -> Option<f64> {
        let key = sanitize_field(type_name);
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, cost)| *cost)
    }

    /// Returns the number of distinct type names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(type name, cost in ms)` pairs in first-recorded order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, cost)| (name.as_str(), *cost))
    }

    /// Renders the timings as a single field: `Name:1.234ms;Other:0.500ms`.
    pub fn to_field(&self) -> String {
        self.entries
            .iter()
            .map(|(name, cost)| format!("{name}:{cost:.3}ms"))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Parses a field produced by [`ScriptTimings::to_field`].
    pub fn parse_field(field: &str) -> Option<Self> {
        let mut timings = Self::new();
        if field.is_empty() {
            return Some(timings);
        }
        for entry in field.split(';') {
            let (name, cost) = entry.rsplit_once(':')?;
            let cost = cost.strip_suffix("ms")?.parse::<f64>().ok()?;
            timings.record(name, cost);
        }
        Some(timings)
    }
}

/// Replaces the characters the artifact format uses as delimiters.
pub(crate) fn sanitize_field(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ',' | ';' | ':' | '\n' | '\r' => '_',
            other => other,
        })
        .collect()
}
