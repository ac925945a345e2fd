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

//! Assembles one [`Sample`] per sampled frame from a [`MetricSource`].

use framewatch_core::{MetricCategories, MetricSource};

use crate::sample::layout::SampleLayout;
use crate::sample::record::{MemoryMetrics, Sample, ScriptTimings};

/// Returns the instantaneous frame rate for a frame delta time, in seconds.
///
/// A zero, negative or non-finite delta has no meaningful rate and yields `0.0`,
/// as does a delta so small that the rate overflows.
pub fn frame_rate(delta_secs: f64) -> f64 {
    finite_or_zero(delta_secs, 1.0 / delta_secs)
}

/// Returns the frame duration in milliseconds. Degenerate deltas, and deltas
/// too large to express in milliseconds, yield `0.0`.
pub fn frame_time_ms(delta_secs: f64) -> f64 {
    finite_or_zero(delta_secs, delta_secs * 1000.0)
}

fn finite_or_zero(delta_secs: f64, value: f64) -> f64 {
    if delta_secs > 0.0 && value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Builds samples whose groups match a fixed [`SampleLayout`].
///
/// The composer owns the script-timing accumulator, which is rebuilt from
/// zero on every sampled frame.
#[derive(Debug, Clone)]
pub struct SampleComposer {
    layout: SampleLayout,
    script_timings: ScriptTimings,
}

impl SampleComposer {
    /// Creates a composer for the given enabled categories.
    pub fn new(categories: MetricCategories) -> Self {
        Self {
            layout: SampleLayout::new(categories),
            script_timings: ScriptTimings::new(),
        }
    }

    /// The layout every composed sample conforms to.
    pub fn layout(&self) -> &SampleLayout {
        &self.layout
    }

    /// The categories this composer queries.
    pub fn categories(&self) -> MetricCategories {
        self.layout.categories()
    }

    /// Captures one sample, querying `source` only for the enabled groups.
    pub fn compose(
        &mut self,
        source: &dyn MetricSource,
        frame: u64,
        elapsed_secs: f64,
        delta_secs: f64,
    ) -> Sample {
        let categories = self.categories();
        let enabled = |category| categories.contains(category);

        let fps = frame_rate(delta_secs);
        if fps == 0.0 {
            log::debug!("Degenerate delta time {delta_secs} at frame {frame}, recording FPS as 0");
        }

        let script_timings = if enabled(MetricCategories::SCRIPT_TIMINGS) {
            self.record_script_timings(source, delta_secs);
            Some(self.script_timings.clone())
        } else {
            None
        };

        Sample {
            frame,
            elapsed_secs,
            fps,
            frame_time_ms: frame_time_ms(delta_secs),
            memory: enabled(MetricCategories::MEMORY)
                .then(|| MemoryMetrics::from(source.memory())),
            gpu_time_ms: enabled(MetricCategories::GPU).then(|| source.gpu_frame_time_ms()),
            draw_counters: enabled(MetricCategories::DRAW_COUNTERS)
                .then(|| source.render_counters()),
            physics: enabled(MetricCategories::PHYSICS).then(|| source.physics()),
            quality: enabled(MetricCategories::RENDERING).then(|| source.quality()),
            audio: enabled(MetricCategories::AUDIO).then(|| source.audio()),
            script_timings,
        }
    }

    /// Rebuilds the accumulator for this frame.
    ///
    /// There is no per-component measurement: each live behaviour is charged
    /// the whole frame time, summed per type name. Disabled behaviours are
    /// charged too.
    fn record_script_timings(&mut self, source: &dyn MetricSource, delta_secs: f64) {
        self.script_timings.clear();
        let cost_ms = frame_time_ms(delta_secs);
        for behaviour in source.behaviours() {
            self.script_timings.record(&behaviour.type_name, cost_ms);
        }
    }
}
