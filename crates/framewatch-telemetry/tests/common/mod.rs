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

//! Shared test doubles for the telemetry integration tests.

#![allow(dead_code)]

use std::path::Path;

use framewatch_core::{
    BehaviourInfo, MemorySnapshot, MetricCategories, MetricSource, QualitySnapshot,
    RenderCounters,
};
use framewatch_telemetry::SamplerConfig;

pub const MB: u64 = 1024 * 1024;

/// A metric source returning fixed values.
#[derive(Debug, Clone)]
pub struct FixedSource {
    pub memory: MemorySnapshot,
    pub gpu_ms: f64,
    pub counters: RenderCounters,
    pub pipeline: String,
    pub behaviours: Vec<BehaviourInfo>,
}

impl Default for FixedSource {
    fn default() -> Self {
        Self {
            memory: MemorySnapshot {
                reserved_bytes: 512 * MB,
                allocated_bytes: 300 * MB,
                managed_heap_bytes: 24 * MB,
            },
            gpu_ms: 4.25,
            counters: RenderCounters {
                batches: 12,
                set_pass_calls: 8,
                draw_calls: 140,
                triangles: 52_000,
                vertices: 98_000,
            },
            pipeline: "Forward".to_string(),
            behaviours: vec![
                BehaviourInfo::new("PlayerController"),
                BehaviourInfo::new("EnemyAi"),
                BehaviourInfo::new("EnemyAi"),
            ],
        }
    }
}

impl MetricSource for FixedSource {
    fn memory(&self) -> MemorySnapshot {
        self.memory
    }

    fn gpu_frame_time_ms(&self) -> f64 {
        self.gpu_ms
    }

    fn render_counters(&self) -> RenderCounters {
        self.counters
    }

    fn quality(&self) -> QualitySnapshot {
        QualitySnapshot {
            render_pipeline: self.pipeline.clone(),
            vsync_count: 1,
            anti_aliasing: 4,
        }
    }

    fn behaviours(&self) -> Vec<BehaviourInfo> {
        self.behaviours.clone()
    }
}

/// A configuration writing into `dir`, with auto-stop off and the given groups.
pub fn config_in(dir: &Path, categories: MetricCategories) -> SamplerConfig {
    let mut config = SamplerConfig::default();
    config.profiling.output_directory = dir.to_path_buf();
    config.profiling.auto_stop_enabled = false;
    config.profiling.set_categories(categories);
    config
}
