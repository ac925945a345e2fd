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

//! A simulated host: a fixed sequence of frames with a few spikes, one toggle
//! press to start recording, and either auto-stop or a second press to end it.
//!
//! Usage: `framewatch-sandbox [config.json|config.ron]`

use std::alloc::System;

use anyhow::{Context, Result};
use framewatch_core::memory::heap_stats;
use framewatch_core::{QualitySnapshot, RenderCounters};
use framewatch_infra::{
    BehaviourHandle, BehaviourRegistry, HostMetricSource, ProcessMemoryMonitor, TrackingAllocator,
};
use framewatch_telemetry::{RecordingSession, SamplerConfig, SessionOutcome};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator::new(System);

/// Frames simulated before the second toggle press, if auto-stop has not fired.
const MAX_FRAMES: u32 = 600;
const MB: f64 = 1024.0 * 1024.0;

fn load_config() -> Result<SamplerConfig> {
    match std::env::args().nth(1) {
        Some(path) => SamplerConfig::from_file(&path)
            .with_context(|| format!("failed to load sampler configuration from '{path}'")),
        None => {
            let mut config = SamplerConfig::default();
            config.profiling.recording_duration_secs = 5.0;
            config.profiling.write_analysis_report = true;
            Ok(config)
        }
    }
}

/// Delta time of a simulated frame: 60 FPS with a hitch every 90 frames.
fn frame_delta(frame: u32) -> f64 {
    if frame % 90 == 89 {
        0.045
    } else {
        1.0 / 60.0
    }
}

fn spawn_scene(registry: &BehaviourRegistry) -> Vec<BehaviourHandle> {
    let mut scene = vec![registry.register("PlayerController"), registry.register("CameraRig")];
    scene.extend((0..4).map(|_| registry.register("EnemyAi")));
    scene
}

fn report(outcome: &SessionOutcome) {
    log::info!(
        "Session ended ({:?}): {} samples in {}",
        outcome.reason,
        outcome.report.sample_count,
        outcome.artifact_path.display()
    );
    if let Some(path) = &outcome.report_path {
        log::info!("Analysis report: {}", path.display());
    }
    for violation in outcome.report.violations.iter().take(5) {
        log::info!(
            "  frame {}: {} = {:.2} (limit {:.2})",
            violation.frame,
            violation.kind,
            violation.value,
            violation.limit
        );
    }

    let heap = heap_stats();
    log::info!(
        "Heap: {} live allocations, {:.2} MB current, {:.2} MB peak",
        heap.live_allocations(),
        heap.current_bytes as f64 / MB,
        heap.peak_bytes as f64 / MB
    );
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let registry = BehaviourRegistry::new();
    let mut scene = spawn_scene(&registry);

    let mut source = HostMetricSource::new()
        .with_memory_monitor(ProcessMemoryMonitor::new())
        .with_behaviours(registry.clone());
    source.set_quality(QualitySnapshot {
        render_pipeline: "Forward".to_string(),
        vsync_count: 1,
        anti_aliasing: 2,
    });

    let mut session = RecordingSession::new(config);
    session
        .on_toggle_requested()
        .context("failed to start recording")?;

    let mut outcome = None;
    for frame in 0..MAX_FRAMES {
        // One enemy despawns every 150 frames.
        if frame > 0 && frame % 150 == 0 && scene.len() > 2 {
            scene.pop();
        }
        let visible = scene.len() as u32;
        source.set_gpu_frame_time_ms(2.0 + f64::from(frame % 7) * 0.25);
        source.set_render_counters(RenderCounters {
            batches: 10 + visible,
            set_pass_calls: 6 + visible / 2,
            draw_calls: 40 + visible * 12,
            triangles: 12_000 + u64::from(visible) * 3_500,
            vertices: 24_000 + u64::from(visible) * 7_000,
        });

        if let Some(ended) = session.on_host_frame(frame_delta(frame), &source)? {
            outcome = Some(ended);
            break;
        }
    }

    let outcome = match outcome {
        Some(outcome) => outcome,
        None => session
            .on_toggle_requested()
            .context("failed to stop recording")?
            .context("session was not recording")?,
    };
    report(&outcome);
    Ok(())
}
