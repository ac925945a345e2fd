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

//! Provides the read-only contracts and snapshot types for sampled metrics.
//!
//! This module defines the "common language" between a host application and
//! the sampling engine: which metric groups exist ([`MetricCategories`]),
//! what one reading of each group looks like, and the [`MetricSource`] trait
//! through which the engine pulls those readings once per sampled frame.

pub mod categories;
pub mod source;

pub use self::categories::MetricCategories;
pub use self::source::{
    AudioSnapshot, BehaviourInfo, MemorySnapshot, MetricSource, PhysicsSnapshot,
    QualitySnapshot, RenderCounters, SimulationMode, SpeakerMode, UnknownVariant,
};
