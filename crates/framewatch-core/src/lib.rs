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

//! # Framewatch Core
//!
//! Foundational crate containing the read-only contracts and plain data types
//! shared by the sampling engine and the host adapters.
//!
//! The sampling engine in `framewatch-telemetry` never talks to engine globals
//! directly. Everything it records is pulled through the [`MetricSource`]
//! trait defined here, which `framewatch-infra` implements on top of real
//! host state and tests implement with fixed values.

#![warn(missing_docs)]

pub mod memory;
pub mod telemetry;
pub mod utils;

pub use telemetry::{
    AudioSnapshot, BehaviourInfo, MemorySnapshot, MetricCategories, MetricSource,
    PhysicsSnapshot, QualitySnapshot, RenderCounters, SimulationMode, SpeakerMode,
    UnknownVariant,
};
