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

//! # Framewatch Infra
//!
//! Concrete [`MetricSource`](framewatch_core::MetricSource) adapters for a
//! native host: a tracking global allocator, `sysinfo`-backed process memory,
//! and an explicit behaviour registry for script timings.

#![warn(missing_docs)]

pub mod allocator;
pub mod behaviour;
pub mod host_source;
pub mod memory_monitor;

pub use allocator::TrackingAllocator;
pub use behaviour::{BehaviourHandle, BehaviourRegistry};
pub use host_source::HostMetricSource;
pub use memory_monitor::ProcessMemoryMonitor;
