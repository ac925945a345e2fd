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

//! Sample records, their column layout, and the composer that fills them.

pub mod composer;
pub mod layout;
pub mod record;

pub use self::composer::{frame_rate, frame_time_ms, SampleComposer};
pub use self::layout::{Column, SampleLayout, CANONICAL_ORDER};
pub use self::record::{MemoryMetrics, Sample, ScriptTimings};
