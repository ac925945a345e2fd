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

//! The set of optional metric groups a recording session captures.

use crate::framewatch_bitflags;

framewatch_bitflags! {
    /// A bitset of the optional metric groups included in every sample of a session.
    ///
    /// Frame index, elapsed time, FPS and frame time are always recorded and
    /// have no flag.
    pub struct MetricCategories: u8 {
        /// Reserved, allocated and managed-heap memory, in megabytes.
        const MEMORY = 1 << 0;
        /// GPU render time of the frame.
        const GPU = 1 << 1;
        /// Batches, set-pass calls, draw calls, triangles and vertices.
        const DRAW_COUNTERS = 1 << 2;
        /// Physics simulation mode, fixed delta time and auto-simulation flag.
        const PHYSICS = 1 << 3;
        /// Render pipeline, vsync count and anti-aliasing level.
        const RENDERING = 1 << 4;
        /// Output sample rate, speaker mode and listener volume.
        const AUDIO = 1 << 5;
        /// Approximate per-component-type update cost.
        const SCRIPT_TIMINGS = 1 << 6;
    }
}
