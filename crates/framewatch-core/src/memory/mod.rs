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

//! Global heap-allocation counters.
//!
//! These counters form a contract: a registered tracking allocator (see
//! `framewatch-infra`) increments them, and memory adapters read them when a
//! sample includes the memory group. Reads use `Ordering::Relaxed`; the
//! values are a statistical snapshot, not a synchronisation point.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// The number of heap bytes currently allocated through the tracking allocator.
pub static CURRENTLY_ALLOCATED_BYTES: AtomicUsize = AtomicUsize::new(0);

/// The highest value ever reached by [`CURRENTLY_ALLOCATED_BYTES`].
pub static PEAK_ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);

/// The number of allocation calls made.
pub static TOTAL_ALLOCATIONS: AtomicU64 = AtomicU64::new(0);

/// The number of deallocation calls made.
pub static TOTAL_DEALLOCATIONS: AtomicU64 = AtomicU64::new(0);

/// A snapshot of the global heap counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Bytes currently allocated.
    pub current_bytes: u64,
    /// Peak bytes allocated at once.
    pub peak_bytes: u64,
    /// Allocation calls since start-up.
    pub total_allocations: u64,
    /// Deallocation calls since start-up.
    pub total_deallocations: u64,
}

impl HeapStats {
    /// The number of allocations not yet freed.
    pub fn live_allocations(&self) -> u64 {
        self.total_allocations
            .saturating_sub(self.total_deallocations)
    }
}

/// Takes a snapshot of the global heap counters.
///
/// All counters stay at zero unless a tracking allocator is registered as the
/// `#[global_allocator]`.
pub fn heap_stats() -> HeapStats {
    HeapStats {
        current_bytes: CURRENTLY_ALLOCATED_BYTES.load(Ordering::Relaxed) as u64,
        peak_bytes: PEAK_ALLOCATED_BYTES.load(Ordering::Relaxed),
        total_allocations: TOTAL_ALLOCATIONS.load(Ordering::Relaxed),
        total_deallocations: TOTAL_DEALLOCATIONS.load(Ordering::Relaxed),
    }
}

/// Returns the number of heap bytes currently allocated.
pub fn currently_allocated_bytes() -> u64 {
    CURRENTLY_ALLOCATED_BYTES.load(Ordering::Relaxed) as u64
}
