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

//! A `GlobalAlloc` wrapper feeding the heap counters of `framewatch_core::memory`.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::Ordering;

use framewatch_core::memory::{
    CURRENTLY_ALLOCATED_BYTES, PEAK_ALLOCATED_BYTES, TOTAL_ALLOCATIONS, TOTAL_DEALLOCATIONS,
};

/// Wraps an allocator and counts every heap allocation made through it.
///
/// Register it as the `#[global_allocator]` to make the memory group of a
/// sample report real heap usage:
///
/// ```rust,ignore
/// use framewatch_infra::TrackingAllocator;
///
/// #[global_allocator]
/// static GLOBAL: TrackingAllocator = TrackingAllocator::new(std::alloc::System);
/// ```
///
/// Nothing in here logs or allocates. A counter that would overflow or
/// underflow is left unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackingAllocator<A = System> {
    inner: A,
}

impl<A> TrackingAllocator<A> {
    /// Wraps `inner`.
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }
}

fn record_alloc(size: usize) {
    let previous = CURRENTLY_ALLOCATED_BYTES.fetch_update(
        Ordering::Relaxed,
        Ordering::Relaxed,
        |current| current.checked_add(size),
    );
    if let Ok(previous) = previous {
        PEAK_ALLOCATED_BYTES.fetch_max((previous + size) as u64, Ordering::Relaxed);
        TOTAL_ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    }
}

fn record_dealloc(size: usize) {
    let previous = CURRENTLY_ALLOCATED_BYTES.fetch_update(
        Ordering::Relaxed,
        Ordering::Relaxed,
        |current| current.checked_sub(size),
    );
    if previous.is_ok() {
        TOTAL_DEALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    }
}

unsafe impl<A: GlobalAlloc> GlobalAlloc for TrackingAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc_zeroed(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        record_dealloc(layout.size());
        self.inner.dealloc(ptr, layout);
    }

    /// Counts only the size difference; a reallocation is neither a new
    /// allocation nor a deallocation.
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let old_size = layout.size();
        let new_ptr = self.inner.realloc(ptr, layout, new_size);
        if new_ptr.is_null() {
            return new_ptr;
        }

        if new_size > old_size {
            let grown = new_size - old_size;
            let previous = CURRENTLY_ALLOCATED_BYTES.fetch_update(
                Ordering::Relaxed,
                Ordering::Relaxed,
                |current| current.checked_add(grown),
            );
            if let Ok(previous) = previous {
                PEAK_ALLOCATED_BYTES.fetch_max((previous + grown) as u64, Ordering::Relaxed);
            }
        } else if new_size < old_size {
            let shrunk = old_size - new_size;
            let _ = CURRENTLY_ALLOCATED_BYTES.fetch_update(
                Ordering::Relaxed,
                Ordering::Relaxed,
                |current| current.checked_sub(shrunk),
            );
        }
        new_ptr
    }
}
