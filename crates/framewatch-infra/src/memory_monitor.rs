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

//! Process memory as seen by the operating system, via `sysinfo`.

use std::sync::{Mutex, PoisonError};

use framewatch_core::memory::currently_allocated_bytes;
use framewatch_core::MemorySnapshot;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Reports the memory of the current process.
///
/// Each snapshot refreshes only this process' memory figures:
///
/// - `reserved_bytes`: virtual memory size of the process.
/// - `allocated_bytes`: resident set size.
/// - `managed_heap_bytes`: bytes live in the [`TrackingAllocator`], or `0`
///   when it is not the global allocator.
///
/// [`TrackingAllocator`]: crate::TrackingAllocator
#[derive(Debug)]
pub struct ProcessMemoryMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl ProcessMemoryMonitor {
    /// Creates a monitor for the current process.
    ///
    /// On platforms where the process id cannot be determined, snapshots
    /// only carry the tracked heap figure.
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(err) => {
                log::warn!("Process memory unavailable: {err}");
                None
            }
        };
        Self {
            system: Mutex::new(System::new()),
            pid,
        }
    }

    /// The monitored process id, if known.
    pub fn pid(&self) -> Option<Pid> {
        self.pid
    }

    /// Refreshes and returns the current memory figures.
    pub fn snapshot(&self) -> MemorySnapshot {
        let managed_heap_bytes = currently_allocated_bytes();
        let Some(pid) = self.pid else {
            return MemorySnapshot {
                managed_heap_bytes,
                ..Default::default()
            };
        };

        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );

        match system.process(pid) {
            Some(process) => MemorySnapshot {
                reserved_bytes: process.virtual_memory(),
                allocated_bytes: process.memory(),
                managed_heap_bytes,
            },
            None => {
                log::debug!("Process {pid} not found while refreshing memory");
                MemorySnapshot {
                    managed_heap_bytes,
                    ..Default::default()
                }
            }
        }
    }
}

impl Default for ProcessMemoryMonitor {
    fn default() -> Self {
        Self::new()
    }
}
