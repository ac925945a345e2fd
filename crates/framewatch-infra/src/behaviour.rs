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

//! Explicit registration of the component instances observed for script timings.
//!
//! The host registers each live component and keeps the returned
//! [`BehaviourHandle`] alongside it. Dropping every clone of a handle
//! unregisters the instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use framewatch_core::BehaviourInfo;

#[derive(Debug)]
struct BehaviourEntry {
    type_name: String,
    enabled: AtomicBool,
}

/// A registered component instance.
#[derive(Debug, Clone)]
pub struct BehaviourHandle {
    entry: Arc<BehaviourEntry>,
}

impl BehaviourHandle {
    /// The component's type name as reported in script timings.
    pub fn type_name(&self) -> &str {
        &self.entry.type_name
    }

    /// Whether the component currently receives updates.
    pub fn is_enabled(&self) -> bool {
        self.entry.enabled.load(Ordering::Relaxed)
    }

    /// Enables or disables the component.
    pub fn set_enabled(&self, enabled: bool) {
        self.entry.enabled.store(enabled, Ordering::Relaxed);
    }
}

/// The set of live component instances.
///
/// Cloning the registry shares the same set.
#[derive(Debug, Clone, Default)]
pub struct BehaviourRegistry {
    entries: Arc<Mutex<Vec<Weak<BehaviourEntry>>>>,
}

impl BehaviourRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an enabled instance under `type_name`.
    pub fn register(&self, type_name: impl Into<String>) -> BehaviourHandle {
        let entry = Arc::new(BehaviourEntry {
            type_name: type_name.into(),
            enabled: AtomicBool::new(true),
        });
        self.lock().push(Arc::downgrade(&entry));
        log::trace!("Registered behaviour '{}'", entry.type_name);
        BehaviourHandle { entry }
    }

    /// Registers an enabled instance of `T`, named after the last path segment
    /// of its type name.
    pub fn register_type<T: ?Sized>(&self) -> BehaviourHandle {
        let full = std::any::type_name::<T>();
        let path = full.split('<').next().unwrap_or(full);
        let short = path.rsplit("::").next().unwrap_or(path);
        self.register(short)
    }

    /// The number of live instances.
    pub fn len(&self) -> usize {
        self.lock()
            .iter()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }

    /// Returns `true` if no instance is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Describes every live instance in registration order, dropping
    /// instances whose handles are gone.
    pub fn snapshot(&self) -> Vec<BehaviourInfo> {
        let mut entries = self.lock();
        entries.retain(|entry| entry.strong_count() > 0);
        entries
            .iter()
            .filter_map(Weak::upgrade)
            .map(|entry| BehaviourInfo {
                type_name: entry.type_name.clone(),
                enabled: entry.enabled.load(Ordering::Relaxed),
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Weak<BehaviourEntry>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    struct PlayerController;

    mod game {
        #[allow(dead_code)]
        pub struct Spawner<T>(pub T);
    }

    #[test]
    fn test_snapshot_lists_live_instances_in_order() {
        let registry = BehaviourRegistry::new();
        let _player = registry.register("Player");
        let enemy = registry.register("Enemy");
        enemy.set_enabled(false);

        let infos = registry.snapshot();
        assert_eq!(
            infos,
            vec![
                BehaviourInfo::new("Player"),
                BehaviourInfo {
                    type_name: "Enemy".to_string(),
                    enabled: false,
                },
            ]
        );
    }

    #[test]
    fn test_dropping_handle_unregisters() {
        let registry = BehaviourRegistry::new();
        let first = registry.register("Turret");
        let second = first.clone();
        assert_eq!(registry.len(), 1);

        drop(first);
        assert_eq!(registry.len(), 1);
        drop(second);
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn test_register_type_uses_short_name() {
        let registry = BehaviourRegistry::new();
        let player = registry.register_type::<PlayerController>();
        let spawner = registry.register_type::<game::Spawner<u32>>();
        assert_eq!(player.type_name(), "PlayerController");
        assert_eq!(spawner.type_name(), "Spawner");
    }
}
