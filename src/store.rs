use std::collections::VecDeque;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{RoiInput, RoiResult};

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub input: RoiInput,
    pub result: RoiResult,
}

impl Scenario {
    pub fn new(input: RoiInput, result: RoiResult) -> Self {
        Self {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            input,
            result,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioStore {
    capacity: usize,
    scenarios: Arc<RwLock<VecDeque<Scenario>>>,
}

impl ScenarioStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            scenarios: Arc::new(RwLock::new(VecDeque::with_capacity(capacity.min(1024)))),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&self, input: RoiInput, result: RoiResult) -> Scenario {
        let scenario = Scenario::new(input, result);
        self.insert(scenario.clone());
        scenario
    }

    // An id already in the history replaces the old entry.
    pub fn insert(&self, scenario: Scenario) {
        let mut scenarios = self.write();
        scenarios.retain(|existing| existing.id != scenario.id);
        scenarios.push_front(scenario);
        while scenarios.len() > self.capacity {
            if let Some(evicted) = scenarios.pop_back() {
                tracing::debug!(id = %evicted.id, "evicted scenario from history");
            }
        }
    }

    pub fn list(&self) -> Vec<Scenario> {
        self.read().iter().cloned().collect()
    }

    pub fn get(&self, id: Uuid) -> Option<Scenario> {
        self.read().iter().find(|s| s.id == id).cloned()
    }

    pub fn clear(&self) -> usize {
        let mut scenarios = self.write();
        let removed = scenarios.len();
        scenarios.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // No update leaves the deque half-written, so a poisoned lock is usable.
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<Scenario>> {
        self.scenarios.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<Scenario>> {
        self.scenarios.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ScenarioStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
