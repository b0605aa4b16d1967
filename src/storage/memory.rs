//! In-memory repository
//!
//! Keeps records in a `BTreeMap` behind an `RwLock`. Identities come from a
//! counter that is never rewound, so deleted identities are not reused.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::repository::{entity_name, Repository};
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{FieldValue, Filter, Pk, Record};

struct MemoryState<T> {
    records: BTreeMap<Pk, T>,
    last_pk: Pk,
}

/// Repository holding records in process memory
pub struct MemoryRepository<T: Record> {
    state: RwLock<MemoryState<T>>,
}

impl<T: Record> MemoryRepository<T> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                records: BTreeMap::new(),
                last_pk: 0,
            }),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> BookkeeperResult<usize> {
        let state = self
            .state
            .read()
            .map_err(|e| BookkeeperError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(state.records.len())
    }

    pub fn is_empty(&self) -> BookkeeperResult<bool> {
        Ok(self.len()? == 0)
    }

    fn select<F>(&self, filter: &Filter, matches: F) -> BookkeeperResult<Vec<T>>
    where
        F: Fn(&FieldValue, &FieldValue) -> bool,
    {
        let schema = T::schema();
        schema.check_filter(filter)?;

        let conditions: Vec<(usize, &FieldValue)> = filter
            .iter()
            .filter_map(|(field, value)| schema.position(field).map(|pos| (pos, value)))
            .collect();

        let state = self
            .state
            .read()
            .map_err(|e| BookkeeperError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(state
            .records
            .values()
            .filter(|record| {
                let values = record.to_values();
                conditions
                    .iter()
                    .all(|(pos, wanted)| values.get(*pos).is_some_and(|v| matches(v, wanted)))
            })
            .cloned()
            .collect())
    }
}

impl<T: Record> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Repository<T> for MemoryRepository<T> {
    fn add(&self, obj: &mut T) -> BookkeeperResult<Pk> {
        if obj.is_saved() {
            return Err(BookkeeperError::InvalidState(format!(
                "Cannot add {} that already has identity {}",
                entity_name::<T>(),
                obj.pk()
            )));
        }

        let mut state = self
            .state
            .write()
            .map_err(|e| BookkeeperError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        state.last_pk += 1;
        let pk = state.last_pk;
        obj.set_pk(pk);
        state.records.insert(pk, obj.clone());

        tracing::debug!(table = T::schema().table, pk, "memory insert");
        Ok(pk)
    }

    fn get(&self, pk: Pk) -> BookkeeperResult<Option<T>> {
        let state = self
            .state
            .read()
            .map_err(|e| BookkeeperError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(state.records.get(&pk).cloned())
    }

    fn get_all(&self, filter: Option<&Filter>) -> BookkeeperResult<Vec<T>> {
        match filter {
            Some(filter) => self.select(filter, |stored, wanted| stored == wanted),
            None => self.select(&Filter::new(), |_, _| true),
        }
    }

    fn get_all_like(&self, filter: &Filter) -> BookkeeperResult<Vec<T>> {
        self.select(filter, |stored, needle| stored.matches_like(needle))
    }

    fn update(&self, obj: &T) -> BookkeeperResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| BookkeeperError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match state.records.get_mut(&obj.pk()) {
            Some(stored) => {
                *stored = obj.clone();
                tracing::debug!(table = T::schema().table, pk = obj.pk(), "memory update");
                Ok(())
            }
            None => Err(BookkeeperError::record_not_found(entity_name::<T>(), obj.pk())),
        }
    }

    fn delete(&self, pk: Pk) -> BookkeeperResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| BookkeeperError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match state.records.remove(&pk) {
            Some(_) => {
                tracing::debug!(table = T::schema().table, pk, "memory delete");
                Ok(())
            }
            None => Err(BookkeeperError::record_not_found(entity_name::<T>(), pk)),
        }
    }
}
