//! Metrics registry
//!
//! Shared map of subject name to record. Cloning the registry clones the
//! handle, not the records. Each subject only ever touches its own key;
//! inserting and removing keys are the only operations that contend.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{MetricsRecord, VitalsError};

#[derive(Debug, Clone, Default)]
pub struct MetricsRegistry {
    inner: Arc<RwLock<HashMap<String, MetricsRecord>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh record; fails if the subject is already registered
    pub fn register(&self, record: MetricsRecord) -> Result<(), VitalsError> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(&record.subject) {
            return Err(VitalsError::AlreadyMounted(record.subject));
        }
        map.insert(record.subject.clone(), record);
        Ok(())
    }

    /// Mutate a subject's record in place
    ///
    /// Returns `None` when the subject is not registered.
    pub fn update<R>(&self, subject: &str, f: impl FnOnce(&mut MetricsRecord) -> R) -> Option<R> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.get_mut(subject).map(f)
    }

    /// Remove a subject's record, returning its final state
    pub fn finalize(&self, subject: &str) -> Option<MetricsRecord> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(subject)
    }

    /// Copy of the current record
    pub fn get(&self, subject: &str) -> Option<MetricsRecord> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(subject)
            .cloned()
    }

    pub fn contains(&self, subject: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(subject)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered subject names, sorted
    pub fn subjects(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}
