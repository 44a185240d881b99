use super::record::{AnswerSet, ResourceKey, TrustRecord};
use crate::dns::DomainName;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::TryReserveError;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Added,
    Duplicate,
}

/// Positive answer sets by key plus the negative anchor names.
///
/// Stored sets are shared through `Arc` and replaced wholesale on merge.
#[derive(Debug, Default)]
pub struct AnswerStore {
    positive: FxHashMap<ResourceKey, Arc<AnswerSet>>,
    negative: FxHashSet<DomainName>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `record` to the set for `key` unless an identical record is present
    pub fn merge(&mut self, key: ResourceKey, record: TrustRecord) -> MergeOutcome {
        let merged = match self.positive.get(&key) {
            Some(existing) => existing.with_record(record),
            None => AnswerSet::new(key.clone()).with_record(record),
        };

        match merged {
            Some(set) => {
                self.positive.insert(key, Arc::new(set));
                MergeOutcome::Added
            }
            None => MergeOutcome::Duplicate,
        }
    }

    /// Insert a complete set for a key that has none yet, reporting allocation failure
    pub fn insert_set(&mut self, set: AnswerSet) -> Result<(), TryReserveError> {
        self.positive.try_reserve(1)?;
        self.positive.insert(set.key().clone(), Arc::new(set));
        Ok(())
    }

    /// Returns false if the name was already present
    pub fn insert_negative(&mut self, name: DomainName) -> bool {
        self.negative.insert(name)
    }

    pub fn contains_key(&self, key: &ResourceKey) -> bool {
        self.positive.contains_key(key)
    }

    pub fn get(&self, key: &ResourceKey) -> Option<Arc<AnswerSet>> {
        self.positive.get(key).cloned()
    }

    pub fn contains_negative(&self, name: &DomainName) -> bool {
        self.negative.contains(name)
    }

    pub fn clear(&mut self) {
        self.positive.clear();
        self.negative.clear();
    }

    pub fn positive_len(&self) -> usize {
        self.positive.len()
    }

    pub fn negative_len(&self) -> usize {
        self.negative.len()
    }

    /// All positive sets ordered by key
    pub fn sorted_sets(&self) -> Vec<Arc<AnswerSet>> {
        let mut sets: Vec<Arc<AnswerSet>> = self.positive.values().cloned().collect();
        sets.sort_by(|a, b| a.key().cmp(b.key()));
        sets
    }

    /// All negative names in lexical order
    pub fn sorted_negative(&self) -> Vec<DomainName> {
        let mut names: Vec<DomainName> = self.negative.iter().cloned().collect();
        names.sort();
        names
    }
}
