use super::{CharCounter, FrequencyTable};
use crate::error::{CharFreqError, Result};
use crate::model::{MergePolicy, RepoId};
use crate::store::FreqStore;
use std::collections::btree_map::{BTreeMap, Entry};
use std::path::{Path, PathBuf};
use tracing::info;

/// Frequency tables of many repositories, keyed by repository id.
///
/// When bound to a store, the collection acts as a staging buffer: [`Collection::save`]
/// reconciles it with the persisted state and leaves it empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    repos: BTreeMap<RepoId, FrequencyTable>,
    store: Option<PathBuf>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store<P: AsRef<Path>>(store: P) -> Self {
        Self {
            repos: BTreeMap::new(),
            store: Some(store.as_ref().to_path_buf()),
        }
    }

    pub(crate) fn from_tables(repos: BTreeMap<RepoId, FrequencyTable>, store: Option<PathBuf>) -> Self {
        Self { repos, store }
    }

    pub fn store(&self) -> Option<&Path> {
        self.store.as_deref()
    }

    pub fn set_store<P: AsRef<Path>>(&mut self, store: P) {
        self.store = Some(store.as_ref().to_path_buf());
    }

    pub fn record(&mut self, repo: impl Into<RepoId>, table: FrequencyTable, policy: MergePolicy) {
        match self.repos.entry(repo.into()) {
            Entry::Vacant(slot) => {
                slot.insert(table);
            }
            Entry::Occupied(mut slot) => match policy {
                MergePolicy::Replace => {
                    slot.insert(table);
                }
                MergePolicy::SkipIfPresent => {}
                MergePolicy::MergeIfPresent => slot.get_mut().merge(&table),
            },
        }
    }

    pub fn merge_collection(&mut self, other: Collection, policy: MergePolicy) {
        for (repo, table) in other.repos {
            self.record(repo, table, policy);
        }
    }

    pub fn total(&self) -> u64 {
        self.repos.values().map(FrequencyTable::total).sum()
    }

    pub fn total_of(&self, chars: &str) -> u64 {
        self.repos.values().map(|t| t.total_of(chars)).sum()
    }

    /// All repositories merged into a single table.
    pub fn flattened_all(&self) -> FrequencyTable {
        let mut out = FrequencyTable::new();
        for table in self.repos.values() {
            out.merge(table);
        }
        out
    }

    /// Per-character totals across every repository and extension.
    pub fn flattened_counter(&self) -> CharCounter {
        let mut out = CharCounter::new();
        for table in self.repos.values() {
            out.add_counter(&table.flattened());
        }
        out
    }

    pub fn case_fold_all(&mut self) {
        for table in self.repos.values_mut() {
            table.case_fold();
        }
    }

    pub fn get(&self, repo: &str) -> Option<&FrequencyTable> {
        self.repos.get(repo)
    }

    pub fn contains(&self, repo: &str) -> bool {
        self.repos.contains_key(repo)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrequencyTable)> + '_ {
        self.repos.iter().map(|(repo, table)| (repo.as_str(), table))
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn clear(&mut self) {
        self.repos.clear();
    }

    /// Fold any previously saved state in under `policy`, persist the result and empty
    /// the in-memory collection. Returns the number of repositories written.
    ///
    /// On error the in-memory collection is left as it was before the call.
    pub fn save(&mut self, policy: MergePolicy) -> Result<usize> {
        let path = self.store_path()?.to_path_buf();
        let mut merged = self.clone();
        if FreqStore::exists(&path) {
            let persisted = FreqStore::open(&path)?.load()?;
            merged.merge_collection(persisted, policy);
        }
        merged.dump()?;
        let written = merged.len();
        info!("Added {} items to {}", written, path.display());
        self.repos.clear();
        Ok(written)
    }

    /// Read the persisted collection. The store is left untouched.
    pub fn load(&self) -> Result<Collection> {
        let path = self.store_path()?;
        if !FreqStore::exists(path) {
            return Err(CharFreqError::Store(format!("No store at {}", path.display())));
        }
        FreqStore::open(path)?.load()
    }

    /// Overwrite the store with the in-memory collection as-is.
    pub fn dump(&self) -> Result<()> {
        let path = self.store_path()?;
        info!("Writing to {}", path.display());
        FreqStore::open(path)?.dump(self)
    }

    fn store_path(&self) -> Result<&Path> {
        self.store.as_deref().ok_or(CharFreqError::NoStore)
    }
}
