use super::CharCounter;
use crate::model::CommitBatch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Character counts of one repository, grouped by file extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    by_extension: BTreeMap<String, CharCounter>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every added-line batch of every commit into a fresh table.
    pub fn from_commits<'a, I>(commits: I) -> Self
    where
        I: IntoIterator<Item = &'a CommitBatch>,
    {
        let mut table = Self::new();
        for commit in commits {
            for added in &commit.files {
                table.append(&added.extension, &added.text);
            }
        }
        table
    }

    pub fn append(&mut self, extension: &str, batch: &str) {
        self.entry(extension).add(batch);
    }

    pub fn append_counter(&mut self, extension: &str, counter: &CharCounter) {
        self.entry(extension).add_counter(counter);
    }

    /// Accumulate `other` into `self`. Merging the same table twice counts it twice.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (extension, counter) in &other.by_extension {
            self.append_counter(extension, counter);
        }
    }

    /// Re-key every counter by uppercase character. Case information is lost.
    pub fn case_fold(&mut self) {
        for counter in self.by_extension.values_mut() {
            *counter = counter.case_folded();
        }
    }

    pub fn total(&self) -> u64 {
        self.by_extension.values().map(CharCounter::total).sum()
    }

    pub fn total_of(&self, chars: &str) -> u64 {
        self.by_extension.values().map(|c| c.total_of(chars)).sum()
    }

    /// Per-character totals across all extensions.
    pub fn flattened(&self) -> CharCounter {
        let mut out = CharCounter::new();
        for counter in self.by_extension.values() {
            out.add_counter(counter);
        }
        out
    }

    pub fn counter(&self, extension: &str) -> Option<&CharCounter> {
        self.by_extension.get(extension)
    }

    pub fn extensions(&self) -> impl Iterator<Item = (&str, &CharCounter)> + '_ {
        self.by_extension.iter().map(|(ext, c)| (ext.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }

    fn entry(&mut self, extension: &str) -> &mut CharCounter {
        self.by_extension.entry(extension.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AddedBatch;

    fn sample() -> FrequencyTable {
        let mut t = FrequencyTable::new();
        t.append(".rs", "fn main() {}");
        t.append(".py", "def f(): pass");
        t.append(".rs", "let a = 1;");
        t
    }

    #[test]
    fn append_accumulates_per_extension() {
        let t = sample();
        assert_eq!(t.len(), 2);
        assert_eq!(t.counter(".rs").map(|c| c.get('n')), Some(2));
        assert_eq!(t.total(), 12 + 13 + 10);
    }

    #[test]
    fn flattened_preserves_total() {
        let t = sample();
        assert_eq!(t.total(), t.flattened().total());
        assert_eq!(t.flattened().get('f'), 3);
    }

    #[test]
    fn merge_is_literal_accumulation() {
        let mut t = sample();
        let other = sample();
        t.merge(&FrequencyTable::new());
        assert_eq!(t, other);
        t.merge(&other);
        assert_eq!(t.total(), 2 * other.total());
        t.merge(&other);
        assert_eq!(t.total(), 3 * other.total());
    }

    #[test]
    fn merge_creates_missing_extensions() {
        let mut t = FrequencyTable::new();
        t.append(".c", "int");
        let mut other = FrequencyTable::new();
        other.append(".h", "void");
        t.merge(&other);
        assert_eq!(t.len(), 2);
        assert_eq!(t.total_of("v"), 1);
    }

    #[test]
    fn case_fold_is_idempotent_and_clears_lowercase() {
        let mut t = sample();
        let before = t.total();
        t.case_fold();
        let once = t.clone();
        t.case_fold();
        assert_eq!(t, once);
        assert_eq!(t.total(), before);
        assert_eq!(t.total_of("abcdefghijklmnopqrstuvwxyz"), 0);
        assert_eq!(t.total_of("F"), 3);
    }

    #[test]
    fn from_commits_groups_by_extension() {
        let commits = vec![
            CommitBatch {
                commit_id: "c1".into(),
                files: vec![
                    AddedBatch { extension: ".md".into(), text: "# hi".into() },
                    AddedBatch { extension: String::new(), text: "all:".into() },
                ],
            },
            CommitBatch {
                commit_id: "c2".into(),
                files: vec![AddedBatch { extension: ".md".into(), text: "hi".into() }],
            },
        ];
        let t = FrequencyTable::from_commits(&commits);
        assert_eq!(t.counter(".md").map(|c| c.get('h')), Some(2));
        assert_eq!(t.counter("").map(CharCounter::total), Some(4));
        assert_eq!(t.total(), 10);
    }
}
