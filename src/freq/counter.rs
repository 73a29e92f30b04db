use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Character occurrence counts for a single file extension.
///
/// A character that is not present has a count of zero; zero counts are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharCounter {
    counts: BTreeMap<char, u64>,
}

impl CharCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every character of `batch`.
    pub fn from_batch(batch: &str) -> Self {
        let mut counter = Self::new();
        counter.add(batch);
        counter
    }

    /// Increment each character of `batch` by its multiplicity in the batch.
    pub fn add(&mut self, batch: &str) {
        for ch in batch.chars() {
            *self.counts.entry(ch).or_insert(0) += 1;
        }
    }

    pub fn add_count(&mut self, ch: char, count: u64) {
        if count > 0 {
            *self.counts.entry(ch).or_insert(0) += count;
        }
    }

    /// In-place counter-wise sum.
    pub fn add_counter(&mut self, other: &CharCounter) {
        for (&ch, &count) in &other.counts {
            self.add_count(ch, count);
        }
    }

    /// Counter-wise sum that leaves both operands untouched.
    pub fn sum(&self, other: &CharCounter) -> CharCounter {
        let mut out = self.clone();
        out.add_counter(other);
        out
    }

    pub fn get(&self, ch: char) -> u64 {
        self.counts.get(&ch).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Sum of the counts of the distinct characters in `chars`.
    pub fn total_of(&self, chars: &str) -> u64 {
        chars
            .chars()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|ch| self.get(ch))
            .sum()
    }

    /// Counts re-keyed by uppercase character, collisions summed.
    pub fn case_folded(&self) -> CharCounter {
        let mut out = CharCounter::new();
        for (&ch, &count) in &self.counts {
            out.add_count(simple_uppercase(ch), count);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.counts.iter().map(|(&ch, &count)| (ch, count))
    }

    /// The `n` most frequent characters, ties broken by character order.
    pub fn most_common(&self, n: usize) -> Vec<(char, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }
}

// Characters whose uppercase form spans several chars (e.g. 'ß') keep their own key.
fn simple_uppercase(ch: char) -> char {
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => ch,
    }
}

impl FromIterator<(char, u64)> for CharCounter {
    fn from_iter<I: IntoIterator<Item = (char, u64)>>(iter: I) -> Self {
        let mut counter = CharCounter::new();
        for (ch, count) in iter {
            counter.add_count(ch, count);
        }
        counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_counts_multiplicity() {
        let c = CharCounter::from_batch("abca\n");
        assert_eq!(c.get('a'), 2);
        assert_eq!(c.get('b'), 1);
        assert_eq!(c.get('\n'), 1);
        assert_eq!(c.get('z'), 0);
        assert_eq!(c.total(), 5);
    }

    #[test]
    fn empty_batch_is_noop() {
        let mut c = CharCounter::from_batch("xy");
        c.add("");
        assert_eq!(c, CharCounter::from_batch("xy"));
    }

    #[test]
    fn sum_adds_totals_without_mutating() {
        let c1 = CharCounter::from_batch("hello");
        let c2 = CharCounter::from_batch("world!");
        let s = c1.sum(&c2);
        assert_eq!(s.total(), c1.total() + c2.total());
        assert_eq!(s.get('l'), 3);
        assert_eq!(c1.total(), 5);
        assert_eq!(c2.sum(&c1), s);
    }

    #[test]
    fn total_of_ignores_missing_and_duplicates() {
        let c = CharCounter::from_batch("aab");
        assert_eq!(c.total_of("a"), 2);
        assert_eq!(c.total_of("aa"), 2);
        assert_eq!(c.total_of("abz"), 3);
        assert_eq!(c.total_of(""), 0);
    }

    #[test]
    fn case_fold_merges_collisions() {
        let c: CharCounter = [('a', 3), ('b', 1)].into_iter().collect();
        let folded = c.case_folded();
        assert_eq!(folded.get('A'), 3);
        assert_eq!(folded.get('B'), 1);
        assert_eq!(folded.total_of("a"), 0);
        assert_eq!(folded.total(), 4);

        let mixed = CharCounter::from_batch("aAa1!");
        let folded = mixed.case_folded();
        assert_eq!(folded.get('A'), 3);
        assert_eq!(folded.get('1'), 1);
        assert_eq!(folded.get('!'), 1);
    }

    #[test]
    fn case_fold_keeps_multi_char_uppercase() {
        let c = CharCounter::from_batch("ßé");
        let folded = c.case_folded();
        assert_eq!(folded.get('ß'), 1);
        assert_eq!(folded.get('É'), 1);
        assert_eq!(folded.case_folded(), folded);
    }

    #[test]
    fn most_common_orders_by_count_then_char() {
        let c = CharCounter::from_batch("ccbbba");
        assert_eq!(c.most_common(2), vec![('b', 3), ('c', 2)]);
        assert_eq!(c.most_common(10).len(), 3);
    }

    #[test]
    fn zero_counts_are_not_stored() {
        let mut c = CharCounter::new();
        c.add_count('x', 0);
        assert!(c.is_empty());
    }
}
