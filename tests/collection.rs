use charfreq::{CharCounter, Collection, FrequencyTable, MergePolicy};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";

fn fixture() -> Collection {
    let mut c = Collection::new();

    let mut rust = FrequencyTable::new();
    rust.append(".rs", "fn main() {\n    println!(\"Hello, Eta!\");\n}");
    rust.append(".toml", "[package]\nname = \"eta\"");
    rust.append("", "all: build");
    c.record("https://example.com/rust.git", rust, MergePolicy::Replace);

    let mut py = FrequencyTable::new();
    py.append(".py", "def total(a, b):\n    return a + b");
    py.append(".py", "print(total(1, 2))  # ünïcödé");
    c.record("https://example.com/py.git", py, MergePolicy::Replace);

    let mut docs = FrequencyTable::new();
    docs.append(".md", "# Title\n\nSome TEXT with Ümlauts and ß.");
    c.record("https://example.com/docs.git", docs, MergePolicy::Replace);

    c
}

#[test]
fn counter_sum_adds_totals() {
    let c1 = CharCounter::from_batch("the quick brown fox");
    let c2 = CharCounter::from_batch("jumps over the lazy dog");
    assert_eq!(c1.sum(&c2).total(), c1.total() + c2.total());
    assert_eq!(c2.sum(&c1), c1.sum(&c2));
}

#[test]
fn case_fold_moves_all_lowercase_mass() {
    let c = fixture();
    let mut folded = c.clone();
    folded.case_fold_all();

    assert_eq!(folded.total_of(LOWERCASE), 0);
    assert_eq!(folded.total(), c.total());
    assert!(folded.total_of("ETA") > folded.total_of("TA"));
    assert_eq!(folded.total(), folded.flattened_all().total());
    assert_eq!(folded.total(), folded.flattened_counter().total());

    let mut twice = folded.clone();
    twice.case_fold_all();
    assert_eq!(twice, folded);
}

#[test]
fn case_fold_concrete_counter() {
    let mut t = FrequencyTable::new();
    t.append_counter(".txt", &[('a', 3), ('b', 1)].into_iter().collect());
    t.case_fold();

    let expected: CharCounter = [('A', 3), ('B', 1)].into_iter().collect();
    assert_eq!(t.counter(".txt"), Some(&expected));
    assert_eq!(t.total(), 4);
    assert_eq!(t.total_of("a"), 0);
    assert_eq!(t.total_of("A"), 3);
}

#[test]
fn grouping_by_extension_preserves_totals() {
    for (_, table) in fixture().iter() {
        assert_eq!(table.total(), table.flattened().total());
    }
}

#[test]
fn merge_policies_on_self() {
    let c = fixture();
    let total = c.total();
    let len = c.len();

    let mut c2 = c.clone();
    c2.merge_collection(c.clone(), MergePolicy::MergeIfPresent);
    assert_eq!(c2.total(), 2 * total);
    assert_eq!(c2.len(), len);

    c2.merge_collection(c.clone(), MergePolicy::SkipIfPresent);
    assert_eq!(c2.total(), 2 * total);
    assert_eq!(c2.len(), len);

    c2.merge_collection(c.clone(), MergePolicy::Replace);
    assert_eq!(c2.total(), total);
    assert_eq!(c2.len(), len);
    assert_eq!(c2, c);
}

#[test]
fn merge_collection_adds_new_keys_under_any_policy() {
    let mut other = Collection::new();
    let mut t = FrequencyTable::new();
    t.append(".go", "package main");
    other.record("https://example.com/go.git", t, MergePolicy::Replace);

    for policy in [MergePolicy::Replace, MergePolicy::SkipIfPresent, MergePolicy::MergeIfPresent] {
        let mut c = fixture();
        let before = c.total();
        c.merge_collection(other.clone(), policy);
        assert_eq!(c.len(), 4);
        assert_eq!(c.total(), before + 12);
    }
}

#[test]
fn save_then_load_preserves_total() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("freqs.db");
    let c = fixture();

    let mut staged = c.clone();
    staged.set_store(&store);
    let written = staged.save(MergePolicy::Replace).unwrap();

    assert_eq!(written, c.len());
    assert!(staged.is_empty());
    let loaded = staged.load().unwrap();
    assert_eq!(loaded.total(), c.total());
    assert_eq!(loaded.len(), c.len());
}

#[test]
fn save_with_merge_doubles_then_dump_clears() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("freqs.db");
    let c = fixture();

    let mut staged = c.clone();
    staged.set_store(&store);
    staged.save(MergePolicy::Replace).unwrap();

    let mut staged = c.clone();
    staged.set_store(&store);
    staged.save(MergePolicy::MergeIfPresent).unwrap();
    assert_eq!(staged.load().unwrap().total(), 2 * c.total());

    // the staging buffer was emptied by the save
    staged.dump().unwrap();
    assert!(staged.load().unwrap().is_empty());
}

#[test]
fn save_keeps_unrelated_stored_entries() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("freqs.db");

    let mut first = fixture();
    first.set_store(&store);
    first.save(MergePolicy::Replace).unwrap();

    let mut second = Collection::with_store(&store);
    let mut t = FrequencyTable::new();
    t.append(".c", "int main;");
    second.record("https://example.com/c.git", t, MergePolicy::Replace);
    second.save(MergePolicy::Replace).unwrap();

    let loaded = second.load().unwrap();
    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded.total(), fixture().total() + 9);
}

#[test]
fn save_policy_decides_between_stored_and_fresh() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("freqs.db");
    let repo = "https://example.com/r.git";

    let table = |text: &str| {
        let mut t = FrequencyTable::new();
        t.append(".txt", text);
        t
    };

    let mut c = Collection::with_store(&store);
    c.record(repo, table("old"), MergePolicy::Replace);
    c.save(MergePolicy::Replace).unwrap();

    // skip keeps the freshly staged table
    c.record(repo, table("fresh!"), MergePolicy::Replace);
    c.save(MergePolicy::SkipIfPresent).unwrap();
    assert_eq!(c.load().unwrap().total(), 6);

    // replace lets the stored table overwrite the staged one
    c.record(repo, table("ignored"), MergePolicy::Replace);
    c.save(MergePolicy::Replace).unwrap();
    assert_eq!(c.load().unwrap().total(), 6);
}

#[test]
fn load_without_prior_save_fails() {
    let dir = tempdir().unwrap();
    let c = Collection::with_store(dir.path().join("missing.db"));
    assert!(c.load().is_err());
    assert!(!dir.path().join("missing.db").exists());
}
