use crate::error::Result;
use crate::model::{AddedBatch, CommitBatch};
use crate::util::{extension_key, tail_chars};
use gix::object::tree::diff::ChangeDetached;
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use similar::{ChangeTag, TextDiff};
use std::collections::{BinaryHeap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bounds applied while walking a repository's history.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Maximum number of commits, newest first.
    pub commit_limit: Option<usize>,
    /// Keep only the trailing characters of each file's added text.
    pub char_limit: Option<usize>,
    /// Also count merge commits, diffed against their first parent.
    pub include_merges: bool,
    pub show_progress: bool,
}

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetch URL of the `origin` remote, if configured.
    pub fn origin_url(&self) -> Option<String> {
        let remote = self.repo.find_remote("origin").ok()?;
        remote
            .url(gix::remote::Direction::Fetch)
            .map(|url| url.to_bstring().to_string())
    }

    /// Added text of every walked commit, grouped per changed file.
    pub fn collect_added(&self, opts: &ExtractOptions) -> Result<Vec<CommitBatch>> {
        let commit_ids = self.walk_commits(opts.commit_limit, opts.include_merges)?;

        let pb = if opts.show_progress {
            ProgressBar::new(commit_ids.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {pos}/{len} commits crunched {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut batches = Vec::with_capacity(commit_ids.len());
        for id in commit_ids {
            match self.commit_batch(id, opts.char_limit)? {
                Some(batch) => batches.push(batch),
                None => debug!(commit = %id, "parent not available, skipping commit"),
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(batches)
    }

    /// Commit ids reachable from HEAD, newest commit time first.
    ///
    /// Merge commits are traversed but not returned unless `include_merges` is set,
    /// and do not count towards `limit`.
    fn walk_commits(&self, limit: Option<usize>, include_merges: bool) -> Result<Vec<ObjectId>> {
        let mut head = self.repo.head()?;
        let head_commit = head.peel_to_commit_in_place()?;

        let mut ordered = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::from([head_commit.id]);
        let mut queue: BinaryHeap<(i64, ObjectId)> = BinaryHeap::new();
        queue.push((head_commit.time()?.seconds, head_commit.id));

        while let Some((_, commit_id)) = queue.pop() {
            if limit.is_some_and(|l| ordered.len() >= l) {
                break;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();
            if include_merges || parents.len() <= 1 {
                ordered.push(commit_id);
            }
            for pid in parents {
                // shallow clones reference parents they do not contain
                if !self.repo.has_object(pid) || !seen.insert(pid) {
                    continue;
                }
                let secs = self.repo.find_commit(pid)?.time()?.seconds;
                queue.push((secs, pid));
            }
        }

        Ok(ordered)
    }

    fn commit_batch(&self, commit_id: ObjectId, char_limit: Option<usize>) -> Result<Option<CommitBatch>> {
        let commit = self.repo.find_commit(commit_id)?;
        let commit_tree = commit.tree()?;
        let parent_id: Option<ObjectId> = commit.parent_ids().next().map(|id| id.into());

        let changes: Vec<ChangeDetached> = match parent_id {
            Some(pid) if !self.repo.has_object(pid) => return Ok(None),
            Some(pid) => {
                let parent_tree = self.repo.find_commit(pid)?.tree()?;
                self.repo.diff_tree_to_tree(Some(&parent_tree), Some(&commit_tree), None)?
            }
            None => self.repo.diff_tree_to_tree(None, Some(&commit_tree), None)?,
        };

        let mut files = Vec::new();
        for change in changes {
            if let Some(added) = self.added_batch(change, char_limit)? {
                files.push(added);
            }
        }

        Ok(Some(CommitBatch {
            commit_id: commit_id.to_string(),
            files,
        }))
    }

    fn added_batch(&self, change: ChangeDetached, char_limit: Option<usize>) -> Result<Option<AddedBatch>> {
        let (previous_id, id, location) = match change {
            ChangeDetached::Addition { id, location, .. } => (None, id, location),
            ChangeDetached::Deletion { .. } => return Ok(None),
            ChangeDetached::Modification {
                previous_id,
                id,
                location,
                ..
            } => (Some(previous_id), id, location),
            ChangeDetached::Rewrite {
                source_id,
                id,
                location,
                ..
            } => (Some(source_id), id, location),
        };

        let Some(new_text) = self.blob_text(id)? else {
            return Ok(None);
        };
        let old_text = match previous_id {
            Some(pid) => self.previous_text(pid)?,
            None => String::new(),
        };

        let inserted = inserted_lines(&old_text, &new_text);
        if inserted.is_empty() {
            return Ok(None);
        }

        let joined = inserted.join("\n");
        let text = match char_limit {
            Some(limit) => tail_chars(&joined, limit).to_string(),
            None => joined,
        };

        Ok(Some(AddedBatch {
            extension: extension_key(&location.to_string()),
            text,
        }))
    }

    /// UTF-8 content of a non-binary blob, `None` when the blob is not text.
    fn blob_text(&self, id: ObjectId) -> Result<Option<String>> {
        let obj = self.repo.find_object(id)?;
        if is_binary(obj.data.as_slice()) {
            return Ok(None);
        }
        Ok(std::str::from_utf8(obj.data.as_slice()).ok().map(str::to_owned))
    }

    /// Content of the old side of a change. Invalid UTF-8 is replaced lossily so
    /// unchanged lines still match the new side.
    fn previous_text(&self, id: ObjectId) -> Result<String> {
        let obj = self.repo.find_object(id)?;
        Ok(String::from_utf8_lossy(obj.data.as_slice()).into_owned())
    }
}

fn is_binary(data: &[u8]) -> bool {
    data.iter().take(8192).any(|&b| b == 0)
}

/// Lines present in `new` but not in `old`, without their line terminators.
fn inserted_lines(old: &str, new: &str) -> Vec<String> {
    let diff = TextDiff::from_lines(old, new);
    diff.iter_all_changes()
        .filter(|change| change.tag() == ChangeTag::Insert)
        .map(|change| {
            let line = change.value();
            line.strip_suffix('\n').unwrap_or(line).to_string()
        })
        .collect()
}
