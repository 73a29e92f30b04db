use crate::freq::FrequencyTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Identifies a repository, normally its clone URL.
pub type RepoId = String;

/// How a table for a repository combines with one already held for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Overwrite the held table.
    #[default]
    Replace,
    /// Keep the held table untouched.
    #[value(name = "skip")]
    SkipIfPresent,
    /// Add the new counts onto the held table.
    #[value(name = "merge")]
    MergeIfPresent,
}

/// Inserted text of one file within one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedBatch {
    pub extension: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitBatch {
    pub commit_id: String,
    pub files: Vec<AddedBatch>,
}

impl CommitBatch {
    pub fn char_count(&self) -> usize {
        self.files.iter().map(|f| f.text.chars().count()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoEntry {
    pub repo: RepoId,
    pub total: u64,
    pub extensions: FrequencyTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub store: String,
    pub case_folded: bool,
    pub total: u64,
    pub repositories: Vec<RepoEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionSummary {
    pub extension: String,
    pub total: u64,
    pub top: Vec<(char, u64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub store: String,
    pub repositories: usize,
    pub total: u64,
    pub selected_chars: Option<String>,
    pub selected_total: Option<u64>,
    pub top: Vec<(char, u64)>,
    pub extensions: Vec<ExtensionSummary>,
}
