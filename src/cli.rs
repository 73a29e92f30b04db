use crate::git::ExtractOptions;
use crate::model::MergePolicy;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "charfreq")]
#[command(about = "Collect per-extension character frequencies from lines added in git history")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to the frequency store (SQLite file)")]
    pub store: PathBuf,

    #[arg(
        long,
        value_enum,
        default_value_t = MergePolicy::Replace,
        help = "How a repository already present is combined: replace it, skip the new table, or merge counts"
    )]
    pub policy: MergePolicy,

    #[arg(short, long, help = "Show debug logging")]
    pub verbose: bool,

    #[arg(short, long, help = "Only log warnings and hide progress output")]
    pub quiet: bool,
}

#[derive(Args, Clone, Debug, Default)]
pub struct ExtractArgs {
    #[arg(long, help = "Maximum number of commits to walk per repository")]
    pub commit_limit: Option<usize>,

    #[arg(long, help = "Keep only the trailing N added characters per file and commit")]
    pub char_limit: Option<usize>,

    #[arg(long, help = "Also count lines added by merge commits")]
    pub include_merges: bool,
}

impl ExtractArgs {
    pub fn options(&self, show_progress: bool) -> ExtractOptions {
        ExtractOptions {
            commit_limit: self.commit_limit,
            char_limit: self.char_limit,
            include_merges: self.include_merges,
            show_progress,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover recently updated repositories and collect their frequencies
    Collect {
        #[arg(long, default_value_t = 1, help = "Number of search result pages")]
        pages: usize,

        #[arg(long, default_value_t = 30, help = "Search results per page (1-100)")]
        per_page: usize,

        #[arg(long, help = "Request the maximum of 10 pages of 100 results")]
        max: bool,

        #[arg(long, default_value_t = 1, help = "Save to the store after this many repositories")]
        flush_every: usize,

        #[command(flatten)]
        extract: ExtractArgs,
    },
    /// Collect frequencies from a local repository
    AddDir {
        #[arg(help = "Path to the git repository")]
        path: PathBuf,

        #[arg(long, help = "Identifier to record under (defaults to the origin url)")]
        id: Option<String>,

        #[command(flatten)]
        extract: ExtractArgs,
    },
    /// Clone repositories by url and collect their frequencies
    AddUrl {
        #[arg(required = true, help = "Clone urls")]
        urls: Vec<String>,

        #[command(flatten)]
        extract: ExtractArgs,
    },
    /// Summarize the stored frequencies
    Stats {
        #[arg(long, help = "Also report the total for these characters")]
        chars: Option<String>,

        #[arg(long, help = "Fold lowercase into uppercase before reporting")]
        fold_case: bool,

        #[arg(long, default_value_t = 10, help = "Number of most common characters to list")]
        top: usize,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Dump the stored frequencies
    Export {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(long, help = "Fold lowercase into uppercase before exporting")]
        fold_case: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Collect {
                pages,
                per_page,
                max,
                flush_every,
                extract,
            } => crate::collect::exec_collect(&self.common, pages, per_page, max, flush_every, &extract),
            Commands::AddDir { path, id, extract } => {
                crate::collect::exec_add_dir(&self.common, &path, id, &extract)
            }
            Commands::AddUrl { urls, extract } => crate::collect::exec_add_url(&self.common, urls, &extract),
            Commands::Stats {
                chars,
                fold_case,
                top,
                json,
            } => crate::stats::exec(&self.common, chars.as_deref(), fold_case, top, json),
            Commands::Export {
                json,
                ndjson,
                fold_case,
            } => crate::export::exec(&self.common, json, ndjson, fold_case),
        }
    }
}
