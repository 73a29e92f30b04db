use crate::cli::{CommonArgs, ExtractArgs};
use crate::discover::{self, DiscoveryConfig};
use crate::error::Result;
use crate::freq::{Collection, FrequencyTable};
use crate::git::{clone_repository, ExtractOptions, GitRepo};
use anyhow::Context;
use console::style;
use std::path::Path;
use tracing::{info, warn};

pub fn exec_collect(
    common: &CommonArgs,
    pages: usize,
    per_page: usize,
    max: bool,
    flush_every: usize,
    extract: &ExtractArgs,
) -> anyhow::Result<()> {
    let config = discovery_config();
    let urls = if max {
        discover::list_recently_updated_max(&config)
    } else {
        discover::list_recently_updated(&config, pages, per_page)
    }
    .context("Failed to discover repositories")?;

    collect_urls(common, urls, extract, flush_every)
}

pub fn exec_add_url(common: &CommonArgs, urls: Vec<String>, extract: &ExtractArgs) -> anyhow::Result<()> {
    let count = urls.len();
    collect_urls(common, urls, extract, count)
}

pub fn exec_add_dir(
    common: &CommonArgs,
    path: &Path,
    id: Option<String>,
    extract: &ExtractArgs,
) -> anyhow::Result<()> {
    let repo = GitRepo::open(Some(path)).context("Failed to open git repository")?;
    let repo_id = match id.or_else(|| repo.origin_url()) {
        Some(id) => id,
        None => {
            let canonical = repo
                .path()
                .canonicalize()
                .context("Failed to resolve repository path")?;
            canonical.to_string_lossy().to_string()
        }
    };
    info!("{}:", repo_id);

    let table = table_for_repo(&repo, &extract.options(!common.quiet))
        .with_context(|| format!("Failed to collect {repo_id}"))?;

    let mut collection = Collection::with_store(&common.store);
    collection.record(repo_id, table, common.policy);
    let written = collection.save(common.policy).context("Failed to save frequency store")?;
    report_saved(common, written);
    Ok(())
}

/// Clone, extract and record each url, saving every `flush_every` repositories.
///
/// When a repository fails, the ones already collected are saved before the error is returned.
fn collect_urls<I>(common: &CommonArgs, urls: I, extract: &ExtractArgs, flush_every: usize) -> anyhow::Result<()>
where
    I: IntoIterator<Item = String>,
{
    let opts = extract.options(!common.quiet);
    let flush_every = flush_every.max(1);
    let mut collection = Collection::with_store(&common.store);
    let mut pending = 0usize;
    let mut written = 0usize;

    for url in urls {
        info!("{}:", url);
        let table = match table_for_url(&url, &opts, common.quiet) {
            Ok(table) => table,
            Err(e) => {
                if !collection.is_empty() {
                    warn!("Saving {} collected repositories before aborting", collection.len());
                    collection.save(common.policy).context("Failed to save frequency store")?;
                }
                return Err(e).with_context(|| format!("Failed to collect {url}"));
            }
        };
        collection.record(url, table, common.policy);
        pending += 1;

        if pending >= flush_every {
            written = collection.save(common.policy).context("Failed to save frequency store")?;
            pending = 0;
        }
    }

    if pending > 0 {
        written = collection.save(common.policy).context("Failed to save frequency store")?;
    }
    report_saved(common, written);
    Ok(())
}

/// Bare-clone `url` into a temporary directory and build its frequency table.
pub fn table_for_url(url: &str, opts: &ExtractOptions, quiet: bool) -> Result<FrequencyTable> {
    let workdir = tempfile::Builder::new().prefix("charfreq-").tempdir()?;
    let dest = workdir.path().join("repo.git");
    clone_repository(url, &dest, opts.commit_limit, quiet)?;
    let repo = GitRepo::open(Some(&dest))?;
    table_for_repo(&repo, opts)
}

/// Frequency table over the added lines of `repo`'s walked commits.
pub fn table_for_repo(repo: &GitRepo, opts: &ExtractOptions) -> Result<FrequencyTable> {
    let commits = repo.collect_added(opts)?;
    let chars: usize = commits.iter().map(|c| c.char_count()).sum();
    info!("{} commits crunched, {} characters", commits.len(), chars);
    Ok(FrequencyTable::from_commits(&commits))
}

fn discovery_config() -> DiscoveryConfig {
    let mut config = DiscoveryConfig::default();
    if let Ok(url) = std::env::var("CHARFREQ_API_URL") {
        config.api_url = url;
    }
    config.token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
    config
}

fn report_saved(common: &CommonArgs, written: usize) {
    if common.quiet {
        return;
    }
    println!(
        "{} {} repositories stored in {}",
        style("Saved").green().bold(),
        style(written).cyan(),
        common.store.display()
    );
}
