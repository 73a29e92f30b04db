use crate::cli::CommonArgs;
use crate::freq::Collection;
use crate::model::{ExportOutput, RepoEntry, SCHEMA_VERSION};
use anyhow::Context;
use chrono::Utc;
use console::style;

pub fn exec(common: &CommonArgs, json: bool, ndjson: bool, fold_case: bool) -> anyhow::Result<()> {
    let mut collection = Collection::with_store(&common.store)
        .load()
        .context("Failed to load frequency store")?;
    if fold_case {
        collection.case_fold_all();
    }

    let entries = repo_entries(&collection);
    if json {
        output_json(&entries, &collection, common, fold_case)?;
    } else if ndjson {
        output_ndjson(&entries)?;
    } else {
        output_summary(&entries, &collection);
    }
    Ok(())
}

pub fn repo_entries(collection: &Collection) -> Vec<RepoEntry> {
    collection
        .iter()
        .map(|(repo, table)| RepoEntry {
            repo: repo.to_string(),
            total: table.total(),
            extensions: table.clone(),
        })
        .collect()
}

fn output_json(entries: &[RepoEntry], collection: &Collection, common: &CommonArgs, fold_case: bool) -> anyhow::Result<()> {
    let output = ExportOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        store: common.store.to_string_lossy().to_string(),
        case_folded: fold_case,
        total: collection.total(),
        repositories: entries.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_ndjson(entries: &[RepoEntry]) -> anyhow::Result<()> {
    for entry in entries {
        println!("{}", serde_json::to_string(entry)?);
    }
    Ok(())
}

fn output_summary(entries: &[RepoEntry], collection: &Collection) {
    println!("{}", style("Export Summary").bold());
    println!("{}", "─".repeat(50));

    let extensions = collection.flattened_all().len();
    let distinct_chars = collection.flattened_counter().len();

    println!("Repositories: {}", style(entries.len()).cyan());
    println!("Total characters: {}", style(collection.total()).cyan());
    println!("Extensions: {}", style(extensions).yellow());
    println!("Distinct characters: {}", style(distinct_chars).yellow());

    println!("\nUse --json or --ndjson flags to export the raw data.");
}
