use crate::cli::CommonArgs;
use crate::freq::Collection;
use crate::model::{ExtensionSummary, StatsOutput, SCHEMA_VERSION};
use anyhow::Context;
use chrono::Utc;
use console::style;
use std::path::Path;

pub fn exec(common: &CommonArgs, chars: Option<&str>, fold_case: bool, top: usize, json: bool) -> anyhow::Result<()> {
    let mut collection = Collection::with_store(&common.store)
        .load()
        .context("Failed to load frequency store")?;
    if fold_case {
        collection.case_fold_all();
    }

    let summary = summarize(&collection, &common.store, chars, top);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        output_table(&summary);
    }
    Ok(())
}

pub fn summarize(collection: &Collection, store: &Path, chars: Option<&str>, top: usize) -> StatsOutput {
    let flat = collection.flattened_all();
    let mut extensions: Vec<ExtensionSummary> = flat
        .extensions()
        .map(|(extension, counter)| ExtensionSummary {
            extension: extension.to_string(),
            total: counter.total(),
            top: counter.most_common(top),
        })
        .collect();
    extensions.sort_by(|a, b| b.total.cmp(&a.total).then(a.extension.cmp(&b.extension)));

    StatsOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        store: store.to_string_lossy().to_string(),
        repositories: collection.len(),
        total: collection.total(),
        selected_chars: chars.map(str::to_string),
        selected_total: chars.map(|c| collection.total_of(c)),
        top: collection.flattened_counter().most_common(top),
        extensions,
    }
}

fn output_table(summary: &StatsOutput) {
    println!("{}", style("Character Frequencies").bold());
    println!("{}", "─".repeat(50));
    println!("Repositories: {}", style(summary.repositories).cyan());
    println!("Total characters: {}", style(summary.total).cyan());
    if let (Some(chars), Some(total)) = (&summary.selected_chars, summary.selected_total) {
        println!("Characters in {:?}: {}", chars, style(total).green());
    }

    if !summary.top.is_empty() {
        println!("\n{}", style("Most common").bold());
        println!("{}", format_top(&summary.top));
    }

    if summary.extensions.is_empty() {
        return;
    }
    println!(
        "\n{:<16} {:>12}  {}",
        style("Extension").bold(),
        style("Total").bold(),
        style("Most common").bold()
    );
    println!("{}", "─".repeat(70));
    for e in summary.extensions.iter().take(30) {
        let name = if e.extension.is_empty() { "(none)" } else { e.extension.as_str() };
        println!("{:<16} {:>12}  {}", name, e.total, format_top(&e.top));
    }
    if summary.extensions.len() > 30 {
        println!("\n... and {} more extensions", summary.extensions.len() - 30);
    }
}

fn format_top(top: &[(char, u64)]) -> String {
    top.iter()
        .map(|(ch, count)| format!("{ch:?}={count}"))
        .collect::<Vec<_>>()
        .join(" ")
}
