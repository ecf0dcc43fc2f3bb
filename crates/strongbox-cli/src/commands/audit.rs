use std::collections::HashMap;

use chrono::Utc;
use strongbox_core::analyzer::analyze;
use strongbox_core::storage::RecordFilter;
use strongbox_core::{RecordStore, RecordVault};

use crate::cli::AuditArgs;
use crate::output::{report_text, short_id};

use super::Mode;

pub fn audit<S: RecordStore>(
    vault: &RecordVault<S>,
    args: &AuditArgs,
    mode: Mode,
) -> anyhow::Result<()> {
    let batch = vault.decrypt_all(&RecordFilter::default())?;
    let report = analyze(&batch.records, Utc::now());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    if mode.quiet {
        println!("{}", report.score);
        return Ok(());
    }

    let names: HashMap<_, _> = batch
        .records
        .iter()
        .map(|entry| (entry.id, entry.record.name.clone()))
        .collect();
    let rendered = report_text(&report, &|id| {
        names.get(id).cloned().unwrap_or_else(|| short_id(id))
    });
    println!("{}", rendered);
    if !batch.unreadable.is_empty() {
        println!(
            "\n{} record(s) could not be decrypted and were not analyzed.",
            batch.unreadable.len()
        );
    }
    Ok(())
}
