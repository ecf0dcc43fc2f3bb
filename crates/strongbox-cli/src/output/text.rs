//! Text and table output formatting for records and reports.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::{Cell, ContentArrangement, Table};
use strongbox_core::analyzer::{IssueKind, SecurityReport};
use strongbox_core::storage::DecryptedRecord;
use uuid::Uuid;

const MASK: &str = "********";

/// Render the record list as a borderless table.
pub fn record_table(entries: &[DecryptedRecord]) -> String {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "NAME", "USERNAME", "CATEGORY", "FAV", "UPDATED"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(short_id(&entry.id)),
            Cell::new(&entry.record.name),
            Cell::new(entry.record.username.as_deref().unwrap_or("-")),
            Cell::new(entry.category.as_str()),
            Cell::new(if entry.favorite { "*" } else { "" }),
            Cell::new(entry.updated_at.format("%Y-%m-%d").to_string()),
        ]);
    }
    table.to_string()
}

/// Plain one-line-per-record list (quiet mode).
pub fn record_lines(entries: &[DecryptedRecord]) -> String {
    entries
        .iter()
        .map(|entry| format!("{} {}", entry.id, entry.record.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print a single record; the password is masked unless `reveal`.
pub fn print_record(entry: &DecryptedRecord, reveal: bool) {
    let record = &entry.record;
    println!("ID:       {}", entry.id);
    println!("Name:     {}", record.name);
    if let Some(username) = &record.username {
        println!("Username: {}", username);
    }
    if !record.password.is_empty() {
        println!(
            "Password: {}",
            if reveal { record.password.as_str() } else { MASK }
        );
    }
    if let Some(url) = &record.url {
        println!("URL:      {}", url);
    }
    println!("Category: {}", entry.category);
    if entry.favorite {
        println!("Favorite: yes");
    }
    println!("Created:  {}", entry.created_at);
    println!("Updated:  {}", entry.updated_at);
    if let Some(notes) = &record.notes {
        println!();
        println!("{}", notes);
    }
}

/// Render an audit report with a summary and an issues table.
pub fn report_text(report: &SecurityReport, names: &dyn Fn(&Uuid) -> String) -> String {
    let mut out = String::new();
    out.push_str(&format!("Security score: {}/100\n", report.score));
    out.push_str(&format!(
        "Passwords: {} total, {} strong, {} weak, {} reused, {} stale\n",
        report.total_passwords,
        report.strong_passwords,
        report.weak_passwords,
        report.reused_passwords,
        report.stale_passwords
    ));

    if report.issues.is_empty() {
        out.push_str("\nNo issues found.");
        return out;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ISSUE", "DETAIL", "RECORDS"]);
    for issue in &report.issues {
        let (label, detail) = match &issue.kind {
            IssueKind::WeakPassword { strength } => ("weak", strength.as_str().to_string()),
            IssueKind::ReusedPassword => {
                ("reused", format!("shared by {}", issue.record_ids.len()))
            }
            IssueKind::StalePassword { age_days } => ("stale", format!("{} days old", age_days)),
        };
        let records = issue
            .record_ids
            .iter()
            .map(|id| names(id))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![label.to_string(), detail, records]);
    }
    out.push('\n');
    out.push_str(&table.to_string());
    out
}

pub fn short_id(id: &Uuid) -> String {
    id.to_string().chars().take(13).collect()
}
