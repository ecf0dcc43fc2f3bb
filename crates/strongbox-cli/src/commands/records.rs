//! Record commands: add, list, show, edit, favorite, delete.

use dialoguer::{Confirm, Password};
use strongbox_core::generator::{generate_password, GeneratorOptions};
use strongbox_core::storage::{Category, NewRecord, PlaintextRecord, RecordFilter};
use strongbox_core::{RecordStore, RecordVault, StrongboxError};
use uuid::Uuid;

use crate::cli::{AddArgs, DeleteArgs, EditArgs, FavoriteArgs, ListArgs, ShowArgs};
use crate::errors::CliError;
use crate::output::{print_record, record_json, record_lines, record_table, records_json, short_id};

use super::Mode;

pub fn parse_category(value: &str) -> Result<Category, CliError> {
    Category::parse(value).ok_or_else(|| {
        CliError::invalid_input(format!(
            "Unknown category: {} (use login, secure_note, api_key, or other)",
            value
        ))
    })
}

fn read_stdin_line() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    let value = line.trim_end_matches(['\r', '\n']).to_string();
    if value.is_empty() {
        return Err(CliError::invalid_input("No password provided on stdin").into());
    }
    Ok(value)
}

fn generated(length: usize) -> anyhow::Result<String> {
    let options = GeneratorOptions {
        length,
        ..GeneratorOptions::default()
    };
    generate_password(&options).map_err(|e| CliError::invalid_input(e.to_string()).into())
}

/// Optional non-interactive password source shared by `add` and `edit`.
fn password_from_flags(
    generate: bool,
    length: usize,
    password_stdin: bool,
) -> anyhow::Result<Option<String>> {
    if generate {
        return generated(length).map(Some);
    }
    if password_stdin {
        return read_stdin_line().map(Some);
    }
    Ok(None)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn warn_unreadable(ids: &[Uuid], mode: Mode) {
    if ids.is_empty() || mode.quiet {
        return;
    }
    let list = ids.iter().map(short_id).collect::<Vec<_>>().join(", ");
    eprintln!(
        "Warning: {} record{} could not be decrypted and {} skipped: {}",
        ids.len(),
        if ids.len() == 1 { "" } else { "s" },
        if ids.len() == 1 { "was" } else { "were" },
        list
    );
}

pub fn add<S: RecordStore>(
    vault: &mut RecordVault<S>,
    args: &AddArgs,
    mode: Mode,
) -> anyhow::Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err(CliError::invalid_input("Record name cannot be empty").into());
    }
    let category = parse_category(&args.category)?;

    let password = match password_from_flags(args.generate, args.length, args.password_stdin)? {
        Some(password) => password,
        None if mode.interactive => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .allow_empty_password(category == Category::SecureNote)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?,
        None if category == Category::SecureNote => String::new(),
        None => {
            return Err(CliError::invalid_input(
                "No password provided. Use --password-stdin or --generate.",
            )
            .into())
        }
    };

    let mut record = PlaintextRecord::new(name, password);
    record.username = non_empty(&args.username);
    record.url = non_empty(&args.url);
    record.notes = non_empty(&args.notes);

    let stored = vault.add(
        &NewRecord::new(record)
            .with_category(category)
            .with_favorite(args.favorite),
    )?;

    if mode.quiet {
        println!("{}", stored.id);
    } else {
        println!("Added record {} ({})", stored.id, name);
    }
    Ok(())
}

pub fn list<S: RecordStore>(
    vault: &RecordVault<S>,
    args: &ListArgs,
    mode: Mode,
) -> anyhow::Result<()> {
    let mut filter = RecordFilter::new();
    if let Some(category) = &args.category {
        filter = filter.category(parse_category(category)?);
    }
    if args.favorites {
        filter = filter.favorites_only();
    }
    if let Some(query) = non_empty(&args.query) {
        filter = filter.name_contains(query);
    }

    let mut batch = vault.decrypt_all(&filter)?;
    batch
        .records
        .sort_by_key(|entry| entry.record.name.to_lowercase());
    warn_unreadable(&batch.unreadable, mode);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&records_json(&batch.records))?
        );
    } else if mode.quiet {
        if !batch.records.is_empty() {
            println!("{}", record_lines(&batch.records));
        }
    } else if batch.records.is_empty() {
        println!("No records found.");
    } else {
        println!("{}", record_table(&batch.records));
    }
    Ok(())
}

pub fn show<S: RecordStore>(vault: &RecordVault<S>, args: &ShowArgs) -> anyhow::Result<()> {
    let id = vault.find_by_prefix(&args.id)?;
    let entry = vault.get(&id)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&record_json(&entry))?);
    } else {
        print_record(&entry, args.reveal);
    }
    Ok(())
}

pub fn edit<S: RecordStore>(
    vault: &mut RecordVault<S>,
    args: &EditArgs,
    mode: Mode,
) -> anyhow::Result<()> {
    let id = vault.find_by_prefix(&args.id)?;
    let current = vault.get(&id)?;
    let mut record = current.record.clone();
    let mut secret_changed = false;

    if let Some(name) = non_empty(&args.name) {
        record.name = name;
        secret_changed = true;
    }
    // An empty value clears an optional field.
    for (value, field) in [
        (&args.username, &mut record.username),
        (&args.url, &mut record.url),
        (&args.notes, &mut record.notes),
    ] {
        if value.is_some() {
            *field = non_empty(value);
            secret_changed = true;
        }
    }
    if let Some(password) = password_from_flags(args.generate, args.length, args.password_stdin)? {
        record.password = password;
        secret_changed = true;
    }
    let category = args.category.as_deref().map(parse_category).transpose()?;

    if !secret_changed && category.is_none() {
        return Err(CliError::invalid_input("Nothing to change").into());
    }
    if secret_changed {
        vault.update(&id, &record)?;
    }
    if let Some(category) = category {
        vault.set_category(&id, category)?;
    }

    if !mode.quiet {
        println!("Updated record {}", id);
    }
    Ok(())
}

pub fn favorite<S: RecordStore>(
    vault: &mut RecordVault<S>,
    args: &FavoriteArgs,
    mode: Mode,
) -> anyhow::Result<()> {
    let id = vault.find_by_prefix(&args.id)?;
    vault.set_favorite(&id, !args.off)?;
    if !mode.quiet {
        if args.off {
            println!("Removed {} from favorites", id);
        } else {
            println!("Marked {} as favorite", id);
        }
    }
    Ok(())
}

pub fn delete<S: RecordStore>(
    vault: &mut RecordVault<S>,
    args: &DeleteArgs,
    mode: Mode,
) -> anyhow::Result<()> {
    let id = vault.find_by_prefix(&args.id)?;
    // Unreadable records stay deletable; they are labelled by short id.
    let label = match vault.get(&id) {
        Ok(entry) => entry.record.name.clone(),
        Err(StrongboxError::Decryption(_) | StrongboxError::Format(_)) => {
            format!("unreadable record {}", short_id(&id))
        }
        Err(err) => return Err(err.into()),
    };

    if !args.yes {
        if !mode.interactive {
            return Err(CliError::invalid_input(
                "Refusing to delete without confirmation. Pass --yes.",
            )
            .into());
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete \"{}\"?", label))
            .default(false)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    vault.delete(&id)?;
    if !mode.quiet {
        println!("Deleted record {} ({})", id, label);
    }
    Ok(())
}
