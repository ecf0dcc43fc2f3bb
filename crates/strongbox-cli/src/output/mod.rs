//! Output formatting helpers for the CLI.
//!
//! This module provides formatting utilities for displaying records
//! and audit reports as JSON, tables, or plain text.

mod json;
mod text;

// Re-export public API
pub use json::{record_json, records_json};
pub use text::{print_record, record_lines, record_table, report_text, short_id};
