//! JSON output formatting for records.

use strongbox_core::storage::DecryptedRecord;

/// Record summary without secret fields.
pub fn record_summary_json(entry: &DecryptedRecord) -> serde_json::Value {
    serde_json::json!({
        "id": entry.id,
        "name": entry.record.name,
        "username": entry.record.username,
        "url": entry.record.url,
        "category": entry.category,
        "favorite": entry.favorite,
        "created_at": entry.created_at,
        "updated_at": entry.updated_at,
    })
}

/// Full record including password and notes.
pub fn record_json(entry: &DecryptedRecord) -> serde_json::Value {
    let mut value = record_summary_json(entry);
    value["password"] = serde_json::Value::from(entry.record.password.as_str());
    value["notes"] = serde_json::json!(entry.record.notes);
    value
}

pub fn records_json(entries: &[DecryptedRecord]) -> Vec<serde_json::Value> {
    entries.iter().map(record_summary_json).collect()
}
