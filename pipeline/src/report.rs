//! JSON report assembly and persistence.

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use subscout_core::{CoreError, SubredditRecord};
use tracing::info;

/// Flatten one annotated record: the original raw fields plus
/// `top_posts` (raw post objects) and `relevant`.
pub fn flatten_record(record: &SubredditRecord) -> Result<Value, CoreError> {
    let relevant = record
        .relevance
        .as_bool()
        .ok_or_else(|| CoreError::InvalidInput {
            message: format!("record {:?} reached the report unannotated", record.name),
        })?;

    let mut object: Map<String, Value> = record.raw.clone();
    object.insert(
        "top_posts".to_string(),
        Value::Array(
            record
                .top_posts
                .iter()
                .map(|post| Value::Object(post.raw.clone()))
                .collect(),
        ),
    );
    object.insert("relevant".to_string(), Value::Bool(relevant));

    Ok(Value::Object(object))
}

/// Serialize every record and write the report in one operation, so a
/// failure earlier in the run leaves no partial file behind.
pub fn write_report(records: &[SubredditRecord], path: &Path) -> Result<(), CoreError> {
    let flattened = records
        .iter()
        .map(flatten_record)
        .collect::<Result<Vec<_>, _>>()?;
    let body = serde_json::to_string_pretty(&Value::Array(flattened))?;
    fs::write(path, body)?;

    info!(
        "Report with {} records written to {}",
        records.len(),
        path.display()
    );
    Ok(())
}
