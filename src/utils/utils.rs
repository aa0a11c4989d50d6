// Start of file: /src/utils/utils.rs

// The utils module organizes useful functions, used by other modules.

use serde::Serialize;
use anyhow::Result;

// Convert any `Serialize` type into a two-space-indented JSON string.
pub fn to_two_space_indented_json<T: Serialize>(value: &T) -> Result<String> {
    let json_value: serde_json::Value = serde_json::to_value(value)?;
    let pretty_json: String = serde_json::to_string_pretty(&json_value)?;
    Ok(pretty_json)
}

// Normalizes a route path: one leading slash, no trailing slash, "/" for empty input.
pub fn normalize_path(path: &str) -> String {
    let trimmed: &str = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}


// End of file: /src/utils/utils.rs
