//! Audit line formatting
//!
//! One line per record: `Key=<k> Value=<v>;` tokens joined by a single space.
//! Keys and values are written verbatim, without escaping.

use std::collections::HashMap;
use std::fmt::Write;

/// Render the audit line for the selected keys
///
/// A key with no value in `attributes` renders with an empty value.
pub fn format_line(keys: &[&str], attributes: &HashMap<String, String>) -> String {
    let mut line = String::new();

    for key in keys {
        let value = attributes.get(*key).map(String::as_str).unwrap_or_default();
        // Writing to a String cannot fail
        let _ = write!(line, "Key={} Value={}; ", key, value);
    }

    line.truncate(line.trim_end().len());
    line
}
