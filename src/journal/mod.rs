//! Attribute journal for WhatsFlowing
//!
//! Turns a record's attributes into one human-readable audit line and
//! appends it to a per-day journal file.
//!
//! # Architecture
//!
//! - `AttributePattern`: full-match regex over attribute keys, with a
//!   `PatternCache` that recompiles only when the configured text changes.
//! - `select_attributes`: picks the matching keys in lexicographic order.
//! - `format_line`: renders `Key=<k> Value=<v>;` tokens joined by spaces.
//! - `JournalWriter`: appends the line to
//!   `<root_dir>/WhatsFlowing_<YYYY_MM_DD>.log`.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use whatsflowing::journal::{format_line, select_attributes, AttributePattern};
//!
//! let mut attributes = HashMap::new();
//! attributes.insert("filename".to_string(), "hello.txt".to_string());
//! attributes.insert("uuid".to_string(), "1234".to_string());
//!
//! let pattern = AttributePattern::compile("file.*").unwrap();
//! let keys = select_attributes(attributes.keys(), &pattern);
//! assert_eq!(format_line(&keys, &attributes), "Key=filename Value=hello.txt;");
//! ```

mod format;
mod pattern;
mod selector;
mod writer;

pub use format::format_line;
pub use pattern::{AttributePattern, PatternCache};
pub use selector::select_attributes;
pub use writer::{journal_file_name, JournalWriter};
