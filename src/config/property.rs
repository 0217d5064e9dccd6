//! Property descriptors
//!
//! A stage declares the options it understands as a list of descriptors.
//! The host uses them to validate configured values, supply defaults, and
//! decide which values go through the expression language.

use serde::Serialize;

/// Rule applied to a configured property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Value must contain at least one character
    NonEmpty,
    /// Value must compile as a regular expression
    RegularExpression,
}

/// Declaration of a single configurable option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    /// Display name, also the key used in configuration
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub default_value: Option<&'static str>,
    pub validator: Validator,
    /// Whether the value is evaluated per record with the expression language
    pub expression_language_supported: bool,
}

/// Directory that receives the daily journal files
pub const LOG_FILE_DIRECTORY: PropertyDescriptor = PropertyDescriptor {
    name: "Log File Directory",
    description: "The directory of the log file. You may use expression language such as /aa/bb/${path}",
    required: true,
    default_value: None,
    validator: Validator::NonEmpty,
    expression_language_supported: true,
};

/// Regular expression selecting the attribute keys to journal
pub const ATTRIBUTES_TO_LOG: PropertyDescriptor = PropertyDescriptor {
    name: "Attributes to Log",
    description: "A regex defining a list of Attributes to Log.",
    required: false,
    default_value: Some("file.*"),
    validator: Validator::RegularExpression,
    expression_language_supported: false,
};
