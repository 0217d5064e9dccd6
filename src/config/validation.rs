//! Property validation
//!
//! Checks configured values against a stage's descriptors before any record
//! is processed. Only problems are reported; an empty result means the
//! configuration is usable.

use std::collections::BTreeMap;
use std::fmt;

use super::property::{PropertyDescriptor, Validator};
use crate::error::WhatsFlowingError;
use crate::journal::AttributePattern;

/// Outcome of validating one property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Property name the result refers to
    pub subject: String,
    /// Value that was validated (empty when absent)
    pub input: String,
    pub explanation: String,
    pub valid: bool,
}

impl ValidationResult {
    fn invalid(subject: &str, input: &str, explanation: String) -> Self {
        Self {
            subject: subject.to_string(),
            input: input.to_string(),
            explanation,
            valid: false,
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            write!(f, "'{}' validated against '{}' is valid", self.subject, self.input)
        } else {
            write!(
                f,
                "'{}' validated against '{}' is invalid because {}",
                self.subject, self.input, self.explanation
            )
        }
    }
}

/// Validate configured values against descriptors
///
/// Returns one result per problem found.
pub fn validate_properties(
    descriptors: &[PropertyDescriptor],
    values: &BTreeMap<String, String>,
) -> Vec<ValidationResult> {
    let mut results = Vec::new();

    for descriptor in descriptors {
        match values.get(descriptor.name) {
            None => {
                if descriptor.required {
                    results.push(ValidationResult::invalid(
                        descriptor.name,
                        "",
                        format!("{} is required", descriptor.name),
                    ));
                }
            }
            Some(value) => {
                if let Some(explanation) = check_value(descriptor, value) {
                    results.push(ValidationResult::invalid(descriptor.name, value, explanation));
                }
            }
        }
    }

    for (key, value) in values {
        if !descriptors.iter().any(|d| d.name == key.as_str()) {
            results.push(ValidationResult::invalid(
                key,
                value,
                format!("'{}' is not a supported property", key),
            ));
        }
    }

    results
}

fn check_value(descriptor: &PropertyDescriptor, value: &str) -> Option<String> {
    match descriptor.validator {
        Validator::NonEmpty => {
            if value.is_empty() {
                Some(format!("{} must not be empty", descriptor.name))
            } else {
                None
            }
        }
        // Compiled exactly as the stage will use it, anchored for full match
        Validator::RegularExpression => match AttributePattern::compile(value) {
            Ok(_) => None,
            Err(WhatsFlowingError::InvalidPattern { reason, .. }) => {
                Some(format!("not a valid regular expression: {}", reason))
            }
            Err(e) => Some(format!("not a valid regular expression: {}", e)),
        },
    }
}
