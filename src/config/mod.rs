//! Configuration module for WhatsFlowing
//!
//! This module provides:
//! - Property descriptors for the stage options
//! - Validation of configured values
//! - JSON settings persistence

pub mod property;
pub mod settings;
pub mod validation;

pub use property::{PropertyDescriptor, Validator, ATTRIBUTES_TO_LOG, LOG_FILE_DIRECTORY};
pub use settings::StageSettings;
pub use validation::{validate_properties, ValidationResult};
