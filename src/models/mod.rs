//! Core data models for WhatsFlowing
//!
//! Records and their identifiers. Records are owned by the host session and
//! only borrowed by stages while they are processed.

pub mod ids;
pub mod record;

pub use ids::RecordId;
pub use record::{core_attributes, Record};
