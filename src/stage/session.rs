//! Per-trigger session contract

use super::relationship::Relationship;
use crate::models::Record;

/// Gives a stage access to its input queue and output relationships
///
/// Records move by value: a record taken with [`get`](Self::get) must be
/// handed back exactly once, through `transfer` or `rollback`.
pub trait ProcessSession {
    /// Take the next available record, if any
    fn get(&mut self) -> Option<Record>;

    /// Route a record to an output relationship
    fn transfer(&mut self, record: Record, relationship: &Relationship);

    /// Return a record to the input queue after a failed trigger
    fn rollback(&mut self, record: Record);
}
