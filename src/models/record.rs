//! Record model
//!
//! A record is the unit of work moving through a flow: an opaque payload plus
//! a map of string attributes. Stages read records and hand them back to the
//! session; nothing in this crate mutates a record once it is enqueued.

use std::collections::HashMap;

use super::ids::RecordId;

/// Attribute keys assigned by the host when a record enters the flow
pub mod core_attributes {
    /// Unique identifier of the record
    pub const UUID: &str = "uuid";
    /// Logical file name of the payload
    pub const FILENAME: &str = "filename";
    /// Relative directory the payload came from
    pub const PATH: &str = "path";
    /// Absolute directory the payload came from
    pub const ABSOLUTE_PATH: &str = "absolute.path";
}

/// A unit of data with its metadata attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: RecordId,
    payload: Vec<u8>,
    attributes: HashMap<String, String>,
}

impl Record {
    /// Create a record with a fresh ID
    pub fn new(payload: impl Into<Vec<u8>>, attributes: HashMap<String, String>) -> Self {
        Self::with_id(RecordId::new(), payload, attributes)
    }

    /// Create a record with a known ID
    pub fn with_id(
        id: RecordId,
        payload: impl Into<Vec<u8>>,
        attributes: HashMap<String, String>,
    ) -> Self {
        Self {
            id,
            payload: payload.into(),
            attributes,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Look up a single attribute value
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Payload length in bytes
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accessors() {
        let mut attrs = HashMap::new();
        attrs.insert("filename".to_string(), "hello.txt".to_string());
        let record = Record::new(b"Hello, World!".to_vec(), attrs);

        assert_eq!(record.payload(), b"Hello, World!");
        assert_eq!(record.size(), 13);
        assert_eq!(record.attribute("filename"), Some("hello.txt"));
        assert_eq!(record.attribute("missing"), None);
    }

    #[test]
    fn test_clone_is_equal() {
        let record = Record::new(vec![1, 2, 3], HashMap::new());
        let copy = record.clone();
        assert_eq!(record, copy);
        assert_eq!(record.id(), copy.id());
    }
}
