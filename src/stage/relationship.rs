//! Output relationships and stage descriptors

use serde::Serialize;

use crate::config::PropertyDescriptor;

/// Named output edge of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
    pub name: &'static str,
    pub description: &'static str,
}

/// Every record leaves the WhatsFlowing stage through this relationship
pub const REL_SUCCESS: Relationship = Relationship {
    name: "success",
    description: "All records are routed to this relationship",
};

/// Registration record the host reads to wire a stage into a flow
#[derive(Debug, Clone, Serialize)]
pub struct StageDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub relationships: Vec<Relationship>,
    pub properties: Vec<PropertyDescriptor>,
}

impl StageDescriptor {
    /// Find a declared relationship by name
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Find a declared property by name
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}
