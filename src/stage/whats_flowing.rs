//! The WhatsFlowing stage
//!
//! Journals a regex-selected subset of each record's attributes and passes
//! the record on to `success` untouched. Journal failures are logged and never
//! hold a record back.

use std::path::PathBuf;

use chrono::{DateTime, Local};

use super::context::ProcessContext;
use super::relationship::{StageDescriptor, REL_SUCCESS};
use super::session::ProcessSession;
use super::Stage;
use crate::config::{ATTRIBUTES_TO_LOG, LOG_FILE_DIRECTORY};
use crate::error::{WhatsFlowingError, WhatsFlowingResult};
use crate::journal::{format_line, select_attributes, AttributePattern, JournalWriter, PatternCache};
use crate::models::Record;

const CAPABILITY_DESCRIPTION: &str = "Uses a regex to define which record attributes are \
     logged as key/value pairs to a user defined log file.";

const TAGS: &[&str] = &["attributes", "logging", "whats", "flowing"];

/// Attribute journaling pass-through stage
#[derive(Debug)]
pub struct WhatsFlowing {
    descriptor: StageDescriptor,
    patterns: PatternCache,
    clock: fn() -> DateTime<Local>,
}

impl WhatsFlowing {
    pub fn new() -> Self {
        Self::with_clock(Local::now)
    }

    /// Create the stage with a custom source of the current time
    ///
    /// The clock decides which day's journal receives each line.
    pub fn with_clock(clock: fn() -> DateTime<Local>) -> Self {
        Self {
            descriptor: StageDescriptor {
                name: "WhatsFlowing",
                description: CAPABILITY_DESCRIPTION,
                tags: TAGS,
                relationships: vec![REL_SUCCESS],
                properties: vec![LOG_FILE_DIRECTORY, ATTRIBUTES_TO_LOG],
            },
            patterns: PatternCache::new(),
            clock,
        }
    }

    /// Resolve the journal directory and attribute pattern for one record
    fn prepare(
        &self,
        context: &ProcessContext,
        record: &Record,
    ) -> WhatsFlowingResult<(PathBuf, AttributePattern)> {
        let root_dir = context
            .evaluate(&LOG_FILE_DIRECTORY, record)?
            .ok_or_else(|| {
                WhatsFlowingError::Config(format!("{} is required", LOG_FILE_DIRECTORY.name))
            })?;

        let source = context
            .property_value(&ATTRIBUTES_TO_LOG)
            .unwrap_or_default();
        let pattern = self.patterns.get(source)?;

        Ok((PathBuf::from(root_dir), pattern))
    }

    /// Build the audit line for a record
    pub fn audit_line(record: &Record, pattern: &AttributePattern) -> String {
        let keys = select_attributes(record.attributes().keys(), pattern);
        format_line(&keys, record.attributes())
    }
}

impl Default for WhatsFlowing {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for WhatsFlowing {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    fn on_trigger(
        &self,
        context: &ProcessContext,
        session: &mut dyn ProcessSession,
    ) -> WhatsFlowingResult<()> {
        let Some(record) = session.get() else {
            return Ok(());
        };

        let (root_dir, pattern) = match self.prepare(context, &record) {
            Ok(prepared) => prepared,
            Err(e) => {
                session.rollback(record);
                return Err(e);
            }
        };

        let line = Self::audit_line(&record, &pattern);
        JournalWriter::new(root_dir).append(&(self.clock)(), &line, context.logger());

        session.transfer(record, &REL_SUCCESS);
        Ok(())
    }
}
