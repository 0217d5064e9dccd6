//! In-process host for running a stage
//!
//! [`StageRunner`] plays the part of the dataflow runtime: it holds property
//! values, queues records, triggers the stage, and keeps whatever the stage
//! routed to each relationship. The CLI uses it to push files through the
//! stage, and tests use it to drive scenarios end to end.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ValidationResult;
use crate::error::{WhatsFlowingError, WhatsFlowingResult};
use crate::logging::{LogSink, MemoryLogSink};
use crate::models::{core_attributes, Record, RecordId};
use crate::stage::{ProcessContext, ProcessSession, Relationship, Stage};

/// Session backed by an in-memory queue
#[derive(Debug, Default)]
pub struct MemorySession {
    input: VecDeque<Record>,
    outputs: HashMap<String, Vec<Record>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, record: Record) {
        self.input.push_back(record);
    }

    /// Number of records still waiting
    pub fn queued(&self) -> usize {
        self.input.len()
    }

    /// Records routed to `relationship`, in transfer order
    pub fn transferred(&self, relationship: &Relationship) -> &[Record] {
        self.outputs
            .get(relationship.name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total records routed to any relationship
    pub fn transferred_count(&self) -> usize {
        self.outputs.values().map(Vec::len).sum()
    }
}

impl ProcessSession for MemorySession {
    fn get(&mut self) -> Option<Record> {
        self.input.pop_front()
    }

    fn transfer(&mut self, record: Record, relationship: &Relationship) {
        self.outputs
            .entry(relationship.name.to_string())
            .or_default()
            .push(record);
    }

    fn rollback(&mut self, record: Record) {
        self.input.push_front(record);
    }
}

/// Drives a stage the way the dataflow host would
pub struct StageRunner<S: Stage> {
    stage: S,
    properties: BTreeMap<String, String>,
    session: MemorySession,
    logger: Arc<MemoryLogSink>,
    forward: Option<Arc<dyn LogSink>>,
}

impl<S: Stage> StageRunner<S> {
    pub fn new(stage: S) -> Self {
        Self {
            stage,
            properties: BTreeMap::new(),
            session: MemorySession::new(),
            logger: Arc::new(MemoryLogSink::new()),
            forward: None,
        }
    }

    /// Also forward everything the stage logs to `sink`
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.forward = Some(sink);
        self
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        self.properties.remove(name)
    }

    pub fn set_properties(&mut self, properties: BTreeMap<String, String>) {
        self.properties.extend(properties);
    }

    /// Queue a record built from `payload`
    ///
    /// The record gets `uuid`, `filename` and `path` core attributes;
    /// `attributes` are applied on top and may override them.
    pub fn enqueue(
        &mut self,
        payload: impl Into<Vec<u8>>,
        attributes: HashMap<String, String>,
    ) -> RecordId {
        let id = RecordId::new();
        let mut all = HashMap::new();
        all.insert(core_attributes::UUID.to_string(), id.as_uuid().to_string());
        all.insert(core_attributes::FILENAME.to_string(), id.as_uuid().to_string());
        all.insert(core_attributes::PATH.to_string(), "./".to_string());
        all.extend(attributes);

        self.session.enqueue(Record::with_id(id, payload, all));
        id
    }

    /// Queue a record whose payload is the content of the file at `path`
    ///
    /// `filename` is the file's name, `path` its parent directory as given,
    /// and `absolute.path` the canonical parent directory.
    pub fn enqueue_file(
        &mut self,
        path: &Path,
        attributes: HashMap<String, String>,
    ) -> WhatsFlowingResult<RecordId> {
        let payload = fs::read(path).map_err(|e| {
            WhatsFlowingError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                WhatsFlowingError::Io(format!("{} does not name a file", path.display()))
            })?;
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let absolute = fs::canonicalize(&parent).unwrap_or_else(|_| parent.clone());

        let mut file_attributes = HashMap::new();
        file_attributes.insert(core_attributes::FILENAME.to_string(), filename);
        file_attributes.insert(
            core_attributes::PATH.to_string(),
            parent.to_string_lossy().into_owned(),
        );
        file_attributes.insert(
            core_attributes::ABSOLUTE_PATH.to_string(),
            absolute.to_string_lossy().into_owned(),
        );
        file_attributes.extend(attributes);

        Ok(self.enqueue(payload, file_attributes))
    }

    fn context(&self) -> ProcessContext {
        let logger: Arc<dyn LogSink> = match &self.forward {
            Some(sink) => Arc::new(TeeLogSink {
                first: self.logger.clone(),
                second: sink.clone(),
            }),
            None => self.logger.clone(),
        };
        ProcessContext::new(self.properties.clone(), logger)
    }

    /// Validate the configured properties against the stage's descriptors
    pub fn validate(&self) -> Vec<ValidationResult> {
        self.context().validate(&self.stage.descriptor().properties)
    }

    /// Trigger the stage `iterations` times
    ///
    /// Refuses to run with an invalid configuration. Stops at the first
    /// trigger that fails; the failed record stays queued.
    pub fn run(&mut self, iterations: usize) -> WhatsFlowingResult<()> {
        let problems = self.validate();
        if !problems.is_empty() {
            let details: Vec<String> = problems.iter().map(ToString::to_string).collect();
            return Err(WhatsFlowingError::Validation(details.join("; ")));
        }

        let context = self.context();
        for _ in 0..iterations {
            self.stage.on_trigger(&context, &mut self.session)?;
        }
        Ok(())
    }

    pub fn queued(&self) -> usize {
        self.session.queued()
    }

    pub fn transferred(&self, relationship: &Relationship) -> &[Record] {
        self.session.transferred(relationship)
    }

    /// Check that exactly `count` records were routed, all to `relationship`
    pub fn assert_all_transferred(&self, relationship: &Relationship, count: usize) {
        let routed = self.session.transferred(relationship).len();
        assert_eq!(
            routed, count,
            "expected {} record(s) on '{}', found {}",
            count, relationship.name, routed
        );
        assert_eq!(
            self.session.transferred_count(),
            routed,
            "records were routed to relationships other than '{}'",
            relationship.name
        );
    }

    /// Everything the stage has logged so far
    pub fn logger(&self) -> &MemoryLogSink {
        &self.logger
    }
}

/// Sends each message to two sinks
struct TeeLogSink {
    first: Arc<MemoryLogSink>,
    second: Arc<dyn LogSink>,
}

impl LogSink for TeeLogSink {
    fn warn(&self, message: &str) {
        self.first.warn(message);
        self.second.warn(message);
    }

    fn info(&self, message: &str) {
        self.first.info(message);
        self.second.info(message);
    }

    fn debug(&self, message: &str) {
        self.first.debug(message);
        self.second.debug(message);
    }
}
