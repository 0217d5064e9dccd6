//! Process context handed to a stage on every trigger
//!
//! Bundles the configured property values with the host services a stage
//! may use: the expression evaluator and the log sink.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{validate_properties, PropertyDescriptor, ValidationResult};
use crate::error::WhatsFlowingResult;
use crate::expression::{AttributeExpressionEvaluator, ExpressionEvaluator};
use crate::logging::LogSink;
use crate::models::Record;

/// Configuration and host services for a stage
#[derive(Clone)]
pub struct ProcessContext {
    properties: BTreeMap<String, String>,
    evaluator: Arc<dyn ExpressionEvaluator>,
    logger: Arc<dyn LogSink>,
}

impl ProcessContext {
    /// Create a context using the default `${attribute}` evaluator
    pub fn new(properties: BTreeMap<String, String>, logger: Arc<dyn LogSink>) -> Self {
        Self::with_evaluator(properties, Arc::new(AttributeExpressionEvaluator), logger)
    }

    pub fn with_evaluator(
        properties: BTreeMap<String, String>,
        evaluator: Arc<dyn ExpressionEvaluator>,
        logger: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            properties,
            evaluator,
            logger,
        }
    }

    /// Configured value, falling back to the descriptor default
    pub fn property_value(&self, descriptor: &PropertyDescriptor) -> Option<&str> {
        self.properties
            .get(descriptor.name)
            .map(String::as_str)
            .or(descriptor.default_value)
    }

    /// Value for `record`, expression-evaluated when the descriptor allows it
    pub fn evaluate(
        &self,
        descriptor: &PropertyDescriptor,
        record: &Record,
    ) -> WhatsFlowingResult<Option<String>> {
        let Some(raw) = self.property_value(descriptor) else {
            return Ok(None);
        };

        if descriptor.expression_language_supported {
            self.evaluator.evaluate(raw, record.attributes()).map(Some)
        } else {
            Ok(Some(raw.to_string()))
        }
    }

    pub fn validate(&self, descriptors: &[PropertyDescriptor]) -> Vec<ValidationResult> {
        validate_properties(descriptors, &self.properties)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn logger(&self) -> &dyn LogSink {
        self.logger.as_ref()
    }
}
