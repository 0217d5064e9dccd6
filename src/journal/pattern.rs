//! Attribute patterns
//!
//! Attribute keys are selected with full-match semantics: the whole key must
//! match, not a substring of it.

use std::sync::{Mutex, PoisonError};

use regex::Regex;

use crate::error::{WhatsFlowingError, WhatsFlowingResult};

/// Compiled full-match regular expression over attribute keys
#[derive(Debug, Clone)]
pub struct AttributePattern {
    source: String,
    regex: Regex,
}

impl AttributePattern {
    pub fn compile(source: &str) -> WhatsFlowingResult<Self> {
        // Validate the source on its own first so errors point at user text
        Regex::new(source).map_err(|e| WhatsFlowingError::invalid_pattern(source, &e))?;
        let regex = Regex::new(&format!("^(?:{})$", source))
            .map_err(|e| WhatsFlowingError::invalid_pattern(source, &e))?;

        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Pattern text as configured, without anchors
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_full_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

/// Keeps the most recently compiled pattern, keyed by its source text
#[derive(Debug, Default)]
pub struct PatternCache {
    cached: Mutex<Option<AttributePattern>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the compiled pattern for `source`, compiling only when it changed
    pub fn get(&self, source: &str) -> WhatsFlowingResult<AttributePattern> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(pattern) = cached.as_ref() {
            if pattern.as_str() == source {
                return Ok(pattern.clone());
            }
        }

        let pattern = AttributePattern::compile(source)?;
        *cached = Some(pattern.clone());
        Ok(pattern)
    }

    /// Source text of the cached pattern, if any
    pub fn cached_source(&self) -> Option<String> {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|p| p.source.clone())
    }
}
