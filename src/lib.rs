//! WhatsFlowing - see what is flowing through a dataflow
//!
//! This library provides a pass-through stage that writes one audit line per
//! record, listing the record attributes selected by a regular expression.
//! Lines go to a per-day journal file; records continue downstream unchanged
//! whether or not the journal write succeeds.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Property descriptors, validation, and the settings file
//! - `error`: Custom error types
//! - `expression`: `${attribute}` expression evaluation
//! - `journal`: Attribute selection, line formatting, and journal appends
//! - `logging`: Log sinks and tracing setup
//! - `models`: Records and record IDs
//! - `runner`: In-process host used by the CLI and tests
//! - `stage`: The stage contract and the WhatsFlowing stage
//!
//! # Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use whatsflowing::runner::StageRunner;
//! use whatsflowing::stage::{WhatsFlowing, REL_SUCCESS};
//!
//! let mut runner = StageRunner::new(WhatsFlowing::new());
//! runner.set_property("Log File Directory", "/var/log/flows");
//! runner.set_property("Attributes to Log", "file.*|path");
//! runner.enqueue(b"payload".to_vec(), HashMap::new());
//! runner.run(1)?;
//! runner.assert_all_transferred(&REL_SUCCESS, 1);
//! # Ok::<(), whatsflowing::WhatsFlowingError>(())
//! ```

pub mod config;
pub mod error;
pub mod expression;
pub mod journal;
pub mod logging;
pub mod models;
pub mod runner;
pub mod stage;

pub use error::{WhatsFlowingError, WhatsFlowingResult};
