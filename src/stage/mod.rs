//! Stage abstraction and the WhatsFlowing stage
//!
//! A stage is a node in a dataflow graph. The host calls
//! [`Stage::on_trigger`] whenever records may be available, passing the
//! configured [`ProcessContext`] and a [`ProcessSession`] to pull records from
//! and route them through.
//!
//! Stages are shared across driver threads, so `on_trigger` takes `&self`
//! and any internal caching must be thread-safe.

mod context;
mod relationship;
mod session;
mod whats_flowing;

pub use context::ProcessContext;
pub use relationship::{Relationship, StageDescriptor, REL_SUCCESS};
pub use session::ProcessSession;
pub use whats_flowing::WhatsFlowing;

use crate::error::WhatsFlowingResult;

/// A node in the dataflow graph
pub trait Stage: Send + Sync {
    /// Outputs and properties the stage declares to the host
    fn descriptor(&self) -> &StageDescriptor;

    /// Process at most one record from `session`
    ///
    /// An error means the record was rolled back to the session.
    fn on_trigger(
        &self,
        context: &ProcessContext,
        session: &mut dyn ProcessSession,
    ) -> WhatsFlowingResult<()>;
}
