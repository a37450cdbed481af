//! Stream module
//!
//! A stream is an immutable `StreamDescriptor` plus a `StreamKind` tag that
//! selects the kind-specific policies (request parameters, record
//! post-processing, child context, error-status exceptions).
//!
//! # Overview
//!
//! One *invocation* runs a stream for a single context through the
//! `Init -> Fetching -> Extracting -> (Fetching | Done)` state machine:
//! build the request, fetch a page, extract and post-process records,
//! advance the bookmark, emit, and let the paginator decide whether to
//! fetch again.

mod catalog;
mod descriptor;
mod phase;
mod policy;
mod remap;
mod run;

pub use catalog::{jira_streams, ISSUE_FIELDS};
pub use descriptor::{IncrementalFilter, StreamDescriptor, StreamKind};
pub use phase::StreamPhase;
pub use remap::remap;
pub use run::{run_invocation, InvocationOutcome, RunOptions};
