//! Use case orchestration for apiguard.
//!
//! This crate provides the application layer: use cases that coordinate the settings and domain
//! layers. It is intentionally thin and delegates heavy lifting to the appropriate layers.
//!
//! Snapshot extraction and report rendering belong to calling collaborators; this crate starts
//! from in-memory snapshots and ends at a serializable report envelope.

#![forbid(unsafe_code)]

mod explain;
mod review;

pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use review::{
    ReviewInput, ReviewOutput, run_review, serialize_report, verdict_exit_code,
};
