//! Core conversion logic and orchestration.
//!
//! This module organizes the per-file pipeline into its steps (classify,
//! plan, execute) and the batch orchestrator that drives them over a
//! directory.

/// Audio classification policy
pub mod classify;

/// Turning classified files into concrete jobs
pub mod plan;

/// Running a single job
pub mod execute;

/// Directory-level orchestration and concurrency
pub mod batch;

pub use batch::process_directory;
pub use classify::{Classification, classify};
pub use execute::{JobOutcome, JobResult, OriginalAction, execute};
pub use plan::{AudioMode, JobPlan, plan};
