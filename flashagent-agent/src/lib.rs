//! Browser-task execution pipeline for FlashAgent.
//!
//! This crate is a thin orchestration layer over an external browser-agent
//! backend: it describes the run seam ([`runner::BrowserAgent`]), the trace
//! that seam produces ([`trace::ExecutionTrace`]), and the normalization of
//! that trace into the one response shape every caller can rely on
//! ([`normalize::ResponseRecord`]).
//!
//! # Overview
//!
//! - [`runner`]: task requests and the backend run operation
//! - [`trace`]: the step-by-step record of one browsing run
//! - [`normalize`]: the result normalizer and its response types
//! - [`manager`]: ties a backend, a shared session, and the normalizer
//!   together into `run_task`

pub mod manager;
pub mod normalize;
pub mod runner;
pub mod trace;

pub use manager::AgentManager;
pub use normalize::{ResponseRecord, ResultNormalizer, StepSummary, TaskStatus};
pub use runner::{BrowserAgent, TaskRequest};
pub use trace::ExecutionTrace;
