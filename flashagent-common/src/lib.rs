//! Common types and utilities shared across FlashAgent crates.
//!
//! This crate defines the shared error type, the workspace `Result` alias,
//! and observability helpers used throughout the FlashAgent workspace. It is
//! intentionally lightweight and dependency‑minimal so that all crates can
//! depend on it without introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`FlashError`] and [`Result`]: Shared error handling
//! - [`observability`]: Centralised tracing/logging initialisation

pub mod observability;

/// Error types used across the FlashAgent system.
#[derive(thiserror::Error, Debug)]
pub enum FlashError {
    /// The browser agent failed to complete a requested run.
    #[error("Agent error: {0}")]
    Agent(String),

    /// The browser layer (session, driver transport) reported an error.
    #[error("Browser error: {0}")]
    Browser(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation exceeded the configured timeout.
    #[error("Timeout occurred")]
    Timeout,
}

/// Convenient alias for results that use [`FlashError`].
pub type Result<T> = std::result::Result<T, FlashError>;
