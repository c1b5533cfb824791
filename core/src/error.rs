//! Error types

use std::alloc::LayoutError;
use thiserror::Error;

/// Errors surfaced by the benchmark library
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("failed to allocate {size} bytes aligned to {align}")]
    Allocation { size: usize, align: usize },

    #[error("invalid buffer layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("worker thread failed: {0}")]
    Worker(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
