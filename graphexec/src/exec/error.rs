// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Execution error types

use crate::functions::FunctionError;
use crate::storage::StorageError;
use thiserror::Error;

/// Execution errors
///
/// Construction-time failures (unknown function, arity mismatch) surface
/// before the first record is evaluated; type mismatches discovered while
/// evaluating abort the query with a descriptive message. Null operands are
/// never errors, they propagate as values.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Expression error: {0}")]
    ExpressionError(String),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),

    #[error("Function error: {0}")]
    FunctionError(#[from] FunctionError),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<StorageError> for ExecutionError {
    fn from(error: StorageError) -> Self {
        ExecutionError::StorageError(error.to_string())
    }
}
