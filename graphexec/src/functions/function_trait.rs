// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Core traits for scalar and aggregate functions
//!
//! Scalar functions are pure mappings from evaluated argument values to a
//! result value. Aggregate functions are factories for accumulators that
//! observe one value per input record and finalize into a result once.
//! Null handling is centralized in the expression evaluator: a scalar
//! function never sees a Null argument (the call evaluates to Null first),
//! while accumulators receive Nulls and apply their own skip policy.

use crate::storage::Value;
use std::fmt;
use thiserror::Error;

/// Error type for function resolution and execution
#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("Invalid argument count: expected {expected}, got {actual}")]
    InvalidArgumentCount { expected: usize, actual: usize },

    #[error("Invalid argument type: {message}")]
    InvalidArgumentType { message: String },

    #[error("Unknown function: {0}")]
    UnknownFunction(String),
}

/// Result type for function execution
pub type FunctionResult<T> = Result<T, FunctionError>;

/// A pure scalar function
pub trait ScalarFunction: Send + Sync + fmt::Debug {
    /// Canonical (uppercase) name of the function
    fn name(&self) -> &str;

    /// Number of arguments the function takes
    fn arity(&self) -> usize;

    /// Apply the function to evaluated, non-null arguments
    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value>;

    /// Check an argument slice against the declared arity
    fn validate_argument_count(&self, args: &[Value]) -> FunctionResult<()> {
        if args.len() != self.arity() {
            return Err(FunctionError::InvalidArgumentCount {
                expected: self.arity(),
                actual: args.len(),
            });
        }
        Ok(())
    }
}

/// Mutable per-group state of one aggregate function instance
pub trait Accumulator: fmt::Debug + Send {
    /// Observe one input value; called once per record fed to the aggregate
    fn accumulate(&mut self, value: &Value) -> FunctionResult<()>;

    /// The running value before finalization (the aggregate's identity when
    /// nothing has been accumulated yet)
    fn current(&self) -> Value;

    /// Produce the final value. Callers guard against re-finalization; an
    /// accumulator is finalized at most once.
    fn finalize(&mut self) -> Value;
}

/// An aggregate function: metadata plus an accumulator factory
pub trait AggregateFunction: Send + Sync + fmt::Debug {
    /// Canonical (uppercase) name of the function
    fn name(&self) -> &str;

    /// Number of arguments the aggregate call takes
    fn arity(&self) -> usize;

    /// Build a fresh accumulator with initial state
    fn accumulator(&self) -> Box<dyn Accumulator>;
}
