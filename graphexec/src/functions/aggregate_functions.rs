// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Aggregate function implementations
//!
//! This module contains all aggregate/statistical functions:
//! - SUM: Sum of numeric values (identity 0)
//! - COUNT: Counts non-null values
//! - AVG: Arithmetic mean
//! - MIN / MAX: Extremum under the value total order
//! - COLLECT: Gathers values into an array
//!
//! Each function is a factory for accumulators; every group owns its own
//! accumulator instances. Finalization is applied at most once, guarded by
//! the owning expression node, so reducing twice never re-divides an AVG.

use super::function_trait::{Accumulator, AggregateFunction, FunctionResult};
use crate::storage::Value;
use std::cmp::Ordering;

// ==============================================================================
// SUM FUNCTION
// ==============================================================================

/// SUM function - sums numeric inputs, ignoring nulls and non-numerics
#[derive(Debug)]
pub struct SumFunction;

impl SumFunction {
    pub fn new() -> Self {
        Self
    }
}

impl AggregateFunction for SumFunction {
    fn name(&self) -> &str {
        "SUM"
    }

    fn arity(&self) -> usize {
        1
    }

    fn accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(SumAccumulator::default())
    }
}

#[derive(Debug, Default)]
struct SumAccumulator {
    total: f64,
}

impl Accumulator for SumAccumulator {
    fn accumulate(&mut self, value: &Value) -> FunctionResult<()> {
        if let Some(n) = value.as_number() {
            self.total += n;
        }
        Ok(())
    }

    fn current(&self) -> Value {
        Value::Double(self.total)
    }

    fn finalize(&mut self) -> Value {
        Value::Double(self.total)
    }
}

// ==============================================================================
// COUNT FUNCTION
// ==============================================================================

/// COUNT function - counts non-null inputs
#[derive(Debug)]
pub struct CountFunction;

impl CountFunction {
    pub fn new() -> Self {
        Self
    }
}

impl AggregateFunction for CountFunction {
    fn name(&self) -> &str {
        "COUNT"
    }

    fn arity(&self) -> usize {
        1
    }

    fn accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(CountAccumulator::default())
    }
}

#[derive(Debug, Default)]
struct CountAccumulator {
    count: i64,
}

impl Accumulator for CountAccumulator {
    fn accumulate(&mut self, value: &Value) -> FunctionResult<()> {
        if !value.is_null() {
            self.count += 1;
        }
        Ok(())
    }

    fn current(&self) -> Value {
        Value::Int(self.count)
    }

    fn finalize(&mut self) -> Value {
        Value::Int(self.count)
    }
}

// ==============================================================================
// AVG FUNCTION
// ==============================================================================

/// AVG function - arithmetic mean of numeric inputs, Null over empty input
#[derive(Debug)]
pub struct AvgFunction;

impl AvgFunction {
    pub fn new() -> Self {
        Self
    }
}

impl AggregateFunction for AvgFunction {
    fn name(&self) -> &str {
        "AVG"
    }

    fn arity(&self) -> usize {
        1
    }

    fn accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(AvgAccumulator::default())
    }
}

#[derive(Debug, Default)]
struct AvgAccumulator {
    total: f64,
    count: i64,
}

impl Accumulator for AvgAccumulator {
    fn accumulate(&mut self, value: &Value) -> FunctionResult<()> {
        if let Some(n) = value.as_number() {
            self.total += n;
            self.count += 1;
        }
        Ok(())
    }

    fn current(&self) -> Value {
        // The running mean is computed without mutating state, so observing
        // it repeatedly never divides twice.
        if self.count == 0 {
            Value::Null
        } else {
            Value::Double(self.total / self.count as f64)
        }
    }

    fn finalize(&mut self) -> Value {
        self.current()
    }
}

// ==============================================================================
// MIN / MAX FUNCTIONS
// ==============================================================================

/// MIN function - smallest non-null input under the value total order
#[derive(Debug)]
pub struct MinFunction;

impl MinFunction {
    pub fn new() -> Self {
        Self
    }
}

impl AggregateFunction for MinFunction {
    fn name(&self) -> &str {
        "MIN"
    }

    fn arity(&self) -> usize {
        1
    }

    fn accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(ExtremumAccumulator::new(Ordering::Less))
    }
}

/// MAX function - largest non-null input under the value total order
#[derive(Debug)]
pub struct MaxFunction;

impl MaxFunction {
    pub fn new() -> Self {
        Self
    }
}

impl AggregateFunction for MaxFunction {
    fn name(&self) -> &str {
        "MAX"
    }

    fn arity(&self) -> usize {
        1
    }

    fn accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(ExtremumAccumulator::new(Ordering::Greater))
    }
}

#[derive(Debug)]
struct ExtremumAccumulator {
    keep: Ordering,
    best: Option<Value>,
}

impl ExtremumAccumulator {
    fn new(keep: Ordering) -> Self {
        Self { keep, best: None }
    }
}

impl Accumulator for ExtremumAccumulator {
    fn accumulate(&mut self, value: &Value) -> FunctionResult<()> {
        if value.is_null() {
            return Ok(());
        }
        let replace = match &self.best {
            None => true,
            Some(best) => value.total_cmp(best) == self.keep,
        };
        if replace {
            self.best = Some(value.clone());
        }
        Ok(())
    }

    fn current(&self) -> Value {
        self.best.clone().unwrap_or(Value::Null)
    }

    fn finalize(&mut self) -> Value {
        self.current()
    }
}

// ==============================================================================
// COLLECT FUNCTION
// ==============================================================================

/// COLLECT function - gathers non-null inputs into an array, in input order
#[derive(Debug)]
pub struct CollectFunction;

impl CollectFunction {
    pub fn new() -> Self {
        Self
    }
}

impl AggregateFunction for CollectFunction {
    fn name(&self) -> &str {
        "COLLECT"
    }

    fn arity(&self) -> usize {
        1
    }

    fn accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(CollectAccumulator::default())
    }
}

#[derive(Debug, Default)]
struct CollectAccumulator {
    items: Vec<Value>,
}

impl Accumulator for CollectAccumulator {
    fn accumulate(&mut self, value: &Value) -> FunctionResult<()> {
        if !value.is_null() {
            self.items.push(value.clone());
        }
        Ok(())
    }

    fn current(&self) -> Value {
        Value::Array(self.items.clone())
    }

    fn finalize(&mut self) -> Value {
        Value::Array(std::mem::take(&mut self.items))
    }
}
