// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Function execution system for query processing
//!
//! This module provides the registry the expression builder resolves call
//! names against. Add new functions by implementing the ScalarFunction or
//! AggregateFunction trait and registering them here.
//!
//! The process-wide registry is built once, before any query executes, and
//! is never mutated afterwards.

mod aggregate_functions;
mod function_trait;
mod mathematical_functions;
mod string_functions;

pub use function_trait::{
    Accumulator, AggregateFunction, FunctionError, FunctionResult, ScalarFunction,
};

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered function: pure scalar, or aggregate accumulator factory
#[derive(Debug, Clone)]
pub enum FunctionKind {
    Scalar(Arc<dyn ScalarFunction>),
    Aggregate(Arc<dyn AggregateFunction>),
}

/// Registry of all available functions, keyed by uppercase name
#[derive(Debug)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionKind>,
}

static REGISTRY: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::new);

impl FunctionRegistry {
    /// Create a new function registry with the default functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        // Arithmetic operators and numeric functions
        registry.register_scalar(Arc::new(mathematical_functions::AddFunction::new()));
        registry.register_scalar(Arc::new(mathematical_functions::SubFunction::new()));
        registry.register_scalar(Arc::new(mathematical_functions::MulFunction::new()));
        registry.register_scalar(Arc::new(mathematical_functions::DivFunction::new()));
        registry.register_scalar(Arc::new(mathematical_functions::AbsFunction::new()));
        registry.register_scalar(Arc::new(mathematical_functions::CeilFunction::new()));
        registry.register_scalar(Arc::new(mathematical_functions::FloorFunction::new()));
        registry.register_scalar(Arc::new(mathematical_functions::RoundFunction::new()));
        registry.register_scalar(Arc::new(mathematical_functions::SignFunction::new()));
        registry.register_scalar(Arc::new(mathematical_functions::SqrtFunction::new()));
        registry.register_scalar(Arc::new(mathematical_functions::PowFunction::new()));
        registry.register_scalar(Arc::new(mathematical_functions::RandFunction::new()));

        // String functions
        registry.register_scalar(Arc::new(string_functions::ReverseFunction::new()));
        registry.register_scalar(Arc::new(string_functions::LeftFunction::new()));
        registry.register_scalar(Arc::new(string_functions::RightFunction::new()));
        registry.register_scalar(Arc::new(string_functions::SubstringFunction::new()));
        registry.register_scalar(Arc::new(string_functions::TrimFunction::new()));
        registry.register_scalar(Arc::new(string_functions::LTrimFunction::new()));
        registry.register_scalar(Arc::new(string_functions::RTrimFunction::new()));
        registry.register_scalar(Arc::new(string_functions::ToLowerFunction::new()));
        registry.register_scalar(Arc::new(string_functions::ToUpperFunction::new()));
        registry.register_scalar(Arc::new(string_functions::ToStringFunction::new()));

        // Aggregate functions
        registry.register_aggregate(Arc::new(aggregate_functions::SumFunction::new()));
        registry.register_aggregate(Arc::new(aggregate_functions::CountFunction::new()));
        registry.register_aggregate(Arc::new(aggregate_functions::AvgFunction::new()));
        registry.register_aggregate(Arc::new(aggregate_functions::MinFunction::new()));
        registry.register_aggregate(Arc::new(aggregate_functions::MaxFunction::new()));
        registry.register_aggregate(Arc::new(aggregate_functions::CollectFunction::new()));

        log::debug!("function registry built: {} functions", registry.functions.len());
        registry
    }

    /// The process-wide registry, built on first access
    pub fn global() -> &'static FunctionRegistry {
        &REGISTRY
    }

    /// Register a scalar function under its canonical name
    pub fn register_scalar(&mut self, function: Arc<dyn ScalarFunction>) {
        self.functions
            .insert(function.name().to_uppercase(), FunctionKind::Scalar(function));
    }

    /// Register an aggregate function under its canonical name
    pub fn register_aggregate(&mut self, function: Arc<dyn AggregateFunction>) {
        self.functions.insert(
            function.name().to_uppercase(),
            FunctionKind::Aggregate(function),
        );
    }

    /// Look up a function by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&FunctionKind> {
        self.functions.get(&name.to_uppercase())
    }

    /// Look up a function or report it unknown
    pub fn resolve(&self, name: &str) -> FunctionResult<&FunctionKind> {
        self.get(name)
            .ok_or_else(|| FunctionError::UnknownFunction(name.to_string()))
    }

    /// Check if a function exists
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_uppercase())
    }

    /// Get all available function names
    pub fn function_names(&self) -> Vec<String> {
        self.functions.keys().cloned().collect()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = FunctionRegistry::global();
        assert!(registry.get("abs").is_some(), "abs (lowercase) should work");
        assert!(registry.get("ABS").is_some(), "ABS should work");
        assert!(registry.get("Sum").is_some(), "Sum (mixed case) should work");
    }

    #[test]
    fn test_default_functions_registered() {
        let registry = FunctionRegistry::global();
        for name in [
            "ADD", "SUB", "MUL", "DIV", "ABS", "CEIL", "FLOOR", "ROUND", "SIGN", "SQRT", "POW",
            "RAND", "REVERSE", "LEFT", "RIGHT", "SUBSTRING", "TRIM", "LTRIM", "RTRIM", "TOLOWER",
            "TOUPPER", "TOSTRING",
        ] {
            assert!(
                matches!(registry.get(name), Some(FunctionKind::Scalar(_))),
                "{} should be a registered scalar function",
                name
            );
        }
        for name in ["SUM", "COUNT", "AVG", "MIN", "MAX", "COLLECT"] {
            assert!(
                matches!(registry.get(name), Some(FunctionKind::Aggregate(_))),
                "{} should be a registered aggregate function",
                name
            );
        }
    }

    #[test]
    fn test_unknown_function_reported() {
        let registry = FunctionRegistry::global();
        assert!(matches!(
            registry.resolve("NOPE"),
            Err(FunctionError::UnknownFunction(_))
        ));
    }

    #[test]
    fn test_function_names_inspectable() {
        let registry = FunctionRegistry::global();
        let names = registry.function_names();
        assert!(names.len() >= 28);
        assert!(names.iter().all(|n| n.chars().all(|c| !c.is_lowercase())));
    }
}
