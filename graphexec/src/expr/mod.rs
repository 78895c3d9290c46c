// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Expression trees evaluated against records
//!
//! The planner hands this module a normalized expression description
//! (`ExprDesc`) with resolved column indices; `ExprNode::build` turns it into
//! an evaluable tree, resolving function names against the process-wide
//! registry and failing fast on unknown names and arity mismatches, before
//! any record is evaluated.
//!
//! A tree's shape is immutable after construction. Only aggregate call nodes
//! carry mutable state: an accumulator fed by `aggregate`, and a result slot
//! written exactly once by `reduce`. Re-reducing is a no-op, so finalization
//! (an AVG's division, for instance) is never applied twice.
//!
//! Null handling is centralized here: a scalar call whose evaluated argument
//! is Null evaluates to Null without invoking the function, which keeps the
//! Null policy auditable in one place.

use crate::exec::error::ExecutionError;
use crate::exec::record::{Column, Record};
use crate::functions::{
    Accumulator, AggregateFunction, FunctionError, FunctionKind, FunctionRegistry, ScalarFunction,
};
use crate::storage::{GraphStore, InMemoryGraph, Value};
use std::fmt;
use std::sync::Arc;

/// Evaluation context: the graph store consulted by variable operands bound
/// to entity properties
#[derive(Debug, Clone)]
pub struct EvalContext {
    store: Arc<dyn GraphStore>,
}

impl EvalContext {
    /// Create a context over a graph store
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Context with no graph behind it, for expressions that never touch
    /// entity properties
    pub fn detached() -> Self {
        Self {
            store: Arc::new(InMemoryGraph::new()),
        }
    }
}

/// Normalized expression description produced by the planner
#[derive(Debug, Clone, PartialEq)]
pub enum ExprDesc {
    /// Literal operand
    Constant(Value),
    /// Record column operand, optionally dereferencing an entity property
    Variable {
        column: usize,
        property: Option<String>,
    },
    /// Function call, scalar or aggregate, resolved by name at build time
    Call { name: String, args: Vec<ExprDesc> },
}

impl ExprDesc {
    /// Literal operand
    pub fn constant(value: impl Into<Value>) -> Self {
        ExprDesc::Constant(value.into())
    }

    /// Column operand
    pub fn variable(column: usize) -> Self {
        ExprDesc::Variable {
            column,
            property: None,
        }
    }

    /// Entity-property operand
    pub fn property(column: usize, key: impl Into<String>) -> Self {
        ExprDesc::Variable {
            column,
            property: Some(key.into()),
        }
    }

    /// Function call
    pub fn call(name: impl Into<String>, args: Vec<ExprDesc>) -> Self {
        ExprDesc::Call {
            name: name.into(),
            args,
        }
    }
}

/// One node of an evaluable expression tree
#[derive(Debug)]
pub enum ExprNode {
    Constant(Value),
    Variable {
        column: usize,
        property: Option<String>,
    },
    ScalarCall {
        func: Arc<dyn ScalarFunction>,
        args: Vec<ExprNode>,
    },
    AggregateCall(AggregateCall),
}

/// An aggregate call: argument subtrees plus exclusive accumulator state
#[derive(Debug)]
pub struct AggregateCall {
    func: Arc<dyn AggregateFunction>,
    args: Vec<ExprNode>,
    accumulator: Box<dyn Accumulator>,
    result: Option<Value>,
}

impl AggregateCall {
    /// The finalized value after `reduce`, or the accumulator's running value
    fn value(&self) -> Value {
        match &self.result {
            Some(v) => v.clone(),
            None => self.accumulator.current(),
        }
    }
}

impl ExprNode {
    /// Build a tree from its description against the global registry
    pub fn build(desc: &ExprDesc) -> Result<Self, ExecutionError> {
        Self::build_with(FunctionRegistry::global(), desc)
    }

    /// Build a tree resolving function names against a specific registry
    pub fn build_with(
        registry: &FunctionRegistry,
        desc: &ExprDesc,
    ) -> Result<Self, ExecutionError> {
        match desc {
            ExprDesc::Constant(value) => Ok(ExprNode::Constant(value.clone())),
            ExprDesc::Variable { column, property } => Ok(ExprNode::Variable {
                column: *column,
                property: property.clone(),
            }),
            ExprDesc::Call { name, args } => {
                let kind = registry.resolve(name)?;
                let built: Vec<ExprNode> = args
                    .iter()
                    .map(|arg| Self::build_with(registry, arg))
                    .collect::<Result<_, _>>()?;
                match kind {
                    FunctionKind::Scalar(func) => {
                        if built.len() != func.arity() {
                            return Err(FunctionError::InvalidArgumentCount {
                                expected: func.arity(),
                                actual: built.len(),
                            }
                            .into());
                        }
                        Ok(ExprNode::ScalarCall {
                            func: Arc::clone(func),
                            args: built,
                        })
                    }
                    FunctionKind::Aggregate(func) => {
                        if built.len() != func.arity() {
                            return Err(FunctionError::InvalidArgumentCount {
                                expected: func.arity(),
                                actual: built.len(),
                            }
                            .into());
                        }
                        if built.iter().any(ExprNode::contains_aggregate) {
                            return Err(ExecutionError::ExpressionError(format!(
                                "aggregate function {} cannot take an aggregate argument",
                                func.name()
                            )));
                        }
                        Ok(ExprNode::AggregateCall(AggregateCall {
                            accumulator: func.accumulator(),
                            func: Arc::clone(func),
                            args: built,
                            result: None,
                        }))
                    }
                }
            }
        }
    }

    /// Whether the tree contains an aggregate call anywhere
    pub fn contains_aggregate(&self) -> bool {
        match self {
            ExprNode::AggregateCall(_) => true,
            ExprNode::ScalarCall { args, .. } => args.iter().any(ExprNode::contains_aggregate),
            _ => false,
        }
    }

    /// Evaluate the tree against a record
    ///
    /// Pure for non-aggregate trees. Aggregate subtrees contribute their
    /// current accumulator value before `reduce` (the aggregate's identity
    /// when nothing has been accumulated) and their finalized value after.
    pub fn evaluate(&self, ctx: &EvalContext, record: &Record) -> Result<Value, ExecutionError> {
        match self {
            ExprNode::Constant(value) => Ok(value.clone()),
            ExprNode::Variable { column, property } => match property {
                None => record.value(*column),
                Some(key) => match record.column(*column)? {
                    Column::Node(id) => {
                        Ok(ctx.store.node_property(*id, key).unwrap_or(Value::Null))
                    }
                    Column::Edge(id) => {
                        Ok(ctx.store.edge_property(*id, key).unwrap_or(Value::Null))
                    }
                    Column::Scalar(_) => Err(ExecutionError::TypeError(format!(
                        "column {} holds a scalar, cannot read property '{}'",
                        column, key
                    ))),
                },
            },
            ExprNode::ScalarCall { func, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(arg.evaluate(ctx, record)?);
                }
                // Null operands propagate without invoking the function.
                if values.iter().any(Value::is_null) {
                    return Ok(Value::Null);
                }
                Ok(func.evaluate(&values)?)
            }
            ExprNode::AggregateCall(call) => Ok(call.value()),
        }
    }

    /// Feed one record to every aggregate node in the tree
    ///
    /// Safe to call any number of times, once per input record of a group.
    pub fn aggregate(&mut self, ctx: &EvalContext, record: &Record) -> Result<(), ExecutionError> {
        match self {
            ExprNode::AggregateCall(call) => {
                let AggregateCall {
                    args, accumulator, ..
                } = call;
                for arg in args.iter() {
                    let value = arg.evaluate(ctx, record)?;
                    accumulator.accumulate(&value)?;
                }
                Ok(())
            }
            ExprNode::ScalarCall { args, .. } => {
                for arg in args {
                    arg.aggregate(ctx, record)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Finalize every aggregate node in the tree
    ///
    /// Idempotent: each aggregate's result slot is written once, and later
    /// calls leave it untouched.
    pub fn reduce(&mut self) {
        match self {
            ExprNode::AggregateCall(call) => {
                if call.result.is_none() {
                    call.result = Some(call.accumulator.finalize());
                }
            }
            ExprNode::ScalarCall { args, .. } => {
                for arg in args {
                    arg.reduce();
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprNode::Constant(value) => write!(f, "{}", value),
            ExprNode::Variable {
                column,
                property: None,
            } => write!(f, "${}", column),
            ExprNode::Variable {
                column,
                property: Some(key),
            } => write!(f, "${}.{}", column, key),
            ExprNode::ScalarCall { func, args } => write_call(f, func.name(), args),
            ExprNode::AggregateCall(call) => write_call(f, call.func.name(), &call.args),
        }
    }
}

fn write_call(f: &mut fmt::Formatter<'_>, name: &str, args: &[ExprNode]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    write!(f, ")")
}
