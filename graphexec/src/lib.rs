// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! GraphExec - the execution core of a lightweight graph query engine
//!
//! GraphExec evaluates scalar and aggregate expressions over streamed records
//! of typed values and performs the order-sensitive transformations (grouping
//! and top-k sorting) of a pull-based query pipeline.
//!
//! # Features
//!
//! - **Typed values**: a closed value union with a total order across kinds,
//!   so sorting and grouping never fail on heterogeneous columns
//! - **Expression trees**: constant, column, and entity-property operands
//!   under scalar and aggregate calls, built from the planner's normalized
//!   descriptions with fail-fast name and arity checking
//! - **Aggregation**: accumulate/finalize lifecycle with idempotent
//!   finalization, grouped per distinct key
//! - **Top-K ordering**: bounded-memory ordering that matches a full stable
//!   sort exactly when a result bound is known
//! - **Function registry**: a process-wide, read-only registry of scalar and
//!   aggregate functions, populated before any query executes
//!
//! The query-language parser, the persistent graph store, and the client
//! reply encoding are external collaborators: this crate consumes normalized
//! expression descriptions and a property-lookup interface, and hands
//! records back through its pull protocol.

pub mod exec;
pub mod expr;
pub mod functions;
pub mod storage;

pub use exec::{
    Column, ExecutionError, Group, GroupCache, Record, RecordSource, ResultSet, SortDirection,
    SortKey, SortOperator, VecRecordSource,
};
pub use expr::{EvalContext, ExprDesc, ExprNode};
pub use functions::{FunctionKind, FunctionRegistry};
pub use storage::{Edge, EdgeId, GraphStore, InMemoryGraph, Node, NodeId, Value};

/// GraphExec version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GraphExec crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
