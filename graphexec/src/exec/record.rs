// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Records flowing through the query pipeline
//!
//! A record is a fixed-width, positionally-addressed row. Each column holds
//! either a scalar value or a graph-entity reference; the column count and
//! kinds are assigned by the planner and fixed for the lifetime of a query's
//! records.

use crate::exec::error::ExecutionError;
use crate::storage::{EdgeId, NodeId, Value};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// One record column: a scalar value or an entity reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Scalar(Value),
    Node(NodeId),
    Edge(EdgeId),
}

impl Hash for Column {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Column::Scalar(v) => {
                0u8.hash(state);
                v.hash(state);
            }
            Column::Node(id) => {
                1u8.hash(state);
                id.hash(state);
            }
            Column::Edge(id) => {
                2u8.hash(state);
                id.hash(state);
            }
        }
    }
}

/// A fixed-width row of columns
///
/// Cloning performs a deep copy (owned string payloads are duplicated), which
/// is how records are retained across pipeline stages: any component keeping a
/// record beyond the call that produced it clones it and owns the clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    columns: Vec<Column>,
}

impl Record {
    /// Create a record of the given width, all columns Null scalars
    pub fn new(width: usize) -> Self {
        Self {
            columns: vec![Column::Scalar(Value::Null); width],
        }
    }

    /// Create a record directly from columns
    pub fn from_columns(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Create a record of scalar columns
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            columns: values.into_iter().map(Column::Scalar).collect(),
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the record has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get a column by position
    pub fn column(&self, index: usize) -> Result<&Column, ExecutionError> {
        self.columns.get(index).ok_or_else(|| {
            ExecutionError::RuntimeError(format!(
                "column index {} out of bounds for record of width {}",
                index,
                self.columns.len()
            ))
        })
    }

    /// Get the scalar at a position; entity columns are a type error
    pub fn scalar(&self, index: usize) -> Result<&Value, ExecutionError> {
        match self.column(index)? {
            Column::Scalar(v) => Ok(v),
            other => Err(ExecutionError::TypeError(format!(
                "column {} holds a {} reference, expected a scalar",
                index,
                match other {
                    Column::Node(_) => "node",
                    _ => "edge",
                }
            ))),
        }
    }

    /// Read a column as a value: scalars clone their payload, entity columns
    /// produce the corresponding reference value
    pub fn value(&self, index: usize) -> Result<Value, ExecutionError> {
        Ok(match self.column(index)? {
            Column::Scalar(v) => v.clone(),
            Column::Node(id) => Value::Node(*id),
            Column::Edge(id) => Value::Edge(*id),
        })
    }

    /// Set a column by position
    pub fn set(&mut self, index: usize, column: Column) -> Result<(), ExecutionError> {
        let width = self.columns.len();
        let slot = self.columns.get_mut(index).ok_or_else(|| {
            ExecutionError::RuntimeError(format!(
                "column index {} out of bounds for record of width {}",
                index, width
            ))
        })?;
        *slot = column;
        Ok(())
    }

    /// Set a scalar column by position
    pub fn set_scalar(&mut self, index: usize, value: Value) -> Result<(), ExecutionError> {
        self.set(index, Column::Scalar(value))
    }

    /// Iterate over columns in position order
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }
}
