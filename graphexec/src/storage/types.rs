// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph data structures and the store interface
//!
//! Defines Node and Edge structures for the in-memory graph, the opaque
//! entity identifiers carried inside records, and the property-lookup trait
//! the expression evaluator calls into. The persistent storage engine lives
//! outside this crate; the in-memory implementation here backs tests and
//! embedded use.

use crate::storage::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Opaque node identifier into the graph store
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(pub u64);

/// Opaque edge identifier into the graph store
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EdgeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error types for graph store operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    #[error("Node already exists: {0}")]
    NodeAlreadyExists(NodeId),

    #[error("Edge already exists: {0}")]
    EdgeAlreadyExists(EdgeId),

    #[error("Invalid edge: from node {from} to node {to} - one or both nodes don't exist")]
    InvalidEdge { from: NodeId, to: NodeId },
}

/// Graph node with id, labels, and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub labels: Vec<String>,
    pub properties: HashMap<String, Value>,
}

impl Node {
    /// Create a new node with the given id
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            labels: Vec::new(),
            properties: HashMap::new(),
        }
    }

    /// Create a new node with id and labels
    pub fn with_labels(id: NodeId, labels: Vec<String>) -> Self {
        Self {
            id,
            labels,
            properties: HashMap::new(),
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Graph edge with id, label, endpoints, and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub label: String,
    pub from_node: NodeId,
    pub to_node: NodeId,
    pub properties: HashMap<String, Value>,
}

impl Edge {
    /// Create a new edge between two nodes
    pub fn new(id: EdgeId, label: impl Into<String>, from_node: NodeId, to_node: NodeId) -> Self {
        Self {
            id,
            label: label.into(),
            from_node,
            to_node,
            properties: HashMap::new(),
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Property lookup by entity reference, consumed by variable operands bound
/// to entity properties.
///
/// A missing entity or property yields `None`; the evaluator maps that to a
/// Null value rather than an error.
pub trait GraphStore: fmt::Debug + Send + Sync {
    fn node_property(&self, id: NodeId, key: &str) -> Option<Value>;
    fn edge_property(&self, id: EdgeId, key: &str) -> Option<Value>;
}

/// In-memory graph storage backing tests and embedded execution
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
}

impl InMemoryGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; the id must not already be present
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, StorageError> {
        let id = node.id;
        if self.nodes.contains_key(&id) {
            return Err(StorageError::NodeAlreadyExists(id));
        }
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Add an edge; both endpoints must exist
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeId, StorageError> {
        if self.edges.contains_key(&edge.id) {
            return Err(StorageError::EdgeAlreadyExists(edge.id));
        }
        if !self.nodes.contains_key(&edge.from_node) || !self.nodes.contains_key(&edge.to_node) {
            return Err(StorageError::InvalidEdge {
                from: edge.from_node,
                to: edge.to_node,
            });
        }
        let id = edge.id;
        self.edges.insert(id, edge);
        Ok(id)
    }

    /// Get a node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get an edge by id
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl GraphStore for InMemoryGraph {
    fn node_property(&self, id: NodeId, key: &str) -> Option<Value> {
        self.nodes.get(&id)?.get_property(key).cloned()
    }

    fn edge_property(&self, id: EdgeId, key: &str) -> Option<Value> {
        self.edges.get(&id)?.get_property(key).cloned()
    }
}
