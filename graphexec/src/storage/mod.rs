// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph storage interface for the execution core
//!
//! This module provides:
//! - Value type system for record columns and graph properties
//! - Opaque node/edge identifiers and the property-lookup trait
//! - An in-memory graph implementation for tests and embedded use

pub mod types;
pub mod value;

pub use types::{Edge, EdgeId, GraphStore, InMemoryGraph, Node, NodeId, StorageError};
pub use value::Value;
