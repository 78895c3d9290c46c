// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Pipeline execution: records, the pull protocol, grouping, ordering, and
//! result collection
//!
//! Stages are single-threaded and synchronous: a consumer pulls one record
//! at a time, and a stage may pull any number of records from its own
//! upstream child before returning. Records are retained across stages by
//! deep clone only; whoever owns a record last releases its payloads.

pub mod error;
pub mod grouping;
pub mod record;
pub mod resultset;
pub mod sort;
pub mod source;

pub use error::ExecutionError;
pub use grouping::{Group, GroupCache};
pub use record::{Column, Record};
pub use resultset::ResultSet;
pub use sort::{SortDirection, SortKey, SortOperator};
pub use source::{RecordSource, VecRecordSource};
