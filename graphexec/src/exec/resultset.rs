// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Result collection for emitted records
//!
//! Accumulates the records a pipeline emits, with optional DISTINCT
//! de-duplication, a skip offset, and a record limit. Rendering the
//! collected rows to a client belongs to the reply layer outside this crate.

use crate::exec::error::ExecutionError;
use crate::exec::record::Record;
use crate::exec::source::RecordSource;
use std::collections::HashSet;

/// Collector for the records a query produces
///
/// Duplicate detection uses whole-record equality with cross-kind numeric
/// semantics, so a row carrying Int 1 duplicates one carrying Double 1.0.
#[derive(Debug, Default)]
pub struct ResultSet {
    records: Vec<Record>,
    distinct: bool,
    seen: HashSet<Record>,
    skip: usize,
    skipped: usize,
    limit: Option<usize>,
}

impl ResultSet {
    /// Create a collector
    pub fn new(distinct: bool, skip: usize, limit: Option<usize>) -> Self {
        Self {
            records: Vec::new(),
            distinct,
            seen: HashSet::new(),
            skip,
            skipped: 0,
            limit,
        }
    }

    /// Unlimited, non-distinct collector
    pub fn unlimited() -> Self {
        Self::new(false, 0, None)
    }

    /// Offer one record; returns whether the set can accept more
    ///
    /// Duplicates (under DISTINCT) and skipped records are consumed without
    /// being retained.
    pub fn add(&mut self, record: Record) -> bool {
        if self.is_full() {
            return false;
        }
        if self.distinct && !self.seen.insert(record.clone()) {
            return true;
        }
        if self.skipped < self.skip {
            self.skipped += 1;
            return true;
        }
        self.records.push(record);
        !self.is_full()
    }

    /// Whether the record limit has been reached
    pub fn is_full(&self) -> bool {
        match self.limit {
            Some(limit) => self.records.len() >= limit,
            None => false,
        }
    }

    /// Drain a source into the set, stopping early once full
    pub fn collect_from(&mut self, source: &mut dyn RecordSource) -> Result<(), ExecutionError> {
        while !self.is_full() {
            match source.next() {
                Some(record) => {
                    self.add(record?);
                }
                None => break,
            }
        }
        Ok(())
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing has been retained
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The retained records in emission order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consume the set, yielding the retained records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
