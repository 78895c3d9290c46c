// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Sort / Top-K pipeline operator
//!
//! Orders its upstream records by one or more key expressions, each tagged
//! ascending or descending. Without a result bound the operator buffers
//! everything and sorts in place; with a bound N it keeps a heap of at most N
//! entries whose root is the worst record retained so far, so peak memory is
//! O(N) instead of O(total rows) while producing exactly the first N records
//! of a full sort.
//!
//! The operator advances through Accumulating, Ordering, Draining, and
//! Exhausted. The first pull fully drains the upstream child before anything
//! is emitted; that latency is inherent to sorting, not a defect.
//!
//! Ties are stable on both paths: records with equal keys emit in arrival
//! order. The buffer path relies on the stable standard sort, the heap path
//! breaks ties on an arrival sequence number.

use crate::exec::error::ExecutionError;
use crate::exec::record::Record;
use crate::exec::source::RecordSource;
use crate::expr::{EvalContext, ExprNode};
use crate::storage::Value;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

/// Direction of one sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One ordering key: an expression and its direction
#[derive(Debug)]
pub struct SortKey {
    pub expr: ExprNode,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(expr: ExprNode) -> Self {
        Self {
            expr,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(expr: ExprNode) -> Self {
        Self {
            expr,
            direction: SortDirection::Descending,
        }
    }
}

/// A record with its evaluated key tuple and arrival sequence
///
/// Keys are computed once when the record arrives, so comparison never
/// re-evaluates expressions and cannot fail mid-sort.
#[derive(Debug)]
struct SortEntry {
    keys: Vec<Value>,
    seq: u64,
    record: Record,
}

/// Multi-key comparison: the first non-equal key decides, ties fall through
/// to arrival order.
fn compare_entries(a: &SortEntry, b: &SortEntry, directions: &[SortDirection]) -> Ordering {
    for (i, direction) in directions.iter().enumerate() {
        let ord = a.keys[i].total_cmp(&b.keys[i]);
        let ord = match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.seq.cmp(&b.seq)
}

/// Heap entry ordered by final output position, so the max-heap root is the
/// worst record currently retained
struct HeapEntry {
    entry: SortEntry,
    directions: Arc<Vec<SortDirection>>,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_entries(&self.entry, &other.entry, &self.directions)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

#[derive(Debug)]
enum Phase {
    Accumulating,
    Draining(std::vec::IntoIter<Record>),
    Exhausted,
}

/// Pull-based sort / top-k stage
pub struct SortOperator {
    child: Box<dyn RecordSource>,
    ctx: EvalContext,
    exprs: Vec<ExprNode>,
    directions: Arc<Vec<SortDirection>>,
    /// Result bound with any skip offset already folded in by the caller
    bound: Option<usize>,
    buffer: Vec<SortEntry>,
    heap: BinaryHeap<HeapEntry>,
    seq: u64,
    phase: Phase,
}

impl SortOperator {
    /// Create a sort stage over a child source
    ///
    /// Key expressions must be aggregate-free; an aggregate in a sort key is
    /// reported at construction time, before any record flows.
    pub fn new(
        child: Box<dyn RecordSource>,
        ctx: EvalContext,
        keys: Vec<SortKey>,
        bound: Option<usize>,
    ) -> Result<Self, ExecutionError> {
        if let Some(key) = keys.iter().find(|k| k.expr.contains_aggregate()) {
            return Err(ExecutionError::ExpressionError(format!(
                "sort key {} contains an aggregate function",
                key.expr
            )));
        }

        let (exprs, directions): (Vec<_>, Vec<_>) =
            keys.into_iter().map(|k| (k.expr, k.direction)).unzip();

        Ok(Self {
            child,
            ctx,
            exprs,
            directions: Arc::new(directions),
            bound,
            buffer: Vec::new(),
            heap: BinaryHeap::new(),
            seq: 0,
            phase: Phase::Accumulating,
        })
    }

    fn accumulate(&mut self, record: Record) -> Result<(), ExecutionError> {
        let mut keys = Vec::with_capacity(self.exprs.len());
        for expr in &self.exprs {
            keys.push(expr.evaluate(&self.ctx, &record)?);
        }
        let entry = SortEntry {
            keys,
            seq: self.seq,
            record,
        };
        self.seq += 1;

        match self.bound {
            None => self.buffer.push(entry),
            // A bound of zero retains nothing.
            Some(0) => {}
            Some(n) => {
                let candidate = HeapEntry {
                    entry,
                    directions: Arc::clone(&self.directions),
                };
                if self.heap.len() < n {
                    self.heap.push(candidate);
                } else if let Some(worst) = self.heap.peek() {
                    // Strictly better than the worst retained record: admit
                    // it and evict the root. Otherwise drop the candidate.
                    if candidate.cmp(worst) == Ordering::Less {
                        self.heap.push(candidate);
                        self.heap.pop();
                    }
                }
            }
        }
        Ok(())
    }

    /// Materialize the final order from whichever store is active
    fn materialize(&mut self) -> Vec<Record> {
        if self.bound.is_none() {
            let directions = Arc::clone(&self.directions);
            let mut buffer = std::mem::take(&mut self.buffer);
            buffer.sort_by(|a, b| compare_entries(a, b, &directions));
            buffer.into_iter().map(|entry| entry.record).collect()
        } else {
            // Extraction is worst-first, so reverse into final order.
            let mut ordered = Vec::with_capacity(self.heap.len());
            while let Some(top) = self.heap.pop() {
                ordered.push(top.entry.record);
            }
            ordered.reverse();
            ordered
        }
    }
}

impl Iterator for SortOperator {
    type Item = Result<Record, ExecutionError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.phase {
                Phase::Accumulating => {
                    while let Some(item) = self.child.next() {
                        let record = match item {
                            Ok(record) => record,
                            Err(e) => return Some(Err(e)),
                        };
                        if let Err(e) = self.accumulate(record) {
                            return Some(Err(e));
                        }
                    }
                    let ordered = self.materialize();
                    log::debug!(
                        "sort materialized {} of {} accumulated records",
                        ordered.len(),
                        self.seq
                    );
                    self.phase = Phase::Draining(ordered.into_iter());
                }
                Phase::Draining(output) => match output.next() {
                    Some(record) => return Some(Ok(record)),
                    None => {
                        self.phase = Phase::Exhausted;
                        return None;
                    }
                },
                Phase::Exhausted => return None,
            }
        }
    }
}

impl RecordSource for SortOperator {
    /// Discard all retained records and restart from the upstream child
    fn reset(&mut self) {
        self.child.reset();
        self.buffer.clear();
        self.heap.clear();
        self.seq = 0;
        self.phase = Phase::Accumulating;
    }
}
