// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Pull protocol for pipeline stages
//!
//! Every stage produces records one at a time when its consumer asks for the
//! next one; a stage may synchronously pull from its own upstream child any
//! number of times before returning. Single-threaded by contract: no record,
//! group, or expression state is ever touched from two execution contexts.

use crate::exec::error::ExecutionError;
use crate::exec::record::Record;

/// Iterator-based pull interface for record-producing stages
///
/// `reset` returns the stage to its initial state so the same pipeline can be
/// re-run within one query (repeated sub-evaluation). Teardown is `Drop` and
/// is safe in any state.
pub trait RecordSource: Iterator<Item = Result<Record, ExecutionError>> {
    /// Restart the stage, discarding any buffered state
    fn reset(&mut self);
}

/// Record source over a materialized vector
///
/// Emits deep clones so the backing records survive `reset` and can be
/// replayed.
pub struct VecRecordSource {
    records: Vec<Record>,
    cursor: usize,
}

impl VecRecordSource {
    /// Create a source over the given records
    pub fn new(records: Vec<Record>) -> Self {
        Self { records, cursor: 0 }
    }
}

impl Iterator for VecRecordSource {
    type Item = Result<Record, ExecutionError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(Ok(record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.records.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl RecordSource for VecRecordSource {
    fn reset(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Value;

    fn records(values: &[i64]) -> Vec<Record> {
        values
            .iter()
            .map(|v| Record::from_values(vec![Value::Int(*v)]))
            .collect()
    }

    #[test]
    fn test_vec_source_emits_in_order() {
        let mut source = VecRecordSource::new(records(&[1, 2, 3]));
        let got: Vec<Record> = source.by_ref().map(|r| r.unwrap()).collect();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].value(0).unwrap(), Value::Int(1));
        assert!(source.next().is_none());
    }

    #[test]
    fn test_reset_replays_from_the_start() {
        let mut source = VecRecordSource::new(records(&[1, 2]));
        assert!(source.next().is_some());
        assert!(source.next().is_some());
        assert!(source.next().is_none());

        source.reset();
        let replay: Vec<Record> = source.by_ref().map(|r| r.unwrap()).collect();
        assert_eq!(replay.len(), 2);
        assert_eq!(replay[1].value(0).unwrap(), Value::Int(2));
    }
}
