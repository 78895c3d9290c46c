// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Per-key aggregation state for grouped queries
//!
//! A group owns a deep-copied composite key, one cloned representative record
//! for the non-aggregated output columns, and one aggregate expression tree
//! per aggregate in the query. The cache maps composite keys to groups with
//! cross-kind numeric equality, so Int 1 and Double 1.0 land in the same
//! group.

use crate::exec::error::ExecutionError;
use crate::exec::record::Record;
use crate::expr::{EvalContext, ExprNode};
use crate::storage::Value;
use std::collections::HashMap;

/// Aggregation state for one distinct grouping key
#[derive(Debug)]
pub struct Group {
    keys: Vec<Value>,
    representative: Record,
    aggregates: Vec<ExprNode>,
}

impl Group {
    fn new(keys: Vec<Value>, record: &Record, aggregates: Vec<ExprNode>) -> Self {
        Self {
            keys,
            // Cloned so the group outlives the triggering record.
            representative: record.clone(),
            aggregates,
        }
    }

    /// The composite key this group accumulates under
    pub fn keys(&self) -> &[Value] {
        &self.keys
    }

    /// The record captured when the group was created
    pub fn representative(&self) -> &Record {
        &self.representative
    }

    /// Feed a record to every owned aggregate tree
    pub fn merge(&mut self, ctx: &EvalContext, record: &Record) -> Result<(), ExecutionError> {
        for aggregate in &mut self.aggregates {
            aggregate.aggregate(ctx, record)?;
        }
        Ok(())
    }

    /// Finalize every owned aggregate tree; safe to call more than once
    pub fn finalize(&mut self) {
        for aggregate in &mut self.aggregates {
            aggregate.reduce();
        }
    }

    /// Evaluate the owned aggregate trees against the representative record
    pub fn aggregate_values(&self, ctx: &EvalContext) -> Result<Vec<Value>, ExecutionError> {
        self.aggregates
            .iter()
            .map(|aggregate| aggregate.evaluate(ctx, &self.representative))
            .collect()
    }
}

/// Cache of groups keyed by composite grouping key
///
/// Groups drain in creation order, so grouped output is deterministic for a
/// given input order.
#[derive(Debug, Default)]
pub struct GroupCache {
    index: HashMap<Vec<Value>, usize>,
    groups: Vec<Group>,
}

impl GroupCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the group for a key, or create one from the triggering record
    ///
    /// The factory builds the group's aggregate trees (one fresh tree per
    /// aggregate expression in the query) and runs only when the key is new.
    pub fn lookup_or_create<F>(
        &mut self,
        keys: &[Value],
        record: &Record,
        factory: F,
    ) -> Result<&mut Group, ExecutionError>
    where
        F: FnOnce() -> Result<Vec<ExprNode>, ExecutionError>,
    {
        if let Some(&slot) = self.index.get(keys) {
            return Ok(&mut self.groups[slot]);
        }

        let aggregates = factory()?;
        log::debug!("new group for key {:?}", keys);
        let slot = self.groups.len();
        self.index.insert(keys.to_vec(), slot);
        self.groups
            .push(Group::new(keys.to_vec(), record, aggregates));
        Ok(&mut self.groups[slot])
    }

    /// Finalize every group at end of input
    pub fn finalize_all(&mut self) {
        for group in &mut self.groups {
            group.finalize();
        }
    }

    /// Number of distinct keys observed
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no group has been created yet
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate groups in creation order
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// Drain groups in creation order
    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprDesc;

    fn sum_and_count() -> Result<Vec<ExprNode>, ExecutionError> {
        Ok(vec![
            ExprNode::build(&ExprDesc::call("SUM", vec![ExprDesc::variable(1)]))?,
            ExprNode::build(&ExprDesc::call("COUNT", vec![ExprDesc::variable(1)]))?,
        ])
    }

    fn row(key: Value, amount: i64) -> Record {
        Record::from_values(vec![key, Value::Int(amount)])
    }

    #[test]
    fn test_groups_accumulate_independently() {
        let ctx = EvalContext::detached();
        let mut cache = GroupCache::new();

        let rows = [
            row(Value::from("a"), 1),
            row(Value::from("b"), 10),
            row(Value::from("a"), 2),
            row(Value::from("b"), 20),
            row(Value::from("a"), 4),
        ];
        for record in &rows {
            let keys = vec![record.value(0).unwrap()];
            let group = cache
                .lookup_or_create(&keys, record, sum_and_count)
                .unwrap();
            group.merge(&ctx, record).unwrap();
        }

        assert_eq!(cache.len(), 2);
        cache.finalize_all();

        let groups = cache.into_groups();
        // Creation order: "a" first.
        assert_eq!(groups[0].keys(), &[Value::from("a")]);
        assert_eq!(
            groups[0].aggregate_values(&ctx).unwrap(),
            vec![Value::Double(7.0), Value::Int(3)]
        );
        assert_eq!(groups[1].keys(), &[Value::from("b")]);
        assert_eq!(
            groups[1].aggregate_values(&ctx).unwrap(),
            vec![Value::Double(30.0), Value::Int(2)]
        );
    }

    #[test]
    fn test_cross_kind_numeric_keys_coalesce() {
        let ctx = EvalContext::detached();
        let mut cache = GroupCache::new();

        let a = row(Value::Int(1), 5);
        let b = row(Value::Double(1.0), 7);
        for record in [&a, &b] {
            let keys = vec![record.value(0).unwrap()];
            let group = cache
                .lookup_or_create(&keys, record, sum_and_count)
                .unwrap();
            group.merge(&ctx, record).unwrap();
        }

        assert_eq!(cache.len(), 1);
        cache.finalize_all();
        let groups = cache.into_groups();
        assert_eq!(
            groups[0].aggregate_values(&ctx).unwrap(),
            vec![Value::Double(12.0), Value::Int(2)]
        );
    }

    #[test]
    fn test_representative_is_a_deep_copy() {
        let mut cache = GroupCache::new();

        let record = row(Value::from("key"), 1);
        let keys = vec![record.value(0).unwrap()];
        cache
            .lookup_or_create(&keys, &record, sum_and_count)
            .unwrap();
        drop(record);

        let groups = cache.into_groups();
        assert_eq!(
            groups[0].representative().value(0).unwrap(),
            Value::from("key")
        );
    }

    #[test]
    fn test_finalize_twice_is_safe() {
        let ctx = EvalContext::detached();
        let mut cache = GroupCache::new();

        let record = row(Value::from("k"), 6);
        let keys = vec![record.value(0).unwrap()];
        let group = cache
            .lookup_or_create(&keys, &record, || {
                Ok(vec![ExprNode::build(&ExprDesc::call(
                    "AVG",
                    vec![ExprDesc::variable(1)],
                ))?])
            })
            .unwrap();
        group.merge(&ctx, &record).unwrap();

        cache.finalize_all();
        cache.finalize_all();

        let groups = cache.into_groups();
        assert_eq!(
            groups[0].aggregate_values(&ctx).unwrap(),
            vec![Value::Double(6.0)]
        );
    }
}
