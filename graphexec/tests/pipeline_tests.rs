//! End-to-end pipeline tests
//!
//! Drives the public API the way an embedding query engine does: records
//! flow from a source through grouping and ordering into a result set, with
//! expression trees built from planner-style descriptions.

use graphexec::{
    Column, EvalContext, ExprDesc, ExprNode, GroupCache, InMemoryGraph, Node, NodeId, Record,
    RecordSource, ResultSet, SortKey, SortOperator, Value, VecRecordSource,
};
use std::sync::Arc;

/// A small people graph plus one record per person
fn people_fixture() -> (EvalContext, Vec<Record>) {
    let mut graph = InMemoryGraph::new();
    let people = [
        (1, "Alice", "Berlin", 30),
        (2, "Bob", "Berlin", 40),
        (3, "Carol", "Lima", 25),
        (4, "Dan", "Lima", 35),
        (5, "Eve", "Oslo", 50),
    ];
    for (id, name, city, age) in people {
        let mut node = Node::with_labels(NodeId(id), vec!["Person".to_string()]);
        node.set_property("name", Value::String(name.to_string()));
        node.set_property("city", Value::String(city.to_string()));
        node.set_property("age", Value::Int(age));
        graph.add_node(node).unwrap();
    }

    let records = (1..=5)
        .map(|id| Record::from_columns(vec![Column::Node(NodeId(id))]))
        .collect();
    (EvalContext::new(Arc::new(graph)), records)
}

/// GROUP BY city, AVG(age): groups coalesce per key and finalize once
#[test]
fn test_group_by_city_with_average_age() {
    let (ctx, records) = people_fixture();

    let key_expr = ExprNode::build(&ExprDesc::property(0, "city")).unwrap();
    let mut cache = GroupCache::new();

    for record in &records {
        let keys = vec![key_expr.evaluate(&ctx, record).unwrap()];
        let group = cache
            .lookup_or_create(&keys, record, || {
                Ok(vec![ExprNode::build(&ExprDesc::call(
                    "AVG",
                    vec![ExprDesc::property(0, "age")],
                ))?])
            })
            .unwrap();
        group.merge(&ctx, record).unwrap();
    }

    cache.finalize_all();
    let groups = cache.into_groups();
    assert_eq!(groups.len(), 3);

    let summary: Vec<(Value, Vec<Value>)> = groups
        .iter()
        .map(|g| (g.keys()[0].clone(), g.aggregate_values(&ctx).unwrap()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Value::from("Berlin"), vec![Value::Double(35.0)]),
            (Value::from("Lima"), vec![Value::Double(30.0)]),
            (Value::from("Oslo"), vec![Value::Double(50.0)]),
        ]
    );
}

/// ORDER BY age DESC SKIP 1 LIMIT 2: the skip folds into the sort bound and
/// the result set drops the skipped prefix
#[test]
fn test_order_by_property_with_skip_and_limit() {
    let (ctx, records) = people_fixture();

    let age = ExprNode::build(&ExprDesc::property(0, "age")).unwrap();
    let skip = 1;
    let limit = 2;
    let mut sort = SortOperator::new(
        Box::new(VecRecordSource::new(records)),
        ctx.clone(),
        vec![SortKey::descending(age)],
        Some(skip + limit),
    )
    .unwrap();

    let mut set = ResultSet::new(false, skip, Some(limit));
    set.collect_from(&mut sort).unwrap();

    let name = ExprNode::build(&ExprDesc::property(0, "name")).unwrap();
    let names: Vec<Value> = set
        .records()
        .iter()
        .map(|r| name.evaluate(&ctx, r).unwrap())
        .collect();
    // Ages 50, 40, 35, ... with the first dropped by SKIP.
    assert_eq!(names, vec![Value::from("Bob"), Value::from("Dan")]);
}

/// Grouped aggregates projected into records survive a downstream sort
#[test]
fn test_grouped_totals_sorted_by_sum() {
    let ctx = EvalContext::detached();
    let sales = [
        ("widget", 4), ("gadget", 10), ("widget", 6), ("doodad", 1),
        ("gadget", 5), ("widget", 2),
    ];
    let records: Vec<Record> = sales
        .iter()
        .map(|(item, amount)| {
            Record::from_values(vec![Value::from(*item), Value::Int(*amount)])
        })
        .collect();

    let mut cache = GroupCache::new();
    for record in &records {
        let keys = vec![record.value(0).unwrap()];
        let group = cache
            .lookup_or_create(&keys, record, || {
                Ok(vec![ExprNode::build(&ExprDesc::call(
                    "SUM",
                    vec![ExprDesc::variable(1)],
                ))?])
            })
            .unwrap();
        group.merge(&ctx, record).unwrap();
    }
    cache.finalize_all();

    // Project each group into (item, total) and sort by total descending.
    let grouped: Vec<Record> = cache
        .into_groups()
        .iter()
        .map(|g| {
            let total = g.aggregate_values(&ctx).unwrap().remove(0);
            Record::from_values(vec![g.keys()[0].clone(), total])
        })
        .collect();

    let total_key = ExprNode::build(&ExprDesc::variable(1)).unwrap();
    let mut sort = SortOperator::new(
        Box::new(VecRecordSource::new(grouped)),
        ctx.clone(),
        vec![SortKey::descending(total_key)],
        None,
    )
    .unwrap();

    let mut set = ResultSet::unlimited();
    set.collect_from(&mut sort).unwrap();

    let items: Vec<Value> = set
        .records()
        .iter()
        .map(|r| r.value(0).unwrap())
        .collect();
    assert_eq!(
        items,
        vec![Value::from("gadget"), Value::from("widget"), Value::from("doodad")]
    );
}

/// The same pipeline replays after a reset
#[test]
fn test_pipeline_replays_after_reset() {
    let (ctx, records) = people_fixture();

    let age = ExprNode::build(&ExprDesc::property(0, "age")).unwrap();
    let mut sort = SortOperator::new(
        Box::new(VecRecordSource::new(records)),
        ctx.clone(),
        vec![SortKey::ascending(age)],
        Some(1),
    )
    .unwrap();

    let youngest = |sort: &mut SortOperator, ctx: &EvalContext| -> Value {
        let record = sort.next().unwrap().unwrap();
        let name = ExprNode::build(&ExprDesc::property(0, "name")).unwrap();
        name.evaluate(ctx, &record).unwrap()
    };

    assert_eq!(youngest(&mut sort, &ctx), Value::from("Carol"));
    assert!(sort.next().is_none());

    sort.reset();
    assert_eq!(youngest(&mut sort, &ctx), Value::from("Carol"));
}

/// Distinct collection across entity reference columns
#[test]
fn test_distinct_entity_rows() {
    let records = vec![
        Record::from_columns(vec![Column::Node(NodeId(1))]),
        Record::from_columns(vec![Column::Node(NodeId(2))]),
        Record::from_columns(vec![Column::Node(NodeId(1))]),
    ];
    let mut source = VecRecordSource::new(records);
    let mut set = ResultSet::new(true, 0, None);
    set.collect_from(&mut source).unwrap();
    assert_eq!(set.len(), 2);
}
