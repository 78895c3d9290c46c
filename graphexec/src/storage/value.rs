// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Value type system for records and graph properties
//!
//! Supports the scalar types flowing through the query pipeline:
//! - Basic types: String, Int, Double, Bool, Null
//! - Entity references: Node, Edge (opaque ids into the graph store)
//! - Collections: Array (produced by COLLECT)

use crate::storage::types::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Value types for record columns and node/edge properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Node(NodeId),
    Edge(EdgeId),
    Array(Vec<Value>),
}

impl Value {
    /// Extract as a number if possible (Int widens to f64)
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Extract as string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract as boolean if possible
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract as array if possible
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is numeric (Int or Double)
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Double(_))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Double(_) => "Double",
            Value::String(_) => "String",
            Value::Node(_) => "Node",
            Value::Edge(_) => "Edge",
            Value::Array(_) => "Array",
        }
    }

    /// String coercion used by the `+` concatenation rule and TOSTRING.
    ///
    /// Numeric operands render with exactly six fractional digits (`3` becomes
    /// `"3.000000"`). Returns `None` for kinds that have no string coercion
    /// (Null, Node, Edge, Array).
    pub fn coerce_to_string(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Int(i) => Some(format!("{:.6}", *i as f64)),
            Value::Double(d) => Some(format!("{:.6}", d)),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Rank used to order values of incomparable kinds.
    ///
    /// Int and Double share a rank so numeric comparison is by value
    /// regardless of kind.
    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Double(_) => 2,
            Value::String(_) => 3,
            Value::Node(_) => 4,
            Value::Edge(_) => 5,
            Value::Array(_) => 6,
        }
    }

    /// Total order over all value kinds, used by sorting and grouping.
    ///
    /// Null sorts before every non-null value. Numerics compare by value
    /// across kinds, strings byte-wise, entity references by id. Values of
    /// incomparable kinds order by a fixed type rank so heterogeneous columns
    /// sort deterministically instead of failing.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => numeric_cmp(*a, *b),
            (Value::Int(a), Value::Double(b)) => numeric_cmp(*a as f64, *b),
            (Value::Double(a), Value::Int(b)) => numeric_cmp(*a, *b as f64),
            (Value::String(a), Value::String(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::Node(a), Value::Node(b)) => a.cmp(b),
            (Value::Edge(a), Value::Edge(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.total_cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

/// Numeric comparison with a deterministic NaN policy: NaN sorts after every
/// other number and equals itself.
fn numeric_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(match (a.is_nan(), b.is_nan()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => Ordering::Equal,
    })
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // NaN equals itself so grouping keys stay reflexive.
            (Value::Double(a), Value::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Int(a), Value::Double(b)) | (Value::Double(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a == b,
            (Value::Edge(a), Value::Edge(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            // Int and Double share a discriminant and hash the widened f64 bit
            // pattern, so Int 1 and Double 1.0 land in the same bucket (they
            // compare equal as grouping keys).
            Value::Int(i) => {
                2u8.hash(state);
                hash_f64(*i as f64, state);
            }
            Value::Double(d) => {
                2u8.hash(state);
                hash_f64(*d, state);
            }
            Value::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Value::Node(id) => {
                4u8.hash(state);
                id.hash(state);
            }
            Value::Edge(id) => {
                5u8.hash(state);
                id.hash(state);
            }
            Value::Array(items) => {
                6u8.hash(state);
                items.len().hash(state);
                for item in items {
                    item.hash(state);
                }
            }
        }
    }
}

/// Hash an f64 consistently with cross-kind numeric equality: NaN collapses to
/// one pattern, negative zero to positive zero.
fn hash_f64<H: Hasher>(f: f64, state: &mut H) {
    if f.is_nan() {
        "NaN".hash(state);
    } else if f == 0.0 {
        0f64.to_bits().hash(state);
    } else {
        f.to_bits().hash(state);
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Node(id) => write!(f, "node({})", id.0),
            Value::Edge(id) => write!(f, "edge({})", id.0),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        v.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_null_sorts_first() {
        let values = [
            Value::Bool(false),
            Value::Int(-100),
            Value::Double(f64::NEG_INFINITY),
            Value::String("".to_string()),
            Value::Node(NodeId(0)),
        ];
        for v in &values {
            assert_eq!(Value::Null.total_cmp(v), Ordering::Less);
            assert_eq!(v.total_cmp(&Value::Null), Ordering::Greater);
        }
    }

    #[test]
    fn test_cross_kind_numeric_order() {
        assert_eq!(Value::Int(1).total_cmp(&Value::Double(1.0)), Ordering::Equal);
        assert_eq!(Value::Int(1).total_cmp(&Value::Double(1.5)), Ordering::Less);
        assert_eq!(
            Value::Double(2.5).total_cmp(&Value::Int(2)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_string_order_is_bytewise() {
        let a = Value::String("abc".to_string());
        let b = Value::String("abd".to_string());
        assert_eq!(a.total_cmp(&b), Ordering::Less);
        assert_eq!(a.total_cmp(&a), Ordering::Equal);
    }

    #[test]
    fn test_heterogeneous_kinds_order_deterministically() {
        let s = Value::String("z".to_string());
        let n = Value::Node(NodeId(1));
        // Not meaningful, but stable in both directions.
        assert_eq!(s.total_cmp(&n), Ordering::Less);
        assert_eq!(n.total_cmp(&s), Ordering::Greater);
    }

    #[test]
    fn test_cross_kind_numeric_equality_and_hash() {
        assert_eq!(Value::Int(1), Value::Double(1.0));
        assert_eq!(hash_of(&Value::Int(1)), hash_of(&Value::Double(1.0)));
        assert_ne!(Value::Int(1), Value::Double(1.25));
        assert_eq!(hash_of(&Value::Double(0.0)), hash_of(&Value::Double(-0.0)));
    }

    #[test]
    fn test_six_digit_string_coercion() {
        assert_eq!(Value::Int(3).coerce_to_string().unwrap(), "3.000000");
        assert_eq!(Value::Double(3.14).coerce_to_string().unwrap(), "3.140000");
        assert_eq!(
            Value::String("muchacho".to_string())
                .coerce_to_string()
                .unwrap(),
            "muchacho"
        );
        assert!(Value::Null.coerce_to_string().is_none());
        assert!(Value::Node(NodeId(7)).coerce_to_string().is_none());
    }

    #[test]
    fn test_nan_is_reflexive() {
        let nan = Value::Double(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(nan.total_cmp(&nan), Ordering::Equal);
        assert_eq!(
            nan.total_cmp(&Value::Double(f64::INFINITY)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let v = Value::Array(vec![
            Value::Int(1),
            Value::String("a".to_string()),
            Value::Null,
        ]);
        let json = serde_json::to_string(&v).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
