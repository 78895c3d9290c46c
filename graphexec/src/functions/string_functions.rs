// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! String function implementations
//!
//! This module contains all string manipulation functions:
//! - REVERSE: Reverses string characters
//! - LEFT / RIGHT: Leading / trailing prefix of a string
//! - SUBSTRING: Extracts substrings
//! - TRIM / LTRIM / RTRIM: Removes surrounding whitespace
//! - TOLOWER / TOUPPER: Case conversion
//! - TOSTRING: String coercion
//!
//! Positions and lengths are measured in characters, and an out-of-range
//! length clamps to the string's actual length instead of erroring. Null
//! propagation happens in the expression evaluator.

use super::function_trait::{FunctionError, FunctionResult, ScalarFunction};
use crate::storage::Value;

/// Extract a string argument or report a type mismatch
fn string_arg<'a>(func: &str, args: &'a [Value], index: usize) -> FunctionResult<&'a str> {
    args[index]
        .as_string()
        .ok_or_else(|| FunctionError::InvalidArgumentType {
            message: format!(
                "{} requires a string argument, got {}",
                func,
                args[index].type_name()
            ),
        })
}

/// Extract a non-negative length/position argument
fn index_arg(func: &str, args: &[Value], index: usize) -> FunctionResult<usize> {
    let n = args[index]
        .as_number()
        .ok_or_else(|| FunctionError::InvalidArgumentType {
            message: format!(
                "{} requires a numeric argument, got {}",
                func,
                args[index].type_name()
            ),
        })?;
    if n < 0.0 {
        return Err(FunctionError::InvalidArgumentType {
            message: format!("{} requires a non-negative length, got {}", func, n),
        });
    }
    Ok(n as usize)
}

// ==============================================================================
// REVERSE FUNCTION
// ==============================================================================

/// REVERSE function - reverses the characters of a string
#[derive(Debug)]
pub struct ReverseFunction;

impl ReverseFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for ReverseFunction {
    fn name(&self) -> &str {
        "REVERSE"
    }

    fn arity(&self) -> usize {
        1
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let s = string_arg("REVERSE", args, 0)?;
        Ok(Value::String(s.chars().rev().collect()))
    }
}

// ==============================================================================
// LEFT FUNCTION
// ==============================================================================

/// LEFT function - the first N characters of a string
///
/// A length beyond the string's end clamps to the whole string.
#[derive(Debug)]
pub struct LeftFunction;

impl LeftFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for LeftFunction {
    fn name(&self) -> &str {
        "LEFT"
    }

    fn arity(&self) -> usize {
        2
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let s = string_arg("LEFT", args, 0)?;
        let n = index_arg("LEFT", args, 1)?;
        Ok(Value::String(s.chars().take(n).collect()))
    }
}

// ==============================================================================
// RIGHT FUNCTION
// ==============================================================================

/// RIGHT function - the last N characters of a string
///
/// A length beyond the string's end clamps to the whole string.
#[derive(Debug)]
pub struct RightFunction;

impl RightFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for RightFunction {
    fn name(&self) -> &str {
        "RIGHT"
    }

    fn arity(&self) -> usize {
        2
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let s = string_arg("RIGHT", args, 0)?;
        let n = index_arg("RIGHT", args, 1)?;
        let total = s.chars().count();
        Ok(Value::String(
            s.chars().skip(total.saturating_sub(n)).collect(),
        ))
    }
}

// ==============================================================================
// SUBSTRING FUNCTION
// ==============================================================================

/// SUBSTRING function - extracts a slice of characters
///
/// Takes a zero-based start position and a length. A start beyond the end
/// yields the empty string; a length past the end clamps to the string's
/// actual length.
#[derive(Debug)]
pub struct SubstringFunction;

impl SubstringFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for SubstringFunction {
    fn name(&self) -> &str {
        "SUBSTRING"
    }

    fn arity(&self) -> usize {
        3
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let s = string_arg("SUBSTRING", args, 0)?;
        let start = index_arg("SUBSTRING", args, 1)?;
        let len = index_arg("SUBSTRING", args, 2)?;
        Ok(Value::String(s.chars().skip(start).take(len).collect()))
    }
}

// ==============================================================================
// TRIM FUNCTIONS
// ==============================================================================

/// TRIM function - removes leading and trailing whitespace
#[derive(Debug)]
pub struct TrimFunction;

impl TrimFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for TrimFunction {
    fn name(&self) -> &str {
        "TRIM"
    }

    fn arity(&self) -> usize {
        1
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let s = string_arg("TRIM", args, 0)?;
        Ok(Value::String(s.trim().to_string()))
    }
}

/// LTRIM function - removes leading whitespace
#[derive(Debug)]
pub struct LTrimFunction;

impl LTrimFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for LTrimFunction {
    fn name(&self) -> &str {
        "LTRIM"
    }

    fn arity(&self) -> usize {
        1
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let s = string_arg("LTRIM", args, 0)?;
        Ok(Value::String(s.trim_start().to_string()))
    }
}

/// RTRIM function - removes trailing whitespace
#[derive(Debug)]
pub struct RTrimFunction;

impl RTrimFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for RTrimFunction {
    fn name(&self) -> &str {
        "RTRIM"
    }

    fn arity(&self) -> usize {
        1
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let s = string_arg("RTRIM", args, 0)?;
        Ok(Value::String(s.trim_end().to_string()))
    }
}

// ==============================================================================
// CASE CONVERSION FUNCTIONS
// ==============================================================================

/// TOLOWER function - converts a string to lowercase
#[derive(Debug)]
pub struct ToLowerFunction;

impl ToLowerFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for ToLowerFunction {
    fn name(&self) -> &str {
        "TOLOWER"
    }

    fn arity(&self) -> usize {
        1
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let s = string_arg("TOLOWER", args, 0)?;
        Ok(Value::String(s.to_lowercase()))
    }
}

/// TOUPPER function - converts a string to uppercase
#[derive(Debug)]
pub struct ToUpperFunction;

impl ToUpperFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for ToUpperFunction {
    fn name(&self) -> &str {
        "TOUPPER"
    }

    fn arity(&self) -> usize {
        1
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let s = string_arg("TOUPPER", args, 0)?;
        Ok(Value::String(s.to_uppercase()))
    }
}

// ==============================================================================
// TOSTRING FUNCTION
// ==============================================================================

/// TOSTRING function - coerces a value to its string representation
///
/// Numerics render with six fractional digits, matching the `+`
/// concatenation rule (`toString(3.14)` is `"3.140000"`).
#[derive(Debug)]
pub struct ToStringFunction;

impl ToStringFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for ToStringFunction {
    fn name(&self) -> &str {
        "TOSTRING"
    }

    fn arity(&self) -> usize {
        1
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let s = args[0]
            .coerce_to_string()
            .ok_or_else(|| FunctionError::InvalidArgumentType {
                message: format!(
                    "TOSTRING cannot coerce {} to a string",
                    args[0].type_name()
                ),
            })?;
        Ok(Value::String(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse() {
        let reverse = ReverseFunction::new();
        assert_eq!(
            reverse.evaluate(&[Value::from("muchacho")]).unwrap(),
            Value::from("ohcahcum")
        );
        assert_eq!(
            reverse.evaluate(&[Value::from("")]).unwrap(),
            Value::from("")
        );
    }

    #[test]
    fn test_left_clamps_to_length() {
        let left = LeftFunction::new();
        assert_eq!(
            left.evaluate(&[Value::from("muchacho"), Value::Int(4)])
                .unwrap(),
            Value::from("much")
        );
        assert_eq!(
            left.evaluate(&[Value::from("muchacho"), Value::Int(100)])
                .unwrap(),
            Value::from("muchacho")
        );
    }

    #[test]
    fn test_right_clamps_to_length() {
        let right = RightFunction::new();
        assert_eq!(
            right
                .evaluate(&[Value::from("muchacho"), Value::Int(4)])
                .unwrap(),
            Value::from("acho")
        );
        assert_eq!(
            right
                .evaluate(&[Value::from("muchacho"), Value::Int(100)])
                .unwrap(),
            Value::from("muchacho")
        );
    }

    #[test]
    fn test_substring() {
        let substring = SubstringFunction::new();
        assert_eq!(
            substring
                .evaluate(&[Value::from("muchacho"), Value::Int(0), Value::Int(4)])
                .unwrap(),
            Value::from("much")
        );
        assert_eq!(
            substring
                .evaluate(&[Value::from("muchacho"), Value::Int(3), Value::Int(20)])
                .unwrap(),
            Value::from("hacho")
        );
        // Start past the end yields the empty string.
        assert_eq!(
            substring
                .evaluate(&[Value::from("muchacho"), Value::Int(50), Value::Int(3)])
                .unwrap(),
            Value::from("")
        );
    }

    #[test]
    fn test_negative_length_is_an_error() {
        let left = LeftFunction::new();
        assert!(matches!(
            left.evaluate(&[Value::from("muchacho"), Value::Int(-1)]),
            Err(FunctionError::InvalidArgumentType { .. })
        ));
    }

    #[test]
    fn test_trims() {
        let trim = TrimFunction::new();
        let ltrim = LTrimFunction::new();
        let rtrim = RTrimFunction::new();

        assert_eq!(
            ltrim.evaluate(&[Value::from("   muchacho")]).unwrap(),
            Value::from("muchacho")
        );
        assert_eq!(
            ltrim.evaluate(&[Value::from("muchacho   ")]).unwrap(),
            Value::from("muchacho   ")
        );
        assert_eq!(
            ltrim.evaluate(&[Value::from("   much   acho   ")]).unwrap(),
            Value::from("much   acho   ")
        );

        assert_eq!(
            rtrim.evaluate(&[Value::from("muchacho   ")]).unwrap(),
            Value::from("muchacho")
        );
        assert_eq!(
            rtrim.evaluate(&[Value::from("   muchacho")]).unwrap(),
            Value::from("   muchacho")
        );
        assert_eq!(
            rtrim.evaluate(&[Value::from("   much   acho   ")]).unwrap(),
            Value::from("   much   acho")
        );

        assert_eq!(
            trim.evaluate(&[Value::from("   much   acho   ")]).unwrap(),
            Value::from("much   acho")
        );
        assert_eq!(
            trim.evaluate(&[Value::from("muchacho")]).unwrap(),
            Value::from("muchacho")
        );
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(
            ToLowerFunction::new()
                .evaluate(&[Value::from("MuChAcHo")])
                .unwrap(),
            Value::from("muchacho")
        );
        assert_eq!(
            ToUpperFunction::new()
                .evaluate(&[Value::from("mUcHaChO")])
                .unwrap(),
            Value::from("MUCHACHO")
        );
    }

    #[test]
    fn test_tostring() {
        let tostring = ToStringFunction::new();
        assert_eq!(
            tostring.evaluate(&[Value::from("muchacho")]).unwrap(),
            Value::from("muchacho")
        );
        assert_eq!(
            tostring.evaluate(&[Value::Double(3.14)]).unwrap(),
            Value::from("3.140000")
        );
        assert_eq!(
            tostring.evaluate(&[Value::Bool(true)]).unwrap(),
            Value::from("true")
        );
    }

    #[test]
    fn test_unicode_positions_are_character_based() {
        let left = LeftFunction::new();
        assert_eq!(
            left.evaluate(&[Value::from("héllo"), Value::Int(2)]).unwrap(),
            Value::from("hé")
        );
    }

    #[test]
    fn test_string_functions_reject_non_strings() {
        let reverse = ReverseFunction::new();
        assert!(matches!(
            reverse.evaluate(&[Value::Int(5)]),
            Err(FunctionError::InvalidArgumentType { .. })
        ));
    }
}
