// Copyright (c) 2024-2025 GraphExec Contributors.
// SPDX-License-Identifier: Apache-2.0
//
//! Mathematical function implementations
//!
//! This module contains the arithmetic operators and numeric functions:
//! - ADD, SUB, MUL, DIV: binary arithmetic (ADD carries the string
//!   concatenation coercion rule)
//! - ABS: Absolute value
//! - CEIL: Round up to nearest integer
//! - FLOOR: Round down to nearest integer
//! - ROUND: Round half up
//! - SIGN: Sign function
//! - SQRT: Square root
//! - POW: Exponentiation
//! - RAND: Uniform random number in [0, 1)
//!
//! Null propagation happens in the expression evaluator; these bodies only
//! ever see non-null arguments.

use super::function_trait::{FunctionError, FunctionResult, ScalarFunction};
use crate::storage::Value;

/// Extract a numeric argument or report a type mismatch
fn numeric_arg(func: &str, args: &[Value], index: usize) -> FunctionResult<f64> {
    args[index]
        .as_number()
        .ok_or_else(|| FunctionError::InvalidArgumentType {
            message: format!(
                "{} requires a numeric argument, got {}",
                func,
                args[index].type_name()
            ),
        })
}

/// Coerce an argument to its string representation or report a type mismatch
fn coerced_string(func: &str, args: &[Value], index: usize) -> FunctionResult<String> {
    args[index]
        .coerce_to_string()
        .ok_or_else(|| FunctionError::InvalidArgumentType {
            message: format!(
                "{} cannot coerce {} to a string",
                func,
                args[index].type_name()
            ),
        })
}

// ==============================================================================
// ADD FUNCTION
// ==============================================================================

/// ADD function - numeric sum, or string concatenation when either operand
/// is a string
///
/// Two numeric operands produce their Double sum. If either operand is a
/// string, both operands are coerced to strings (numerics with exactly six
/// fractional digits) and concatenated. Applied left-to-right through a
/// chain, `1 + 2 + 'a' + 2 + 1` evaluates to `"3.000000a2.0000001.000000"`.
#[derive(Debug)]
pub struct AddFunction;

impl AddFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for AddFunction {
    fn name(&self) -> &str {
        "ADD"
    }

    fn arity(&self) -> usize {
        2
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;

        if let (Some(a), Some(b)) = (args[0].as_number(), args[1].as_number()) {
            return Ok(Value::Double(a + b));
        }

        // The concatenation path requires an actual string on one side;
        // Bool/Node/Edge/Array operands cannot be added.
        if !matches!(args[0], Value::String(_)) && !matches!(args[1], Value::String(_)) {
            return Err(FunctionError::InvalidArgumentType {
                message: format!(
                    "ADD cannot combine {} and {}",
                    args[0].type_name(),
                    args[1].type_name()
                ),
            });
        }

        let left = coerced_string("ADD", args, 0)?;
        let right = coerced_string("ADD", args, 1)?;
        Ok(Value::String(left + &right))
    }
}

// ==============================================================================
// SUB FUNCTION
// ==============================================================================

/// SUB function - numeric subtraction
#[derive(Debug)]
pub struct SubFunction;

impl SubFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for SubFunction {
    fn name(&self) -> &str {
        "SUB"
    }

    fn arity(&self) -> usize {
        2
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let a = numeric_arg("SUB", args, 0)?;
        let b = numeric_arg("SUB", args, 1)?;
        Ok(Value::Double(a - b))
    }
}

// ==============================================================================
// MUL FUNCTION
// ==============================================================================

/// MUL function - numeric multiplication
#[derive(Debug)]
pub struct MulFunction;

impl MulFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for MulFunction {
    fn name(&self) -> &str {
        "MUL"
    }

    fn arity(&self) -> usize {
        2
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let a = numeric_arg("MUL", args, 0)?;
        let b = numeric_arg("MUL", args, 1)?;
        Ok(Value::Double(a * b))
    }
}

// ==============================================================================
// DIV FUNCTION
// ==============================================================================

/// DIV function - numeric division
///
/// Division by zero follows IEEE 754 (infinities and NaN).
#[derive(Debug)]
pub struct DivFunction;

impl DivFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for DivFunction {
    fn name(&self) -> &str {
        "DIV"
    }

    fn arity(&self) -> usize {
        2
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let a = numeric_arg("DIV", args, 0)?;
        let b = numeric_arg("DIV", args, 1)?;
        Ok(Value::Double(a / b))
    }
}

// ==============================================================================
// ABS FUNCTION
// ==============================================================================

/// ABS function - returns the absolute value of a number
#[derive(Debug)]
pub struct AbsFunction;

impl AbsFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for AbsFunction {
    fn name(&self) -> &str {
        "ABS"
    }

    fn arity(&self) -> usize {
        1
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let n = numeric_arg("ABS", args, 0)?;
        Ok(Value::Double(n.abs()))
    }
}

// ==============================================================================
// CEIL FUNCTION
// ==============================================================================

/// CEIL function - smallest integer greater than or equal to the number
#[derive(Debug)]
pub struct CeilFunction;

impl CeilFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for CeilFunction {
    fn name(&self) -> &str {
        "CEIL"
    }

    fn arity(&self) -> usize {
        1
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let n = numeric_arg("CEIL", args, 0)?;
        Ok(Value::Double(n.ceil()))
    }
}

// ==============================================================================
// FLOOR FUNCTION
// ==============================================================================

/// FLOOR function - largest integer less than or equal to the number
#[derive(Debug)]
pub struct FloorFunction;

impl FloorFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for FloorFunction {
    fn name(&self) -> &str {
        "FLOOR"
    }

    fn arity(&self) -> usize {
        1
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let n = numeric_arg("FLOOR", args, 0)?;
        Ok(Value::Double(n.floor()))
    }
}

// ==============================================================================
// ROUND FUNCTION
// ==============================================================================

/// ROUND function - rounds half up
///
/// Exact halves round toward positive infinity: ROUND(0.5) is 1,
/// ROUND(0.49) is 0, and ROUND(-0.5) is 0 rather than -1.
#[derive(Debug)]
pub struct RoundFunction;

impl RoundFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for RoundFunction {
    fn name(&self) -> &str {
        "ROUND"
    }

    fn arity(&self) -> usize {
        1
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let n = numeric_arg("ROUND", args, 0)?;
        Ok(Value::Double((n + 0.5).floor()))
    }
}

// ==============================================================================
// SIGN FUNCTION
// ==============================================================================

/// SIGN function - -1, 0, or 1 according to the number's sign
#[derive(Debug)]
pub struct SignFunction;

impl SignFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for SignFunction {
    fn name(&self) -> &str {
        "SIGN"
    }

    fn arity(&self) -> usize {
        1
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let n = numeric_arg("SIGN", args, 0)?;
        let sign = if n > 0.0 {
            1.0
        } else if n < 0.0 {
            -1.0
        } else {
            0.0
        };
        Ok(Value::Double(sign))
    }
}

// ==============================================================================
// SQRT FUNCTION
// ==============================================================================

/// SQRT function - square root (NaN for negative input)
#[derive(Debug)]
pub struct SqrtFunction;

impl SqrtFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for SqrtFunction {
    fn name(&self) -> &str {
        "SQRT"
    }

    fn arity(&self) -> usize {
        1
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let n = numeric_arg("SQRT", args, 0)?;
        Ok(Value::Double(n.sqrt()))
    }
}

// ==============================================================================
// POW FUNCTION
// ==============================================================================

/// POW function - raises the first argument to the power of the second
#[derive(Debug)]
pub struct PowFunction;

impl PowFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for PowFunction {
    fn name(&self) -> &str {
        "POW"
    }

    fn arity(&self) -> usize {
        2
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        let a = numeric_arg("POW", args, 0)?;
        let b = numeric_arg("POW", args, 1)?;
        Ok(Value::Double(a.powf(b)))
    }
}

// ==============================================================================
// RAND FUNCTION
// ==============================================================================

/// RAND function - uniform random Double in [0, 1)
#[derive(Debug)]
pub struct RandFunction;

impl RandFunction {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarFunction for RandFunction {
    fn name(&self) -> &str {
        "RAND"
    }

    fn arity(&self) -> usize {
        0
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        self.validate_argument_count(args)?;
        Ok(Value::Double(fastrand::f64()))
    }
}
