//! Operator semantics: arithmetic with int/float promotion, comparisons and
//! truthiness.
//!
//! Integer operations are checked and report [`ErrorKind::Overflow`] instead
//! of wrapping. Division always produces a float. Booleans count as 0 and 1
//! whenever they meet a number.

use std::cmp::Ordering;

use crate::value::Value;
use lumen_syntax::ast::NodeKind;
use lumen_syntax::error::{error, Error, ErrorKind, Result};

fn overflow(op: &str) -> Error {
    Error::new(ErrorKind::Overflow, format!("integer overflow in {}", op))
}

/// Numeric view of a value, booleans included.
fn num(v: &Value) -> Option<f64> {
    match v {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        other => other.as_f64(),
    }
}

/// Turns booleans into ints when both operands are numeric, so `True + 1` is `2`.
fn promote(a: Value, b: Value) -> (Value, Value) {
    if num(&a).is_none() || num(&b).is_none() {
        return (a, b);
    }
    let int = |v: Value| match v {
        Value::Bool(flag) => Value::Int(i64::from(flag)),
        other => other,
    };
    (int(a), int(b))
}

fn mismatch<T>(verb: &str, a: &Value, b: &Value) -> Result<T> {
    error(
        ErrorKind::Type,
        format!("Cannot {} {} and {}", verb, a.type_name(), b.type_name()),
    )
}

pub(crate) fn add(a: Value, b: Value) -> Result<Value> {
    match promote(a, b) {
        (Value::Int(x), Value::Int(y)) => x.checked_add(y).map(Value::Int).ok_or_else(|| overflow("+")),
        (Value::Str(x), Value::Str(y)) => Ok(Value::Str(x + &y)),
        (Value::List(mut x), Value::List(y)) => {
            x.extend(y);
            Ok(Value::List(x))
        }
        (x, y) => match (x.as_f64(), y.as_f64()) {
            (Some(p), Some(q)) => Ok(Value::Float(p + q)),
            _ => mismatch("add", &x, &y),
        },
    }
}

pub(crate) fn sub(a: Value, b: Value) -> Result<Value> {
    let (a, b) = promote(a, b);
    match (&a, &b) {
        (Value::Int(x), Value::Int(y)) => x.checked_sub(*y).map(Value::Int).ok_or_else(|| overflow("-")),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(p), Some(q)) => Ok(Value::Float(p - q)),
            _ => mismatch("subtract", &a, &b),
        },
    }
}

pub(crate) fn mul(a: Value, b: Value) -> Result<Value> {
    let (a, b) = promote(a, b);
    match (&a, &b) {
        (Value::Int(x), Value::Int(y)) => x.checked_mul(*y).map(Value::Int).ok_or_else(|| overflow("*")),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(p), Some(q)) => Ok(Value::Float(p * q)),
            _ => mismatch("multiply", &a, &b),
        },
    }
}

/// True division: `8 / 2` is `4.0`.
pub(crate) fn div(a: Value, b: Value) -> Result<Value> {
    match (num(&a), num(&b)) {
        (Some(_), Some(q)) if q == 0.0 => error(ErrorKind::DivisionByZero, "division by zero"),
        (Some(p), Some(q)) => Ok(Value::Float(p / q)),
        _ => mismatch("divide", &a, &b),
    }
}

/// Integer base and non-negative integer exponent stay integral; a negative
/// integer exponent or any float operand gives a float.
pub(crate) fn pow(a: Value, b: Value) -> Result<Value> {
    let (a, b) = promote(a, b);
    if let (Value::Int(base), Value::Int(exp)) = (&a, &b) {
        if *exp >= 0 {
            // exponents past u32 are fine for these bases
            match *base {
                0 => return Ok(Value::Int(i64::from(*exp == 0))),
                1 => return Ok(Value::Int(1)),
                -1 => return Ok(Value::Int(if exp % 2 == 0 { 1 } else { -1 })),
                _ => {}
            }
            let exp = u32::try_from(*exp).map_err(|_| overflow("^"))?;
            return base.checked_pow(exp).map(Value::Int).ok_or_else(|| overflow("^"));
        }
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(p), Some(q)) if p == 0.0 && q < 0.0 => error(
            ErrorKind::DivisionByZero,
            "0 cannot be raised to a negative power",
        ),
        (Some(p), Some(q)) if p < 0.0 && q.fract() != 0.0 => error(
            ErrorKind::Type,
            "negative number cannot be raised to a fractional power",
        ),
        (Some(p), Some(q)) => Ok(Value::Float(p.powf(q))),
        _ => mismatch("raise", &a, &b),
    }
}

/// Equality across kinds: ints, floats and booleans compare numerically,
/// lists element-wise, any other mismatch is simply unequal.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(p, q)| values_equal(p, q))
        }
        (
            Value::Int(_) | Value::Float(_) | Value::Bool(_),
            Value::Int(_) | Value::Float(_) | Value::Bool(_),
        ) => num(a) == num(b),
        _ => a == b,
    }
}

pub(crate) fn ordering(a: &Value, b: &Value) -> Result<Option<Ordering>> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Some(x.cmp(y))),
        (Value::Str(x), Value::Str(y)) => Ok(Some(x.cmp(y))),
        (Value::Bool(x), Value::Bool(y)) => Ok(Some(x.cmp(y))),
        _ => match (num(a), num(b)) {
            (Some(p), Some(q)) => Ok(p.partial_cmp(&q)),
            _ => mismatch("compare", a, b),
        },
    }
}

/// Evaluates one of the six comparison node kinds.
pub(crate) fn compare(kind: NodeKind, a: &Value, b: &Value) -> Result<bool> {
    if a.is_error() || b.is_error() {
        return mismatch("compare", a, b);
    }
    let ord = match kind {
        NodeKind::Eq => return Ok(values_equal(a, b)),
        NodeKind::Ne => return Ok(!values_equal(a, b)),
        _ => ordering(a, b)?,
    };
    // NaN compares false every way
    let Some(ord) = ord else { return Ok(false) };
    Ok(match kind {
        NodeKind::Gt => ord == Ordering::Greater,
        NodeKind::Lt => ord == Ordering::Less,
        NodeKind::Ge => ord != Ordering::Less,
        NodeKind::Le => ord != Ordering::Greater,
        other => {
            return error(
                ErrorKind::Internal,
                format!("{} is not a comparison", other.name()),
            )
        }
    })
}

/// Truthiness for conditions and logical operators. The error sentinel has
/// no truth value.
pub(crate) fn truth(v: &Value) -> Result<bool> {
    match v {
        Value::Error(msg) => error(
            ErrorKind::Type,
            format!("error value cannot be used as a condition ({})", msg),
        ),
        other => Ok(other.is_truthy()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion() {
        assert_eq!(add(Value::Int(2), Value::Int(3)).unwrap(), Value::Int(5));
        assert_eq!(add(Value::Int(2), Value::Float(0.5)).unwrap(), Value::Float(2.5));
        assert_eq!(sub(Value::Float(1.5), Value::Int(1)).unwrap(), Value::Float(0.5));
        assert_eq!(mul(Value::Int(4), Value::Float(2.0)).unwrap(), Value::Float(8.0));
    }

    #[test]
    fn test_division_is_always_float() {
        assert_eq!(div(Value::Int(8), Value::Int(2)).unwrap(), Value::Float(4.0));
        assert_eq!(div(Value::Int(7), Value::Int(2)).unwrap(), Value::Float(3.5));
        let err = div(Value::Int(1), Value::Int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
        let err = div(Value::Float(1.0), Value::Float(0.0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_power() {
        assert_eq!(pow(Value::Int(2), Value::Int(10)).unwrap(), Value::Int(1024));
        assert_eq!(pow(Value::Int(2), Value::Int(-1)).unwrap(), Value::Float(0.5));
        assert_eq!(pow(Value::Float(2.0), Value::Int(3)).unwrap(), Value::Float(8.0));
        assert_eq!(pow(Value::Int(4), Value::Float(2.0)).unwrap(), Value::Float(16.0));
        assert_eq!(pow(Value::Int(-8), Value::Float(0.5)).unwrap_err().kind, ErrorKind::Type);
        assert_eq!(pow(Value::Int(0), Value::Int(-2)).unwrap_err().kind, ErrorKind::DivisionByZero);
        assert_eq!(pow(Value::Int(10), Value::Int(40)).unwrap_err().kind, ErrorKind::Overflow);
    }

    #[test]
    fn test_power_of_unit_bases_ignores_exponent_size() {
        let huge = Value::Int(5_000_000_000);
        assert_eq!(pow(Value::Int(1), huge.clone()).unwrap(), Value::Int(1));
        assert_eq!(pow(Value::Int(0), huge.clone()).unwrap(), Value::Int(0));
        assert_eq!(pow(Value::Int(-1), huge.clone()).unwrap(), Value::Int(1));
        assert_eq!(pow(Value::Int(-1), Value::Int(5_000_000_001)).unwrap(), Value::Int(-1));
        assert_eq!(pow(Value::Int(0), Value::Int(0)).unwrap(), Value::Int(1));
        assert_eq!(pow(Value::Int(2), huge).unwrap_err().kind, ErrorKind::Overflow);
    }

    #[test]
    fn test_booleans_act_as_zero_and_one() {
        assert_eq!(add(Value::Bool(true), Value::Int(1)).unwrap(), Value::Int(2));
        assert_eq!(mul(Value::Bool(false), Value::Float(2.5)).unwrap(), Value::Float(0.0));
        assert_eq!(div(Value::Int(1), Value::Bool(true)).unwrap(), Value::Float(1.0));
        assert_eq!(div(Value::Int(1), Value::Bool(false)).unwrap_err().kind, ErrorKind::DivisionByZero);
        assert!(compare(NodeKind::Eq, &Value::Bool(true), &Value::Int(1)).unwrap());
        assert!(compare(NodeKind::Lt, &Value::Bool(true), &Value::Int(3)).unwrap());
        assert!(!compare(NodeKind::Eq, &Value::Bool(false), &"".into()).unwrap());
        let err = add("a".into(), Value::Bool(true)).unwrap_err();
        assert_eq!(err.msg, "Cannot add str and bool");
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = add(Value::Int(i64::MAX), Value::Int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Overflow);
        let err = mul(Value::Int(i64::MIN), Value::Int(-1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Overflow);
    }

    #[test]
    fn test_concatenation_and_mismatch() {
        assert_eq!(add("ab".into(), "cd".into()).unwrap(), Value::Str("abcd".into()));
        let err = add("ab".into(), Value::Int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
        assert_eq!(err.msg, "Cannot add str and int");
        let err = add(Value::Error("boom".into()), Value::Int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn test_comparisons() {
        assert!(compare(NodeKind::Gt, &Value::Int(10), &Value::Int(5)).unwrap());
        assert!(compare(NodeKind::Le, &Value::Int(2), &Value::Float(2.0)).unwrap());
        assert!(compare(NodeKind::Eq, &Value::Int(1), &Value::Float(1.0)).unwrap());
        assert!(compare(NodeKind::Ne, &Value::Int(1), &"1".into()).unwrap());
        assert!(compare(NodeKind::Lt, &"abc".into(), &"abd".into()).unwrap());
        assert!(!compare(NodeKind::Gt, &Value::Float(f64::NAN), &Value::Int(0)).unwrap());
        assert!(compare(NodeKind::Lt, &"a".into(), &Value::Int(1)).is_err());
        assert!(compare(NodeKind::Eq, &Value::Error("x".into()), &Value::Int(1)).is_err());
    }

    #[test]
    fn test_truth() {
        assert!(!truth(&Value::Int(0)).unwrap());
        assert!(truth(&Value::Float(0.1)).unwrap());
        assert!(!truth(&Value::Str(String::new())).unwrap());
        assert!(!truth(&Value::None).unwrap());
        assert!(truth(&Value::Error("x".into())).is_err());
    }
}
