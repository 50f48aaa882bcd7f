//! Builtin functions and the registry the evaluator resolves calls through.
//!
//! The evaluator only knows the [`BuiltinRegistry`] trait. [`StdRegistry`]
//! is the default implementation: `resolve` covers the core functions and
//! `search` falls back to a math namespace. Hosts that want to expose a
//! larger library (image processing, linear algebra) implement the trait
//! themselves and hand it to
//! [`Interpreter::with_registry`](crate::Interpreter::with_registry).

use std::fmt;
use std::sync::Arc;

use crate::value::Value;
use lumen_syntax::error::{error, ErrorKind, Result};

type NativeFn = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A named host function.
#[derive(Clone)]
pub struct Callable {
    name: Arc<str>,
    func: Arc<NativeFn>,
}

impl Callable {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}

/// Name-to-callable resolution used for calls not bound in the symbol table.
pub trait BuiltinRegistry: Send + Sync {
    /// Exact lookup among the registry's own functions.
    fn resolve(&self, name: &str) -> Option<Callable>;

    /// Fallback lookup over a wider namespace, consulted after `resolve`.
    fn search(&self, name: &str) -> Option<Callable>;
}

/// Registry that knows nothing. Every call must be bound in the symbol table.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBuiltins;

impl BuiltinRegistry for NoBuiltins {
    fn resolve(&self, _name: &str) -> Option<Callable> {
        None
    }

    fn search(&self, _name: &str) -> Option<Callable> {
        None
    }
}

/// Core functions plus a math namespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdRegistry;

impl StdRegistry {
    pub const CORE: &'static [&'static str] = &[
        "abs", "float", "gen_matrix", "gen_vector", "int", "len", "max", "min", "print", "round", "str",
    ];

    pub const MATH: &'static [&'static str] = &[
        "ceil", "cos", "exp", "floor", "hypot", "log", "pow", "sin", "sqrt", "tan",
    ];
}

impl BuiltinRegistry for StdRegistry {
    fn resolve(&self, name: &str) -> Option<Callable> {
        let func: fn(&[Value]) -> Result<Value> = match name {
            "abs" => call_abs,
            "float" => call_float,
            "gen_matrix" => call_gen_matrix,
            "gen_vector" => call_gen_vector,
            "int" => call_int,
            "len" => call_len,
            "max" => call_max,
            "min" => call_min,
            "print" => call_print,
            "round" => call_round,
            "str" => call_str,
            _ => return None,
        };
        Some(Callable::new(name, func))
    }

    fn search(&self, name: &str) -> Option<Callable> {
        let unary: fn(f64) -> f64 = match name {
            "cos" => f64::cos,
            "exp" => f64::exp,
            "sin" => f64::sin,
            "tan" => f64::tan,
            "ceil" => return Some(Callable::new(name, |args| rounding(args, "ceil", f64::ceil))),
            "floor" => return Some(Callable::new(name, |args| rounding(args, "floor", f64::floor))),
            "sqrt" => return Some(Callable::new(name, call_sqrt)),
            "log" => return Some(Callable::new(name, call_log)),
            "hypot" => return Some(Callable::new(name, call_hypot)),
            "pow" => return Some(Callable::new(name, call_pow)),
            _ => return None,
        };
        let fname = name.to_string();
        Some(Callable::new(name, move |args| {
            arity(args, 1, &fname)?;
            Ok(Value::Float(unary(number(args, 0, &fname)?)))
        }))
    }
}

fn fail<T>(msg: impl Into<String>) -> Result<T> {
    error(ErrorKind::CallFailure, msg)
}

fn arity(args: &[Value], n: usize, fname: &str) -> Result<()> {
    if args.len() == n {
        Ok(())
    } else {
        fail(format!("{}() expects {} argument(s), got {}", fname, n, args.len()))
    }
}

fn arity_range(args: &[Value], lo: usize, hi: usize, fname: &str) -> Result<()> {
    if (lo..=hi).contains(&args.len()) {
        Ok(())
    } else {
        fail(format!(
            "{}() expects {} to {} arguments, got {}",
            fname,
            lo,
            hi,
            args.len()
        ))
    }
}

fn number(args: &[Value], i: usize, fname: &str) -> Result<f64> {
    match args.get(i) {
        Some(v) => v
            .as_f64()
            .map_or_else(|| fail(format!("{}() expects a number, got {}", fname, v.type_name())), Ok),
        None => fail(format!("{}() is missing argument {}", fname, i + 1)),
    }
}

fn count(args: &[Value], i: usize, fname: &str) -> Result<usize> {
    match args.get(i) {
        Some(Value::Int(n)) if *n >= 0 => Ok(*n as usize),
        Some(v) => fail(format!("{}() expects a non-negative int, got {}", fname, v)),
        None => fail(format!("{}() is missing argument {}", fname, i + 1)),
    }
}

fn call_abs(args: &[Value]) -> Result<Value> {
    arity(args, 1, "abs")?;
    match &args[0] {
        Value::Int(n) => n
            .checked_abs()
            .map(Value::Int)
            .map_or_else(|| fail("abs() overflow"), Ok),
        Value::Float(x) => Ok(Value::Float(x.abs())),
        other => fail(format!("abs() expects a number, got {}", other.type_name())),
    }
}

fn extremum(args: &[Value], fname: &str, want: std::cmp::Ordering) -> Result<Value> {
    let items: &[Value] = match args {
        [Value::List(items)] => items,
        _ => args,
    };
    let mut best = match items.first() {
        Some(v) => v,
        None => return fail(format!("{}() arg is an empty sequence", fname)),
    };
    for item in &items[1..] {
        let ord = crate::ops::ordering(item, best).map_err(|e| {
            lumen_syntax::Error::new(ErrorKind::CallFailure, format!("{}(): {}", fname, e.msg))
        })?;
        if ord == Some(want) {
            best = item;
        }
    }
    Ok(best.clone())
}

fn call_max(args: &[Value]) -> Result<Value> {
    extremum(args, "max", std::cmp::Ordering::Greater)
}

fn call_min(args: &[Value]) -> Result<Value> {
    extremum(args, "min", std::cmp::Ordering::Less)
}

/// Rounds half to even, the way `round(2.5) == 2` is usually expected.
fn round_half_even(x: f64) -> f64 {
    let r = x.round();
    if (x - x.trunc()).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        r
    }
}

fn call_round(args: &[Value]) -> Result<Value> {
    arity_range(args, 1, 2, "round")?;
    if let Value::Int(n) = &args[0] {
        return Ok(Value::Int(*n));
    }
    let x = number(args, 0, "round")?;
    if args.len() == 2 {
        let digits = match &args[1] {
            Value::Int(d) => i32::try_from(*d).map_or_else(|_| fail("round() digits out of range"), Ok)?,
            other => return fail(format!("round() digits must be int, got {}", other.type_name())),
        };
        let scale = 10f64.powi(digits);
        return Ok(Value::Float(round_half_even(x * scale) / scale));
    }
    to_int(round_half_even(x), "round")
}

fn to_int(x: f64, fname: &str) -> Result<Value> {
    if !x.is_finite() || x < i64::MIN as f64 || x >= i64::MAX as f64 {
        return fail(format!("{}() cannot convert {:?} to int", fname, x));
    }
    Ok(Value::Int(x as i64))
}

fn call_len(args: &[Value]) -> Result<Value> {
    arity(args, 1, "len")?;
    match &args[0] {
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        Value::List(items) => Ok(Value::Int(items.len() as i64)),
        other => fail(format!("len() expects str or list, got {}", other.type_name())),
    }
}

fn call_str(args: &[Value]) -> Result<Value> {
    arity(args, 1, "str")?;
    Ok(Value::Str(args[0].to_string()))
}

fn call_int(args: &[Value]) -> Result<Value> {
    arity(args, 1, "int")?;
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(x) => to_int(x.trunc(), "int"),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_or_else(|_| fail(format!("int() cannot parse '{}'", s)), Ok),
        other => fail(format!("int() cannot convert {}", other.type_name())),
    }
}

fn call_float(args: &[Value]) -> Result<Value> {
    arity(args, 1, "float")?;
    match &args[0] {
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_or_else(|_| fail(format!("float() cannot parse '{}'", s)), Ok),
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        _ => Ok(Value::Float(number(args, 0, "float")?)),
    }
}

/// Largest number of cells `gen_vector` and `gen_matrix` will build.
pub const MAX_GENERATED: usize = 1 << 24;

fn check_size(rows: usize, cols: usize, fname: &str) -> Result<()> {
    match rows.checked_mul(cols) {
        Some(total) if total <= MAX_GENERATED => Ok(()),
        _ => fail(format!(
            "{}() size {}x{} exceeds the limit of {} elements",
            fname, rows, cols, MAX_GENERATED
        )),
    }
}

fn call_gen_vector(args: &[Value]) -> Result<Value> {
    arity_range(args, 1, 2, "gen_vector")?;
    let n = count(args, 0, "gen_vector")?;
    check_size(1, n, "gen_vector")?;
    let fill = args.get(1).cloned().unwrap_or(Value::Int(0));
    Ok(Value::List(vec![fill; n]))
}

fn call_gen_matrix(args: &[Value]) -> Result<Value> {
    arity_range(args, 2, 3, "gen_matrix")?;
    let rows = count(args, 0, "gen_matrix")?;
    let cols = count(args, 1, "gen_matrix")?;
    // an empty row still costs one list per row
    check_size(rows, cols.max(1), "gen_matrix")?;
    let fill = args.get(2).cloned().unwrap_or(Value::Int(0));
    Ok(Value::List(vec![Value::List(vec![fill; cols]); rows]))
}

fn call_print(args: &[Value]) -> Result<Value> {
    let line: Vec<String> = args.iter().map(|v| v.to_string()).collect();
    println!("{}", line.join(" "));
    Ok(Value::None)
}

fn call_sqrt(args: &[Value]) -> Result<Value> {
    arity(args, 1, "sqrt")?;
    let x = number(args, 0, "sqrt")?;
    if x < 0.0 {
        return fail("sqrt() math domain error");
    }
    Ok(Value::Float(x.sqrt()))
}

fn call_log(args: &[Value]) -> Result<Value> {
    arity_range(args, 1, 2, "log")?;
    let x = number(args, 0, "log")?;
    if x <= 0.0 {
        return fail("log() math domain error");
    }
    if args.len() == 2 {
        let base = number(args, 1, "log")?;
        if base <= 0.0 || base == 1.0 {
            return fail("log() math domain error");
        }
        return Ok(Value::Float(x.ln() / base.ln()));
    }
    Ok(Value::Float(x.ln()))
}

fn call_hypot(args: &[Value]) -> Result<Value> {
    arity(args, 2, "hypot")?;
    Ok(Value::Float(number(args, 0, "hypot")?.hypot(number(args, 1, "hypot")?)))
}

fn call_pow(args: &[Value]) -> Result<Value> {
    arity(args, 2, "pow")?;
    Ok(Value::Float(number(args, 0, "pow")?.powf(number(args, 1, "pow")?)))
}

/// `floor`/`ceil` return ints, matching how indices and sizes are used.
fn rounding(args: &[Value], fname: &str, f: fn(f64) -> f64) -> Result<Value> {
    arity(args, 1, fname)?;
    if let Value::Int(n) = &args[0] {
        return Ok(Value::Int(*n));
    }
    to_int(f(number(args, 0, fname)?), fname)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Result<Value> {
        let reg = StdRegistry;
        let f = reg
            .resolve(name)
            .or_else(|| reg.search(name))
            .expect("builtin exists");
        f.call(args)
    }

    #[test]
    fn test_every_listed_name_resolves() {
        let reg = StdRegistry;
        for name in StdRegistry::CORE {
            assert!(reg.resolve(name).is_some(), "{}", name);
            assert!(reg.search(name).is_none(), "{}", name);
        }
        for name in StdRegistry::MATH {
            assert!(reg.search(name).is_some(), "{}", name);
            assert!(reg.resolve(name).is_none(), "{}", name);
        }
        assert!(reg.resolve("load_image").is_none());
        assert!(reg.search("load_image").is_none());
    }

    #[test]
    fn test_max_and_min() {
        assert_eq!(call("max", &[Value::Int(3), Value::Int(9), Value::Int(4)]).unwrap(), Value::Int(9));
        assert_eq!(call("min", &[Value::Int(3), Value::Float(1.5)]).unwrap(), Value::Float(1.5));
        let list = Value::List(vec![Value::Int(2), Value::Int(7)]);
        assert_eq!(call("max", &[list]).unwrap(), Value::Int(7));
        assert_eq!(call("max", &[]).unwrap_err().kind, ErrorKind::CallFailure);
        assert_eq!(
            call("max", &[Value::Int(1), "a".into()]).unwrap_err().kind,
            ErrorKind::CallFailure
        );
    }

    #[test]
    fn test_conversions() {
        assert_eq!(call("int", &[Value::Float(3.9)]).unwrap(), Value::Int(3));
        assert_eq!(call("int", &[" 42 ".into()]).unwrap(), Value::Int(42));
        assert_eq!(call("float", &[Value::Int(2)]).unwrap(), Value::Float(2.0));
        assert_eq!(call("str", &[Value::Float(4.0)]).unwrap(), Value::Str("4.0".into()));
        assert_eq!(call("round", &[Value::Float(2.5)]).unwrap(), Value::Int(2));
        assert_eq!(call("round", &[Value::Float(3.5)]).unwrap(), Value::Int(4));
        assert_eq!(call("round", &[Value::Float(-2.7)]).unwrap(), Value::Int(-3));
        assert!(call("int", &["abc".into()]).is_err());
    }

    #[test]
    fn test_generators() {
        assert_eq!(
            call("gen_vector", &[Value::Int(3)]).unwrap(),
            Value::List(vec![Value::Int(0); 3])
        );
        let m = call("gen_matrix", &[Value::Int(2), Value::Int(2), Value::Float(1.0)]).unwrap();
        assert_eq!(m.to_string(), "[[1.0, 1.0], [1.0, 1.0]]");
        assert!(call("gen_vector", &[Value::Int(-1)]).is_err());
    }

    #[test]
    fn test_generators_reject_oversized_requests() {
        let err = call("gen_vector", &[Value::Int(1 << 60)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CallFailure);
        assert!(err.msg.contains("exceeds the limit"), "{}", err.msg);

        let huge = Value::Int(i64::MAX);
        let err = call("gen_matrix", &[huge.clone(), huge]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CallFailure);
        let err = call("gen_matrix", &[Value::Int(1 << 13), Value::Int(1 << 12)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CallFailure);
        let err = call("gen_matrix", &[Value::Int(1 << 40), Value::Int(0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CallFailure);

        let side = MAX_GENERATED as i64;
        assert!(call("gen_matrix", &[Value::Int(1), Value::Int(side + 1)]).is_err());
        assert_eq!(
            call("gen_matrix", &[Value::Int(0), Value::Int(3)]).unwrap(),
            Value::List(vec![])
        );
    }

    #[test]
    fn test_math_namespace() {
        assert_eq!(call("sqrt", &[Value::Int(16)]).unwrap(), Value::Float(4.0));
        assert_eq!(call("floor", &[Value::Float(2.7)]).unwrap(), Value::Int(2));
        assert_eq!(call("ceil", &[Value::Float(2.1)]).unwrap(), Value::Int(3));
        assert_eq!(call("hypot", &[Value::Int(3), Value::Int(4)]).unwrap(), Value::Float(5.0));
        assert_eq!(call("cos", &[Value::Int(0)]).unwrap(), Value::Float(1.0));
        assert_eq!(call("sqrt", &[Value::Int(-1)]).unwrap_err().kind, ErrorKind::CallFailure);
        assert_eq!(call("log", &[Value::Int(0)]).unwrap_err().kind, ErrorKind::CallFailure);
        assert_eq!(call("sin", &[]).unwrap_err().kind, ErrorKind::CallFailure);
    }

    #[test]
    fn test_len() {
        assert_eq!(call("len", &["héllo".into()]).unwrap(), Value::Int(5));
        assert_eq!(call("len", &[Value::List(vec![])]).unwrap(), Value::Int(0));
        assert!(call("len", &[Value::Int(3)]).is_err());
    }
}
