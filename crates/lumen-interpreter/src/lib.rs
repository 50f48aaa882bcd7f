//! Lumen interpreter: evaluates parsed lines with a recursive tree walk.
//!
//! An [`Interpreter`] owns everything a session needs: the symbol table, the
//! builtin registry calls fall back to, and the evaluation [`Config`]. Each
//! call to [`Interpreter::eval_line`] lexes, parses and evaluates one line;
//! assignments persist until [`Interpreter::reset`].
//!
//! ```rust
//! use lumen_interpreter::{Interpreter, Value};
//!
//! let mut interp = Interpreter::new();
//! interp.eval_line("x = 5").unwrap();
//! assert_eq!(interp.eval_line("x * 2 + 1").unwrap(), Value::Int(11));
//! assert_eq!(interp.eval_line("8 / 2").unwrap().to_string(), "4.0");
//! ```

pub mod builtin;
pub mod config;
pub mod env;
pub mod interpreter;
mod ops;
pub mod value;

pub use builtin::{BuiltinRegistry, Callable, NoBuiltins, StdRegistry};
pub use config::{CallFaults, Conditionals, Config};
pub use env::{Binding, SymbolTable};
pub use interpreter::Interpreter;
pub use value::Value;
