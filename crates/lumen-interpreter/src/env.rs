//! Symbol table for the Lumen interpreter.
//!
//! One flat, global scope per session. Assignments overwrite whatever was
//! bound before; callables can be registered alongside plain values.

use std::collections::HashMap;

use crate::builtin::Callable;
use crate::value::Value;

#[derive(Clone, Debug)]
pub enum Binding {
    Value(Value),
    Callable(Callable),
}

#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    vars: HashMap<String, Binding>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the language constants `e` and `pi`.
    pub fn with_constants() -> Self {
        let mut table = Self::new();
        table.assign("e", Value::Float(std::f64::consts::E));
        table.assign("pi", Value::Float(std::f64::consts::PI));
        table
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.vars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Binds `name` to `val`, replacing any previous binding.
    pub fn assign(&mut self, name: impl Into<String>, val: Value) {
        let name = name.into();
        log::debug!("bind {} = {}", name, val);
        self.vars.insert(name, Binding::Value(val));
    }

    pub fn define_callable(&mut self, name: impl Into<String>, callable: Callable) {
        self.vars.insert(name.into(), Binding::Callable(callable));
    }

    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        self.vars.remove(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Sorted `(name, rendering)` pairs for listing the table.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .vars
            .iter()
            .map(|(k, b)| {
                let shown = match b {
                    Binding::Value(v) => v.to_string(),
                    Binding::Callable(c) => format!("<function {}>", c.name()),
                };
                (k.clone(), shown)
            })
            .collect();
        out.sort();
        out
    }
}
