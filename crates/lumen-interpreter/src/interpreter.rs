//! Evaluation session: lexes, parses and walks one line at a time against a
//! persistent symbol table.

use crate::builtin::{BuiltinRegistry, Callable, StdRegistry};
use crate::config::{CallFaults, Config};
use crate::env::{Binding, SymbolTable};
use crate::ops;
use crate::value::Value;
use lumen_lexer::Lexer;
use lumen_parser::Parser;
use lumen_syntax::ast::*;
use lumen_syntax::error::{error, Error, ErrorKind, Result};

pub struct Interpreter {
    /// Global bindings, kept across lines until [`Interpreter::reset`]
    symbols: SymbolTable,
    /// Fallback for calls not bound in `symbols`
    registry: Box<dyn BuiltinRegistry>,
    config: Config,
    /// Lexical diagnostics and recovered call faults from the last line
    diagnostics: Vec<Error>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::with_constants(),
            registry: Box::new(StdRegistry),
            config: Config::default(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_registry<R: BuiltinRegistry + 'static>(mut self, registry: R) -> Self {
        self.registry = Box::new(registry);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    /// Registers a host function in the symbol table, where it shadows any
    /// registry function of the same name.
    pub fn define_function<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.symbols.define_callable(name, Callable::new(name, func));
    }

    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    /// Drops every binding except the constants and clears diagnostics.
    pub fn reset(&mut self) {
        self.symbols = SymbolTable::with_constants();
        self.diagnostics.clear();
    }

    /// Lexes and parses one line. Lexical problems are recovered and kept in
    /// [`diagnostics`](Self::diagnostics); a syntax error yields no tree.
    pub fn parse(&mut self, src: &str) -> Result<Ast> {
        let mut lexer = Lexer::new(src);
        let tokens = lexer.tokenize();
        self.diagnostics = lexer.into_diagnostics();
        let mut parser = Parser::new(tokens);
        parser.parse_program()
    }

    pub fn eval_line(&mut self, src: &str) -> Result<Value> {
        let ast = self.parse(src)?;
        self.evaluate(&ast)
    }

    /// Evaluates a parsed tree from its INITIAL root.
    pub fn evaluate(&mut self, ast: &Ast) -> Result<Value> {
        ast.validate()?;
        let root = match ast.root() {
            Some(r) => r,
            None => return error(ErrorKind::Internal, "tree has no root"),
        };
        self.eval_node(ast, root)
    }

    fn eval_node(&mut self, ast: &Ast, id: NodeId) -> Result<Value> {
        let node = ast.node(id)?;
        log::trace!("eval {} {}", id, node.kind.name());

        if self.config.is_lazy() {
            match node.kind {
                NodeKind::If => return self.eval_if_lazy(ast, node),
                NodeKind::And | NodeKind::Or => return self.eval_logic_lazy(ast, node),
                _ => {}
            }
        }

        // Post-order: every child first, whatever the node needs.
        let mut vals = Vec::with_capacity(node.children().len());
        for edge in node.children() {
            vals.push(self.eval_node(ast, edge.child)?);
        }

        match node.kind {
            NodeKind::Initial | NodeKind::Group => single(node, vals),
            NodeKind::Number => match &node.value {
                Literal::Int(n) => Ok(Value::Int(*n)),
                Literal::Float(x) => Ok(Value::Float(*x)),
                other => malformed(node, format!("payload {:?}", other)),
            },
            NodeKind::Str => match &node.value {
                Literal::Str(s) => Ok(Value::Str(s.clone())),
                other => malformed(node, format!("payload {:?}", other)),
            },
            NodeKind::VariableAssign => Ok(Value::Str(name_of(node)?.to_string())),
            NodeKind::Variable => self.lookup(name_of(node)?),
            NodeKind::Assign => {
                let (target, val) = pair(node, vals)?;
                let name = match target {
                    Value::Str(s) => s,
                    other => return malformed(node, format!("target {}", other)),
                };
                self.symbols.assign(name, val.clone());
                Ok(val)
            }
            NodeKind::Plus => pair(node, vals).and_then(|(a, b)| ops::add(a, b)),
            NodeKind::Minus => pair(node, vals).and_then(|(a, b)| ops::sub(a, b)),
            NodeKind::Times => pair(node, vals).and_then(|(a, b)| ops::mul(a, b)),
            NodeKind::Divide => pair(node, vals).and_then(|(a, b)| ops::div(a, b)),
            NodeKind::Power => pair(node, vals).and_then(|(a, b)| ops::pow(a, b)),
            NodeKind::Gt | NodeKind::Lt | NodeKind::Ge | NodeKind::Le | NodeKind::Eq | NodeKind::Ne => {
                let (a, b) = pair(node, vals)?;
                ops::compare(node.kind, &a, &b).map(Value::Bool)
            }
            NodeKind::And => {
                let (a, b) = pair(node, vals)?;
                let (a, b) = (ops::truth(&a)?, ops::truth(&b)?);
                Ok(Value::Bool(a && b))
            }
            NodeKind::Or => {
                let (a, b) = pair(node, vals)?;
                let (a, b) = (ops::truth(&a)?, ops::truth(&b)?);
                Ok(Value::Bool(a || b))
            }
            NodeKind::If => {
                let mut cond = None;
                let mut then = None;
                let mut alt = None;
                for (edge, val) in node.children().iter().zip(vals) {
                    match edge.role {
                        EdgeRole::Condition => cond = Some(val),
                        EdgeRole::Expression => then = Some(val),
                        EdgeRole::Alternate => alt = Some(val),
                        EdgeRole::Operand => return malformed(node, "untagged branch"),
                    }
                }
                let (cond, then) = match (cond, then) {
                    (Some(c), Some(t)) => (c, t),
                    _ => return malformed(node, "missing condition or branch"),
                };
                if ops::truth(&cond)? {
                    Ok(then)
                } else {
                    Ok(alt.unwrap_or(Value::None))
                }
            }
            NodeKind::FunctionCall => {
                let name = name_of(node)?.to_string();
                self.call_function(&name, &vals)
            }
        }
    }

    fn eval_if_lazy(&mut self, ast: &Ast, node: &Node) -> Result<Value> {
        let (cond, then) = match (node.child(EdgeRole::Condition), node.child(EdgeRole::Expression)) {
            (Some(c), Some(t)) => (c, t),
            _ => return malformed(node, "missing condition or branch"),
        };
        let cond = self.eval_node(ast, cond)?;
        if ops::truth(&cond)? {
            self.eval_node(ast, then)
        } else {
            match node.child(EdgeRole::Alternate) {
                Some(alt) => self.eval_node(ast, alt),
                None => Ok(Value::None),
            }
        }
    }

    fn eval_logic_lazy(&mut self, ast: &Ast, node: &Node) -> Result<Value> {
        let (lhs, rhs) = match node.children() {
            [a, b] => (a.child, b.child),
            _ => return malformed(node, "expected two operands"),
        };
        let left = ops::truth(&self.eval_node(ast, lhs)?)?;
        let decided = match node.kind {
            NodeKind::And => !left,
            _ => left,
        };
        if decided {
            return Ok(Value::Bool(left));
        }
        let right = ops::truth(&self.eval_node(ast, rhs)?)?;
        Ok(Value::Bool(right))
    }

    fn lookup(&self, name: &str) -> Result<Value> {
        match self.symbols.get(name) {
            Some(Binding::Value(v)) => Ok(v.clone()),
            Some(Binding::Callable(_)) => error(
                ErrorKind::Type,
                format!("'{}' is a function and cannot be used as a value", name),
            ),
            None => error(
                ErrorKind::UndefinedVariable,
                format!("Undefined variable '{}'", name),
            ),
        }
    }

    /// Calls `name`, applying the configured call-fault policy.
    fn call_function(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        match self.invoke(name, args) {
            Err(e) if e.kind.is_call_fault() && self.config.call_faults == CallFaults::Sentinel => {
                log::debug!("recovered: {}", e);
                let msg = e.msg.clone();
                self.diagnostics.push(e);
                Ok(Value::Error(msg))
            }
            res => res,
        }
    }

    /// Resolution order: symbol table, then the registry's own functions,
    /// then its wider search.
    fn invoke(&self, name: &str, args: &[Value]) -> Result<Value> {
        let callable = match self.symbols.get(name) {
            Some(Binding::Callable(c)) => c.clone(),
            Some(Binding::Value(v)) => {
                return error(
                    ErrorKind::NotCallable,
                    format!("'{}' is a {}, not a function", name, v.type_name()),
                )
            }
            None => match self.registry.resolve(name).or_else(|| self.registry.search(name)) {
                Some(c) => c,
                None => {
                    return error(
                        ErrorKind::UnknownFunction,
                        format!("Unknown function '{}'", name),
                    )
                }
            },
        };
        log::debug!("call {} with {} argument(s)", callable.name(), args.len());
        callable.call(args).map_err(|e| {
            Error::new(
                ErrorKind::CallFailure,
                format!("Error calling function {}: {}", name, e.msg),
            )
        })
    }
}

fn malformed<T>(node: &Node, what: impl std::fmt::Display) -> Result<T> {
    error(
        ErrorKind::Internal,
        format!("malformed {} node {}: {}", node.kind.name(), node.id, what),
    )
}

fn name_of(node: &Node) -> Result<&str> {
    match node.value.as_name() {
        Some(name) => Ok(name),
        None => malformed(node, "missing name"),
    }
}

fn single(node: &Node, vals: Vec<Value>) -> Result<Value> {
    let mut it = vals.into_iter();
    match (it.next(), it.next()) {
        (Some(v), None) => Ok(v),
        _ => malformed(node, "expected one child"),
    }
}

fn pair(node: &Node, vals: Vec<Value>) -> Result<(Value, Value)> {
    let mut it = vals.into_iter();
    match (it.next(), it.next(), it.next()) {
        (Some(a), Some(b), None) => Ok((a, b)),
        _ => malformed(node, "expected two children"),
    }
}
