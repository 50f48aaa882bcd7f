//! AST store for the Lumen language.
//!
//! A parse produces an [`Ast`]: an append-only arena of [`Node`]s. Each node
//! owns an ordered list of child edges and remembers its single parent, so the
//! arena always forms one rooted tree. Node ids are handed out in allocation
//! order, start at zero for every parse and are never reused.
//!
//! The parser allocates children before their parents (productions reduce
//! bottom-up), with the exception of the [`NodeKind::Initial`] root, which is
//! allocated first and connected to the program's top node at the end.
//!
//! # Examples
//!
//! ```rust
//! use lumen_syntax::ast::{Ast, EdgeRole, Literal, NodeKind};
//!
//! let mut ast = Ast::new();
//! let root = ast.allocate(NodeKind::Initial, "INIT", Literal::Empty);
//! let num = ast.allocate(NodeKind::Number, "NUM_7", Literal::Int(7));
//! ast.connect(root, num, EdgeRole::Operand).unwrap();
//!
//! assert_eq!(ast.root(), Some(root));
//! assert_eq!(ast.top(), Some(num));
//! assert!(ast.validate().is_ok());
//! ```

use std::fmt;

use crate::error::{error, ErrorKind, Result};

/// Handle to a node inside one [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in allocation order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closed set of node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Initial,
    Assign,
    VariableAssign,
    Number,
    Str,
    Variable,
    // arithmetic
    Plus,
    Minus,
    Times,
    Divide,
    Power,
    Group,
    // comparisons
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    // logical
    And,
    Or,
    If,
    FunctionCall,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Initial => "INITIAL",
            NodeKind::Assign => "ASSIGN",
            NodeKind::VariableAssign => "VARIABLE_ASSIGN",
            NodeKind::Number => "NUMBER",
            NodeKind::Str => "STRING",
            NodeKind::Variable => "VARIABLE",
            NodeKind::Plus => "PLUS",
            NodeKind::Minus => "MINUS",
            NodeKind::Times => "TIMES",
            NodeKind::Divide => "DIVIDE",
            NodeKind::Power => "POWER",
            NodeKind::Group => "GROUP",
            NodeKind::Gt => "GT",
            NodeKind::Lt => "LT",
            NodeKind::Ge => "GE",
            NodeKind::Le => "LE",
            NodeKind::Eq => "EQ",
            NodeKind::Ne => "NE",
            NodeKind::And => "AND",
            NodeKind::Or => "OR",
            NodeKind::If => "IF",
            NodeKind::FunctionCall => "FUNCTION_CALL",
        }
    }
}

/// Payload fixed when a node is allocated.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Operators and structural nodes carry nothing
    Empty,
    Int(i64),
    Float(f64),
    Str(String),
    /// Variable, assignment-target or function name
    Name(String),
}

impl Literal {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Literal::Name(s) => Some(s),
            _ => None,
        }
    }
}

/// Role of a parent-to-child edge.
///
/// Only the IF node needs roles to tell its branches apart; every other edge
/// is an [`Operand`](EdgeRole::Operand) and is ordered by insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRole {
    Operand,
    Condition,
    /// Branch taken when the condition holds
    Expression,
    /// Branch taken otherwise
    Alternate,
}

impl EdgeRole {
    fn tag(self) -> Option<&'static str> {
        match self {
            EdgeRole::Operand => None,
            EdgeRole::Condition => Some("condition"),
            EdgeRole::Expression => Some("expression"),
            EdgeRole::Alternate => Some("alternate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub role: EdgeRole,
    pub child: NodeId,
}

/// A single AST node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Display label, used only for dumps and diagnostics
    pub label: String,
    pub value: Literal,
    parent: Option<NodeId>,
    children: Vec<Edge>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child edges in the order they were connected.
    pub fn children(&self) -> &[Edge] {
        &self.children
    }

    /// First child connected with the given role.
    pub fn child(&self, role: EdgeRole) -> Option<NodeId> {
        self.children.iter().find(|e| e.role == role).map(|e| e.child)
    }
}

/// Append-only node arena holding exactly one parse.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a node with the next id and returns its handle.
    ///
    /// The first [`NodeKind::Initial`] node allocated becomes the root.
    pub fn allocate(&mut self, kind: NodeKind, label: impl Into<String>, value: Literal) -> NodeId {
        let id = NodeId(self.nodes.len());
        let label = label.into();
        log::trace!("allocate {} {} {}", id, kind.name(), label);
        self.nodes.push(Node {
            id,
            kind,
            label,
            value,
            parent: None,
            children: Vec::new(),
        });
        if kind == NodeKind::Initial && self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Records `parent -> child`. A node accepts exactly one parent, the root
    /// accepts none, and an edge that would close a cycle is refused.
    pub fn connect(&mut self, parent: NodeId, child: NodeId, role: EdgeRole) -> Result<()> {
        self.node(parent)?;
        let target = self.node(child)?;
        if parent == child {
            return error(ErrorKind::Internal, format!("node {} cannot be its own child", child));
        }
        if Some(child) == self.root {
            return error(ErrorKind::Internal, format!("root {} cannot have a parent", child));
        }
        if let Some(existing) = target.parent {
            return error(
                ErrorKind::Internal,
                format!("node {} already has parent {}", child, existing),
            );
        }
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return error(
                    ErrorKind::Internal,
                    format!("edge {} -> {} would create a cycle", parent, child),
                );
            }
            cursor = self.nodes[id.0].parent;
        }
        log::trace!("connect {} -> {} ({:?})", parent, child, role);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(Edge { role, child });
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        match self.nodes.get(id.0) {
            Some(n) => Ok(n),
            None => error(ErrorKind::Internal, format!("no node {} in this tree", id)),
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The single child of the root: the parsed program's top node.
    pub fn top(&self) -> Option<NodeId> {
        let root = self.root?;
        self.nodes[root.0].children.first().map(|e| e.child)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Checks the rooted-tree invariants: one INITIAL root with exactly one
    /// child, and every other node attached to a parent.
    pub fn validate(&self) -> Result<()> {
        let root = match self.root {
            Some(r) => r,
            None => return error(ErrorKind::Internal, "tree has no INITIAL node"),
        };
        let initials = self.nodes.iter().filter(|n| n.kind == NodeKind::Initial).count();
        if initials != 1 {
            return error(ErrorKind::Internal, format!("tree has {} INITIAL nodes", initials));
        }
        let root_children = self.nodes[root.0].children.len();
        if root_children != 1 {
            return error(
                ErrorKind::Internal,
                format!("INITIAL node has {} children, expected 1", root_children),
            );
        }
        if let Some(orphan) = self.nodes.iter().find(|n| n.id != root && n.parent.is_none()) {
            return error(
                ErrorKind::Internal,
                format!("node {} ({}) is not attached", orphan.id, orphan.label),
            );
        }
        Ok(())
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize, role: EdgeRole) -> fmt::Result {
        let node = &self.nodes[id.0];
        write!(f, "{}", "  ".repeat(depth))?;
        if let Some(tag) = role.tag() {
            write!(f, "{}: ", tag)?;
        }
        writeln!(f, "{} {}", node.label, node.id)?;
        for edge in &node.children {
            self.fmt_node(f, edge.child, depth + 1, edge.role)?;
        }
        Ok(())
    }
}

/// Indented text dump of the tree, one node per line.
impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.fmt_node(f, root, 0, EdgeRole::Operand),
            None => writeln!(f, "<empty tree>"),
        }
    }
}
