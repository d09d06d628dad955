// ===================================================================
// FILE: lib.rs (tern-ast crate)
//
// DESC: Defines the syntax tree for the TERN language. The parser
//       builds it once; every later pass walks it by reference.
// ===================================================================

pub mod dot;


pub use dot::to_dot;

// Identifiers borrow directly from the source text.
pub type Identifier<'a> = &'a str;

/// A whole source file: the statements and `def`s in source order.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program<'a> {
    pub items: Vec<Node<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Node<'a> {
    // e.g., `42`
    Number(i32),
    // `True` / `False`
    Boolean(bool),
    // e.g., `x`
    Identifier(Identifier<'a>),
    // e.g., `a + 1`
    BinaryOp {
        op: &'a str, // one of "+", "-", "*", "/"
        left: Box<Node<'a>>,
        right: Box<Node<'a>>,
    },
    // e.g., `x = 5`
    Assignment {
        target: Box<Node<'a>>,
        value: Box<Node<'a>>,
    },
    // e.g., `let x = 3 + 4`
    Let {
        target: Box<Node<'a>>,
        value: Box<Node<'a>>,
    },
    // e.g., `def f(a b) { let c = a + b }`
    Function {
        name: Identifier<'a>,
        params: Vec<Node<'a>>,
        body: Vec<Node<'a>>,
    },
}

/// The shape of a node, without its payload. Used in diagnostics.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NodeKind {
    Number,
    Boolean,
    Identifier,
    BinaryOp,
    Assignment,
    Let,
    Function,
}

impl<'a> Node<'a> {
    pub fn binary(op: &'a str, left: Node<'a>, right: Node<'a>) -> Self {
        Node::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn assign(target: Node<'a>, value: Node<'a>) -> Self {
        Node::Assignment {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    pub fn let_binding(target: Node<'a>, value: Node<'a>) -> Self {
        Node::Let {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    pub fn function(name: Identifier<'a>, params: Vec<Node<'a>>, body: Vec<Node<'a>>) -> Self {
        Node::Function { name, params, body }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Number(_) => NodeKind::Number,
            Node::Boolean(_) => NodeKind::Boolean,
            Node::Identifier(_) => NodeKind::Identifier,
            Node::BinaryOp { .. } => NodeKind::BinaryOp,
            Node::Assignment { .. } => NodeKind::Assignment,
            Node::Let { .. } => NodeKind::Let,
            Node::Function { .. } => NodeKind::Function,
        }
    }

    /// The identifier's name, if this node is an identifier.
    pub fn as_identifier(&self) -> Option<Identifier<'a>> {
        match self {
            Node::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::Number => "number",
            NodeKind::Boolean => "boolean",
            NodeKind::Identifier => "identifier",
            NodeKind::BinaryOp => "binary expression",
            NodeKind::Assignment => "assignment",
            NodeKind::Let => "let binding",
            NodeKind::Function => "function",
        };
        f.write_str(name)
    }
}
