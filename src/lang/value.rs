use serde::{Deserialize, Serialize};

/// Literal value carried by a [`Lit`](super::node::Node::Lit) node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 64-bit signed integer.
    Integer(i64),

    /// 64-bit floating-point number.
    Float(f64),

    /// Interned symbol: `:name`.
    Symbol(String),

    /// Range literal: `first..last` / `first...last`.
    ///
    /// The parser produces these, but the bytecode compiler has no push
    /// opcode for them yet; compiling one is an unsupported-literal error.
    Range {
        first: i64,
        last: i64,
        exclusive: bool,
    },
}

impl std::fmt::Display for Value {
    /// Format a value using Garnet surface syntax.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Symbol(s) => write!(f, ":{}", s),
            Value::Range {
                first,
                last,
                exclusive,
            } => {
                if *exclusive {
                    write!(f, "{}...{}", first, last)
                } else {
                    write!(f, "{}..{}", first, last)
                }
            }
        }
    }
}
