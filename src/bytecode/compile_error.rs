use crate::lang::{node::Node, value::Value};

/// Failure while lowering an AST to bytecode.
///
/// All failures are fatal to the current compilation: no instruction is
/// partially emitted for a failing node, and the caller must discard any
/// partial output.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// A node kind the compiler has no lowering for.
    UnsupportedNode { node_type: String },

    /// A literal value with no push opcode mapping.
    UnsupportedLiteral { literal: String },

    /// A nested binding element whose tag is not the destructuring
    /// pattern tag.
    Pattern { found: String },

    /// Input that breaks the structural contract: a non-`block` root, or
    /// an `iter` whose associated node is not a call.
    Structural { reason: String },
}

impl CompileError {
    pub fn unsupported_node(node: &Node) -> Self {
        CompileError::UnsupportedNode {
            node_type: node_type_name(node).to_string(),
        }
    }

    pub fn unsupported_literal(value: &Value) -> Self {
        CompileError::UnsupportedLiteral {
            literal: value.to_string(),
        }
    }

    pub fn pattern(found: &Node) -> Self {
        CompileError::Pattern {
            found: node_type_name(found).to_string(),
        }
    }

    pub fn structural(reason: impl Into<String>) -> Self {
        CompileError::Structural {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::UnsupportedNode { node_type } => {
                write!(f, "compile error: cannot compile '{}' node", node_type)
            }
            CompileError::UnsupportedLiteral { literal } => {
                write!(
                    f,
                    "compile error: no push instruction for literal {}",
                    literal
                )
            }
            CompileError::Pattern { found } => {
                write!(
                    f,
                    "compile error: expected a destructuring pattern in parameter list, got '{}'",
                    found
                )
            }
            CompileError::Structural { reason } => {
                write!(f, "compile error: {}", reason)
            }
        }
    }
}

impl std::error::Error for CompileError {}

/// Extract a human-readable name for a node kind.
pub(crate) fn node_type_name(node: &Node) -> &'static str {
    match node {
        Node::Block(_) => "block",
        Node::Array(_) => "array",
        Node::Call { .. } => "call",
        Node::Class { .. } => "class",
        Node::Const(_) => "const",
        Node::Defn { .. } => "defn",
        Node::If { .. } => "if",
        Node::Iter { .. } => "iter",
        Node::Lasgn { .. } => "lasgn",
        Node::Lit(v) => match v {
            Value::Integer(_) => "integer literal",
            Value::Float(_) => "float literal",
            Value::Symbol(_) => "symbol literal",
            Value::Range { .. } => "range literal",
        },
        Node::Lvar(_) => "lvar",
        Node::Nil => "nil",
        Node::SelfRef => "self",
        Node::Str(_) => "str",
        Node::Masgn(_) => "masgn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_node_display() {
        let err = CompileError::unsupported_node(&Node::Masgn(vec![]));

        let msg = err.to_string();
        assert!(msg.contains("cannot compile"));
        assert!(msg.contains("masgn"));
    }

    #[test]
    fn test_unsupported_literal_display() {
        let err = CompileError::unsupported_literal(&Value::Range {
            first: 1,
            last: 10,
            exclusive: false,
        });

        let msg = err.to_string();
        assert!(msg.contains("no push instruction"));
        assert!(msg.contains("1..10"));
    }

    #[test]
    fn test_pattern_display() {
        let err = CompileError::pattern(&Node::Lvar("x".to_string()));

        let msg = err.to_string();
        assert!(msg.contains("destructuring pattern"));
        assert!(msg.contains("lvar"));
    }

    #[test]
    fn test_structural_display() {
        let err = CompileError::structural("expected a block at the top level");

        assert_eq!(
            err.to_string(),
            "compile error: expected a block at the top level"
        );
    }

    #[test]
    fn test_error_implements_std_error() {
        let err = CompileError::structural("test");
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_node_type_name_literals() {
        assert_eq!(
            node_type_name(&Node::Lit(Value::Integer(42))),
            "integer literal"
        );
        assert_eq!(
            node_type_name(&Node::Lit(Value::Symbol("ok".to_string()))),
            "symbol literal"
        );
        assert_eq!(node_type_name(&Node::SelfRef), "self");
    }
}
