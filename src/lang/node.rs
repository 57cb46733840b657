use super::value::Value;
use serde::{Deserialize, Serialize};

/// Abstract Syntax Tree node for the Garnet language.
///
/// Each `Node` is a tagged form whose variant determines the meaning of its
/// children. The parser owns construction; the compiler only reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// A statement sequence. Only the last statement's value can survive;
    /// all earlier statements compile in discarding mode.
    Block(Vec<Node>),

    /// Array literal: every element expression in order.
    Array(Vec<Node>),

    /// Message send. A missing receiver means the send resolves against
    /// the enclosing `self` at runtime.
    Call {
        receiver: Option<Box<Node>>,
        message: String,
        args: Vec<Node>,
    },

    /// Class definition. Without an explicit superclass the runtime root
    /// object class is looked up instead.
    Class {
        name: String,
        superclass: Option<Box<Node>>,
        body: Vec<Node>,
    },

    /// Constant lookup by name.
    Const(String),

    /// Method definition.
    Defn {
        name: String,
        params: Vec<Param>,
        body: Vec<Node>,
    },

    /// Conditional. Either branch may be absent; an absent branch yields
    /// nil.
    If {
        condition: Box<Node>,
        then_branch: Option<Box<Node>>,
        else_branch: Option<Box<Node>>,
    },

    /// A call with an attached closure: `call` must be a [`Node::Call`],
    /// `params` are the block's parameters, `body` its single body
    /// expression.
    Iter {
        call: Box<Node>,
        params: Vec<Param>,
        body: Box<Node>,
    },

    /// Local variable assignment. Assignment is an expression: when its
    /// value is used, the bound name is read back.
    Lasgn { name: String, value: Box<Node> },

    /// Literal value (integer, float, symbol, ...).
    Lit(Value),

    /// Local variable read.
    Lvar(String),

    /// The nil literal.
    Nil,

    /// The enclosing `self`.
    SelfRef,

    /// String literal.
    Str(String),

    /// A nested destructuring pattern, only meaningful inside a parameter
    /// list (see [`Param::Pattern`]). In expression position it is not
    /// compilable.
    Masgn(Vec<Param>),
}

/// One parameter descriptor in a method or block parameter list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Param {
    /// Plain positional parameter.
    Name(String),

    /// Rest parameter (`*name`): collects the remaining arguments.
    Splat(String),

    /// Nested destructuring. The node must be a [`Node::Masgn`]; anything
    /// else is a pattern error at compile time.
    Pattern(Node),
}
