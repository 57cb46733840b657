//! Bytecode compiler for the Garnet scripting language.
//!
//! The parser (a separate stage) produces a [`lang::node::Node`] tree; this
//! crate lowers it into a flat [`bytecode::op::Op`] stream for the stack
//! VM. Parsing and execution live elsewhere; the compiler neither reads
//! source text nor runs instructions.

pub mod bytecode;
pub mod lang;

pub use bytecode::compile::Compiler;
pub use bytecode::compile_error::CompileError;
pub use bytecode::ir::Program;
pub use bytecode::op::{EndKind, Op};
pub use lang::node::{Node, Param};
pub use lang::value::Value;
