//! # Garnet Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the Garnet
//! language. The AST is produced by the parser and consumed by the
//! bytecode compiler; the tree is read-only input and is never mutated
//! during compilation.

pub mod node;
pub mod value;
