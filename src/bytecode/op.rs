use serde::{Deserialize, Serialize};

// =============================================================================
// OP - Bytecode instructions
// =============================================================================

/// One VM instruction. Instructions never reference each other; sequence
/// order encodes control flow, with paired begin/`End` markers for
/// conditionals and class/method/block bodies interpreted by the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Op {
    // literals
    PushInt(i64),
    PushFloat(f64),
    PushSymbol(String),
    PushString { value: String, length: usize },
    PushNil,

    /// Push the enclosing `self`.
    PushSelf,

    // name lookups and binds
    ConstFind(String),
    VariableGet(String),
    VariableSet(String),

    /// Build an array from the top `count` stack values.
    CreateArray { count: usize },

    // ==========================================================================
    // Message sends
    // ==========================================================================
    /// Push the argument count for the following `Send`.
    PushArgc(usize),

    /// Send `message` to the receiver on top of the stack. `with_block`
    /// means a block object sits beneath the arguments.
    Send { message: String, with_block: bool },

    // ==========================================================================
    // Structured regions - each opener pairs with End(kind)
    // ==========================================================================
    DefineClass { name: String },
    DefineMethod { name: String, arity: usize },
    DefineBlock { arity: usize },

    /// Pop the condition; run the instructions up to `Else` when truthy,
    /// the instructions between `Else` and `End(If)` otherwise.
    If,
    Else,
    End(EndKind),

    // ==========================================================================
    // Argument binding
    // ==========================================================================
    /// Push the positional argument at `index`.
    PushArg(usize),

    /// Materialize the remaining arguments into an array.
    PushArgs,

    /// Shift the first element off the array on top of the stack, leaving
    /// the array beneath it: `( ary -- ary elem )`.
    ArrayShift,

    /// Pop the last element off the array on top of the stack, leaving the
    /// array beneath it: `( ary -- ary elem )`.
    ArrayPop,

    /// Discard the top stack value.
    Pop,
}

/// Which structured region an [`Op::End`] closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndKind {
    If,
    DefineClass,
    DefineMethod,
    DefineBlock,
}
