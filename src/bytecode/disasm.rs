use crate::bytecode::ir::Program;
use crate::bytecode::op::{EndKind, Op};
use std::fmt::Write;

/// Render a compiled program as a human-readable listing.
pub fn disassemble_program(program: &Program) -> String {
    disassemble(&program.ops)
}

/// Render an instruction stream, one mnemonic per line, indented by
/// class/method/block/conditional nesting.
pub fn disassemble(ops: &[Op]) -> String {
    let mut out = String::new();
    let mut indent: usize = 0;

    for (ip, op) in ops.iter().enumerate() {
        if matches!(op, Op::Else | Op::End(_)) {
            indent = indent.saturating_sub(1);
        }

        let _ = writeln!(out, "{:04} {}{}", ip, "  ".repeat(indent), mnemonic(op));

        if matches!(
            op,
            Op::DefineClass { .. }
                | Op::DefineMethod { .. }
                | Op::DefineBlock { .. }
                | Op::If
                | Op::Else
        ) {
            indent += 1;
        }
    }

    out
}

fn mnemonic(op: &Op) -> String {
    match op {
        Op::PushInt(n) => format!("PUSH_INT      {}", n),
        Op::PushFloat(x) => format!("PUSH_FLOAT    {}", x),
        Op::PushSymbol(s) => format!("PUSH_SYMBOL   :{}", s),
        Op::PushString { value, length } => {
            format!("PUSH_STRING   {:?} len={}", value, length)
        }
        Op::PushNil => "PUSH_NIL".to_string(),
        Op::PushSelf => "PUSH_SELF".to_string(),
        Op::ConstFind(name) => format!("CONST_FIND    {}", name),
        Op::VariableGet(name) => format!("VAR_GET       {}", name),
        Op::VariableSet(name) => format!("VAR_SET       {}", name),
        Op::CreateArray { count } => format!("CREATE_ARRAY  {}", count),
        Op::PushArgc(count) => format!("PUSH_ARGC     {}", count),
        Op::Send {
            message,
            with_block,
        } => {
            if *with_block {
                format!("SEND          {} (with block)", message)
            } else {
                format!("SEND          {}", message)
            }
        }
        Op::DefineClass { name } => format!("DEFINE_CLASS  {}", name),
        Op::DefineMethod { name, arity } => {
            format!("DEFINE_METHOD {} arity={}", name, arity)
        }
        Op::DefineBlock { arity } => format!("DEFINE_BLOCK  arity={}", arity),
        Op::If => "IF".to_string(),
        Op::Else => "ELSE".to_string(),
        Op::End(kind) => format!("END           {}", end_kind_name(*kind)),
        Op::PushArg(index) => format!("PUSH_ARG      {}", index),
        Op::PushArgs => "PUSH_ARGS".to_string(),
        Op::ArrayShift => "ARRAY_SHIFT".to_string(),
        Op::ArrayPop => "ARRAY_POP".to_string(),
        Op::Pop => "POP".to_string(),
    }
}

fn end_kind_name(kind: EndKind) -> &'static str {
    match kind {
        EndKind::If => "if",
        EndKind::DefineClass => "class",
        EndKind::DefineMethod => "method",
        EndKind::DefineBlock => "block",
    }
}
