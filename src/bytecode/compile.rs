use crate::bytecode::compile_error::{CompileError, node_type_name};
use crate::bytecode::op::{EndKind, Op};
use crate::lang::node::{Node, Param};
use crate::lang::value::Value;

/// Lowers a parsed program to a flat instruction stream.
///
/// The `used` flag threads through every handler: `used=true` means the
/// expression must leave exactly one value on the operand stack, `used=false`
/// means it must leave the stack untouched (the value is popped, or never
/// pushed at all). Handlers are pure; each returns its own owned sequence
/// and the caller concatenates, so the final stream is flat by construction.
pub struct Compiler {
    ast: Node,
}

impl Compiler {
    pub fn new(ast: Node) -> Self {
        Self { ast }
    }

    /// Compile the program. Pass `used: true` to leave the final result on
    /// the stack. The root node must be a `block`.
    pub fn compile(&self, used: bool) -> Result<Vec<Op>, CompileError> {
        match &self.ast {
            Node::Block(body) => compile_body(body, used),
            other => Err(CompileError::structural(format!(
                "expected a block at the top level, got '{}'",
                node_type_name(other)
            ))),
        }
    }
}

/// Statement-sequence lowering: everything but the last statement compiles
/// in discarding mode. An empty sequence emits nothing even when used;
/// callers that need a placeholder value substitute their own.
fn compile_body(body: &[Node], used: bool) -> Result<Vec<Op>, CompileError> {
    let mut ops = Vec::new();
    if let Some((last, rest)) = body.split_last() {
        for stmt in rest {
            ops.extend(compile_expr(stmt, false)?);
        }
        ops.extend(compile_expr(last, used)?);
    }
    Ok(ops)
}

/// The dispatcher: all recursion goes through here so the `used` discipline
/// is enforced uniformly.
fn compile_expr(node: &Node, used: bool) -> Result<Vec<Op>, CompileError> {
    match node {
        Node::Block(body) => compile_body(body, used),
        Node::Array(items) => compile_array(items, used),
        Node::Call {
            receiver,
            message,
            args,
        } => compile_call(receiver.as_deref(), message, args, used, false),
        Node::Class {
            name,
            superclass,
            body,
        } => compile_class(name, superclass.as_deref(), body, used),
        Node::Const(name) => Ok(if used {
            vec![Op::ConstFind(name.clone())]
        } else {
            Vec::new()
        }),
        Node::Defn { name, params, body } => compile_defn(name, params, body, used),
        Node::If {
            condition,
            then_branch,
            else_branch,
        } => compile_if(condition, then_branch.as_deref(), else_branch.as_deref(), used),
        Node::Iter { call, params, body } => compile_iter(call, params, body, used),
        Node::Lasgn { name, value } => compile_lasgn(name, value, used),
        Node::Lit(value) => compile_lit(value, used),
        Node::Lvar(name) => Ok(if used {
            vec![Op::VariableGet(name.clone())]
        } else {
            Vec::new()
        }),
        Node::Nil => Ok(if used { vec![Op::PushNil] } else { Vec::new() }),
        Node::SelfRef => Ok(if used { vec![Op::PushSelf] } else { Vec::new() }),
        Node::Str(s) => Ok(if used {
            vec![Op::PushString {
                value: s.clone(),
                length: s.len(),
            }]
        } else {
            Vec::new()
        }),
        // Forward-compatibility arm: kinds the parser produces but this
        // pass cannot lower yet.
        other @ Node::Masgn(_) => Err(CompileError::unsupported_node(other)),
    }
}

/// Array construction always needs every element value; the array itself is
/// kept on the stack regardless of `used`.
fn compile_array(items: &[Node], _used: bool) -> Result<Vec<Op>, CompileError> {
    let mut ops = Vec::new();
    for item in items {
        ops.extend(compile_expr(item, true)?);
    }
    ops.push(Op::CreateArray { count: items.len() });
    Ok(ops)
}

fn compile_call(
    receiver: Option<&Node>,
    message: &str,
    args: &[Node],
    used: bool,
    with_block: bool,
) -> Result<Vec<Op>, CompileError> {
    let mut ops = Vec::new();
    for arg in args {
        ops.extend(compile_expr(arg, true)?);
    }
    ops.push(Op::PushArgc(args.len()));
    match receiver {
        Some(receiver) => ops.extend(compile_expr(receiver, true)?),
        // receiverless sends resolve against the enclosing self at send
        // time
        None => ops.push(Op::PushSelf),
    }
    ops.push(Op::Send {
        message: message.to_string(),
        with_block,
    });
    if !used {
        ops.push(Op::Pop);
    }
    Ok(ops)
}

/// Class bodies execute for effect; their trailing value is discarded, and
/// the definition itself yields nil to the expression context.
fn compile_class(
    name: &str,
    superclass: Option<&Node>,
    body: &[Node],
    used: bool,
) -> Result<Vec<Op>, CompileError> {
    let mut ops = Vec::new();
    match superclass {
        Some(superclass) => ops.extend(compile_expr(superclass, true)?),
        None => ops.push(Op::ConstFind("Object".to_string())),
    }
    ops.push(Op::DefineClass {
        name: name.to_string(),
    });
    ops.extend(compile_body(body, false)?);
    ops.push(Op::End(EndKind::DefineClass));
    if used {
        ops.push(Op::PushNil);
    }
    Ok(ops)
}

fn compile_defn(
    name: &str,
    params: &[Param],
    body: &[Node],
    used: bool,
) -> Result<Vec<Op>, CompileError> {
    // Coarse arity: the bare parameter count, with no required/optional/
    // rest distinction. The executor's calling convention depends on it.
    let arity = params.len();
    let mut ops = vec![Op::DefineMethod {
        name: name.to_string(),
        arity,
    }];
    ops.extend(compile_params(params, true)?);
    if body.is_empty() {
        ops.push(Op::PushNil);
    } else {
        ops.extend(compile_body(body, true)?);
    }
    ops.push(Op::End(EndKind::DefineMethod));
    if !used {
        ops.push(Op::Pop);
    }
    Ok(ops)
}

/// A call with an attached closure: the block is defined first, then the
/// call compiles with its block flag set.
fn compile_iter(
    call: &Node,
    params: &[Param],
    body: &Node,
    used: bool,
) -> Result<Vec<Op>, CompileError> {
    let arity = params.len();
    let mut ops = vec![Op::DefineBlock { arity }];
    ops.extend(compile_params(params, true)?);
    ops.extend(compile_expr(body, true)?);
    ops.push(Op::End(EndKind::DefineBlock));
    match call {
        Node::Call {
            receiver,
            message,
            args,
        } => ops.extend(compile_call(receiver.as_deref(), message, args, used, true)?),
        other => {
            return Err(CompileError::structural(format!(
                "expected a call attached to the block, got '{}'",
                node_type_name(other)
            )));
        }
    }
    Ok(ops)
}

fn compile_lasgn(name: &str, value: &Node, used: bool) -> Result<Vec<Op>, CompileError> {
    let mut ops = compile_expr(value, true)?;
    ops.push(Op::VariableSet(name.to_string()));
    if used {
        // assignment is an expression: read the bound name back
        ops.push(Op::VariableGet(name.to_string()));
    }
    Ok(ops)
}

fn compile_lit(value: &Value, used: bool) -> Result<Vec<Op>, CompileError> {
    if !used {
        return Ok(Vec::new());
    }
    let op = match value {
        Value::Integer(n) => Op::PushInt(*n),
        Value::Float(n) => Op::PushFloat(*n),
        Value::Symbol(s) => Op::PushSymbol(s.clone()),
        other => return Err(CompileError::unsupported_literal(other)),
    };
    Ok(vec![op])
}

/// Both branches compile with `used=true` so the stack depth is identical
/// on both paths entering the end marker; the outer flag only controls
/// whether the unified result is kept.
fn compile_if(
    condition: &Node,
    then_branch: Option<&Node>,
    else_branch: Option<&Node>,
    used: bool,
) -> Result<Vec<Op>, CompileError> {
    let then_ops = match then_branch {
        Some(node) => compile_expr(node, true)?,
        None => vec![Op::PushNil],
    };
    let else_ops = match else_branch {
        Some(node) => compile_expr(node, true)?,
        None => vec![Op::PushNil],
    };
    let mut ops = compile_expr(condition, true)?;
    ops.push(Op::If);
    ops.extend(then_ops);
    ops.push(Op::Else);
    ops.extend(else_ops);
    ops.push(Op::End(EndKind::If));
    if !used {
        ops.push(Op::Pop);
    }
    Ok(ops)
}

// =============================================================================
// Parameter-binding lowering
// =============================================================================

/// Turn a parameter list into binding instructions. With only plain names,
/// each parameter reads its positional argument directly; a splat or a
/// nested pattern anywhere forces the sequence-based path.
fn compile_params(params: &[Param], used: bool) -> Result<Vec<Op>, CompileError> {
    if !used {
        return Ok(Vec::new());
    }
    if complicated_params(params) {
        let mut ops = vec![Op::PushArgs];
        ops.extend(compile_destructure(params)?);
        Ok(ops)
    } else {
        let mut ops = Vec::new();
        for (index, param) in params.iter().enumerate() {
            // only plain names reach the simple case
            if let Param::Name(name) = param {
                ops.push(Op::PushArg(index));
                ops.push(Op::VariableSet(name.clone()));
            }
        }
        Ok(ops)
    }
}

fn complicated_params(params: &[Param]) -> bool {
    params
        .iter()
        .any(|p| matches!(p, Param::Splat(_) | Param::Pattern(_)))
}

/// Bind parameters out of the argument sequence on top of the stack.
/// Plain names shift from the front until a splat has been bound, then pop
/// from the back; the working sequence itself is discarded at the end.
fn compile_destructure(params: &[Param]) -> Result<Vec<Op>, CompileError> {
    let mut ops = Vec::new();
    let mut splat_bound = false;
    for param in params {
        match param {
            Param::Pattern(node) => {
                let inner = match node {
                    Node::Masgn(inner) => inner,
                    other => return Err(CompileError::pattern(other)),
                };
                ops.push(Op::ArrayShift);
                ops.extend(compile_destructure(inner)?);
            }
            Param::Splat(name) => {
                ops.push(Op::VariableSet(name.clone()));
                // re-push so parameters after the splat can still pop
                // from it
                ops.push(Op::VariableGet(name.clone()));
                splat_bound = true;
            }
            Param::Name(name) => {
                ops.push(if splat_bound {
                    Op::ArrayPop
                } else {
                    Op::ArrayShift
                });
                ops.push(Op::VariableSet(name.clone()));
            }
        }
    }
    ops.push(Op::Pop);
    Ok(ops)
}
