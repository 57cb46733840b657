use crate::bytecode::op::{EndKind, Op};

/// A statically detectable operand-stack violation in an instruction
/// stream.
#[derive(Debug)]
pub struct StackCheckError {
    pub message: String,
}

impl std::fmt::Display for StackCheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stack-check error: {}", self.message)
    }
}

impl std::error::Error for StackCheckError {}

impl StackCheckError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One tracked operand-stack slot. Argument counts are tracked exactly so
/// a `Send` knows how many values it consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Value,
    Argc(usize),
}

#[derive(Debug)]
enum Frame {
    /// A class/method/block body: runs on a fresh operand stack; the
    /// enclosing stack is parked until the matching `End`.
    Region { kind: EndKind, outer: Vec<Slot> },

    /// An open conditional: branches share the surrounding stack, but both
    /// must reach the same depth at `End`.
    Branch {
        snapshot: Vec<Slot>,
        then_depth: Option<usize>,
    },
}

/// Walk an instruction stream and return its net stack effect.
///
/// Underflow, an `End` that does not match its opener, a dangling region,
/// mismatched branch depths, or a `Send` without an argument-count marker
/// are all errors. Class bodies must close at depth 0, method and block
/// bodies at depth 1 (their last expression is the return value).
pub fn check_ops(ops: &[Op]) -> Result<i32, StackCheckError> {
    check_ops_with_initial(ops, 0)
}

/// Check with `initial_height` values already on the stack.
pub fn check_ops_with_initial(ops: &[Op], initial_height: usize) -> Result<i32, StackCheckError> {
    let mut stack: Vec<Slot> = vec![Slot::Value; initial_height];
    let mut frames: Vec<Frame> = Vec::new();

    for (ip, op) in ops.iter().enumerate() {
        match op {
            Op::PushInt(_)
            | Op::PushFloat(_)
            | Op::PushSymbol(_)
            | Op::PushString { .. }
            | Op::PushNil
            | Op::PushSelf
            | Op::ConstFind(_)
            | Op::VariableGet(_)
            | Op::PushArg(_)
            | Op::PushArgs => stack.push(Slot::Value),

            Op::PushArgc(count) => stack.push(Slot::Argc(*count)),

            Op::VariableSet(_) | Op::Pop => {
                pop_value(&mut stack, ip, op)?;
            }

            Op::CreateArray { count } => {
                for _ in 0..*count {
                    pop_value(&mut stack, ip, op)?;
                }
                stack.push(Slot::Value);
            }

            // ( ary -- ary elem )
            Op::ArrayShift | Op::ArrayPop => {
                if stack.is_empty() {
                    return Err(underflow(ip, op));
                }
                stack.push(Slot::Value);
            }

            Op::Send { with_block, .. } => {
                pop_value(&mut stack, ip, op)?; // receiver
                let argc = match stack.pop() {
                    Some(Slot::Argc(argc)) => argc,
                    Some(Slot::Value) => {
                        return Err(StackCheckError::new(format!(
                            "send without argument-count marker at ip={}, op={:?}",
                            ip, op
                        )));
                    }
                    None => return Err(underflow(ip, op)),
                };
                for _ in 0..argc {
                    pop_value(&mut stack, ip, op)?;
                }
                if *with_block {
                    pop_value(&mut stack, ip, op)?;
                }
                stack.push(Slot::Value);
            }

            Op::DefineClass { .. } => {
                pop_value(&mut stack, ip, op)?; // superclass
                frames.push(Frame::Region {
                    kind: EndKind::DefineClass,
                    outer: std::mem::take(&mut stack),
                });
            }

            Op::DefineMethod { .. } => frames.push(Frame::Region {
                kind: EndKind::DefineMethod,
                outer: std::mem::take(&mut stack),
            }),

            Op::DefineBlock { .. } => frames.push(Frame::Region {
                kind: EndKind::DefineBlock,
                outer: std::mem::take(&mut stack),
            }),

            Op::If => {
                pop_value(&mut stack, ip, op)?; // condition
                frames.push(Frame::Branch {
                    snapshot: stack.clone(),
                    then_depth: None,
                });
            }

            Op::Else => match frames.last_mut() {
                Some(Frame::Branch {
                    snapshot,
                    then_depth,
                }) => {
                    if then_depth.is_some() {
                        return Err(StackCheckError::new(format!(
                            "second else marker in one conditional at ip={}",
                            ip
                        )));
                    }
                    *then_depth = Some(stack.len());
                    stack = snapshot.clone();
                }
                _ => {
                    return Err(StackCheckError::new(format!(
                        "else marker without an open conditional at ip={}",
                        ip
                    )));
                }
            },

            Op::End(kind) => match frames.pop() {
                Some(Frame::Branch { then_depth, .. }) if *kind == EndKind::If => {
                    let then_depth = then_depth.ok_or_else(|| {
                        StackCheckError::new(format!(
                            "conditional closed without an else marker at ip={}",
                            ip
                        ))
                    })?;
                    if stack.len() != then_depth {
                        return Err(StackCheckError::new(format!(
                            "branch depth mismatch at ip={}: then leaves {}, else leaves {}",
                            ip,
                            then_depth,
                            stack.len()
                        )));
                    }
                }
                Some(Frame::Region { kind: opened, outer }) if *kind == opened => {
                    let expected = if opened == EndKind::DefineClass { 0 } else { 1 };
                    if stack.len() != expected {
                        return Err(StackCheckError::new(format!(
                            "{:?} body leaves {} values at ip={}, expected {}",
                            opened,
                            stack.len(),
                            ip,
                            expected
                        )));
                    }
                    stack = outer;
                    // the defined method/block object lands on the
                    // enclosing stack; a class definition leaves nothing
                    if opened != EndKind::DefineClass {
                        stack.push(Slot::Value);
                    }
                }
                Some(_) => {
                    return Err(StackCheckError::new(format!(
                        "mismatched end marker {:?} at ip={}",
                        kind, ip
                    )));
                }
                None => {
                    return Err(StackCheckError::new(format!(
                        "end marker {:?} without an opener at ip={}",
                        kind, ip
                    )));
                }
            },
        }
    }

    if !frames.is_empty() {
        return Err(StackCheckError::new(format!(
            "{} unclosed region(s) at end of stream",
            frames.len()
        )));
    }

    Ok(stack.len() as i32 - initial_height as i32)
}

fn pop_value(stack: &mut Vec<Slot>, ip: usize, op: &Op) -> Result<Slot, StackCheckError> {
    stack.pop().ok_or_else(|| underflow(ip, op))
}

fn underflow(ip: usize, op: &Op) -> StackCheckError {
    StackCheckError::new(format!("stack underflow at ip={}, op={:?}", ip, op))
}
