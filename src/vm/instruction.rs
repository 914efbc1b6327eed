//! The semantics of every operation, and the table that decodes them.
use super::{Error, MachineState, Memory, Op, Opcode, Stack};
use std::collections::BTreeMap;

/// Something the machine can execute against its state.
///
/// An instruction is responsible for moving the program counter.
/// If it fails, it must leave the state exactly as it found it.
pub trait Instruction {
    fn execute(&self, state: &mut MachineState, set: &InstructionSet) -> Result<(), Error>;
}

impl Instruction for Op {
    fn execute(&self, state: &mut MachineState, set: &InstructionSet) -> Result<(), Error> {
        let pc = state.pc;
        let next = match self {
            Op::Noop | Op::Then => pc + 1,

            Op::DsFetch => {
                fetch(&mut state.data_stack, &state.memory)?;
                pc + 1
            }
            Op::DsStore => {
                store(&mut state.data_stack, &mut state.memory)?;
                pc + 1
            }
            Op::RsFetch => {
                fetch(&mut state.return_stack, &state.memory)?;
                pc + 1
            }
            Op::RsStore => {
                store(&mut state.return_stack, &mut state.memory)?;
                pc + 1
            }
            Op::Literal => {
                // The operand is data, not an opcode.
                let value = state.memory.read(pc as i64 + 1)?;
                state.data_stack.push(value)?;
                pc + 2
            }

            Op::DsAdd => {
                binary(&mut state.data_stack, |b, a| b + a)?;
                pc + 1
            }
            Op::DsSub => {
                binary(&mut state.data_stack, |b, a| b - a)?;
                pc + 1
            }
            Op::DsMul => {
                binary(&mut state.data_stack, |b, a| b * a)?;
                pc + 1
            }
            Op::DsDiv => {
                state.data_stack.require(2)?;
                if state.data_stack.top(0)? == 0 {
                    return Err(Error::DivisionByZero { address: pc });
                }
                binary(&mut state.data_stack, |b, a| b / a)?;
                pc + 1
            }
            Op::DsEq => {
                binary(&mut state.data_stack, |b, a| i128::from(b == a))?;
                pc + 1
            }
            Op::DsAnd => {
                binary(&mut state.data_stack, |b, a| b & a)?;
                pc + 1
            }
            Op::DsNot => {
                let a = state.data_stack.pop()?;
                state.data_stack.push(!a)?;
                pc + 1
            }

            Op::If => {
                let target = if state.data_stack.top(0)? == 0 {
                    matching_then(state, set)?
                } else {
                    pc + 1
                };
                state.data_stack.pop()?;
                target
            }
            Op::Jump => {
                let target = pc as i128 + state.data_stack.top(0)? as i128;
                let target = usize::try_from(target).map_err(|_| Error::AddressOutOfBounds {
                    address: target.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
                    size: state.memory.size(),
                })?;
                state.data_stack.pop()?;
                target
            }
        };
        state.pc = next;
        Ok(())
    }
}

/// Replace the address on top of `stack` with the cell it points to.
fn fetch(stack: &mut Stack, memory: &Memory) -> Result<(), Error> {
    let value = memory.read(stack.top(0)?)?;
    stack.pop()?;
    stack.push(value)
}

/// Pop an address and a value from `stack` and store the value.
fn store(stack: &mut Stack, memory: &mut Memory) -> Result<(), Error> {
    stack.require(2)?;
    memory.check(stack.top(0)?)?;
    let address = stack.pop()?;
    let value = stack.pop()?;
    memory.write(address, value)
}

/// Pop `a` then `b`, and push `f(b, a)` wrapped to the cell width.
///
/// Operands are widened so that no intermediate result overflows
/// before the cell wraps it.
fn binary(stack: &mut Stack, f: impl FnOnce(i128, i128) -> i128) -> Result<(), Error> {
    stack.require(2)?;
    let a = stack.pop()? as i128;
    let b = stack.pop()? as i128;
    stack.push(f(b, a))
}

/// Find the `THEN` that closes the `IF` at the program counter.
///
/// Nested `IF`s are counted, and the operand of a `LITERAL` is
/// skipped so that data is never mistaken for an opcode.
fn matching_then(state: &MachineState, set: &InstructionSet) -> Result<usize, Error> {
    let mut depth = 1;
    let mut address = state.pc + 1;
    while address < state.memory.size() {
        match set.decode(state.memory.read(address as i64)?) {
            Some(Op::If) => depth += 1,
            Some(Op::Then) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(address);
                }
            }
            Some(op) => address += op.operands(),
            None => {}
        }
        address += 1;
    }
    Err(Error::UnmatchedIf { address: state.pc })
}

/// The registered operations of a machine, keyed by opcode.
///
/// The opcode space is sparse: anything that is not registered
/// decodes to nothing, which ends a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionSet {
    table: BTreeMap<Opcode, Op>,
}

impl InstructionSet {
    /// Register exactly the given operations.
    pub fn new(ops: impl IntoIterator<Item = Op>) -> Self {
        Self {
            table: ops.into_iter().map(|op| (op.opcode(), op)).collect(),
        }
    }

    pub fn get(&self, opcode: Opcode) -> Option<Op> {
        self.table.get(&opcode).copied()
    }

    /// Decode a memory cell into a registered operation.
    pub fn decode(&self, cell: i64) -> Option<Op> {
        Opcode::from_cell(cell).and_then(|opcode| self.get(opcode))
    }

    pub fn contains(&self, op: Op) -> bool {
        self.table.get(&op.opcode()) == Some(&op)
    }

    /// The registered operations, in opcode order.
    pub fn ops(&self) -> impl Iterator<Item = Op> + '_ {
        self.table.values().copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for InstructionSet {
    fn default() -> Self {
        Self::new(Op::ALL)
    }
}
