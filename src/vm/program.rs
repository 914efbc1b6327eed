//! Memory images of programs.
use super::{InstructionSet, Op};
use core::fmt;
use serde_derive::{Deserialize, Serialize};

/// A program, as the sequence of cells to place in the program region.
///
/// Opcodes and their operands are already resolved to integers.
#[derive(Default, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Program(pub Vec<i64>);

/// A conditional marker without its partner, at a program-relative address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Unmatched {
    pub op: Op,
    pub address: usize,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation.
    pub fn op(mut self, op: Op) -> Self {
        self.0.push(op.cell());
        self
    }

    /// Append a `LITERAL` and its operand.
    pub fn lit(mut self, value: i64) -> Self {
        self.0.push(Op::Literal.cell());
        self.0.push(value);
        self
    }

    /// Append a raw cell.
    pub fn raw(mut self, cell: i64) -> Self {
        self.0.push(cell);
        self
    }

    pub fn cells(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check that every `IF` has a matching `THEN` and vice versa.
    pub fn check_conditionals(&self, set: &InstructionSet) -> Result<(), Unmatched> {
        let mut open = vec![];
        let mut i = 0;
        while i < self.0.len() {
            match set.decode(self.0[i]) {
                Some(Op::If) => open.push(i),
                Some(Op::Then) => {
                    if open.pop().is_none() {
                        return Err(Unmatched {
                            op: Op::Then,
                            address: i,
                        });
                    }
                }
                Some(op) => i += op.operands(),
                None => {}
            }
            i += 1;
        }
        match open.pop() {
            Some(address) => Err(Unmatched { op: Op::If, address }),
            None => Ok(()),
        }
    }
}

impl From<Vec<Op>> for Program {
    fn from(ops: Vec<Op>) -> Self {
        ops.into_iter().collect()
    }
}

impl FromIterator<Op> for Program {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Self(iter.into_iter().map(|op| op.cell()).collect())
    }
}

impl fmt::Display for Program {
    /// Disassemble the program, one instruction per line.
    /// The alternate form prefixes each line with its address.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let set = InstructionSet::default();
        let mut indent = 0;
        let mut i = 0;
        while i < self.0.len() {
            if f.alternate() {
                write!(f, "{:08x?}: ", i)?;
            }
            let cell = self.0[i];
            match set.decode(cell) {
                Some(Op::Literal) => match self.0.get(i + 1) {
                    Some(operand) => {
                        writeln!(f, "{}{} {}", "   ".repeat(indent), Op::Literal, operand)?;
                        i += 1;
                    }
                    None => writeln!(f, "{}{}", "   ".repeat(indent), Op::Literal)?,
                },
                Some(Op::If) => {
                    writeln!(f, "{}{}", "   ".repeat(indent), Op::If)?;
                    indent += 1;
                }
                Some(Op::Then) => {
                    indent = indent.saturating_sub(1);
                    writeln!(f, "{}{}", "   ".repeat(indent), Op::Then)?;
                }
                Some(op) => writeln!(f, "{}{}", "   ".repeat(indent), op)?,
                None => writeln!(f, "{}{}", "   ".repeat(indent), cell)?,
            }
            i += 1;
        }
        Ok(())
    }
}
