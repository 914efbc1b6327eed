//! Opcodes and the operations they name.
use core::fmt;
use serde_derive::{Deserialize, Serialize};

/// A 32 bit instruction code, as stored in a memory cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Opcode(pub u32);

impl Opcode {
    /// Interpret a cell as an opcode. Negative cells and cells wider
    /// than 32 bits are never opcodes.
    pub fn from_cell(cell: i64) -> Option<Self> {
        u32::try_from(cell).ok().map(Self)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl fmt::LowerHex for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<Op> for Opcode {
    fn from(op: Op) -> Self {
        op.opcode()
    }
}

/// An individual virtual machine operation.
///
/// "`a`" is always the value popped first (the old top of stack) and
/// "`b`" the value popped second, so binary operations compute `b op a`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Op {
    /// Do nothing.
    Noop,

    /// Pop an address from the data stack and push the cell stored there.
    DsFetch,
    /// Pop an address, then a value, from the data stack and store the value at the address.
    DsStore,
    /// Pop an address from the return stack and push the cell stored there.
    RsFetch,
    /// Pop an address, then a value, from the return stack and store the value at the address.
    RsStore,
    /// Push the cell following this opcode onto the data stack, and skip over it.
    Literal,

    /// Push `b + a`.
    DsAdd,
    /// Push `b - a`.
    DsSub,
    /// Push `b * a`.
    DsMul,
    /// Push `b / a`, truncated toward zero. Fails if `a` is zero.
    DsDiv,
    /// Push 1 if `a == b`, otherwise 0.
    DsEq,
    /// Push the bitwise `b & a`.
    DsAnd,
    /// Push the bitwise complement of `a`.
    DsNot,

    /// Pop a condition. If it is zero, skip forward to the matching `THEN`.
    ///
    /// Conditionals may nest:
    /// ```text
    /// IF
    ///     ...
    ///     IF
    ///         ...
    ///     THEN
    /// THEN
    /// ```
    If,
    /// Mark the end of an `IF` block.
    Then,
    /// Pop an offset and add it to the program counter.
    Jump,
}

impl Op {
    /// Every operation, in opcode order.
    pub const ALL: [Op; 16] = [
        Op::Noop,
        Op::DsFetch,
        Op::DsStore,
        Op::RsFetch,
        Op::RsStore,
        Op::Literal,
        Op::DsAdd,
        Op::DsSub,
        Op::DsMul,
        Op::DsDiv,
        Op::DsEq,
        Op::DsAnd,
        Op::DsNot,
        Op::If,
        Op::Then,
        Op::Jump,
    ];

    pub fn opcode(&self) -> Opcode {
        Opcode(match self {
            Op::Noop => 0x00,
            Op::DsFetch => 0x01,
            Op::DsStore => 0x02,
            Op::RsFetch => 0x03,
            Op::RsStore => 0x04,
            Op::Literal => 0x05,
            Op::DsAdd => 0x11,
            Op::DsSub => 0x12,
            Op::DsMul => 0x13,
            Op::DsDiv => 0x14,
            Op::DsEq => 0x15,
            Op::DsAnd => 0x16,
            Op::DsNot => 0x17,
            Op::If => 0x21,
            Op::Then => 0x22,
            Op::Jump => 0x23,
        })
    }

    /// The opcode as it is stored in a memory cell.
    pub fn cell(&self) -> i64 {
        self.opcode().0 as i64
    }

    /// The name of this operation in program source.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Noop => "NOOP",
            Op::DsFetch => "DS_FETCH",
            Op::DsStore => "DS_STORE",
            Op::RsFetch => "RS_FETCH",
            Op::RsStore => "RS_STORE",
            Op::Literal => "LITERAL",
            Op::DsAdd => "DS_ADD",
            Op::DsSub => "DS_SUB",
            Op::DsMul => "DS_MUL",
            Op::DsDiv => "DS_DIV",
            Op::DsEq => "DS_EQ",
            Op::DsAnd => "DS_AND",
            Op::DsNot => "DS_NOT",
            Op::If => "IF",
            Op::Then => "THEN",
            Op::Jump => "JUMP",
        }
    }

    /// The number of operand cells that follow this opcode in memory.
    pub fn operands(&self) -> usize {
        match self {
            Op::Literal => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_opcodes_unique() {
        let codes: BTreeSet<Opcode> = Op::ALL.iter().map(Op::opcode).collect();
        assert_eq!(codes.len(), Op::ALL.len());
    }

    #[test]
    fn test_opcode_display() {
        assert_eq!(Op::Then.opcode().to_string(), "0x00000022");
        assert_eq!(format!("{:x}", Op::DsDiv.opcode()), "14");
    }

    #[test]
    fn test_from_cell() {
        assert_eq!(Opcode::from_cell(0x21), Some(Opcode(0x21)));
        assert_eq!(Opcode::from_cell(-1), None);
        assert_eq!(Opcode::from_cell(1 << 32), None);
    }
}
