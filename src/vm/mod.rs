//! # Virtual Machine Module
//!
//! This module contains all things related to the virtual machine.
//!
//! ### What is this machine?
//!
//! This virtual machine is a small Forth-style stack machine.
//! There are two bounded stacks of cells (the data stack and the
//! return stack), a flat addressable memory of cells, and a
//! program counter. Every cell is a signed integer of a fixed
//! bit width that wraps around on overflow instead of failing.
//!
//! ### How does it run?
//!
//! The machine repeatedly fetches the cell at the program counter,
//! decodes it through its [`InstructionSet`], and executes the
//! matching [`Op`]. Every operation moves the program counter itself:
//! most by one cell, `LITERAL` by two (it carries an operand), and
//! `IF` / `JUMP` by whatever distance they decide.
//!
//! The run ends normally when the program counter walks off the end
//! of memory. Decoding an unregistered opcode, or any runtime fault
//! (a stack overflow, a bad address, a division by zero), ends the
//! run with an [`Error`] instead.
//!
//! ### What does memory look like?
//!
//! By convention the address space is split into a text input buffer,
//! a dictionary, and the program region. The program counter starts at
//! the program region. Nothing enforces the split.
use core::fmt;

mod cell;
pub use self::cell::*;

mod stack;
pub use self::stack::*;

mod memory;
pub use self::memory::*;

mod opcode;
pub use self::opcode::*;

mod instruction;
pub use self::instruction::*;

mod state;
pub use self::state::*;

mod config;
pub use self::config::*;

mod program;
pub use self::program::*;

mod interpreter;
pub use self::interpreter::*;

/// Which of the machine's two stacks an error came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum StackKind {
    /// The operand stack used by arithmetic and memory instructions.
    Data,
    /// The auxiliary stack used by `RS_FETCH` and `RS_STORE`.
    Return,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackKind::Data => write!(f, "data stack"),
            StackKind::Return => write!(f, "return stack"),
        }
    }
}

/// An error that ends a run of the virtual machine.
///
/// Every variant is fatal for the current run. When an instruction
/// fails, the machine is left exactly as it was before that instruction
/// started, so the program counter still points at the faulting opcode.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A push onto a stack that was already full.
    StackOverflow(StackKind),
    /// A pop from a stack that was empty.
    StackUnderflow(StackKind),
    /// A memory access (or jump target) outside of `0..size`.
    AddressOutOfBounds { address: i64, size: usize },
    /// `DS_DIV` with a zero divisor, at the given address.
    DivisionByZero { address: usize },
    /// The cell at `address` is not a registered opcode.
    UnknownOpcode { opcode: i64, address: usize },
    /// An `IF` at `address` took the false branch but no matching
    /// `THEN` exists before the end of memory.
    UnmatchedIf { address: usize },
    /// The machine configuration cannot be built.
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::StackOverflow(kind) => write!(f, "{kind} overflow"),
            Error::StackUnderflow(kind) => write!(f, "{kind} underflow"),
            Error::AddressOutOfBounds { address, size } => {
                write!(f, "address {address} is out of bounds for memory of {size} cells")
            }
            Error::DivisionByZero { address } => {
                write!(f, "division by zero at address {address}")
            }
            Error::UnknownOpcode { opcode, address } => {
                write!(f, "unknown opcode {opcode:#010x} at address {address}")
            }
            Error::UnmatchedIf { address } => {
                write!(f, "IF at address {address} has no matching THEN")
            }
            Error::InvalidConfig(msg) => write!(f, "invalid machine configuration: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
