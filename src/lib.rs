//! # forth-vm
//!
//! A small bytecode-driven virtual machine in the style of a Forth
//! inner interpreter.
//!
//! ```text
//!        +-----------+      +-------------------------------+
//!   pc ->|  memory   |----->| fetch -> decode -> execute    |
//!        | (cells)   |<-----|   data stack   return stack   |
//!        +-----------+      +-------------------------------+
//! ```
//!
//! ## What is this machine?
//!
//! The machine has two bounded stacks (the data stack and the return
//! stack), a flat memory of fixed-width signed cells, and a program
//! counter. Cells wrap around on overflow like two's complement
//! hardware registers; nothing about arithmetic overflow is an error.
//!
//! ## Index
//!
//! 1. [The Virtual Machine](./vm/index.html)
//! 2. [The Program Loader](./parse/index.html)
//!
//! ## Instruction Set
//!
//! |              |            |            |            |            |          |
//! |--------------|------------|------------|------------|------------|----------|
//! | Memory       | `NOOP`     | `DS_FETCH` | `DS_STORE` | `RS_FETCH` | `RS_STORE` |
//! | Data         | `LITERAL`  |            |            |            |          |
//! | Arithmetic   | `DS_ADD`   | `DS_SUB`   | `DS_MUL`   | `DS_DIV`   | `DS_EQ`  |
//! | Bitwise      | `DS_AND`   | `DS_NOT`   |            |            |          |
//! | Control Flow | `IF`       | `THEN`     | `JUMP`     |            |          |
//!
//! ## Example
//!
//! ```
//! use forth_vm::{parse::parse_program, vm::*};
//!
//! let program = parse_program("LITERAL 10 LITERAL 3 DS_SUB").unwrap();
//! let mut vm = VirtualMachine::new(MachineConfig::default().with_memory_size(205)).unwrap();
//! vm.load(&program).unwrap();
//!
//! assert_eq!(vm.run(), Ok(Halt::EndOfProgram));
//! assert_eq!(vm.data_stack().values(), vec![7]);
//! ```
pub mod parse;
pub mod vm;

pub use parse::{parse_program, LoadError};
pub use vm::{Error, Halt, MachineConfig, Program, VirtualMachine};
