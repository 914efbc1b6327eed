//! The construction parameters of a machine.
use super::{Error, MAX_CELL_BITS};
use serde_derive::{Deserialize, Serialize};

/// The default width of a cell, in bits.
pub const DEFAULT_BITS_PER_CELL: u32 = 32;
/// The default capacity of each stack.
pub const DEFAULT_STACK_DEPTH: usize = 20;
/// The default number of cells in memory.
pub const DEFAULT_MEMORY_SIZE: usize = 350;

/// The sizes and address-space layout of a machine.
///
/// The three offsets split memory into a text input buffer, a dictionary,
/// and the program region. Only the program region is used by the
/// interpreter; the others are reserved and are not checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub bits_per_cell: u32,
    pub stack_depth: usize,
    pub memory_size: usize,
    pub tib_offset: usize,
    pub dictionary_offset: usize,
    /// Where programs are loaded, and where the program counter starts.
    pub program_offset: usize,
    /// Stop the run after this many instructions.
    pub max_steps: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            bits_per_cell: DEFAULT_BITS_PER_CELL,
            stack_depth: DEFAULT_STACK_DEPTH,
            memory_size: DEFAULT_MEMORY_SIZE,
            tib_offset: 50,
            dictionary_offset: 100,
            program_offset: 200,
            max_steps: None,
        }
    }
}

impl MachineConfig {
    pub fn with_bits_per_cell(mut self, bits: u32) -> Self {
        self.bits_per_cell = bits;
        self
    }

    pub fn with_stack_depth(mut self, depth: usize) -> Self {
        self.stack_depth = depth;
        self
    }

    pub fn with_memory_size(mut self, size: usize) -> Self {
        self.memory_size = size;
        self
    }

    pub fn with_program_offset(mut self, offset: usize) -> Self {
        self.program_offset = offset;
        self
    }

    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Check that a machine can be built from this configuration.
    pub fn validate(&self) -> Result<(), Error> {
        if !(1..=MAX_CELL_BITS).contains(&self.bits_per_cell) {
            return Err(Error::InvalidConfig(format!(
                "cells must be between 1 and {MAX_CELL_BITS} bits wide, got {}",
                self.bits_per_cell
            )));
        }
        if self.memory_size == 0 {
            return Err(Error::InvalidConfig("memory must hold at least one cell".to_string()));
        }
        if self.program_offset >= self.memory_size {
            return Err(Error::InvalidConfig(format!(
                "program offset {} is outside of memory ({} cells)",
                self.program_offset, self.memory_size
            )));
        }
        Ok(())
    }
}
