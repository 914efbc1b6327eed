//! The explicit state of a running machine.
use super::{Error, MachineConfig, Memory, Stack, StackKind};

/// Everything an instruction may read or change.
///
/// Instructions are executed against this state directly, so a single
/// step can be observed (and tested) without running a whole program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineState {
    /// The address of the next opcode to fetch.
    pub pc: usize,
    pub data_stack: Stack,
    pub return_stack: Stack,
    pub memory: Memory,
}

impl MachineState {
    /// Build a zeroed state for the given configuration, with the
    /// program counter at the start of the program region.
    ///
    /// # Panics
    ///
    /// Panics if the cell width is not in `1..=64`. Run
    /// [`MachineConfig::validate`] first, as [`VirtualMachine::new`](super::VirtualMachine::new) does.
    pub fn new(config: &MachineConfig) -> Self {
        let bits = config.bits_per_cell;
        Self {
            pc: config.program_offset,
            data_stack: Stack::new(StackKind::Data, config.stack_depth, bits),
            return_stack: Stack::new(StackKind::Return, config.stack_depth, bits),
            memory: Memory::new(config.memory_size, bits),
        }
    }

    /// The cell at the program counter.
    pub fn fetch(&self) -> Result<i64, Error> {
        self.memory.read(self.pc as i64)
    }

    /// Has the program counter walked off the end of memory?
    pub fn at_end(&self) -> bool {
        self.pc >= self.memory.size()
    }
}
