//! # Interpreter
//!
//! The fetch-decode-execute loop. A [`VirtualMachine`] owns its
//! configuration, its instruction set, and its [`MachineState`], and
//! runs one program until it halts or fails.
use super::{
    Error, Instruction, InstructionSet, MachineConfig, MachineState, Memory, Program, Stack,
};
use core::fmt;
use log::{debug, info, trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};

/// Why a run stopped without an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Halt {
    /// The program counter walked off the end of memory.
    EndOfProgram,
    /// The caller asked the machine to stop. `pc` is the next
    /// instruction that would have run.
    Cancelled { pc: usize },
    /// The configured step budget was used up.
    StepLimit { steps: u64 },
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::EndOfProgram => write!(f, "end of program"),
            Halt::Cancelled { pc } => write!(f, "cancelled before address {pc}"),
            Halt::StepLimit { steps } => write!(f, "step limit reached after {steps} steps"),
        }
    }
}

/// The outcome of a single step.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    Continue,
    Halt(Halt),
}

/// The interpreter which runs the virtual machine program.
#[derive(Clone, Debug)]
pub struct VirtualMachine {
    config: MachineConfig,
    instructions: InstructionSet,
    state: MachineState,
    /// Instructions executed since construction or the last reset.
    steps: u64,
}

impl Default for VirtualMachine {
    fn default() -> Self {
        let config = MachineConfig::default();
        Self {
            state: MachineState::new(&config),
            config,
            instructions: InstructionSet::default(),
            steps: 0,
        }
    }
}

impl VirtualMachine {
    /// Build a machine with every operation registered.
    pub fn new(config: MachineConfig) -> Result<Self, Error> {
        Self::with_instruction_set(config, InstructionSet::default())
    }

    /// Build a machine that only understands the given instruction set.
    pub fn with_instruction_set(
        config: MachineConfig,
        instructions: InstructionSet,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            state: MachineState::new(&config),
            config,
            instructions,
            steps: 0,
        })
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn instruction_set(&self) -> &InstructionSet {
        &self.instructions
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Mutable access to the state, for seeding stacks or memory before a run.
    pub fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    pub fn pc(&self) -> usize {
        self.state.pc
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn data_stack(&self) -> &Stack {
        &self.state.data_stack
    }

    pub fn return_stack(&self) -> &Stack {
        &self.state.return_stack
    }

    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    /// Place a program in the program region and point the program
    /// counter at its first cell.
    pub fn load(&mut self, program: &Program) -> Result<(), Error> {
        let offset = self.config.program_offset;
        self.state.memory.load(offset, program.cells())?;
        self.state.pc = offset;
        debug!("loaded {} cells at address {offset}", program.len());
        Ok(())
    }

    /// Empty both stacks, zero memory, and rewind the program counter.
    pub fn reset(&mut self) {
        self.state.data_stack.flush();
        self.state.return_stack.flush();
        self.state.memory.clear();
        self.state.pc = self.config.program_offset;
        self.steps = 0;
    }

    /// Run a single fetch-decode-execute cycle.
    pub fn step(&mut self) -> Result<Step, Error> {
        if self.state.at_end() {
            return Ok(Step::Halt(Halt::EndOfProgram));
        }

        let address = self.state.pc;
        let cell = self.state.fetch()?;
        let op = self
            .instructions
            .decode(cell)
            .ok_or(Error::UnknownOpcode {
                opcode: cell,
                address,
            })?;

        trace!("{address:>6}: {op:<8} |{}", self.state.data_stack);
        op.execute(&mut self.state, &self.instructions)?;
        self.steps += 1;

        if self.state.at_end() {
            Ok(Step::Halt(Halt::EndOfProgram))
        } else {
            Ok(Step::Continue)
        }
    }

    /// Run until the program halts or fails.
    pub fn run(&mut self) -> Result<Halt, Error> {
        self.run_until(|| false)
    }

    /// Run until the program halts or fails, or until `cancel` is set.
    /// The flag is checked between instructions.
    pub fn run_with_cancel(&mut self, cancel: &AtomicBool) -> Result<Halt, Error> {
        self.run_until(|| cancel.load(Ordering::Relaxed))
    }

    fn run_until(&mut self, mut cancelled: impl FnMut() -> bool) -> Result<Halt, Error> {
        info!("running from address {}", self.state.pc);
        loop {
            if cancelled() {
                let halt = Halt::Cancelled { pc: self.state.pc };
                debug!("{halt}");
                return Ok(halt);
            }
            if let Some(max) = self.config.max_steps {
                if self.steps >= max {
                    let halt = Halt::StepLimit { steps: self.steps };
                    debug!("{halt}");
                    return Ok(halt);
                }
            }

            match self.step() {
                Ok(Step::Continue) => {}
                Ok(Step::Halt(halt)) => {
                    debug!("{halt} after {} steps", self.steps);
                    return Ok(halt);
                }
                Err(e) => {
                    warn!("{e} (pc = {})", self.state.pc);
                    return Err(e);
                }
            }
        }
    }
}

impl fmt::Display for VirtualMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pc: {}", self.state.pc)?;
        writeln!(f, "data stack:  {}", self.state.data_stack)?;
        write!(f, "return stack:{}", self.state.return_stack)
    }
}
