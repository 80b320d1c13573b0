use tracing::{debug, trace};

use crate::instruction::{Instruction, Operands};
use crate::opcode::Opcode;
use crate::operand::{Operand, Word};
use crate::program::Program;

/// Registers in the puzzle machine, `a` through `d`
pub const REGISTERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
  Active,
  Halted,
}

/// A virtual machine for assembunny.
///
/// The machine halts as soon as the program counter leaves the program, in
/// either direction. There is no other way to stop it: a program that loops
/// forever keeps [`Vm::run`] busy forever, use [`Vm::run_bounded`] to impose
/// a budget.
#[derive(Debug, Clone)]
pub struct Vm<const N: usize = REGISTERS> {
  pc: isize,
  registers: [Word; N],
  program: Program,
  state: State,
}

impl<const N: usize> Vm<N> {
  /// Create a machine about to execute the first instruction of `program`
  pub fn new(registers: [Word; N], program: Program) -> Self {
    let state = if program.is_empty() {
      State::Halted
    } else {
      State::Active
    };
    Self {
      pc: 0,
      registers,
      program,
      state,
    }
  }

  /// Execute a single instruction
  pub fn step(&mut self) -> Result<(), Error> {
    if self.state == State::Halted {
      return Err(Error::MachineHalted);
    }
    self.pc = step(self.pc, &mut self.registers, &mut self.program)?;
    if !self.program.contains(self.pc) {
      debug!(pc = self.pc, registers = ?self.registers, "halted");
      self.state = State::Halted;
    }
    Ok(())
  }

  /// Step until the program counter falls off the program
  pub fn run(&mut self) -> Result<(), Error> {
    while self.state == State::Active {
      self.step()?;
    }
    Ok(())
  }

  /// Like [`Vm::run`], but give up after `limit` instructions.
  ///
  /// Returns the number of instructions executed. On
  /// [`Error::StepLimitExceeded`] the machine is left where it stopped and
  /// can be resumed.
  pub fn run_bounded(&mut self, limit: usize) -> Result<usize, Error> {
    let mut steps = 0;
    while self.state == State::Active {
      if steps == limit {
        return Err(Error::StepLimitExceeded { limit });
      }
      self.step()?;
      steps += 1;
    }
    Ok(steps)
  }

  pub fn pc(&self) -> isize {
    self.pc
  }

  pub fn registers(&self) -> &[Word; N] {
    &self.registers
  }

  pub fn register(&self, index: usize) -> Option<Word> {
    self.registers.get(index).copied()
  }

  pub fn program(&self) -> &Program {
    &self.program
  }

  pub fn is_halted(&self) -> bool {
    self.state == State::Halted
  }

  pub fn into_registers(self) -> [Word; N] {
    self.registers
  }
}

impl<const N: usize> Default for Vm<N> {
  fn default() -> Self {
    Self::new([0; N], Program::default())
  }
}

/// An error that occurred during execution of instructions.
///
/// Writes to immediates and toggles that miss the program are not errors,
/// they just do nothing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  #[error("program counter {pc} is outside a program of {len} instructions")]
  ProgramCounterOutOfRange { pc: isize, len: usize },

  #[error("register {index} does not exist, only {available} available")]
  RegisterOutOfRange { index: usize, available: usize },

  #[error("`{opcode}` takes {expected} operand(s), got {found}")]
  ArityMismatch {
    opcode: Opcode,
    expected: usize,
    found: usize,
  },

  #[error("machine is halted")]
  MachineHalted,

  #[error("still running after {limit} steps")]
  StepLimitExceeded { limit: usize },
}

/// Execute `program[pc]` and return the next program counter.
///
/// `pc` must index into `program`; anything else is
/// [`Error::ProgramCounterOutOfRange`].
pub fn step(pc: isize, registers: &mut [Word], program: &mut Program) -> Result<isize, Error> {
  let instruction = *program.get(pc).ok_or(Error::ProgramCounterOutOfRange {
    pc,
    len: program.len(),
  })?;
  trace!(pc, %instruction, "step");
  let mut task = Task::new(pc, registers, program);
  task.run(instruction)
}

/// Run `program` from the top until the program counter leaves it, returning
/// the final register file. `program` keeps whatever toggles happened.
pub fn run<const N: usize>(
  mut registers: [Word; N],
  program: &mut Program,
) -> Result<[Word; N], Error> {
  let mut pc = 0;
  while program.contains(pc) {
    pc = step(pc, &mut registers, program)?;
  }
  Ok(registers)
}

struct Task<'a> {
  pc: isize,
  registers: &'a mut [Word],
  program: &'a mut Program,
}

impl<'a> Task<'a> {
  fn new(pc: isize, registers: &'a mut [Word], program: &'a mut Program) -> Self {
    Self {
      pc,
      registers,
      program,
    }
  }

  fn value(&self, operand: Operand) -> Result<Word, Error> {
    operand.value(self.registers)
  }

  /// The register `operand` names, or `None` if it is an immediate
  fn slot(&mut self, operand: Operand) -> Result<Option<&mut Word>, Error> {
    let Some(index) = operand.register() else {
      debug!(pc = self.pc, %operand, "write to immediate skipped");
      return Ok(None);
    };
    let available = self.registers.len();
    self
      .registers
      .get_mut(index)
      .map(Some)
      .ok_or(Error::RegisterOutOfRange { index, available })
  }

  /// `pc + by`, anything that overflows is out of range anyway
  fn relative(&self, by: Word) -> isize {
    let by = isize::try_from(by).unwrap_or(if by < 0 { isize::MIN } else { isize::MAX });
    self.pc.saturating_add(by)
  }

  fn run(&mut self, instruction: Instruction) -> Result<isize, Error> {
    let opcode = instruction.opcode();
    match (opcode, instruction.operands()) {
      (Opcode::Copy, Operands::Binary(x, y)) => copy(self, x, y),
      (Opcode::Increment, Operands::Unary(x)) => increment(self, x),
      (Opcode::Decrement, Operands::Unary(x)) => decrement(self, x),
      (Opcode::JumpIfNonZero, Operands::Binary(x, y)) => jump_if_non_zero(self, x, y),
      (Opcode::Toggle, Operands::Unary(x)) => toggle(self, x),
      // only reachable if an instruction was put together by hand wrongly
      (opcode, operands) => Err(Error::ArityMismatch {
        opcode,
        expected: opcode.arity(),
        found: operands.count(),
      }),
    }
  }
}

// r[y] ← x
fn copy(task: &mut Task<'_>, x: Operand, y: Operand) -> Result<isize, Error> {
  // nowhere to write, so x is never read
  if y.register().is_none() {
    debug!(pc = task.pc, %y, "write to immediate skipped");
    return Ok(task.pc + 1);
  }
  let value = task.value(x)?;
  if let Some(slot) = task.slot(y)? {
    *slot = value;
  }
  Ok(task.pc + 1)
}

// r[x] ← r[x] + 1
fn increment(task: &mut Task<'_>, x: Operand) -> Result<isize, Error> {
  if let Some(slot) = task.slot(x)? {
    *slot = slot.wrapping_add(1);
  }
  Ok(task.pc + 1)
}

// r[x] ← r[x] − 1
fn decrement(task: &mut Task<'_>, x: Operand) -> Result<isize, Error> {
  if let Some(slot) = task.slot(x)? {
    *slot = slot.wrapping_sub(1);
  }
  Ok(task.pc + 1)
}

// if x != 0 : pc ← pc + y
fn jump_if_non_zero(task: &mut Task<'_>, x: Operand, y: Operand) -> Result<isize, Error> {
  if task.value(x)? == 0 {
    return Ok(task.pc + 1);
  }
  let offset = task.value(y)?;
  Ok(task.relative(offset))
}

// code[pc + x] ← toggled(code[pc + x])
fn toggle(task: &mut Task<'_>, x: Operand) -> Result<isize, Error> {
  let target = task.relative(task.value(x)?);
  // out of range is a no-op, the program logs it
  task.program.toggle(target);
  Ok(task.pc + 1)
}
