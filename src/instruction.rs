use std::fmt;

use crate::opcode::Opcode;
use crate::operand::Operand;
use crate::vm::Error;

/// The arguments of an instruction, fixed once it is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operands {
  Unary(Operand),
  Binary(Operand, Operand),
}

impl Operands {
  pub fn count(&self) -> usize {
    match self {
      Self::Unary(_) => 1,
      Self::Binary(..) => 2,
    }
  }
}

/// A single line of a program.
///
/// Only the opcode can change after construction (see [`Opcode::toggled`]);
/// the operands stay exactly as they were built and are reused positionally
/// by whatever the opcode becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
  opcode: Opcode,
  operands: Operands,
}

impl Instruction {
  /// Build an instruction, checking the operand count against the opcode
  pub fn new(opcode: Opcode, operands: &[Operand]) -> Result<Self, Error> {
    let operands = match (opcode.arity(), operands) {
      (1, &[x]) => Operands::Unary(x),
      (2, &[x, y]) => Operands::Binary(x, y),
      (expected, found) => {
        return Err(Error::ArityMismatch {
          opcode,
          expected,
          found: found.len(),
        })
      }
    };
    Ok(Self { opcode, operands })
  }

  pub fn copy(src: Operand, dst: Operand) -> Self {
    Self::binary(Opcode::Copy, src, dst)
  }

  pub fn increment(x: Operand) -> Self {
    Self::unary(Opcode::Increment, x)
  }

  pub fn decrement(x: Operand) -> Self {
    Self::unary(Opcode::Decrement, x)
  }

  pub fn jump_if_non_zero(x: Operand, offset: Operand) -> Self {
    Self::binary(Opcode::JumpIfNonZero, x, offset)
  }

  pub fn toggle(x: Operand) -> Self {
    Self::unary(Opcode::Toggle, x)
  }

  fn unary(opcode: Opcode, x: Operand) -> Self {
    Self {
      opcode,
      operands: Operands::Unary(x),
    }
  }

  fn binary(opcode: Opcode, x: Operand, y: Operand) -> Self {
    Self {
      opcode,
      operands: Operands::Binary(x, y),
    }
  }

  pub fn opcode(&self) -> Opcode {
    self.opcode
  }

  pub fn operands(&self) -> Operands {
    self.operands
  }

  /// Swap the opcode for its toggled counterpart, returning the new one
  pub(crate) fn toggle_in_place(&mut self) -> Opcode {
    self.opcode = self.opcode.toggled();
    self.opcode
  }
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.operands {
      Operands::Unary(x) => write!(f, "{} {x}", self.opcode),
      Operands::Binary(x, y) => write!(f, "{} {x} {y}", self.opcode),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use Operand::{Immediate, Register};

  #[test]
  fn new_checks_arity() {
    let ok = Instruction::new(Opcode::Copy, &[Immediate(1), Register(0)]).unwrap();
    assert_eq!(ok, Instruction::copy(Immediate(1), Register(0)));

    let err = Instruction::new(Opcode::Increment, &[Register(0), Register(1)]).unwrap_err();
    assert!(matches!(
      err,
      Error::ArityMismatch {
        opcode: Opcode::Increment,
        expected: 1,
        found: 2
      }
    ));

    let err = Instruction::new(Opcode::JumpIfNonZero, &[]).unwrap_err();
    assert!(matches!(
      err,
      Error::ArityMismatch {
        expected: 2,
        found: 0,
        ..
      }
    ));
  }

  #[test]
  fn toggle_keeps_operands() {
    let mut instruction = Instruction::copy(Immediate(1), Register(2));
    assert_eq!(instruction.toggle_in_place(), Opcode::JumpIfNonZero);
    assert_eq!(
      instruction.operands(),
      Operands::Binary(Immediate(1), Register(2))
    );
    assert_eq!(instruction.operands().count(), 2);
  }

  #[test]
  fn display() {
    assert_eq!(
      Instruction::copy(Immediate(-16), Register(2)).to_string(),
      "cpy -16 c"
    );
    assert_eq!(Instruction::toggle(Register(0)).to_string(), "tgl a");
    assert_eq!(
      Instruction::jump_if_non_zero(Register(3), Immediate(-2)).to_string(),
      "jnz d -2"
    );
  }
}
