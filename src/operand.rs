use std::fmt;

use crate::vm::Error;

/// The type of a single register in our machine
pub type Word = i64;

/// An instruction argument, either a constant or a register slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
  Immediate(Word),
  Register(usize),
}

impl Operand {
  /// Resolve to an integer, reading the register file if needed
  pub fn value(&self, registers: &[Word]) -> Result<Word, Error> {
    match *self {
      Self::Immediate(value) => Ok(value),
      Self::Register(index) => registers
        .get(index)
        .copied()
        .ok_or(Error::RegisterOutOfRange {
          index,
          available: registers.len(),
        }),
    }
  }

  /// The register this operand names, `None` for immediates.
  ///
  /// Instructions that write use this to decide whether the write happens at
  /// all; an immediate destination makes the write a no-op.
  pub fn register(&self) -> Option<usize> {
    match *self {
      Self::Immediate(_) => None,
      Self::Register(index) => Some(index),
    }
  }
}

impl From<Word> for Operand {
  fn from(value: Word) -> Self {
    Self::Immediate(value)
  }
}

impl fmt::Display for Operand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      Self::Immediate(value) => write!(f, "{value}"),
      // a..z, like the puzzle
      Self::Register(index) if index < 26 => write!(f, "{}", (b'a' + index as u8) as char),
      Self::Register(index) => write!(f, "r{index}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn immediate_resolution() {
    let registers = [1, 2, 3, 4];
    let operand = Operand::Immediate(-7);
    assert_eq!(operand.value(&registers).unwrap(), -7);
    assert_eq!(operand.register(), None);
  }

  #[test]
  fn register_resolution() {
    let registers = [1, 2, 3, 4];
    let operand = Operand::Register(2);
    assert_eq!(operand.value(&registers).unwrap(), 3);
    assert_eq!(operand.register(), Some(2));
  }

  #[test]
  fn register_out_of_range() {
    let registers = [0; 4];
    let err = Operand::Register(4).value(&registers).unwrap_err();
    assert!(matches!(
      err,
      Error::RegisterOutOfRange {
        index: 4,
        available: 4
      }
    ));
  }

  #[test]
  fn display() {
    assert_eq!(Operand::Register(0).to_string(), "a");
    assert_eq!(Operand::Register(3).to_string(), "d");
    assert_eq!(Operand::Register(30).to_string(), "r30");
    assert_eq!(Operand::Immediate(-16).to_string(), "-16");
    assert_eq!(Operand::from(5), Operand::Immediate(5));
  }
}
