use std::fmt;

use tracing::debug;

use crate::instruction::Instruction;
use crate::opcode::Opcode;

/// A `Program` is the fixed-length list of instructions our machine executes.
///
/// Its length never changes after construction, but `tgl` may relabel any
/// slot while it runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
  instructions: Vec<Instruction>,
}

impl From<Vec<Instruction>> for Program {
  fn from(instructions: Vec<Instruction>) -> Self {
    Self { instructions }
  }
}

impl FromIterator<Instruction> for Program {
  fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
    Self {
      instructions: iter.into_iter().collect(),
    }
  }
}

impl Program {
  pub fn len(&self) -> usize {
    self.instructions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.instructions.is_empty()
  }

  /// Fetch by a signed index, so negative program counters just miss
  pub fn get(&self, index: isize) -> Option<&Instruction> {
    let index = usize::try_from(index).ok()?;
    self.instructions.get(index)
  }

  pub fn contains(&self, index: isize) -> bool {
    self.get(index).is_some()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
    self.instructions.iter()
  }

  /// Toggle the instruction at `index`, returning its new opcode, or `None`
  /// (leaving the program untouched) if `index` is out of range
  pub fn toggle(&mut self, index: isize) -> Option<Opcode> {
    let len = self.instructions.len();
    let Some(instruction) = usize::try_from(index)
      .ok()
      .and_then(|index| self.instructions.get_mut(index))
    else {
      debug!(index, len, "toggle target out of range");
      return None;
    };
    let before = instruction.opcode();
    let after = instruction.toggle_in_place();
    debug!(index, %before, %after, "toggled");
    Some(after)
  }
}

impl<'a> IntoIterator for &'a Program {
  type Item = &'a Instruction;
  type IntoIter = std::slice::Iter<'a, Instruction>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl fmt::Display for Program {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for instruction in self {
      writeln!(f, "{instruction}")?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::operand::Operand::{Immediate, Register};

  fn sample() -> Program {
    vec![
      Instruction::copy(Immediate(2), Register(0)),
      Instruction::toggle(Register(0)),
      Instruction::decrement(Register(0)),
    ]
    .into()
  }

  #[test]
  fn get_signed() {
    let program = sample();
    assert_eq!(program.len(), 3);
    assert!(program.get(-1).is_none());
    assert!(program.get(3).is_none());
    assert_eq!(program.get(1), Some(&Instruction::toggle(Register(0))));
    assert!(program.contains(0));
    assert!(!program.contains(isize::MIN));
  }

  #[test]
  fn toggle_in_range() {
    let mut program = sample();
    assert_eq!(program.toggle(1), Some(Opcode::Increment));
    assert_eq!(program.toggle(1), Some(Opcode::Decrement));
    assert_eq!(program.toggle(2), Some(Opcode::Increment));
    assert_eq!(program.len(), 3);
  }

  #[test]
  fn toggle_out_of_range() {
    let mut program = sample();
    let before = program.clone();
    assert_eq!(program.toggle(3), None);
    assert_eq!(program.toggle(-1), None);
    assert_eq!(program, before);
  }

  #[test]
  fn display() {
    assert_eq!(sample().to_string(), "cpy 2 a\ntgl a\ndec a\n");
    assert!(Program::default().is_empty());
  }
}
