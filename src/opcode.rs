use std::fmt;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
  /// Copies a value into a register.
  ///
  /// | Operation | Semantics/RTL                     | Assembly  |
  /// |-----------|-----------------------------------|-----------|
  /// | Copy      | `r[y] ← x` (skipped if `y` is not a register) | `cpy x y` |
  Copy = 0x0,

  /// | Operation | Semantics/RTL     | Assembly |
  /// |-----------|-------------------|----------|
  /// | Increment | `r[x] ← r[x] + 1` | `inc x`  |
  Increment = 0x1,

  /// | Operation | Semantics/RTL     | Assembly |
  /// |-----------|-------------------|----------|
  /// | Decrement | `r[x] ← r[x] − 1` | `dec x`  |
  Decrement = 0x2,

  /// Jumps relative to itself when the condition is nonzero.
  ///
  /// | Operation      | Semantics/RTL               | Assembly  |
  /// |----------------|-----------------------------|-----------|
  /// | JumpIfNonZero  | `if x != 0 : pc ← pc + y`   | `jnz x y` |
  ///
  /// Both `x` and `y` are read at execution time, so `y` may be a register.
  JumpIfNonZero = 0x3,

  /// Rewrites the opcode of another instruction, see [`Opcode::toggled`].
  ///
  /// | Operation | Semantics/RTL                            | Assembly |
  /// |-----------|------------------------------------------|----------|
  /// | Toggle    | `code[pc + x] ← toggled(code[pc + x])`   | `tgl x`  |
  Toggle = 0x4,
}

impl Opcode {
  /// Number of operands an instruction with this opcode carries
  pub const fn arity(self) -> usize {
    match self {
      Self::Copy | Self::JumpIfNonZero => 2,
      Self::Increment | Self::Decrement | Self::Toggle => 1,
    }
  }

  /// The opcode an instruction takes on after being hit by `tgl`.
  ///
  /// | Before | After |
  /// |--------|-------|
  /// | `inc`  | `dec` |
  /// | `dec`  | `inc` |
  /// | `tgl`  | `inc` |
  /// | `jnz`  | `cpy` |
  /// | `cpy`  | `jnz` |
  ///
  /// Not an involution: `tgl` toggled twice ends up as `dec`. Arity is
  /// always preserved.
  pub const fn toggled(self) -> Self {
    match self {
      Self::Increment => Self::Decrement,
      Self::Decrement => Self::Increment,
      Self::Toggle => Self::Increment,
      Self::JumpIfNonZero => Self::Copy,
      Self::Copy => Self::JumpIfNonZero,
    }
  }

  pub const fn mnemonic(self) -> &'static str {
    match self {
      Self::Copy => "cpy",
      Self::Increment => "inc",
      Self::Decrement => "dec",
      Self::JumpIfNonZero => "jnz",
      Self::Toggle => "tgl",
    }
  }
}

impl fmt::Display for Opcode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.mnemonic())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL: [Opcode; 5] = [
    Opcode::Copy,
    Opcode::Increment,
    Opcode::Decrement,
    Opcode::JumpIfNonZero,
    Opcode::Toggle,
  ];

  #[test]
  fn toggled_table() {
    assert_eq!(Opcode::Increment.toggled(), Opcode::Decrement);
    assert_eq!(Opcode::Decrement.toggled(), Opcode::Increment);
    assert_eq!(Opcode::Toggle.toggled(), Opcode::Increment);
    assert_eq!(Opcode::JumpIfNonZero.toggled(), Opcode::Copy);
    assert_eq!(Opcode::Copy.toggled(), Opcode::JumpIfNonZero);
  }

  #[test]
  fn toggled_keeps_arity() {
    for op in ALL {
      assert_eq!(op.arity(), op.toggled().arity(), "{op}");
    }
  }

  #[test]
  fn toggle_is_not_an_involution() {
    assert_eq!(Opcode::Toggle.toggled().toggled(), Opcode::Decrement);
    // everything else flips back
    for op in ALL.into_iter().filter(|op| *op != Opcode::Toggle) {
      assert_eq!(op.toggled().toggled(), op);
    }
  }

  #[test]
  fn mnemonics() {
    let names: Vec<String> = ALL.iter().map(ToString::to_string).collect();
    assert_eq!(names, ["cpy", "inc", "dec", "jnz", "tgl"]);
  }
}
