//! Bare-bones interpreter for the assembunny register machine
//!
//! <https://adventofcode.com/2016/day/23>
//!
//! four registers, five instructions, and one of them rewrites the others.

pub mod instruction;
pub mod opcode;
pub mod operand;
pub mod program;
pub mod vm;
