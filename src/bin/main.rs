use assembunny::instruction::Instruction;
use assembunny::operand::Operand::{Immediate, Register};
use assembunny::program::Program;
use assembunny::vm::Vm;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  fmt().with_env_filter(filter).with_target(false).init();

  let a = Register(0);
  let program: Program = vec![
    Instruction::copy(Immediate(2), a),
    Instruction::toggle(a),
    Instruction::toggle(a),
    Instruction::toggle(a),
    Instruction::copy(Immediate(1), a),
    Instruction::decrement(a),
    Instruction::decrement(a),
  ]
  .into();
  info!("running\n{program}");

  let mut vm = Vm::new([0; 4], program);
  match vm.run() {
    Ok(()) => info!(registers = ?vm.registers(), "finished\n{}", vm.program()),
    Err(err) => error!(pc = vm.pc(), "{err}"),
  }
}
