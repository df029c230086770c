// Serializes a legal AIR to GNU-assembler text. Operands must already
// be legal here -- encountering a `Pseudo` is an `InternalInvariant`,
// not a `SyntaxError`: it means the stack-allocation or legalization
// pass failed to uphold its contract.

use crate::air::{AFunction, AInstruction, AProgram, BinaryOp, ConditionCode, Operand, Register, UnaryOp};
use crate::error::{CompileError, DriverError, IoErrorContext};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write as _IoWrite};
use std::path::{Path, PathBuf};

fn register32(r: Register) -> &'static str {
    match r {
        Register::AX => "%eax",
        Register::DX => "%edx",
        Register::R10 => "%r10d",
        Register::R11 => "%r11d",
    }
}

fn register8(r: Register) -> &'static str {
    match r {
        Register::AX => "%al",
        Register::DX => "%dl",
        Register::R10 => "%r10b",
        Register::R11 => "%r11b",
    }
}

fn condition_suffix(cond: ConditionCode) -> &'static str {
    match cond {
        ConditionCode::Equal => "e",
        ConditionCode::NotEqual => "ne",
        ConditionCode::LessThan => "l",
        ConditionCode::LessOrEqual => "le",
        ConditionCode::GreaterThan => "g",
        ConditionCode::GreaterOrEqual => "ge",
    }
}

fn operand32(op: &Operand) -> Result<String, CompileError> {
    match op {
        Operand::Immediate(n) => Ok(format!("${n}")),
        Operand::Register(r) => Ok(register32(*r).to_string()),
        Operand::Stack(off) => Ok(format!("{off}(%rbp)")),
        Operand::Pseudo(name) => {
            Err(CompileError::InternalInvariant(format!("pseudo operand '{name}' reached the emitter")))
        }
    }
}

fn operand8(op: &Operand) -> Result<String, CompileError> {
    match op {
        Operand::Register(r) => Ok(register8(*r).to_string()),
        Operand::Stack(off) => Ok(format!("{off}(%rbp)")),
        Operand::Immediate(_) => Err(CompileError::InternalInvariant(
            "SetCC operand must not be an immediate".to_string(),
        )),
        Operand::Pseudo(name) => {
            Err(CompileError::InternalInvariant(format!("pseudo operand '{name}' reached the emitter")))
        }
    }
}

fn binary_mnemonic(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "addl",
        BinaryOp::Sub => "subl",
        BinaryOp::Mult => "imull",
        BinaryOp::BitAnd => "andl",
        BinaryOp::BitOr => "orl",
        BinaryOp::BitXor => "xorl",
        BinaryOp::Sal => "sall",
        BinaryOp::Sar => "sarl",
    }
}

fn emit_instruction(instr: &AInstruction, out: &mut String) -> Result<(), CompileError> {
    match instr {
        AInstruction::Mov { src, dst } => {
            writeln!(out, "\tmovl {}, {}", operand32(src)?, operand32(dst)?).unwrap();
        }
        AInstruction::Unary { op, operand } => {
            let mnemonic = match op {
                UnaryOp::Neg => "negl",
                UnaryOp::Not => "notl",
            };
            writeln!(out, "\t{mnemonic} {}", operand32(operand)?).unwrap();
        }
        AInstruction::Binary { op, left, right } => {
            writeln!(out, "\t{} {}, {}", binary_mnemonic(*op), operand32(left)?, operand32(right)?).unwrap();
        }
        AInstruction::Idiv(op) => {
            writeln!(out, "\tidivl {}", operand32(op)?).unwrap();
        }
        AInstruction::Cdq => {
            writeln!(out, "\tcdq").unwrap();
        }
        AInstruction::AllocateStack(n) => {
            writeln!(out, "\tsubq ${n}, %rsp").unwrap();
        }
        AInstruction::Ret => {
            writeln!(out, "\tmovq %rbp, %rsp").unwrap();
            writeln!(out, "\tpopq %rbp").unwrap();
            writeln!(out, "\tret").unwrap();
        }
        AInstruction::Cmp { left, right } => {
            writeln!(out, "\tcmpl {}, {}", operand32(left)?, operand32(right)?).unwrap();
        }
        AInstruction::SetCC { cond, operand } => {
            writeln!(out, "\tset{} {}", condition_suffix(*cond), operand8(operand)?).unwrap();
        }
        AInstruction::Label(name) => {
            writeln!(out, "{name}:").unwrap();
        }
        AInstruction::Jmp(target) => {
            writeln!(out, "\tjmp {target}").unwrap();
        }
        AInstruction::JmpCC { cond, target } => {
            writeln!(out, "\tj{} {target}", condition_suffix(*cond)).unwrap();
        }
    }
    Ok(())
}

fn emit_function(function: &AFunction, out: &mut String) -> Result<(), CompileError> {
    writeln!(out, "\t.globl {}", function.name).unwrap();
    writeln!(out, "{}:", function.name).unwrap();
    writeln!(out, "\tpushq %rbp").unwrap();
    writeln!(out, "\tmovq %rsp, %rbp").unwrap();
    for instr in &function.instructions {
        emit_instruction(instr, out)?;
    }
    Ok(())
}

/// Serializes a legal AIR program to GAS text. The file ends with a
/// `.note.GNU-stack` section so the emitted object is marked with a
/// non-executable stack.
pub fn emit_program(program: &AProgram) -> Result<String, CompileError> {
    let mut out = String::new();
    for function in &program.functions {
        emit_function(function, &mut out)?;
    }
    writeln!(out, "\t.section .note.GNU-stack,\"\",@progbits").unwrap();
    Ok(out)
}

/// Scopes the output file's lifetime: opened at construction, released
/// when `dump()` returns or the `Emitter` is dropped, whichever is
/// sooner. Exiting by any path -- success or error -- flushes and
/// closes, since `BufWriter`'s `Drop` impl does.
pub struct Emitter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl Emitter {
    pub fn create(path: &Path) -> Result<Emitter, DriverError> {
        let file = File::create(path)
            .map_err(|err| DriverError::Io(err, IoErrorContext::WriteOutput, path.to_path_buf()))?;
        Ok(Emitter { path: path.to_path_buf(), writer: BufWriter::new(file) })
    }

    pub fn dump(mut self, program: &AProgram) -> Result<(), DriverError> {
        let text = emit_program(program)?;
        self.writer
            .write_all(text.as_bytes())
            .map_err(|err| DriverError::Io(err, IoErrorContext::WriteOutput, self.path.clone()))?;
        Ok(())
    }
}
