// The pseudo-replacement pass: walks a function's AIR and replaces
// every `Pseudo(name)` with a `Stack(offset)`. Structural rebuild
// only — no instruction is added, removed, or reordered.

use crate::air::{AFunction, AInstruction, AProgram, Operand};
use std::collections::HashMap;

/// Owns the per-function stack-offset map and counter. Reset at the
/// start of every function; offsets are dense multiples of 4 assigned in
/// order of first appearance.
struct StackAllocator {
    offsets: HashMap<String, i32>,
    cur: i32,
}

impl StackAllocator {
    fn new() -> StackAllocator {
        StackAllocator { offsets: HashMap::new(), cur: 0 }
    }

    fn resolve(&mut self, operand: Operand) -> Operand {
        match operand {
            Operand::Pseudo(name) => {
                let offset = *self.offsets.entry(name).or_insert_with(|| {
                    self.cur -= 4;
                    self.cur
                });
                Operand::Stack(offset)
            }
            other => other,
        }
    }

    fn max_offset(&self) -> i32 {
        -self.cur
    }

    fn rewrite(&mut self, instr: AInstruction) -> AInstruction {
        match instr {
            AInstruction::Mov { src, dst } => AInstruction::Mov { src: self.resolve(src), dst: self.resolve(dst) },
            AInstruction::Unary { op, operand } => AInstruction::Unary { op, operand: self.resolve(operand) },
            AInstruction::Binary { op, left, right } => {
                AInstruction::Binary { op, left: self.resolve(left), right: self.resolve(right) }
            }
            AInstruction::Idiv(operand) => AInstruction::Idiv(self.resolve(operand)),
            AInstruction::Cmp { left, right } => AInstruction::Cmp { left: self.resolve(left), right: self.resolve(right) },
            AInstruction::SetCC { cond, operand } => AInstruction::SetCC { cond, operand: self.resolve(operand) },
            AInstruction::Cdq
            | AInstruction::AllocateStack(_)
            | AInstruction::Ret
            | AInstruction::Label(_)
            | AInstruction::Jmp(_)
            | AInstruction::JmpCC { .. } => instr,
        }
    }

    fn run(&mut self, function: AFunction) -> (AFunction, i32) {
        self.offsets.clear();
        self.cur = 0;
        let instructions = function.instructions.into_iter().map(|i| self.rewrite(i)).collect();
        (AFunction { name: function.name, instructions }, self.max_offset())
    }
}

/// Runs pass H over every function. Returns each function paired with its
/// `maxOffset()` (consumed by pass I to size the prologue's stack frame).
pub fn allocate_stack_slots(program: AProgram) -> Vec<(AFunction, i32)> {
    let mut allocator = StackAllocator::new();
    program.functions.into_iter().map(|f| allocator.run(f)).collect()
}
