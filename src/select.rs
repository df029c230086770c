// TIR -> AIR instruction selection. Operand lowering is fixed
// (`Integer -> Immediate`, `Variable -> Pseudo`); every TIR instruction
// expands to a short, fixed sequence of AIR instructions, emitted in
// order. Nothing here chooses a stack slot or rewrites an illegal
// operand combination — that's the later passes' job.

use crate::air::{AFunction, AInstruction, AProgram, BinaryOp, ConditionCode, Operand, Register, UnaryOp};
use crate::tir::{TBinOp, TFunction, TInstruction, TProgram, TUnOp, TValue};

fn lower_value(value: &TValue) -> Operand {
    match value {
        TValue::Integer(n) => Operand::Immediate(*n),
        TValue::Variable(name) => Operand::Pseudo(name.clone()),
    }
}

/// Owns the per-function label counter used to mint short-circuit branch
/// targets for `&&`/`||`. Reset at the start of every function, the same
/// way the pseudo-replacement pass resets its stack-offset counter per
/// function.
struct Selector {
    next_label: u32,
    out: Vec<AInstruction>,
}

impl Selector {
    fn new() -> Selector {
        Selector { next_label: 0, out: Vec::new() }
    }

    fn label(&mut self, tag: &str) -> String {
        let name = format!(".Lcc_{tag}_{}", self.next_label);
        self.next_label += 1;
        name
    }

    fn push(&mut self, instr: AInstruction) {
        self.out.push(instr);
    }

    fn select_unary(&mut self, op: TUnOp, src: &TValue, dst: &TValue) {
        let src = lower_value(src);
        let dst = lower_value(dst);
        match op {
            TUnOp::Complement => {
                self.push(AInstruction::Mov { src, dst: dst.clone() });
                self.push(AInstruction::Unary { op: UnaryOp::Not, operand: dst });
            }
            TUnOp::Negate => {
                self.push(AInstruction::Mov { src, dst: dst.clone() });
                self.push(AInstruction::Unary { op: UnaryOp::Neg, operand: dst });
            }
            TUnOp::Not => {
                // Logical not: dst = (src == 0).
                self.push(AInstruction::Cmp { left: Operand::Immediate(0), right: src });
                self.push(AInstruction::Mov { src: Operand::Immediate(0), dst: dst.clone() });
                self.push(AInstruction::SetCC { cond: ConditionCode::Equal, operand: dst });
            }
        }
    }

    fn select_short_circuit(&mut self, is_and: bool, left: &TValue, right: &TValue, dst: &TValue) {
        let left = lower_value(left);
        let right = lower_value(right);
        let dst = lower_value(dst);
        let short_circuit_cond = if is_and { ConditionCode::Equal } else { ConditionCode::NotEqual };
        let short_circuit_value = if is_and { 0 } else { 1 };
        let fall_through_value = 1 - short_circuit_value;
        let short_circuit_label = self.label(if is_and { "false" } else { "true" });
        let end_label = self.label("end");

        self.push(AInstruction::Cmp { left: Operand::Immediate(0), right: left });
        self.push(AInstruction::JmpCC { cond: short_circuit_cond, target: short_circuit_label.clone() });
        self.push(AInstruction::Cmp { left: Operand::Immediate(0), right });
        self.push(AInstruction::JmpCC { cond: short_circuit_cond, target: short_circuit_label.clone() });
        self.push(AInstruction::Mov { src: Operand::Immediate(fall_through_value), dst: dst.clone() });
        self.push(AInstruction::Jmp(end_label.clone()));
        self.push(AInstruction::Label(short_circuit_label));
        self.push(AInstruction::Mov { src: Operand::Immediate(short_circuit_value), dst });
        self.push(AInstruction::Label(end_label));
    }

    fn select_binary(&mut self, op: TBinOp, left: &TValue, right: &TValue, dst: &TValue) {
        if let TBinOp::LogAnd | TBinOp::LogOr = op {
            self.select_short_circuit(matches!(op, TBinOp::LogAnd), left, right, dst);
            return;
        }

        let l = lower_value(left);
        let r = lower_value(right);
        let d = lower_value(dst);
        match op {
            TBinOp::Add | TBinOp::Sub | TBinOp::Mul | TBinOp::BitAnd | TBinOp::BitOr | TBinOp::BitXor => {
                let arith = match op {
                    TBinOp::Add => BinaryOp::Add,
                    TBinOp::Sub => BinaryOp::Sub,
                    TBinOp::Mul => BinaryOp::Mult,
                    TBinOp::BitAnd => BinaryOp::BitAnd,
                    TBinOp::BitOr => BinaryOp::BitOr,
                    TBinOp::BitXor => BinaryOp::BitXor,
                    _ => unreachable!(),
                };
                self.push(AInstruction::Mov { src: l, dst: d.clone() });
                self.push(AInstruction::Binary { op: arith, left: r, right: d });
            }
            TBinOp::Shl | TBinOp::Shr => {
                let shift = if op == TBinOp::Shl { BinaryOp::Sal } else { BinaryOp::Sar };
                self.push(AInstruction::Mov { src: l, dst: d.clone() });
                self.push(AInstruction::Binary { op: shift, left: r, right: d });
            }
            TBinOp::Div | TBinOp::Mod => {
                self.push(AInstruction::Mov { src: l, dst: Operand::Register(Register::AX) });
                self.push(AInstruction::Cdq);
                self.push(AInstruction::Idiv(r));
                let result_reg = if op == TBinOp::Div { Register::AX } else { Register::DX };
                self.push(AInstruction::Mov { src: Operand::Register(result_reg), dst: d });
            }
            TBinOp::Relational(cond) => {
                // spec's "Cmp right, left": the TIR right operand is the
                // instruction's left field, so flags read `left - right`.
                self.push(AInstruction::Cmp { left: r, right: l });
                self.push(AInstruction::Mov { src: Operand::Immediate(0), dst: d.clone() });
                self.push(AInstruction::SetCC { cond, operand: d });
            }
            TBinOp::LogAnd | TBinOp::LogOr => unreachable!("handled above"),
        }
    }

    fn select_function(&mut self, function: &TFunction) -> AFunction {
        self.out.clear();
        self.next_label = 0;
        for instr in &function.instructions {
            match instr {
                TInstruction::Return(v) => {
                    self.push(AInstruction::Mov { src: lower_value(v), dst: Operand::Register(Register::AX) });
                    self.push(AInstruction::Ret);
                }
                TInstruction::Unary { op, src, dst } => self.select_unary(*op, src, dst),
                TInstruction::Binary { op, left, right, dst } => self.select_binary(*op, left, right, dst),
            }
        }
        AFunction { name: function.name.clone(), instructions: std::mem::take(&mut self.out) }
    }
}

pub fn select_program(program: &TProgram) -> AProgram {
    let mut selector = Selector::new();
    let functions = program.functions.iter().map(|f| selector.select_function(f)).collect();
    AProgram { functions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_program;
    use crate::tir::lower_program;

    fn select(src: &str) -> AFunction {
        let program = parse_program(src).unwrap();
        let tir = lower_program(&program).unwrap();
        select_program(&tir).functions.into_iter().next().unwrap()
    }

    #[test]
    fn constant_return_lowers_to_mov_ret() {
        let f = select("int main(){ return 2; }");
        assert_eq!(
            f.instructions,
            vec![
                AInstruction::Mov { src: Operand::Immediate(2), dst: Operand::Register(Register::AX) },
                AInstruction::Ret,
            ]
        );
    }

    #[test]
    fn division_uses_ax_dx_cdq_idiv() {
        // scenario S5: 20/6
        let f = select("int main(){ return 20/6; }");
        assert!(f.instructions.iter().any(|i| matches!(i, AInstruction::Cdq)));
        assert!(f.instructions.iter().any(|i| matches!(i, AInstruction::Idiv(_))));
        assert!(matches!(
            &f.instructions[0],
            AInstruction::Mov { src: Operand::Immediate(20), dst: Operand::Register(Register::AX) }
        ));
    }

    #[test]
    fn modulo_reads_remainder_from_dx() {
        let f = select("int main(){ return 20%6; }");
        let last_mov_before_ret = f.instructions.iter().rev().find_map(|i| match i {
            AInstruction::Mov { src: Operand::Register(Register::DX), dst } => Some(dst.clone()),
            _ => None,
        });
        assert!(last_mov_before_ret.is_some());
    }

    #[test]
    fn logical_not_emits_cmp_zero_and_sete() {
        let f = select("int main(){ return !0; }");
        assert!(f.instructions.iter().any(|i| matches!(i, AInstruction::Cmp { .. })));
        assert!(f.instructions.iter().any(|i| matches!(i, AInstruction::SetCC { cond: ConditionCode::Equal, .. })));
    }

    #[test]
    fn logical_and_emits_short_circuit_labels() {
        let f = select("int main(){ return 1 && 0; }");
        let labels: Vec<_> = f
            .instructions
            .iter()
            .filter_map(|i| match i {
                AInstruction::Label(name) => Some(name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].starts_with(".Lcc_false_"));
        assert!(labels[1].starts_with(".Lcc_end_"));
    }

    #[test]
    fn logical_or_short_circuits_on_true() {
        let f = select("int main(){ return 1 || 0; }");
        let labels: Vec<_> = f
            .instructions
            .iter()
            .filter_map(|i| match i {
                AInstruction::Label(name) => Some(name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].starts_with(".Lcc_true_"));
    }

    #[test]
    fn relational_emits_cmp_with_swapped_operands() {
        let f = select("int main(){ return 3 < 4; }");
        match &f.instructions[0] {
            AInstruction::Cmp { left: Operand::Immediate(4), right: Operand::Immediate(3) } => {}
            other => panic!("unexpected first instruction: {other:?}"),
        }
    }
}
