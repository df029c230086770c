// The three-address IR, plus the SAST -> TIR linearizing translator.
//
// `emit` is a recursive function returning the operand directly, in
// place of a work-stack of heterogeneous nodes with runtime downcasts —
// the same recursive-descent-with-return-value shape the parser already
// uses, just one IR stage further down.

use crate::air::ConditionCode;
use crate::ast::{self, BinOp, UnOp};
use crate::error::CompileError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TUnOp {
    Complement,
    Negate,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TBinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    LogAnd,
    LogOr,
    /// Carries the flags-register predicate a source relational operator
    /// (`== != < > <= >=`) lowers to.
    Relational(ConditionCode),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TValue {
    Integer(i32),
    Variable(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TInstruction {
    Return(TValue),
    Unary { op: TUnOp, src: TValue, dst: TValue },
    Binary { op: TBinOp, left: TValue, right: TValue, dst: TValue },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TFunction {
    pub name: String,
    pub instructions: Vec<TInstruction>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TProgram {
    pub functions: Vec<TFunction>,
}

fn map_unary(op: UnOp) -> TUnOp {
    match op {
        UnOp::Complement => TUnOp::Complement,
        UnOp::Negate => TUnOp::Negate,
        UnOp::Not => TUnOp::Not,
    }
}

fn map_binary(op: BinOp) -> TBinOp {
    match op {
        BinOp::Add => TBinOp::Add,
        BinOp::Sub => TBinOp::Sub,
        BinOp::Mul => TBinOp::Mul,
        BinOp::Div => TBinOp::Div,
        BinOp::Mod => TBinOp::Mod,
        BinOp::BitAnd => TBinOp::BitAnd,
        BinOp::BitOr => TBinOp::BitOr,
        BinOp::BitXor => TBinOp::BitXor,
        BinOp::Shl => TBinOp::Shl,
        BinOp::Shr => TBinOp::Shr,
        BinOp::LogAnd => TBinOp::LogAnd,
        BinOp::LogOr => TBinOp::LogOr,
        BinOp::Eq => TBinOp::Relational(ConditionCode::Equal),
        BinOp::NotEq => TBinOp::Relational(ConditionCode::NotEqual),
        BinOp::Lt => TBinOp::Relational(ConditionCode::LessThan),
        BinOp::Gt => TBinOp::Relational(ConditionCode::GreaterThan),
        BinOp::Lte => TBinOp::Relational(ConditionCode::LessOrEqual),
        BinOp::Gte => TBinOp::Relational(ConditionCode::GreaterOrEqual),
    }
}

/// Owns the per-translation-unit temporary-name counter: one monotonic
/// counter, never reset between functions, shared by every `emit` call
/// in the program.
struct Translator {
    next_temp: u32,
    instructions: Vec<TInstruction>,
}

impl Translator {
    fn new() -> Translator {
        Translator { next_temp: 0, instructions: Vec::new() }
    }

    fn fresh(&mut self) -> TValue {
        let name = format!("_tacky_temp_{}", self.next_temp);
        self.next_temp += 1;
        TValue::Variable(name)
    }

    fn push(&mut self, instr: TInstruction) {
        self.instructions.push(instr);
    }

    /// `emit(e) -> TValue`: computes `e`, appending instructions to the
    /// current function's list, and returns the value holding its result.
    /// Evaluation order is strictly left-then-right for binary nodes.
    fn emit(&mut self, expr: &ast::Expr) -> TValue {
        match expr {
            ast::Expr::Integer(n) => TValue::Integer(*n),
            ast::Expr::Unary { op, operand } => {
                let src = self.emit(operand);
                let dst = self.fresh();
                self.push(TInstruction::Unary { op: map_unary(*op), src, dst: dst.clone() });
                dst
            }
            ast::Expr::Binary { op, left, right } => {
                let lv = self.emit(left);
                let rv = self.emit(right);
                let dst = self.fresh();
                self.push(TInstruction::Binary { op: map_binary(*op), left: lv, right: rv, dst: dst.clone() });
                dst
            }
        }
    }

    fn emit_function(&mut self, function: &ast::Function) -> Result<TFunction, CompileError> {
        self.instructions.clear();
        for statement in &function.body.statements {
            let ast::Statement::Return { type_tag, value } = statement;
            if *type_tag != ast::TypeTag::Integer {
                return Err(CompileError::UnsupportedType("only `int` return types are supported"));
            }
            let result = self.emit(value);
            self.push(TInstruction::Return(result));
        }
        Ok(TFunction { name: function.name.clone(), instructions: std::mem::take(&mut self.instructions) })
    }
}

pub fn lower_program(program: &ast::Program) -> Result<TProgram, CompileError> {
    let mut translator = Translator::new();
    let mut functions = Vec::with_capacity(program.functions.len());
    for function in &program.functions {
        if function.return_type != ast::TypeTag::Integer {
            return Err(CompileError::UnsupportedType("only `int` return types are supported"));
        }
        functions.push(translator.emit_function(function)?);
    }
    Ok(TProgram { functions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_program;

    fn lower(src: &str) -> TFunction {
        let program = parse_program(src).unwrap();
        lower_program(&program).unwrap().functions.into_iter().next().unwrap()
    }

    #[test]
    fn constant_return_emits_no_instructions_before_return() {
        let f = lower("int main(){ return 2; }");
        assert_eq!(f.instructions, vec![TInstruction::Return(TValue::Integer(2))]);
    }

    #[test]
    fn nested_unaries_mint_three_temporaries_in_order() {
        // scenario S2: ~(-(~400))
        let f = lower("int main(){ return ~(-(~400)); }");
        assert_eq!(
            f.instructions,
            vec![
                TInstruction::Unary {
                    op: TUnOp::Complement,
                    src: TValue::Integer(400),
                    dst: TValue::Variable("_tacky_temp_0".into()),
                },
                TInstruction::Unary {
                    op: TUnOp::Negate,
                    src: TValue::Variable("_tacky_temp_0".into()),
                    dst: TValue::Variable("_tacky_temp_1".into()),
                },
                TInstruction::Unary {
                    op: TUnOp::Complement,
                    src: TValue::Variable("_tacky_temp_1".into()),
                    dst: TValue::Variable("_tacky_temp_2".into()),
                },
                TInstruction::Return(TValue::Variable("_tacky_temp_2".into())),
            ]
        );
    }

    #[test]
    fn precedence_expression_has_exactly_four_binaries_plus_return() {
        // scenario S3: 2*7%5 + 10 - 11
        let f = lower("int main(){ return 2*7%5 + 10 - 11; }");
        let binary_count = f.instructions.iter().filter(|i| matches!(i, TInstruction::Binary { .. })).count();
        assert_eq!(binary_count, 4);
        assert!(matches!(f.instructions.last(), Some(TInstruction::Return(_))));
    }

    #[test]
    fn temp_counter_does_not_reset_between_functions() {
        let program = parse_program("int main(){ return 1+2; } int other(){ return 3+4; }").unwrap();
        let lowered = lower_program(&program).unwrap();
        let first_dst = match &lowered.functions[0].instructions[0] {
            TInstruction::Binary { dst: TValue::Variable(n), .. } => n.clone(),
            _ => panic!("expected Binary"),
        };
        let second_dst = match &lowered.functions[1].instructions[0] {
            TInstruction::Binary { dst: TValue::Variable(n), .. } => n.clone(),
            _ => panic!("expected Binary"),
        };
        assert_eq!(first_dst, "_tacky_temp_0");
        assert_eq!(second_dst, "_tacky_temp_1");
    }

    #[test]
    fn non_integer_return_type_is_rejected() {
        // The grammar only ever produces `TypeTag::Integer` today, so this
        // exercises the guard directly rather than through the parser.
        let mut translator = Translator::new();
        let function = ast::Function {
            name: "f".into(),
            return_type: ast::TypeTag::Void,
            arguments: vec![],
            body: ast::StatementBlock { statements: vec![] },
        };
        let program = ast::Program { functions: vec![function] };
        let _ = translator; // silence unused warning if guard moves
        assert!(matches!(lower_program(&program), Err(CompileError::UnsupportedType(_))));
    }
}
