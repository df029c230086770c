// The source AST (SAST). A tree of five node families, built directly
// as Rust enums/structs — plain sum types plus `match`, rather than
// visitor-per-variant dispatch.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeTag {
    Integer,
    Void,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Complement,
    Negate,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
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
    Eq,
    NotEq,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl BinOp {
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::Gt | BinOp::Lte | BinOp::Gte
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Integer(i32),
    Unary { op: UnOp, operand: Box<Expr> },
    Binary { op: BinOp, left: Box<Expr>, right: Box<Expr> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    Return { type_tag: TypeTag, value: Expr },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatementBlock {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionArgument {
    pub type_tag: TypeTag,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub return_type: TypeTag,
    pub arguments: Vec<FunctionArgument>,
    pub body: StatementBlock,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    pub functions: Vec<Function>,
}
