// Optional Graphviz `.dot` dumps of SAST/TIR/AIR, for visual debugging,
// wired behind the CLI's `--dump-dot` flag. Node labeling is a plain
// recursive function over the enum -- the same match-based traversal
// every other pass in this crate uses.

use crate::air::{AInstruction, AProgram, Operand};
use crate::ast::{Expr, Program};
use crate::tir::{TInstruction, TProgram, TValue};
use std::fmt::Write as _;

struct NodeIds {
    next: u32,
}

impl NodeIds {
    fn new() -> NodeIds {
        NodeIds { next: 0 }
    }

    fn fresh(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

fn node(out: &mut String, id: u32, label: &str) {
    writeln!(out, "\tn{id} [label=\"{}\"];", label.replace('"', "\\\"")).unwrap();
}

fn edge(out: &mut String, parent: u32, child: u32) {
    writeln!(out, "\tn{parent} -> n{child};").unwrap();
}

fn dump_expr(ids: &mut NodeIds, out: &mut String, expr: &Expr) -> u32 {
    let id = ids.fresh();
    match expr {
        Expr::Integer(n) => node(out, id, &format!("Integer {n}")),
        Expr::Unary { op, operand } => {
            node(out, id, &format!("Unary {op:?}"));
            let child = dump_expr(ids, out, operand);
            edge(out, id, child);
        }
        Expr::Binary { op, left, right } => {
            node(out, id, &format!("Binary {op:?}"));
            let l = dump_expr(ids, out, left);
            let r = dump_expr(ids, out, right);
            edge(out, id, l);
            edge(out, id, r);
        }
    }
    id
}

/// Renders the source AST as a Graphviz digraph.
pub fn dump_sast(program: &Program) -> String {
    let mut out = String::from("digraph SAST {\n\tnode [shape=record];\n");
    let mut ids = NodeIds::new();
    for function in &program.functions {
        let fn_id = ids.fresh();
        node(&mut out, fn_id, &format!("Function {}", function.name));
        for statement in &function.body.statements {
            let crate::ast::Statement::Return { value, .. } = statement;
            let stmt_id = ids.fresh();
            node(&mut out, stmt_id, "Return");
            edge(&mut out, fn_id, stmt_id);
            let expr_id = dump_expr(&mut ids, &mut out, value);
            edge(&mut out, stmt_id, expr_id);
        }
    }
    out.push_str("}\n");
    out
}

fn describe_tvalue(v: &TValue) -> String {
    match v {
        TValue::Integer(n) => format!("Integer {n}"),
        TValue::Variable(name) => format!("Variable {name}"),
    }
}

/// Renders the TIR as a Graphviz digraph: one node per instruction per
/// function, in program order.
pub fn dump_tir(program: &TProgram) -> String {
    let mut out = String::from("digraph TIR {\n\tnode [shape=record];\n");
    let mut ids = NodeIds::new();
    for function in &program.functions {
        let fn_id = ids.fresh();
        node(&mut out, fn_id, &format!("TFunction {}", function.name));
        let mut prev = fn_id;
        for instr in &function.instructions {
            let id = ids.fresh();
            let label = match instr {
                TInstruction::Return(v) => format!("Return {}", describe_tvalue(v)),
                TInstruction::Unary { op, src, dst } => {
                    format!("Unary {op:?} {} -> {}", describe_tvalue(src), describe_tvalue(dst))
                }
                TInstruction::Binary { op, left, right, dst } => {
                    format!("Binary {op:?} {}, {} -> {}", describe_tvalue(left), describe_tvalue(right), describe_tvalue(dst))
                }
            };
            node(&mut out, id, &label);
            edge(&mut out, prev, id);
            prev = id;
        }
    }
    out.push_str("}\n");
    out
}

fn describe_operand(op: &Operand) -> String {
    match op {
        Operand::Immediate(n) => format!("${n}"),
        Operand::Register(r) => format!("{r:?}"),
        Operand::Pseudo(name) => format!("Pseudo {name}"),
        Operand::Stack(off) => format!("Stack {off}"),
    }
}

/// Renders the AIR as a Graphviz digraph: one node per instruction per
/// function, in program order. Valid whether the operands are still
/// symbolic, concrete-but-illegal, or fully legalized, which is why
/// dumping is useful before and after the stack-allocation and
/// legalization passes alike.
pub fn dump_air(program: &AProgram) -> String {
    let mut out = String::from("digraph AIR {\n\tnode [shape=record];\n");
    let mut ids = NodeIds::new();
    for function in &program.functions {
        let fn_id = ids.fresh();
        node(&mut out, fn_id, &format!("AFunction {}", function.name));
        let mut prev = fn_id;
        for instr in &function.instructions {
            let id = ids.fresh();
            let label = match instr {
                AInstruction::Mov { src, dst } => format!("Mov {} -> {}", describe_operand(src), describe_operand(dst)),
                AInstruction::Unary { op, operand } => format!("{op:?} {}", describe_operand(operand)),
                AInstruction::Binary { op, left, right } => {
                    format!("{op:?} {}, {}", describe_operand(left), describe_operand(right))
                }
                AInstruction::Idiv(op) => format!("Idiv {}", describe_operand(op)),
                AInstruction::Cdq => "Cdq".to_string(),
                AInstruction::AllocateStack(n) => format!("AllocateStack {n}"),
                AInstruction::Ret => "Ret".to_string(),
                AInstruction::Cmp { left, right } => format!("Cmp {}, {}", describe_operand(left), describe_operand(right)),
                AInstruction::SetCC { cond, operand } => format!("SetCC {cond:?} {}", describe_operand(operand)),
                AInstruction::Label(name) => format!("Label {name}"),
                AInstruction::Jmp(target) => format!("Jmp {target}"),
                AInstruction::JmpCC { cond, target } => format!("JmpCC {cond:?} {target}"),
            };
            node(&mut out, id, &label);
            edge(&mut out, prev, id);
            prev = id;
        }
    }
    out.push_str("}\n");
    out
}
