use crate::ast::{
    ast::{PrimitiveType, Storage},
    expressions::{Expr, VariableRef},
    statements::{Assignment, Block, Stmt},
};

use super::{
    compiler::Compiler,
    expr::gen_expression,
    fragment::{FloatPredicate, Fragment, Inst, IntPredicate, IrType, Predicate, Value},
};

/// Address of a resolved variable.
pub fn variable_address(compiler: &Compiler, variable: &VariableRef) -> Value {
    match variable.storage {
        Storage::Global => Value::Global(compiler.global_symbol(&variable.name)),
        Storage::Local(slot) => Value::Slot {
            name: variable.name.clone(),
            slot: slot.0,
        },
    }
}

pub fn gen_assignment(compiler: &mut Compiler, assignment: &Assignment) -> Fragment {
    let mut fragment = Fragment::new();
    let value = fragment.append(gen_expression(compiler, &assignment.value));

    if let Some(value) = value {
        fragment.push(Inst::Store {
            ty: assignment.target.ty.into(),
            value,
            ptr: variable_address(compiler, &assignment.target),
        });
    }

    fragment
}

/// Evaluates a condition down to an `i1`.
fn gen_condition(compiler: &mut Compiler, condition: &Expr) -> Fragment {
    let mut fragment = Fragment::new();
    let value = fragment
        .append(gen_expression(compiler, condition))
        .unwrap_or(Value::Bool(false));

    let (predicate, zero) = match condition.ty {
        PrimitiveType::Int => (Predicate::Int(IntPredicate::Ne), Value::Int(0)),
        PrimitiveType::Float => (Predicate::Float(FloatPredicate::One), Value::Float(0.0)),
        _ => {
            fragment.value = Some(value);
            return fragment;
        }
    };

    let dest = compiler.fresh_temp();
    fragment.push(Inst::Compare {
        dest,
        predicate,
        ty: condition.ty.into(),
        left: value,
        right: zero,
    });
    fragment.value = Some(Value::Temp(dest));
    fragment
}

pub fn gen_block(compiler: &mut Compiler, block: &Block) -> Fragment {
    let mut fragment = Fragment::new();
    for statement in &block.statements {
        fragment.append(gen_statement(compiler, statement));
    }

    fragment
}

pub fn gen_statement(compiler: &mut Compiler, statement: &Stmt) -> Fragment {
    match statement {
        Stmt::Block(block) => gen_block(compiler, block),
        Stmt::Expr(expression) => {
            let mut fragment = gen_expression(compiler, expression);
            fragment.value = None;
            fragment
        }
        Stmt::Assign(assignment) => gen_assignment(compiler, assignment),
        Stmt::VarDecl(declaration) => {
            compiler.add_alloca(
                Value::Slot {
                    name: declaration.name.clone(),
                    slot: declaration.slot.0,
                },
                declaration.ty.into(),
            );
            Fragment::new()
        }
        Stmt::Return(None) => {
            let mut fragment = Fragment::new();
            fragment.push(Inst::Ret(None));
            fragment
        }
        Stmt::Return(Some(value)) => {
            let mut fragment = Fragment::new();
            let ty = IrType::from(value.ty);
            let result = fragment.append(gen_expression(compiler, value));
            match result {
                Some(result) => fragment.push(Inst::Ret(Some((ty, result)))),
                None => fragment.push(Inst::Ret(None)),
            }
            fragment
        }
        Stmt::If {
            condition,
            then_stmt,
            else_stmt,
        } => {
            let then_label = compiler.fresh_label("then");
            let else_label = compiler.fresh_label("else");
            let end_label = compiler.fresh_label("endif");

            let mut fragment = Fragment::new();
            let condition = fragment
                .append(gen_condition(compiler, condition))
                .unwrap_or(Value::Bool(false));
            let else_target = match else_stmt {
                Some(_) => else_label.clone(),
                None => end_label.clone(),
            };
            fragment.push(Inst::CondBr {
                condition,
                then_label: then_label.clone(),
                else_label: else_target,
            });

            fragment.push(Inst::Label(then_label));
            fragment.append(gen_statement(compiler, then_stmt));
            fragment.push(Inst::Br(end_label.clone()));

            if let Some(else_stmt) = else_stmt {
                fragment.push(Inst::Label(else_label));
                fragment.append(gen_statement(compiler, else_stmt));
                fragment.push(Inst::Br(end_label.clone()));
            }

            fragment.push(Inst::Label(end_label));
            fragment
        }
        Stmt::While { condition, body } => {
            let cond_label = compiler.fresh_label("while.cond");
            let body_label = compiler.fresh_label("while.body");
            let end_label = compiler.fresh_label("while.end");

            let mut fragment = Fragment::new();
            fragment.push(Inst::Br(cond_label.clone()));
            fragment.push(Inst::Label(cond_label.clone()));
            let condition = fragment
                .append(gen_condition(compiler, condition))
                .unwrap_or(Value::Bool(false));
            fragment.push(Inst::CondBr {
                condition,
                then_label: body_label.clone(),
                else_label: end_label.clone(),
            });

            fragment.push(Inst::Label(body_label));
            fragment.append(gen_statement(compiler, body));
            fragment.push(Inst::Br(cond_label));

            fragment.push(Inst::Label(end_label));
            fragment
        }
        Stmt::Empty => Fragment::new(),
    }
}
