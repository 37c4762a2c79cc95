use crate::ast::{
    ast::{BinaryOperator, PrimitiveType, RelationalOperator, UnaryOperator},
    expressions::{Expr, ExprKind},
};

use super::{
    compiler::Compiler,
    fragment::{BinaryOp, CastOp, FloatPredicate, Fragment, Inst, IntPredicate, IrType, Predicate, Value},
    stmt::variable_address,
};

fn binary_op(operator: BinaryOperator, ty: PrimitiveType) -> BinaryOp {
    match (operator, ty) {
        (BinaryOperator::Add, PrimitiveType::Float) => BinaryOp::FAdd,
        (BinaryOperator::Sub, PrimitiveType::Float) => BinaryOp::FSub,
        (BinaryOperator::Mul, PrimitiveType::Float) => BinaryOp::FMul,
        (BinaryOperator::Div, PrimitiveType::Float) => BinaryOp::FDiv,
        (BinaryOperator::Add, _) => BinaryOp::Add,
        (BinaryOperator::Sub, _) => BinaryOp::Sub,
        (BinaryOperator::Mul, _) => BinaryOp::Mul,
        (BinaryOperator::Div, _) => BinaryOp::SDiv,
    }
}

/// Signed for ints, unsigned for bools, ordered for floats.
fn predicate(operator: RelationalOperator, ty: PrimitiveType) -> Predicate {
    match ty {
        PrimitiveType::Float => Predicate::Float(match operator {
            RelationalOperator::Lt => FloatPredicate::Olt,
            RelationalOperator::Gt => FloatPredicate::Ogt,
            RelationalOperator::Leq => FloatPredicate::Ole,
            RelationalOperator::Geq => FloatPredicate::Oge,
            RelationalOperator::Eq => FloatPredicate::Oeq,
            RelationalOperator::Neq => FloatPredicate::One,
        }),
        PrimitiveType::Bool => Predicate::Int(match operator {
            RelationalOperator::Lt => IntPredicate::Ult,
            RelationalOperator::Gt => IntPredicate::Ugt,
            RelationalOperator::Leq => IntPredicate::Ule,
            RelationalOperator::Geq => IntPredicate::Uge,
            RelationalOperator::Eq => IntPredicate::Eq,
            RelationalOperator::Neq => IntPredicate::Ne,
        }),
        _ => Predicate::Int(match operator {
            RelationalOperator::Lt => IntPredicate::Slt,
            RelationalOperator::Gt => IntPredicate::Sgt,
            RelationalOperator::Leq => IntPredicate::Sle,
            RelationalOperator::Geq => IntPredicate::Sge,
            RelationalOperator::Eq => IntPredicate::Eq,
            RelationalOperator::Neq => IntPredicate::Ne,
        }),
    }
}

/// Emits `expression`. The fragment carries a value unless the expression
/// has type void.
pub fn gen_expression(compiler: &mut Compiler, expression: &Expr) -> Fragment {
    match &expression.kind {
        ExprKind::IntLiteral(value) => Fragment::of_value(Value::Int(*value)),
        ExprKind::FloatLiteral(value) => Fragment::of_value(Value::Float(*value)),
        ExprKind::BoolLiteral(value) => Fragment::of_value(Value::Bool(*value)),
        ExprKind::StringLiteral(value) => Fragment::of_value(compiler.intern_string(value)),
        ExprKind::VarRef(variable) => {
            let dest = compiler.fresh_temp();
            let mut fragment = Fragment::new();
            fragment.push(Inst::Load {
                dest,
                ty: variable.ty.into(),
                ptr: variable_address(compiler, variable),
            });
            fragment.value = Some(Value::Temp(dest));
            fragment
        }
        ExprKind::Unary { operator, operand } => {
            let mut fragment = Fragment::new();
            let value = fragment.append(gen_expression(compiler, operand));

            fragment.value = match (operator, value) {
                (UnaryOperator::Neg, Some(value)) => {
                    let dest = compiler.fresh_temp();
                    let zero = Value::zero(operand.ty.into()).unwrap_or(Value::Int(0));
                    fragment.push(Inst::Binary {
                        dest,
                        op: BinaryOp::Sub,
                        ty: operand.ty.into(),
                        left: zero,
                        right: value,
                    });
                    Some(Value::Temp(dest))
                }
                (_, value) => value,
            };
            fragment
        }
        ExprKind::Binary {
            operator,
            left,
            right,
        } => {
            let mut fragment = Fragment::new();
            let left_value = fragment.append(gen_expression(compiler, left));
            let right_value = fragment.append(gen_expression(compiler, right));

            if let (Some(left_value), Some(right_value)) = (left_value, right_value) {
                let dest = compiler.fresh_temp();
                fragment.push(Inst::Binary {
                    dest,
                    op: binary_op(*operator, left.ty),
                    ty: left.ty.into(),
                    left: left_value,
                    right: right_value,
                });
                fragment.value = Some(Value::Temp(dest));
            }
            fragment
        }
        ExprKind::Relational {
            operator,
            left,
            right,
        } => {
            let mut fragment = Fragment::new();
            let left_value = fragment.append(gen_expression(compiler, left));
            let right_value = fragment.append(gen_expression(compiler, right));

            if let (Some(left_value), Some(right_value)) = (left_value, right_value) {
                let compared = compiler.fresh_temp();
                fragment.push(Inst::Compare {
                    dest: compared,
                    predicate: predicate(*operator, left.ty),
                    ty: left.ty.into(),
                    left: left_value,
                    right: right_value,
                });

                // The comparison has the operands' type; widen the i1.
                let cast = match expression.ty {
                    PrimitiveType::Int => Some(CastOp::ZExt),
                    PrimitiveType::Float => Some(CastOp::UIToFP),
                    _ => None,
                };
                fragment.value = match cast {
                    Some(op) => {
                        let dest = compiler.fresh_temp();
                        fragment.push(Inst::Cast {
                            dest,
                            op,
                            from: IrType::I1,
                            value: Value::Temp(compared),
                            to: expression.ty.into(),
                        });
                        Some(Value::Temp(dest))
                    }
                    None => Some(Value::Temp(compared)),
                };
            }
            fragment
        }
        ExprKind::Call { name, arguments } => {
            let mut fragment = Fragment::new();
            let mut values = vec![];
            for argument in arguments {
                if let Some(value) = fragment.append(gen_expression(compiler, argument)) {
                    values.push((IrType::from(argument.ty), value));
                }
            }

            let return_type = IrType::from(expression.ty);
            let dest = match return_type {
                IrType::Void => None,
                _ => Some(compiler.fresh_temp()),
            };
            fragment.push(Inst::Call {
                dest,
                return_type,
                callee: compiler.function_symbol(name),
                arguments: values,
            });
            fragment.value = dest.map(Value::Temp);
            fragment
        }
    }
}
