//! Structural pretty printer for the checked AST.
//!
//! Each node renders on its own line, prefixed by one `INDENT_STR` per
//! nesting level. Used by verbose diagnostics and tests.

use super::{
    ast::Root,
    declarations::{Declaration, FunctionDefinition},
    expressions::{Expr, ExprKind},
    statements::{Assignment, Block, Stmt},
};

pub const INDENT_STR: &str = "|   ";

pub trait PrettyPrint {
    fn print(&self, indentation_level: usize, out: &mut String);

    fn pretty(&self) -> String {
        let mut out = String::new();
        self.print(0, &mut out);
        out
    }
}

fn line(out: &mut String, indentation_level: usize, text: &str) {
    out.push_str(&INDENT_STR.repeat(indentation_level));
    out.push_str(text);
    out.push('\n');
}

fn extern_prefix(is_extern: bool) -> &'static str {
    if is_extern {
        "extern "
    } else {
        ""
    }
}

impl PrettyPrint for Root {
    fn print(&self, indentation_level: usize, out: &mut String) {
        line(out, indentation_level, &format!("Root. {}", self.unit_name));
        if !self.declarations.is_empty() {
            line(out, indentation_level, "Declarations:");
        }
        for declaration in &self.declarations {
            declaration.print(indentation_level + 1, out);
        }
        if !self.global_assignments.is_empty() {
            line(out, indentation_level, "Assignments:");
        }
        for assignment in &self.global_assignments {
            assignment.print(indentation_level + 1, out);
        }
        if !self.function_definitions.is_empty() {
            line(out, indentation_level, "Functions:");
        }
        for function in &self.function_definitions {
            function.print(indentation_level + 1, out);
        }
    }
}

impl PrettyPrint for Declaration {
    fn print(&self, indentation_level: usize, out: &mut String) {
        match self {
            Declaration::Variable(variable) => line(
                out,
                indentation_level,
                &format!(
                    "VarDecl. {}{} {}",
                    extern_prefix(variable.is_extern),
                    variable.ty,
                    variable.name
                ),
            ),
            Declaration::Function(function) => {
                let params = function
                    .param_types
                    .iter()
                    .map(|ty| ty.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                line(
                    out,
                    indentation_level,
                    &format!(
                        "FuncDecl. {}{} {}({})",
                        extern_prefix(function.is_extern),
                        function.return_type,
                        function.name,
                        params
                    ),
                )
            }
        }
    }
}

impl PrettyPrint for FunctionDefinition {
    fn print(&self, indentation_level: usize, out: &mut String) {
        let params = self
            .params
            .iter()
            .map(|param| format!("{} {}", param.ty, param.name))
            .collect::<Vec<String>>()
            .join(", ");
        line(
            out,
            indentation_level,
            &format!(
                "FuncDef. {} {}({})",
                self.signature.return_type, self.signature.name, params
            ),
        );
        self.body.print(indentation_level + 1, out);
    }
}

impl PrettyPrint for Assignment {
    fn print(&self, indentation_level: usize, out: &mut String) {
        line(out, indentation_level, &format!("Asgn. {} =", self.target.name));
        self.value.print(indentation_level + 1, out);
    }
}

impl PrettyPrint for Block {
    fn print(&self, indentation_level: usize, out: &mut String) {
        line(out, indentation_level, "Block.");
        for statement in &self.statements {
            statement.print(indentation_level + 1, out);
        }
    }
}

impl PrettyPrint for Stmt {
    fn print(&self, indentation_level: usize, out: &mut String) {
        match self {
            Stmt::Block(block) => block.print(indentation_level, out),
            Stmt::If {
                condition,
                then_stmt,
                else_stmt,
            } => {
                line(out, indentation_level, "If.");
                line(out, indentation_level, "(If) condition =");
                condition.print(indentation_level + 1, out);
                line(out, indentation_level, "(If) then =");
                then_stmt.print(indentation_level + 1, out);
                if let Some(else_stmt) = else_stmt {
                    line(out, indentation_level, "(If) else =");
                    else_stmt.print(indentation_level + 1, out);
                }
            }
            Stmt::While { condition, body } => {
                line(out, indentation_level, "While.");
                line(out, indentation_level, "(While) condition =");
                condition.print(indentation_level + 1, out);
                line(out, indentation_level, "(While) body =");
                body.print(indentation_level + 1, out);
            }
            Stmt::Return(None) => line(out, indentation_level, "Ret."),
            Stmt::Return(Some(value)) => {
                line(out, indentation_level, "Ret. expression =");
                value.print(indentation_level + 1, out);
            }
            Stmt::Assign(assignment) => assignment.print(indentation_level, out),
            Stmt::VarDecl(declaration) => line(
                out,
                indentation_level,
                &format!("VarDecl. {} {}", declaration.ty, declaration.name),
            ),
            Stmt::Expr(expression) => expression.print(indentation_level, out),
            Stmt::Empty => line(out, indentation_level, "EmptyStmt."),
        }
    }
}

impl PrettyPrint for Expr {
    fn print(&self, indentation_level: usize, out: &mut String) {
        match &self.kind {
            ExprKind::IntLiteral(value) => {
                line(out, indentation_level, &format!("IntLiteral. {}", value))
            }
            ExprKind::FloatLiteral(value) => {
                line(out, indentation_level, &format!("FloatLiteral. {:?}", value))
            }
            ExprKind::BoolLiteral(value) => {
                line(out, indentation_level, &format!("BoolLiteral. {}", value))
            }
            ExprKind::StringLiteral(value) => {
                line(out, indentation_level, &format!("StrLiteral. {:?}", value))
            }
            ExprKind::VarRef(variable) => {
                line(out, indentation_level, &format!("Var. {}", variable.name))
            }
            ExprKind::Unary { operator, operand } => {
                line(
                    out,
                    indentation_level,
                    &format!("UExpr. {}, expression =", operator),
                );
                operand.print(indentation_level + 1, out);
            }
            ExprKind::Binary {
                operator,
                left,
                right,
            } => {
                line(out, indentation_level, &format!("BExpr. {}", operator));
                line(out, indentation_level, "(BExpr) LHS =");
                left.print(indentation_level + 1, out);
                line(out, indentation_level, "(BExpr) RHS =");
                right.print(indentation_level + 1, out);
            }
            ExprKind::Relational {
                operator,
                left,
                right,
            } => {
                line(out, indentation_level, &format!("RExpr. {}", operator));
                line(out, indentation_level, "(RExpr) LHS =");
                left.print(indentation_level + 1, out);
                line(out, indentation_level, "(RExpr) RHS =");
                right.print(indentation_level + 1, out);
            }
            ExprKind::Call { name, arguments } => {
                let suffix = if arguments.is_empty() {
                    ""
                } else {
                    ", parameters ="
                };
                line(out, indentation_level, &format!("Call. {}{}", name, suffix));
                for argument in arguments {
                    argument.print(indentation_level + 1, out);
                }
            }
        }
    }
}
