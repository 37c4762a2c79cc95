//! Lowering and type checking.
//!
//! This module turns the parse tree into the checked AST in one
//! left-to-right descent while:
//!
//! - Resolving every identifier through the scope chain
//! - Registering declarations in the current frame as they are met
//! - Computing the static type of every expression
//! - Rejecting operator, assignment, call and return type disagreements
//!
//! The pass is fail-fast: the first error aborts it and no `Root` is built.

pub mod expr;
pub mod lowering;
pub mod stmt;
