//! Parser module for building the MiniC parse tree.
//!
//! This module transforms a stream of tokens into the concrete parse tree
//! consumed by lowering. It uses a Pratt parser for expressions with
//! binding powers for precedence and handles:
//!
//! - Top-level lines (declarations, global assignments, function definitions)
//! - Statements (control flow, local declarations, assignments)
//! - Expressions (unary, binary and relational ops, calls, literals)
//! - Error recovery into `Error` nodes
//!
//! Type names are kept as written; lowering decides which are supported.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod tree;

#[cfg(test)]
mod tests;
