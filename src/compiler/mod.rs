//! Code generation module for the compiler.
//!
//! This module lowers the checked AST into a `Module` of structured
//! instructions and renders it through a backend. It handles:
//!
//! - Emission of expressions and statements into fragments
//! - Mapping of MiniC types onto IR types
//! - Global initialisation and the program entry point
//! - Text rendering, and LLVM verification behind the `llvm` feature

pub mod backend;
pub mod compiler;
pub mod expr;
pub mod fragment;
pub mod stmt;
