//! Backends turning a finished `Module` into its output document.
//!
//! - text: LLVM assembly written directly, always available
//! - llvm: the same module built through `inkwell` and verified by LLVM,
//!   behind the `llvm` feature

#[cfg(feature = "llvm")]
pub mod llvm;
pub mod text;
