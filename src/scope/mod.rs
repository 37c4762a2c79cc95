//! Scope chain and symbol records.
//!
//! Frames own two namespaces (variables and functions) and a loop/ordinary
//! kind. Lookups walk outwards through parent links; entering a frame hands
//! back a guard that restores the chain when it goes out of scope.

pub mod scope;
pub mod symbols;

#[cfg(test)]
mod tests;
