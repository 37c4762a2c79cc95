/// AST (Abstract Syntax Tree) module
/// Contains the typed, scope-checked program representation produced by lowering
///
/// Submodules:
/// - ast: Primitive types, operators, storage and the root node
/// - declarations: Variable/function declarations and function definitions
/// - statements: Statement variants
/// - expressions: Type-annotated expression variants
/// - printer: Indented structural pretty printer
pub mod ast;
pub mod declarations;
pub mod expressions;
pub mod printer;
pub mod statements;

#[cfg(test)]
mod tests;
