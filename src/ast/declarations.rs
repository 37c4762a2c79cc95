use crate::scope::symbols::FunctionSignature;

use super::{
    ast::{LocalSlot, PrimitiveType},
    statements::Block,
};

/// Variable declaration (eg. `int a;` or `extern int errno;`).
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub is_extern: bool,
    pub ty: PrimitiveType,
    pub name: String,
}

/// Function declaration (eg. `extern int square(int);`).
///
/// Parameter names are irrelevant to a declaration and are not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub is_extern: bool,
    pub return_type: PrimitiveType,
    pub name: String,
    pub param_types: Vec<PrimitiveType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Variable(VariableDecl),
    Function(FunctionDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub ty: PrimitiveType,
    pub name: String,
    pub slot: LocalSlot,
}

/// Function definition (eg. `int the_identity_fn(int n) { return n; }`).
///
/// Only the signature outlives lowering; the body frames are gone by the
/// time this node exists.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub signature: FunctionSignature,
    pub params: Vec<Parameter>,
    pub body: Block,
}
