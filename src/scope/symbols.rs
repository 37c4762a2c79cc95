use crate::ast::ast::{PrimitiveType, Storage};

/// A declared variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: PrimitiveType,
    pub storage: Storage,
}

impl Symbol {
    pub fn new(name: impl Into<String>, ty: PrimitiveType, storage: Storage) -> Self {
        Symbol {
            name: name.into(),
            ty,
            storage,
        }
    }
}

/// A function's name, return type and ordered parameter types, independent
/// of any call site.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub name: String,
    pub return_type: PrimitiveType,
    pub params: Vec<PrimitiveType>,
    pub is_extern: bool,
}

impl FunctionSignature {
    pub fn new(
        name: impl Into<String>,
        return_type: PrimitiveType,
        params: Vec<PrimitiveType>,
        is_extern: bool,
    ) -> Self {
        FunctionSignature {
            name: name.into(),
            return_type,
            params,
            is_extern,
        }
    }
}
