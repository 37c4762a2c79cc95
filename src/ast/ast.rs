use std::{fmt::Display, str::FromStr};

use super::{
    declarations::{Declaration, FunctionDefinition},
    statements::Assignment,
};

/// The fixed set of MiniC types, compared by nominal equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Void,
    Int,
    Float,
    Bool,
    String,
}

impl PrimitiveType {
    /// Types a unary `+`/`-` may be applied to.
    pub const UNARY_OPERABLE: [PrimitiveType; 3] =
        [PrimitiveType::Int, PrimitiveType::Bool, PrimitiveType::Void];

    /// Types arithmetic and relational operators accept.
    pub const BINARY_OPERABLE: [PrimitiveType; 3] =
        [PrimitiveType::Int, PrimitiveType::Float, PrimitiveType::Bool];

    /// Types usable as an `if` or `while` condition.
    pub const CONDITION: [PrimitiveType; 3] =
        [PrimitiveType::Bool, PrimitiveType::Int, PrimitiveType::Float];

    pub fn is_unary_operable(&self) -> bool {
        Self::UNARY_OPERABLE.contains(self)
    }

    pub fn is_binary_operable(&self) -> bool {
        Self::BINARY_OPERABLE.contains(self)
    }

    pub fn is_condition(&self) -> bool {
        Self::CONDITION.contains(self)
    }
}

/// Parses the spelling used in declarations (`str` for strings).
impl FromStr for PrimitiveType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "void" => Ok(PrimitiveType::Void),
            "int" => Ok(PrimitiveType::Int),
            "float" => Ok(PrimitiveType::Float),
            "bool" => Ok(PrimitiveType::Bool),
            "str" => Ok(PrimitiveType::String),
            _ => Err(()),
        }
    }
}

impl Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimitiveType::Void => write!(f, "void"),
            PrimitiveType::Int => write!(f, "int"),
            PrimitiveType::Float => write!(f, "float"),
            PrimitiveType::Bool => write!(f, "bool"),
            PrimitiveType::String => write!(f, "string"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Pos,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalOperator {
    Lt,
    Gt,
    Leq,
    Geq,
    Eq,
    Neq,
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Pos => write!(f, "POS"),
            UnaryOperator::Neg => write!(f, "NEG"),
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "ADD"),
            BinaryOperator::Sub => write!(f, "SUB"),
            BinaryOperator::Mul => write!(f, "MUL"),
            BinaryOperator::Div => write!(f, "DIV"),
        }
    }
}

impl Display for RelationalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationalOperator::Lt => write!(f, "LT"),
            RelationalOperator::Gt => write!(f, "GT"),
            RelationalOperator::Leq => write!(f, "LEQ"),
            RelationalOperator::Geq => write!(f, "GEQ"),
            RelationalOperator::Eq => write!(f, "EQ"),
            RelationalOperator::Neq => write!(f, "NEQ"),
        }
    }
}

/// A function-local stack slot, unique within its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalSlot(pub u32);

/// Where a variable lives, fixed at declaration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Global,
    Local(LocalSlot),
}

/// The checked program for one compilation unit.
///
/// Declarations precede global assignments, which precede function
/// definitions, matching source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    pub unit_name: String,
    pub declarations: Vec<Declaration>,
    pub global_assignments: Vec<Assignment>,
    pub function_definitions: Vec<FunctionDefinition>,
}
