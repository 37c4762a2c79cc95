//! Structured emission output.
//!
//! Nodes emit `Fragment`s of `Inst`s operating on `Value`s; a backend turns
//! the finished `Module` into concrete target syntax.

use crate::ast::ast::PrimitiveType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrType {
    Void,
    I1,
    I32,
    Float,
    I8Ptr,
}

impl From<PrimitiveType> for IrType {
    fn from(ty: PrimitiveType) -> Self {
        match ty {
            PrimitiveType::Void => IrType::Void,
            PrimitiveType::Int => IrType::I32,
            PrimitiveType::Float => IrType::Float,
            PrimitiveType::Bool => IrType::I1,
            PrimitiveType::String => IrType::I8Ptr,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f64),
    Bool(bool),
    Null,
    /// A function-local temporary.
    Temp(u32),
    /// An incoming parameter of the current function.
    Param(String),
    /// The stack slot of a local variable.
    Slot { name: String, slot: u32 },
    /// The address of a global variable.
    Global(String),
    /// Pointer to the first byte of an interned string constant.
    Str { id: usize, len: usize },
}

impl Value {
    /// The zero value of `ty`, used for global initialisers and default
    /// returns.
    pub fn zero(ty: IrType) -> Option<Value> {
        match ty {
            IrType::Void => None,
            IrType::I1 => Some(Value::Bool(false)),
            IrType::I32 => Some(Value::Int(0)),
            IrType::Float => Some(Value::Float(0.0)),
            IrType::I8Ptr => Some(Value::Null),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    SDiv,
    FAdd,
    FSub,
    FMul,
    FDiv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntPredicate {
    Eq,
    Ne,
    Slt,
    Sgt,
    Sle,
    Sge,
    Ult,
    Ugt,
    Ule,
    Uge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatPredicate {
    Oeq,
    One,
    Olt,
    Ogt,
    Ole,
    Oge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Int(IntPredicate),
    Float(FloatPredicate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOp {
    ZExt,
    UIToFP,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(pub String);

#[derive(Debug, Clone, PartialEq)]
pub enum Inst {
    Alloca {
        dest: Value,
        ty: IrType,
    },
    Load {
        dest: u32,
        ty: IrType,
        ptr: Value,
    },
    Store {
        ty: IrType,
        value: Value,
        ptr: Value,
    },
    Binary {
        dest: u32,
        op: BinaryOp,
        ty: IrType,
        left: Value,
        right: Value,
    },
    Compare {
        dest: u32,
        predicate: Predicate,
        ty: IrType,
        left: Value,
        right: Value,
    },
    Cast {
        dest: u32,
        op: CastOp,
        from: IrType,
        value: Value,
        to: IrType,
    },
    Call {
        dest: Option<u32>,
        return_type: IrType,
        callee: String,
        arguments: Vec<(IrType, Value)>,
    },
    Br(Label),
    CondBr {
        condition: Value,
        then_label: Label,
        else_label: Label,
    },
    Ret(Option<(IrType, Value)>),
    Label(Label),
}

impl Inst {
    pub fn is_terminator(&self) -> bool {
        matches!(self, Inst::Br(_) | Inst::CondBr { .. } | Inst::Ret(_))
    }
}

/// The output of one node: its instructions and, for expressions with a
/// non-void type, the value it produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    pub insts: Vec<Inst>,
    pub value: Option<Value>,
}

impl Fragment {
    pub fn new() -> Self {
        Fragment::default()
    }

    pub fn of_value(value: Value) -> Self {
        Fragment {
            insts: vec![],
            value: Some(value),
        }
    }

    pub fn push(&mut self, inst: Inst) {
        self.insts.push(inst);
    }

    /// Appends `other`'s instructions and hands back its value.
    pub fn append(&mut self, other: Fragment) -> Option<Value> {
        self.insts.extend(other.insts);
        other.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    External,
    Internal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub linkage: Linkage,
    pub return_type: IrType,
    pub params: Vec<(IrType, String)>,
    /// Starts with the entry block; every block ends in a terminator.
    pub insts: Vec<Inst>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Global {
        name: String,
        ty: IrType,
        is_extern: bool,
    },
    Declare {
        name: String,
        return_type: IrType,
        params: Vec<IrType>,
    },
    Define(Function),
}

/// One compilation unit ready for a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    /// Interned string constants; the index is the constant's id.
    pub strings: Vec<String>,
    pub items: Vec<Item>,
}
