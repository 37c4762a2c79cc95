//! Renders a `Module` as LLVM assembly in the typed-pointer dialect.

use std::fmt::Write;

use crate::compiler::fragment::{
    BinaryOp, CastOp, FloatPredicate, Function, Inst, IntPredicate, IrType, Item, Linkage, Module,
    Predicate, Value,
};

pub fn type_name(ty: IrType) -> &'static str {
    match ty {
        IrType::Void => "void",
        IrType::I1 => "i1",
        IrType::I32 => "i32",
        IrType::Float => "float",
        IrType::I8Ptr => "i8*",
    }
}

/// Float constants are written as the hex image of the double, which LLVM
/// requires to be exactly representable as a float.
pub fn float_constant(value: f64) -> String {
    format!("0x{:016X}", (value as f32 as f64).to_bits())
}

/// Body of a `c"..."` constant, including the terminator.
pub fn escape_bytes(value: &str) -> String {
    let mut escaped = String::new();
    for byte in value.bytes().chain(std::iter::once(0)) {
        match byte {
            // `"` and `\` are printable but delimit the constant.
            b'"' | b'\\' => {
                let _ = write!(escaped, "\\{:02X}", byte);
            }
            0x20..=0x7E => escaped.push(byte as char),
            _ => {
                let _ = write!(escaped, "\\{:02X}", byte);
            }
        }
    }

    escaped
}

fn value(value: &Value) -> String {
    match value {
        Value::Int(value) => value.to_string(),
        Value::Float(value) => float_constant(*value),
        Value::Bool(value) => value.to_string(),
        Value::Null => String::from("null"),
        Value::Temp(id) => format!("%t.{}", id),
        Value::Param(name) => format!("%arg.{}", name),
        Value::Slot { name, slot } => format!("%{}.addr.{}", name, slot),
        Value::Global(name) => format!("@{}", name),
        Value::Str { id, len } => format!(
            "getelementptr inbounds ([{len} x i8], [{len} x i8]* @.str.{id}, i32 0, i32 0)",
            len = len,
            id = id
        ),
    }
}

fn binary_op(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "add",
        BinaryOp::Sub => "sub",
        BinaryOp::Mul => "mul",
        BinaryOp::SDiv => "sdiv",
        BinaryOp::FAdd => "fadd",
        BinaryOp::FSub => "fsub",
        BinaryOp::FMul => "fmul",
        BinaryOp::FDiv => "fdiv",
    }
}

fn predicate(predicate: Predicate) -> String {
    let (instruction, condition) = match predicate {
        Predicate::Int(predicate) => (
            "icmp",
            match predicate {
                IntPredicate::Eq => "eq",
                IntPredicate::Ne => "ne",
                IntPredicate::Slt => "slt",
                IntPredicate::Sgt => "sgt",
                IntPredicate::Sle => "sle",
                IntPredicate::Sge => "sge",
                IntPredicate::Ult => "ult",
                IntPredicate::Ugt => "ugt",
                IntPredicate::Ule => "ule",
                IntPredicate::Uge => "uge",
            },
        ),
        Predicate::Float(predicate) => (
            "fcmp",
            match predicate {
                FloatPredicate::Oeq => "oeq",
                FloatPredicate::One => "one",
                FloatPredicate::Olt => "olt",
                FloatPredicate::Ogt => "ogt",
                FloatPredicate::Ole => "ole",
                FloatPredicate::Oge => "oge",
            },
        ),
    };

    format!("{} {}", instruction, condition)
}

fn cast_op(op: CastOp) -> &'static str {
    match op {
        CastOp::ZExt => "zext",
        CastOp::UIToFP => "uitofp",
    }
}

fn typed_list(values: &[(IrType, Value)]) -> String {
    values
        .iter()
        .map(|(ty, argument)| format!("{} {}", type_name(*ty), value(argument)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_inst(out: &mut String, inst: &Inst) {
    let line = match inst {
        Inst::Label(label) => {
            if label.0 != "entry" {
                out.push('\n');
            }
            let _ = writeln!(out, "{}:", label.0);
            return;
        }
        Inst::Alloca { dest, ty } => format!("{} = alloca {}", value(dest), type_name(*ty)),
        Inst::Load { dest, ty, ptr } => format!(
            "%t.{} = load {}, {}* {}",
            dest,
            type_name(*ty),
            type_name(*ty),
            value(ptr)
        ),
        Inst::Store {
            ty,
            value: stored,
            ptr,
        } => format!(
            "store {} {}, {}* {}",
            type_name(*ty),
            value(stored),
            type_name(*ty),
            value(ptr)
        ),
        Inst::Binary {
            dest,
            op,
            ty,
            left,
            right,
        } => format!(
            "%t.{} = {} {} {}, {}",
            dest,
            binary_op(*op),
            type_name(*ty),
            value(left),
            value(right)
        ),
        Inst::Compare {
            dest,
            predicate: compare,
            ty,
            left,
            right,
        } => format!(
            "%t.{} = {} {} {}, {}",
            dest,
            predicate(*compare),
            type_name(*ty),
            value(left),
            value(right)
        ),
        Inst::Cast {
            dest,
            op,
            from,
            value: cast,
            to,
        } => format!(
            "%t.{} = {} {} {} to {}",
            dest,
            cast_op(*op),
            type_name(*from),
            value(cast),
            type_name(*to)
        ),
        Inst::Call {
            dest,
            return_type,
            callee,
            arguments,
        } => {
            let call = format!(
                "call {} @{}({})",
                type_name(*return_type),
                callee,
                typed_list(arguments)
            );
            match dest {
                Some(dest) => format!("%t.{} = {}", dest, call),
                None => call,
            }
        }
        Inst::Br(label) => format!("br label %{}", label.0),
        Inst::CondBr {
            condition,
            then_label,
            else_label,
        } => format!(
            "br i1 {}, label %{}, label %{}",
            value(condition),
            then_label.0,
            else_label.0
        ),
        Inst::Ret(None) => String::from("ret void"),
        Inst::Ret(Some((ty, returned))) => {
            format!("ret {} {}", type_name(*ty), value(returned))
        }
    };

    let _ = writeln!(out, "  {}", line);
}

fn render_function(out: &mut String, function: &Function) {
    let linkage = match function.linkage {
        Linkage::External => "",
        Linkage::Internal => "internal ",
    };
    let params = function
        .params
        .iter()
        .map(|(ty, name)| format!("{} %arg.{}", type_name(*ty), name))
        .collect::<Vec<_>>()
        .join(", ");

    let _ = writeln!(
        out,
        "define {}{} @{}({}) {{",
        linkage,
        type_name(function.return_type),
        function.name,
        params
    );
    for inst in &function.insts {
        render_inst(out, inst);
    }
    out.push_str("}\n");
}

fn render_item(out: &mut String, item: &Item) {
    match item {
        Item::Global {
            name,
            ty,
            is_extern: true,
        } => {
            let _ = writeln!(out, "@{} = external global {}", name, type_name(*ty));
        }
        Item::Global { name, ty, .. } => {
            let zero = Value::zero(*ty).map(|zero| value(&zero)).unwrap_or_default();
            let _ = writeln!(out, "@{} = global {} {}", name, type_name(*ty), zero);
        }
        Item::Declare {
            name,
            return_type,
            params,
        } => {
            let params = params
                .iter()
                .map(|ty| type_name(*ty))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "declare {} @{}({})", type_name(*return_type), name, params);
        }
        Item::Define(function) => {
            out.push('\n');
            render_function(out, function);
        }
    }
}

/// Renders the whole module. Equal modules always render to equal text.
pub fn render(module: &Module) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "; ModuleID = '{}'", module.name);
    let _ = writeln!(out, "source_filename = \"{}\"", module.name);

    if !module.strings.is_empty() {
        out.push('\n');
    }
    for (id, string) in module.strings.iter().enumerate() {
        let _ = writeln!(
            out,
            "@.str.{} = private unnamed_addr constant [{} x i8] c\"{}\"",
            id,
            string.len() + 1,
            escape_bytes(string)
        );
    }

    if module
        .items
        .iter()
        .any(|item| !matches!(item, Item::Define(_)))
    {
        out.push('\n');
    }
    for item in &module.items {
        render_item(&mut out, item);
    }

    out
}
