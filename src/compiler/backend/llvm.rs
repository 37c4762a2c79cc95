//! Builds a `Module` through LLVM itself.
//!
//! The result is verified by LLVM before it is printed, which catches any
//! malformed instruction the text backend would pass through silently.

use std::collections::HashMap;

use inkwell::{
    basic_block::BasicBlock,
    builder::Builder,
    context::Context,
    module::{Linkage as LlvmLinkage, Module as LlvmModule},
    types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType},
    values::{BasicMetadataValueEnum, BasicValueEnum, FunctionValue, GlobalValue},
    AddressSpace, FloatPredicate as LlvmFloatPredicate, IntPredicate as LlvmIntPredicate,
};
use log::debug;

use crate::{
    compiler::fragment::{
        BinaryOp, CastOp, FloatPredicate, Function, Inst, IntPredicate, IrType, Item, Linkage,
        Module, Predicate, Value,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

fn failure(message: impl ToString) -> Error {
    Error::new(
        ErrorImpl::BackendFailure {
            message: message.to_string(),
        },
        Position::null(),
    )
}

/// Per-function value bindings.
#[derive(Default)]
struct Locals<'a> {
    temps: HashMap<u32, BasicValueEnum<'a>>,
    params: HashMap<String, BasicValueEnum<'a>>,
    slots: HashMap<(String, u32), BasicValueEnum<'a>>,
    blocks: HashMap<String, BasicBlock<'a>>,
}

struct Emitter<'a> {
    context: &'a Context,
    module: LlvmModule<'a>,
    builder: Builder<'a>,
    strings: Vec<GlobalValue<'a>>,
}

impl<'a> Emitter<'a> {
    fn basic_type(&self, ty: IrType) -> Option<BasicTypeEnum<'a>> {
        match ty {
            IrType::Void => None,
            IrType::I1 => Some(self.context.bool_type().into()),
            IrType::I32 => Some(self.context.i32_type().into()),
            IrType::Float => Some(self.context.f32_type().into()),
            IrType::I8Ptr => Some(
                self.context
                    .i8_type()
                    .ptr_type(AddressSpace::default())
                    .into(),
            ),
        }
    }

    fn function_type(&self, return_type: IrType, params: &[IrType]) -> Result<FunctionType<'a>, Error> {
        let params = params
            .iter()
            .map(|ty| {
                self.basic_type(*ty)
                    .map(BasicMetadataTypeEnum::from)
                    .ok_or_else(|| failure("void parameter"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match self.basic_type(return_type) {
            Some(ty) => ty.fn_type(&params, false),
            None => self.context.void_type().fn_type(&params, false),
        })
    }

    fn constant(&self, ty: IrType) -> Option<BasicValueEnum<'a>> {
        match self.basic_type(ty)? {
            BasicTypeEnum::IntType(ty) => Some(ty.const_zero().into()),
            BasicTypeEnum::FloatType(ty) => Some(ty.const_zero().into()),
            BasicTypeEnum::PointerType(ty) => Some(ty.const_null().into()),
            _ => None,
        }
    }

    fn add_strings(&mut self, strings: &[String]) {
        for (id, string) in strings.iter().enumerate() {
            let value = self.context.const_string(string.as_bytes(), true);
            let global = self
                .module
                .add_global(value.get_type(), None, &format!(".str.{}", id));
            global.set_initializer(&value);
            global.set_constant(true);
            global.set_unnamed_addr(true);
            global.set_linkage(LlvmLinkage::Private);
            self.strings.push(global);
        }
    }

    fn value(&self, locals: &Locals<'a>, value: &Value) -> Result<BasicValueEnum<'a>, Error> {
        let missing = || failure(format!("unbound value {:?}", value));

        Ok(match value {
            Value::Int(value) => self.context.i32_type().const_int(*value as u64, true).into(),
            Value::Float(value) => self.context.f32_type().const_float(*value).into(),
            Value::Bool(value) => self.context.bool_type().const_int(*value as u64, false).into(),
            Value::Null => self
                .context
                .i8_type()
                .ptr_type(AddressSpace::default())
                .const_null()
                .into(),
            Value::Temp(id) => *locals.temps.get(id).ok_or_else(missing)?,
            Value::Param(name) => *locals.params.get(name).ok_or_else(missing)?,
            Value::Slot { name, slot } => *locals
                .slots
                .get(&(name.clone(), *slot))
                .ok_or_else(missing)?,
            Value::Global(name) => self
                .module
                .get_global(name)
                .ok_or_else(missing)?
                .as_pointer_value()
                .into(),
            Value::Str { id, .. } => {
                let global = self.strings.get(*id).ok_or_else(missing)?;
                let zero = self.context.i32_type().const_zero();
                let pointer = unsafe {
                    self.builder
                        .build_in_bounds_gep(global.as_pointer_value(), &[zero, zero], "")
                }
                .map_err(|e| failure(format!("{:?}", e)))?;
                pointer.into()
            }
        })
    }

    fn declare(&self, name: &str, return_type: IrType, params: &[IrType], linkage: LlvmLinkage) -> Result<FunctionValue<'a>, Error> {
        let ty = self.function_type(return_type, params)?;
        Ok(self.module.add_function(name, ty, Some(linkage)))
    }

    fn block(&self, locals: &Locals<'a>, label: &str) -> Result<BasicBlock<'a>, Error> {
        locals
            .blocks
            .get(label)
            .copied()
            .ok_or_else(|| failure(format!("unknown label {}", label)))
    }

    fn emit_inst(&self, locals: &mut Locals<'a>, inst: &Inst) -> Result<(), Error> {
        let b = &self.builder;
        let err = |e: inkwell::builder::BuilderError| failure(format!("{:?}", e));

        match inst {
            Inst::Label(label) => {
                let block = self.block(locals, &label.0)?;
                b.position_at_end(block);
            }
            Inst::Alloca { dest, ty } => {
                let Value::Slot { name, slot } = dest else {
                    return Err(failure("alloca into a non-slot value"));
                };
                let ty = self.basic_type(*ty).ok_or_else(|| failure("void alloca"))?;
                let pointer = b.build_alloca(ty, &format!("{}.addr", name)).map_err(err)?;
                locals.slots.insert((name.clone(), *slot), pointer.into());
            }
            Inst::Load { dest, ptr, .. } => {
                let pointer = self.value(locals, ptr)?.into_pointer_value();
                let loaded = b.build_load(pointer, "").map_err(err)?;
                locals.temps.insert(*dest, loaded);
            }
            Inst::Store { value, ptr, .. } => {
                let pointer = self.value(locals, ptr)?.into_pointer_value();
                let value = self.value(locals, value)?;
                b.build_store(pointer, value).map_err(err)?;
            }
            Inst::Binary {
                dest,
                op,
                left,
                right,
                ..
            } => {
                let left = self.value(locals, left)?;
                let right = self.value(locals, right)?;
                let result: BasicValueEnum = match op {
                    BinaryOp::Add => b
                        .build_int_add(left.into_int_value(), right.into_int_value(), "")
                        .map_err(err)?
                        .into(),
                    BinaryOp::Sub => b
                        .build_int_sub(left.into_int_value(), right.into_int_value(), "")
                        .map_err(err)?
                        .into(),
                    BinaryOp::Mul => b
                        .build_int_mul(left.into_int_value(), right.into_int_value(), "")
                        .map_err(err)?
                        .into(),
                    BinaryOp::SDiv => b
                        .build_int_signed_div(left.into_int_value(), right.into_int_value(), "")
                        .map_err(err)?
                        .into(),
                    BinaryOp::FAdd => b
                        .build_float_add(left.into_float_value(), right.into_float_value(), "")
                        .map_err(err)?
                        .into(),
                    BinaryOp::FSub => b
                        .build_float_sub(left.into_float_value(), right.into_float_value(), "")
                        .map_err(err)?
                        .into(),
                    BinaryOp::FMul => b
                        .build_float_mul(left.into_float_value(), right.into_float_value(), "")
                        .map_err(err)?
                        .into(),
                    BinaryOp::FDiv => b
                        .build_float_div(left.into_float_value(), right.into_float_value(), "")
                        .map_err(err)?
                        .into(),
                };
                locals.temps.insert(*dest, result);
            }
            Inst::Compare {
                dest,
                predicate,
                left,
                right,
                ..
            } => {
                let left = self.value(locals, left)?;
                let right = self.value(locals, right)?;
                let result = match predicate {
                    Predicate::Int(predicate) => b
                        .build_int_compare(
                            int_predicate(*predicate),
                            left.into_int_value(),
                            right.into_int_value(),
                            "",
                        )
                        .map_err(err)?,
                    Predicate::Float(predicate) => b
                        .build_float_compare(
                            float_predicate(*predicate),
                            left.into_float_value(),
                            right.into_float_value(),
                            "",
                        )
                        .map_err(err)?,
                };
                locals.temps.insert(*dest, result.into());
            }
            Inst::Cast {
                dest, op, value, ..
            } => {
                let value = self.value(locals, value)?.into_int_value();
                let result: BasicValueEnum = match op {
                    CastOp::ZExt => b
                        .build_int_z_extend(value, self.context.i32_type(), "")
                        .map_err(err)?
                        .into(),
                    CastOp::UIToFP => b
                        .build_unsigned_int_to_float(value, self.context.f32_type(), "")
                        .map_err(err)?
                        .into(),
                };
                locals.temps.insert(*dest, result);
            }
            Inst::Call {
                dest,
                callee,
                arguments,
                ..
            } => {
                let function = self
                    .module
                    .get_function(callee)
                    .ok_or_else(|| failure(format!("unknown function {}", callee)))?;
                let arguments = arguments
                    .iter()
                    .map(|(_, argument)| self.value(locals, argument).map(BasicMetadataValueEnum::from))
                    .collect::<Result<Vec<_>, _>>()?;

                let call = b.build_call(function, &arguments, "").map_err(err)?;
                if let Some(dest) = dest {
                    let result = call
                        .try_as_basic_value()
                        .left()
                        .ok_or_else(|| failure(format!("{} returns no value", callee)))?;
                    locals.temps.insert(*dest, result);
                }
            }
            Inst::Br(label) => {
                let block = self.block(locals, &label.0)?;
                b.build_unconditional_branch(block).map_err(err)?;
            }
            Inst::CondBr {
                condition,
                then_label,
                else_label,
            } => {
                let condition = self.value(locals, condition)?.into_int_value();
                let then_block = self.block(locals, &then_label.0)?;
                let else_block = self.block(locals, &else_label.0)?;
                b.build_conditional_branch(condition, then_block, else_block)
                    .map_err(err)?;
            }
            Inst::Ret(None) => {
                b.build_return(None).map_err(err)?;
            }
            Inst::Ret(Some((_, value))) => {
                let value = self.value(locals, value)?;
                b.build_return(Some(&value)).map_err(err)?;
            }
        }

        Ok(())
    }

    fn emit_function(&self, function: &Function) -> Result<(), Error> {
        let value = self
            .module
            .get_function(&function.name)
            .ok_or_else(|| failure(format!("undeclared function {}", function.name)))?;

        let mut locals = Locals::default();
        for ((_, name), param) in function.params.iter().zip(value.get_param_iter()) {
            param.set_name(&format!("arg.{}", name));
            locals.params.insert(name.clone(), param);
        }
        for inst in &function.insts {
            if let Inst::Label(label) = inst {
                let block = self.context.append_basic_block(value, &label.0);
                locals.blocks.insert(label.0.clone(), block);
            }
        }

        for inst in &function.insts {
            self.emit_inst(&mut locals, inst)?;
        }

        Ok(())
    }
}

fn int_predicate(predicate: IntPredicate) -> LlvmIntPredicate {
    match predicate {
        IntPredicate::Eq => LlvmIntPredicate::EQ,
        IntPredicate::Ne => LlvmIntPredicate::NE,
        IntPredicate::Slt => LlvmIntPredicate::SLT,
        IntPredicate::Sgt => LlvmIntPredicate::SGT,
        IntPredicate::Sle => LlvmIntPredicate::SLE,
        IntPredicate::Sge => LlvmIntPredicate::SGE,
        IntPredicate::Ult => LlvmIntPredicate::ULT,
        IntPredicate::Ugt => LlvmIntPredicate::UGT,
        IntPredicate::Ule => LlvmIntPredicate::ULE,
        IntPredicate::Uge => LlvmIntPredicate::UGE,
    }
}

fn float_predicate(predicate: FloatPredicate) -> LlvmFloatPredicate {
    match predicate {
        FloatPredicate::Oeq => LlvmFloatPredicate::OEQ,
        FloatPredicate::One => LlvmFloatPredicate::ONE,
        FloatPredicate::Olt => LlvmFloatPredicate::OLT,
        FloatPredicate::Ogt => LlvmFloatPredicate::OGT,
        FloatPredicate::Ole => LlvmFloatPredicate::OLE,
        FloatPredicate::Oge => LlvmFloatPredicate::OGE,
    }
}

/// Builds, verifies and prints `module`.
pub fn render(module: &Module) -> Result<String, Error> {
    let context = Context::create();
    let mut emitter = Emitter {
        context: &context,
        module: context.create_module(&module.name),
        builder: context.create_builder(),
        strings: vec![],
    };
    emitter.add_strings(&module.strings);

    // Every function is declared up front so that calls can resolve.
    for item in &module.items {
        match item {
            Item::Global { name, ty, is_extern } => {
                let llvm_ty = emitter
                    .basic_type(*ty)
                    .ok_or_else(|| failure("void global"))?;
                let global = emitter.module.add_global(llvm_ty, None, name);
                match (is_extern, emitter.constant(*ty)) {
                    (false, Some(zero)) => global.set_initializer(&zero),
                    _ => global.set_linkage(LlvmLinkage::External),
                }
            }
            Item::Declare {
                name,
                return_type,
                params,
            } => {
                emitter.declare(name, *return_type, params, LlvmLinkage::External)?;
            }
            Item::Define(function) => {
                let params = function.params.iter().map(|(ty, _)| *ty).collect::<Vec<_>>();
                let linkage = match function.linkage {
                    Linkage::External => LlvmLinkage::External,
                    Linkage::Internal => LlvmLinkage::Internal,
                };
                emitter.declare(&function.name, function.return_type, &params, linkage)?;
            }
        }
    }

    for item in &module.items {
        if let Item::Define(function) = item {
            emitter.emit_function(function)?;
        }
    }

    emitter
        .module
        .verify()
        .map_err(|message| failure(message.to_string()))?;
    debug!("llvm verified {}", module.name);

    Ok(emitter.module.print_to_string().to_string())
}
