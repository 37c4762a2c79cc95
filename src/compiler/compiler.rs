//! Main compiler module.
//!
//! This module contains the emission context and the root of the code
//! generation walk. Declarations, global assignments and function
//! definitions are emitted in that order, followed by the entry point.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::ast::{
    ast::{PrimitiveType, Root},
    declarations::{Declaration, FunctionDefinition},
};

use super::{
    fragment::{Function, Inst, IrType, Item, Label, Linkage, Module, Value},
    stmt::{gen_assignment, gen_block},
};

/// Name of the function holding the global assignments.
pub const INIT_FUNCTION: &str = "minic.init";
/// Name a user-defined `main` is emitted under, freeing `main` for the
/// entry point.
pub const USER_MAIN: &str = "minic.main";

/// The state of one code generation run.
///
/// Holds the module under construction plus the per-function counters for
/// temporaries and labels.
pub struct Compiler {
    /// The module being built
    pub module: Module,
    /// Interned string constants, by content
    strings: HashMap<String, usize>,
    /// Every function name of the unit, to keep globals from colliding
    function_names: HashSet<String>,

    next_temp: u32,
    next_label: u32,
    /// Allocas of the current function, hoisted to its entry block
    allocas: Vec<Inst>,
}

impl Compiler {
    pub fn new(unit_name: &str) -> Self {
        Compiler {
            module: Module {
                name: unit_name.to_string(),
                strings: vec![],
                items: vec![],
            },
            strings: HashMap::new(),
            function_names: HashSet::new(),
            next_temp: 0,
            next_label: 0,
            allocas: vec![],
        }
    }

    pub fn fresh_temp(&mut self) -> u32 {
        let temp = self.next_temp;
        self.next_temp += 1;
        temp
    }

    pub fn fresh_label(&mut self, kind: &str) -> Label {
        let label = Label(format!("{}.{}", kind, self.next_label));
        self.next_label += 1;
        label
    }

    /// Returns the constant for `value`, reusing an earlier identical one.
    pub fn intern_string(&mut self, value: &str) -> Value {
        let id = match self.strings.get(value) {
            Some(id) => *id,
            None => {
                let id = self.module.strings.len();
                self.module.strings.push(value.to_string());
                self.strings.insert(value.to_string(), id);
                id
            }
        };

        Value::Str {
            id,
            len: value.len() + 1,
        }
    }

    /// Symbol of a global variable. Functions and variables share one
    /// namespace in the output, so colliding variables get a suffix.
    pub fn global_symbol(&self, name: &str) -> String {
        if self.function_names.contains(name) {
            format!("{}.var", name)
        } else {
            name.to_string()
        }
    }

    /// Symbol of a function.
    pub fn function_symbol(&self, name: &str) -> String {
        if name == "main" {
            USER_MAIN.to_string()
        } else {
            name.to_string()
        }
    }

    /// Records a stack slot for the entry block of the current function.
    pub fn add_alloca(&mut self, slot: Value, ty: IrType) {
        self.allocas.push(Inst::Alloca { dest: slot, ty });
    }

    fn begin_function(&mut self) {
        self.next_temp = 0;
        self.next_label = 0;
        self.allocas.clear();
    }

    /// Assembles the body of the current function.
    ///
    /// Allocas go first, an unterminated block falls through into the next
    /// label, instructions after a terminator open a fresh unreachable
    /// block, and a body that can run off the end gets a default return.
    fn finish_function(&mut self, body: Vec<Inst>, return_type: IrType) -> Vec<Inst> {
        let mut insts = vec![Inst::Label(Label(String::from("entry")))];
        insts.append(&mut self.allocas);

        let mut terminated = false;
        for inst in body {
            match &inst {
                Inst::Label(label) if !terminated => insts.push(Inst::Br(label.clone())),
                Inst::Label(_) => {}
                _ if terminated => {
                    let dead = self.fresh_label("dead");
                    insts.push(Inst::Label(dead));
                }
                _ => {}
            }
            terminated = inst.is_terminator();
            insts.push(inst);
        }

        if !terminated {
            insts.push(Inst::Ret(
                Value::zero(return_type).map(|value| (return_type, value)),
            ));
        }

        insts
    }

    /// Emits a complete function from a body fragment.
    pub fn define_function(
        &mut self,
        name: String,
        linkage: Linkage,
        return_type: IrType,
        params: Vec<(IrType, String)>,
        body: Vec<Inst>,
    ) {
        let insts = self.finish_function(body, return_type);
        self.module.items.push(Item::Define(Function {
            name,
            linkage,
            return_type,
            params,
            insts,
        }));
    }
}

fn gen_declaration(compiler: &mut Compiler, declaration: &Declaration) {
    match declaration {
        Declaration::Variable(variable) => {
            let name = compiler.global_symbol(&variable.name);
            compiler.module.items.push(Item::Global {
                name,
                ty: variable.ty.into(),
                is_extern: variable.is_extern,
            });
        }
        Declaration::Function(function) => {
            let name = compiler.function_symbol(&function.name);
            compiler.module.items.push(Item::Declare {
                name,
                return_type: function.return_type.into(),
                params: function.param_types.iter().map(|ty| (*ty).into()).collect(),
            });
        }
    }
}

fn gen_function(compiler: &mut Compiler, function: &FunctionDefinition) {
    compiler.begin_function();
    let mut entry = vec![];

    // Parameters are copied into slots so that they can be assigned to.
    for param in &function.params {
        let ty = IrType::from(param.ty);
        let slot = Value::Slot {
            name: param.name.clone(),
            slot: param.slot.0,
        };
        compiler.add_alloca(slot.clone(), ty);
        entry.push(Inst::Store {
            ty,
            value: Value::Param(param.name.clone()),
            ptr: slot,
        });
    }

    let body = gen_block(compiler, &function.body);
    entry.extend(body.insts);

    let params = function
        .params
        .iter()
        .map(|param| (IrType::from(param.ty), param.name.clone()))
        .collect();
    let name = compiler.function_symbol(&function.signature.name);
    compiler.define_function(
        name,
        Linkage::External,
        function.signature.return_type.into(),
        params,
        entry,
    );
}

/// `main` calls the initialiser and then a parameterless user `main`,
/// returning its int result.
fn gen_entry_point(compiler: &mut Compiler, user_main: Option<PrimitiveType>) {
    compiler.begin_function();
    let mut body = vec![Inst::Call {
        dest: None,
        return_type: IrType::Void,
        callee: INIT_FUNCTION.to_string(),
        arguments: vec![],
    }];

    match user_main {
        Some(PrimitiveType::Int) => {
            let dest = compiler.fresh_temp();
            body.push(Inst::Call {
                dest: Some(dest),
                return_type: IrType::I32,
                callee: USER_MAIN.to_string(),
                arguments: vec![],
            });
            body.push(Inst::Ret(Some((IrType::I32, Value::Temp(dest)))));
        }
        Some(return_type) => {
            let return_type = IrType::from(return_type);
            let dest = match return_type {
                IrType::Void => None,
                _ => Some(compiler.fresh_temp()),
            };
            body.push(Inst::Call {
                dest,
                return_type,
                callee: USER_MAIN.to_string(),
                arguments: vec![],
            });
        }
        None => {}
    }

    compiler.define_function(
        String::from("main"),
        Linkage::External,
        IrType::I32,
        vec![],
        body,
    );
}

/// Emits the module for a checked AST. Never fails: every name and type was
/// proven during lowering.
pub fn gen_root(root: &Root) -> Module {
    let mut compiler = Compiler::new(&root.unit_name);

    for declaration in &root.declarations {
        if let Declaration::Function(function) = declaration {
            compiler.function_names.insert(function.name.clone());
        }
    }
    for function in &root.function_definitions {
        compiler.function_names.insert(function.signature.name.clone());
    }
    // The entry point and user main live under these names.
    compiler.function_names.insert(String::from("main"));

    for declaration in &root.declarations {
        gen_declaration(&mut compiler, declaration);
    }

    compiler.begin_function();
    let mut init = vec![];
    for assignment in &root.global_assignments {
        init.extend(gen_assignment(&mut compiler, assignment).insts);
    }
    compiler.define_function(
        INIT_FUNCTION.to_string(),
        Linkage::Internal,
        IrType::Void,
        vec![],
        init,
    );

    for function in &root.function_definitions {
        gen_function(&mut compiler, function);
    }

    let user_main = root
        .function_definitions
        .iter()
        .find(|function| function.signature.name == "main" && function.params.is_empty())
        .map(|function| function.signature.return_type);
    gen_entry_point(&mut compiler, user_main);

    debug!(
        "emitted {}: {} items, {} string constants",
        compiler.module.name,
        compiler.module.items.len(),
        compiler.module.strings.len()
    );

    compiler.module
}
