use log::debug;

use crate::{
    ast::{
        ast::{LocalSlot, PrimitiveType, Root, Storage},
        declarations::{Declaration, FunctionDecl, FunctionDefinition, Parameter, VariableDecl},
    },
    errors::errors::{Error, ErrorImpl},
    parser::tree::{self, ErrorNode, Line, Start, TypeName},
    scope::{
        scope::ScopeChain,
        symbols::{FunctionSignature, Symbol},
    },
};

use super::stmt::{lower_assignment, lower_block};

/// Per-function state of the pass. The scope chain is threaded separately
/// so that frames can be borrowed by guards.
#[derive(Debug)]
pub struct Lowerer {
    return_type: PrimitiveType,
    next_slot: u32,
}

impl Default for Lowerer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lowerer {
    pub fn new() -> Self {
        Lowerer {
            return_type: PrimitiveType::Void,
            next_slot: 0,
        }
    }

    /// Resets the slot counter for a new function body.
    pub fn begin_function(&mut self, return_type: PrimitiveType) {
        self.return_type = return_type;
        self.next_slot = 0;
    }

    pub fn return_type(&self) -> PrimitiveType {
        self.return_type
    }

    pub fn allocate_slot(&mut self) -> LocalSlot {
        let slot = LocalSlot(self.next_slot);
        self.next_slot += 1;
        slot
    }
}

/// Maps a spelled type onto a primitive type.
pub fn resolve_type(name: &TypeName) -> Result<PrimitiveType, Error> {
    name.name.parse::<PrimitiveType>().map_err(|_| {
        Error::new(
            ErrorImpl::UnsupportedType {
                type_: name.name.clone(),
            },
            name.span.start.clone(),
        )
    })
}

/// Like `resolve_type`, but for variables and parameters, which cannot be
/// `void`.
pub fn resolve_value_type(name: &TypeName) -> Result<PrimitiveType, Error> {
    match resolve_type(name)? {
        PrimitiveType::Void => Err(Error::new(
            ErrorImpl::UnsupportedType {
                type_: name.name.clone(),
            },
            name.span.start.clone(),
        )),
        ty => Ok(ty),
    }
}

pub fn unknown_construct(node: &ErrorNode) -> Error {
    let text = node
        .tokens
        .iter()
        .map(|token| token.value.as_str())
        .collect::<Vec<&str>>()
        .join(" ");

    Error::new(
        ErrorImpl::UnknownConstruct {
            construct: format!("unparsed input `{}`", text),
        },
        node.span.start.clone(),
    )
}

fn lower_declaration(
    scopes: &mut ScopeChain,
    declaration: &tree::Declaration,
) -> Result<Declaration, Error> {
    match &declaration.kind {
        tree::DeclarationKind::Variable(arg) => {
            let ty = resolve_value_type(&arg.ty)?;
            scopes.declare_variable(
                Symbol::new(arg.name.name.as_str(), ty, Storage::Global),
                arg.name.span.start.clone(),
            )?;

            Ok(Declaration::Variable(VariableDecl {
                is_extern: declaration.is_extern,
                ty,
                name: arg.name.name.clone(),
            }))
        }
        tree::DeclarationKind::Function(function) => {
            let return_type = resolve_type(&function.return_type)?;
            let param_types = function
                .params
                .iter()
                .map(resolve_value_type)
                .collect::<Result<Vec<PrimitiveType>, Error>>()?;

            scopes.declare_function(
                FunctionSignature::new(
                    function.name.name.as_str(),
                    return_type,
                    param_types.clone(),
                    declaration.is_extern,
                ),
                function.name.span.start.clone(),
            )?;

            Ok(Declaration::Function(FunctionDecl {
                is_extern: declaration.is_extern,
                return_type,
                name: function.name.name.clone(),
                param_types,
            }))
        }
    }
}

/// Registers the signature in the enclosing frame, then lowers the body in a
/// frame seeded with the parameters.
fn lower_function(
    lowerer: &mut Lowerer,
    scopes: &mut ScopeChain,
    function: &tree::FunctionDef,
) -> Result<FunctionDefinition, Error> {
    debug!("lowering function {}", function.name.name);

    let return_type = resolve_type(&function.return_type)?;
    lowerer.begin_function(return_type);

    let mut params = vec![];
    for arg in &function.params {
        params.push(Parameter {
            ty: resolve_value_type(&arg.ty)?,
            name: arg.name.name.clone(),
            slot: lowerer.allocate_slot(),
        });
    }

    let signature = FunctionSignature::new(
        function.name.name.as_str(),
        return_type,
        params.iter().map(|param| param.ty).collect(),
        false,
    );
    scopes.declare_function(signature.clone(), function.name.span.start.clone())?;

    let symbols = params
        .iter()
        .zip(&function.params)
        .map(|(param, arg)| {
            (
                Symbol::new(param.name.as_str(), param.ty, Storage::Local(param.slot)),
                arg.name.span.start.clone(),
            )
        })
        .collect();

    let mut body_scope = scopes.enter_function(symbols)?;
    let body = lower_block(lowerer, &mut body_scope, &function.block)?;

    Ok(FunctionDefinition {
        signature,
        params,
        body,
    })
}

/// Lowers and type checks a whole parse tree.
///
/// Fails on the first error; no partial `Root` is ever returned.
pub fn lower(start: &Start, unit_name: &str) -> Result<Root, Error> {
    let mut lowerer = Lowerer::new();
    let mut scopes = ScopeChain::new();
    let mut root = Root {
        unit_name: unit_name.to_string(),
        declarations: vec![],
        global_assignments: vec![],
        function_definitions: vec![],
    };

    for line in &start.lines {
        match line {
            Line::Declaration(declaration) => root
                .declarations
                .push(lower_declaration(&mut scopes, declaration)?),
            Line::Assignment(assignment) => root
                .global_assignments
                .push(lower_assignment(&scopes, assignment)?),
            Line::FunctionDef(function) => root
                .function_definitions
                .push(lower_function(&mut lowerer, &mut scopes, function)?),
            Line::Error(node) => return Err(unknown_construct(node)),
        }
    }

    debug!(
        "lowered {}: {} declarations, {} global assignments, {} functions",
        root.unit_name,
        root.declarations.len(),
        root.global_assignments.len(),
        root.function_definitions.len()
    );

    Ok(root)
}
