use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
};

use log::{debug, trace};

use crate::{
    ast::ast::PrimitiveType,
    errors::errors::{Error, ErrorImpl, Namespace},
    Position,
};

use super::symbols::{FunctionSignature, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Ordinary,
    /// Introduced directly by a loop; rejects direct declarations.
    Loop,
}

/// One lexical scope: two separate namespaces plus a link to the
/// enclosing frame.
#[derive(Debug)]
pub struct Frame {
    variables: HashMap<String, Symbol>,
    functions: HashMap<String, FunctionSignature>,
    kind: FrameKind,
    parent: Option<usize>,
}

impl Frame {
    fn new(kind: FrameKind, parent: Option<usize>) -> Self {
        Frame {
            variables: HashMap::new(),
            functions: HashMap::new(),
            kind,
            parent,
        }
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn get_variable(&self, name: &str) -> Option<&Symbol> {
        self.variables.get(name)
    }

    pub fn get_function(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.get(name)
    }
}

/// The stack of live frames during lowering. Index 0 is the root frame;
/// every other frame's parent is an index below it.
#[derive(Debug)]
pub struct ScopeChain {
    frames: Vec<Frame>,
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeChain {
    pub fn new() -> Self {
        ScopeChain {
            frames: vec![Frame::new(FrameKind::Ordinary, None)],
        }
    }

    /// Number of live frames, the root included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn current(&self) -> &Frame {
        &self.frames[self.frames.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Walks from the current frame outwards along parent links.
    fn enclosing(&self) -> impl Iterator<Item = &Frame> {
        let mut next = Some(self.frames.len() - 1);
        std::iter::from_fn(move || {
            let frame = &self.frames[next?];
            next = frame.parent();
            Some(frame)
        })
    }

    /// Pushes a child of the current frame with the given kind.
    ///
    /// The frame is popped when the returned guard is dropped, on every exit
    /// path.
    pub fn enter(&mut self, kind: FrameKind) -> ScopeGuard<'_> {
        let depth = self.frames.len();
        self.frames.push(Frame::new(kind, Some(depth - 1)));
        debug!("entered {:?} frame at depth {}", kind, depth + 1);

        ScopeGuard { chain: self, depth }
    }

    /// Pushes a child that copies the current frame's kind.
    pub fn enter_inherited(&mut self) -> ScopeGuard<'_> {
        let kind = self.current().kind;
        self.enter(kind)
    }

    /// Pushes a function body frame seeded with the parameters.
    ///
    /// The signature itself must already be declared in the enclosing frame
    /// so that recursive calls resolve.
    pub fn enter_function(
        &mut self,
        params: Vec<(Symbol, Position)>,
    ) -> Result<ScopeGuard<'_>, Error> {
        let mut guard = self.enter(FrameKind::Ordinary);
        for (symbol, position) in params {
            guard.declare_variable(symbol, position)?;
        }

        Ok(guard)
    }

    pub fn declare_variable(&mut self, symbol: Symbol, position: Position) -> Result<(), Error> {
        let frame = self.current_mut();
        if frame.kind == FrameKind::Loop {
            return Err(Error::new(
                ErrorImpl::DeclarationInLoop {
                    identifier: symbol.name,
                },
                position,
            ));
        }
        if frame.variables.contains_key(&symbol.name) {
            return Err(Error::new(
                ErrorImpl::AlreadyDeclared {
                    identifier: symbol.name,
                    namespace: Namespace::Variable,
                },
                position,
            ));
        }

        trace!("declared variable {} : {}", symbol.name, symbol.ty);
        frame.variables.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    pub fn declare_function(
        &mut self,
        signature: FunctionSignature,
        position: Position,
    ) -> Result<(), Error> {
        let frame = self.current_mut();
        if frame.kind == FrameKind::Loop {
            return Err(Error::new(
                ErrorImpl::DeclarationInLoop {
                    identifier: signature.name,
                },
                position,
            ));
        }
        if frame.functions.contains_key(&signature.name) {
            return Err(Error::new(
                ErrorImpl::AlreadyDeclared {
                    identifier: signature.name,
                    namespace: Namespace::Function,
                },
                position,
            ));
        }

        trace!("declared function {}", signature.name);
        frame.functions.insert(signature.name.clone(), signature);
        Ok(())
    }

    /// Nearest enclosing variable named `name`.
    pub fn resolve_variable(&self, name: &str, position: Position) -> Result<&Symbol, Error> {
        self.enclosing()
            .find_map(|frame| frame.get_variable(name))
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::UndefinedIdentifier {
                        identifier: name.to_string(),
                    },
                    position,
                )
            })
    }

    /// Nearest enclosing function named `name`, checked against the
    /// argument types of a call.
    ///
    /// The argument count is checked before any argument type.
    pub fn resolve_function(
        &self,
        name: &str,
        arguments: &[PrimitiveType],
        position: Position,
    ) -> Result<&FunctionSignature, Error> {
        let signature = self
            .enclosing()
            .find_map(|frame| frame.get_function(name))
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::UndefinedIdentifier {
                        identifier: name.to_string(),
                    },
                    position.clone(),
                )
            })?;

        if signature.params.len() != arguments.len() {
            return Err(Error::new(
                ErrorImpl::ArityMismatch {
                    function: name.to_string(),
                    expected: signature.params.len(),
                    received: arguments.len(),
                },
                position,
            ));
        }

        let mismatch = signature
            .params
            .iter()
            .zip(arguments)
            .position(|(expected, received)| expected != received);
        if let Some(index) = mismatch {
            return Err(Error::new(
                ErrorImpl::TypeMismatch {
                    expected: signature.params[index],
                    received: arguments[index],
                    argument: Some(index),
                },
                position,
            ));
        }

        Ok(signature)
    }
}

/// Restores the scope chain to its depth before `enter` when dropped.
pub struct ScopeGuard<'a> {
    chain: &'a mut ScopeChain,
    depth: usize,
}

impl Deref for ScopeGuard<'_> {
    type Target = ScopeChain;

    fn deref(&self) -> &Self::Target {
        self.chain
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.chain
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.chain.frames.truncate(self.depth);
        debug!("left frame, back at depth {}", self.depth);
    }
}
