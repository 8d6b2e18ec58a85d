//! Symbol and frame scoping.
//!
//! A [`Frame`] is a lexical scope: a list of locally declared [`Symbol`]s
//! plus an optional parent to recurse into. Frames nest the way declaration
//! blocks nest in the source language - the document's global frame, a
//! template's parameter/local frame as its child, a statement block's frame
//! as the template frame's child, and so on.

use netta_base::Name;

use crate::ids::{FrameId, SymbolId, TypeId};

/// A named entity owning a type, a declaring frame, a position, and an
/// opaque back-pointer to the domain object it names (a variable, function,
/// template, instance, or LSC instance-line).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Symbol {
    pub name: Name,
    pub ty: TypeId,
    pub frame: FrameId,
    pub span: netta_base::Span,
    /// What kind of domain object this symbol names, and that object's id
    /// encoded as a raw index - kept untyped here so `frame.rs` doesn't
    /// need to depend on every declaration module. Callers narrow this
    /// back to a `VariableId`/`FunctionId`/etc. based on `kind`.
    pub kind: SymbolKind,
    pub reference: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SymbolKind {
    Variable,
    Function,
    Template,
    Instance,
    Process,
    TypeAlias,
    InstanceLine,
}

/// A lexical scope: the symbols declared directly in it, plus a link to the
/// enclosing scope for recursive lookup.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    parent: Option<FrameId>,
    symbols: Vec<SymbolId>,
}

impl Frame {
    pub fn root() -> Self {
        Self { parent: None, symbols: Vec::new() }
    }

    pub fn child_of(parent: FrameId) -> Self {
        Self { parent: Some(parent), symbols: Vec::new() }
    }

    pub fn parent(&self) -> Option<FrameId> {
        self.parent
    }

    pub fn local_symbols(&self) -> &[SymbolId] {
        &self.symbols
    }

    pub fn local_symbols_mut(&mut self) -> &mut Vec<SymbolId> {
        &mut self.symbols
    }

    pub fn size(&self) -> usize {
        self.symbols.len()
    }
}
