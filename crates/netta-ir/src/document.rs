//! The root IR container.
//!
//! A `Document` owns every entity in the model: the type/expression/
//! statement slabs, every template and its interior storage, every
//! instance/process, the LSC entities, the diagnostic sink, and two
//! distinct string tables: the identifier interner used during frame
//! resolution, and the insertion-order string table downstream
//! serializers use for deduplication.

use std::collections::BTreeSet;

use netta_base::{Interner, PositionTable, Slab};

use crate::decl::{Function, Variable};
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::expr::Expr;
use crate::frame::{Frame, Symbol};
use crate::ids::{ExprId, FrameId, ProcessId, SymbolId, TemplateId, TypeId, VariableId};
use crate::lsc::{Condition, InstanceLine, Message, Simregion, Update};
use crate::stmt::Stmt;
use crate::template::{Branchpoint, ChannelPriority, Edge, Instance, Location, Process, Template};
use crate::types::Type;

/// Global flags set by the checker while validating the document (4.6).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GlobalFlags {
    pub has_strict_invariants: bool,
    pub stops_clock: bool,
    pub has_urgent_transition: bool,
    pub has_strict_lower_bound_on_controllable_edges: bool,
    pub has_guard_on_recv_broadcast: bool,
}

/// The three semantics a model may admit, advertised to downstream
/// backends (6 "Supported methods flags"). Defaults to all `true`,
/// toggled `false` by constructs that violate a given semantics'
/// restrictions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SupportedMethods {
    pub symbolic: bool,
    pub stochastic: bool,
    pub concrete: bool,
}

impl Default for SupportedMethods {
    fn default() -> Self {
        Self { symbolic: true, stochastic: true, concrete: true }
    }
}

/// An embedded query: a formula string (parsed by the front-end using the
/// same grammar as expressions, in the query sub-dialect) plus recognized
/// option pass-throughs (6 "Recognized query options").
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Query {
    pub formula: String,
    pub options: Vec<String>,
}

/// An insertion-order-preserving deduplicated list of strings, distinct
/// from the `Interner` (3.1 "String table vs. interner").
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct StringTable {
    strings: Vec<String>,
    index: std::collections::HashMap<String, usize>,
}

impl StringTable {
    pub fn new() -> Self {
        Self { strings: Vec::new(), index: std::collections::HashMap::new() }
    }

    /// Adds `s` if not already present, returning its (possibly
    /// preexisting) index.
    pub fn add_string_if_new(&mut self, s: &str) -> usize {
        if let Some(&idx) = self.index.get(s) {
            return idx;
        }
        let idx = self.strings.len();
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), idx);
        idx
    }

    pub fn get(&self, idx: usize) -> &str {
        &self.strings[idx]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// The root IR container. See the module doc comment for ownership rules.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Document {
    pub types: Slab<Type>,
    pub exprs: Slab<Expr>,
    pub stmts: Slab<Stmt>,
    pub frames: Slab<Frame>,
    pub symbols: Slab<Symbol>,
    pub variables: Slab<Variable>,
    pub functions: Slab<Function>,
    pub templates: Slab<Template>,
    pub locations: Slab<Location>,
    pub branchpoints: Slab<Branchpoint>,
    pub edges: Slab<Edge>,
    pub instances: Slab<Instance>,
    pub processes: Slab<Process>,
    pub channel_priorities: Slab<ChannelPriority>,
    pub queries: Slab<Query>,
    pub instance_lines: Slab<InstanceLine>,
    pub messages: Slab<Message>,
    pub conditions: Slab<Condition>,
    pub updates: Slab<Update>,
    pub simregions: Slab<Simregion>,

    /// Root lexical frame holding global declarations.
    pub global_frame: FrameId,
    /// Variables declared directly in `global_frame`, in declaration
    /// order - the document's global declarations.
    pub globals: Vec<VariableId>,
    /// Templates declared at document scope, in declaration order.
    pub template_order: Vec<TemplateId>,
    /// Fully bound processes composing the running system, in the order
    /// `system ...;` declared them.
    pub system_processes: Vec<ProcessId>,

    pub flags: GlobalFlags,
    pub supported_methods: SupportedMethods,
    pub model_options: Vec<String>,
    pub before_update: Option<ExprId>,
    pub after_update: Option<ExprId>,

    /// Transient identifier interner used while the Builder ingests
    /// declarations and frames resolve names; not needed once checking
    /// completes; re-exported so callers can still pretty-print symbol
    /// names from a finished `Document`.
    pub interner: Interner,
    pub strings: StringTable,
    pub positions: PositionTable,
    pub diagnostics: Diagnostics,
}

impl Document {
    pub fn new() -> Self {
        let mut frames = Slab::new();
        let global_frame = FrameId::from_index(frames.push(Frame::root()));
        Self {
            types: Slab::new(),
            exprs: Slab::new(),
            stmts: Slab::new(),
            frames,
            symbols: Slab::new(),
            variables: Slab::new(),
            functions: Slab::new(),
            templates: Slab::new(),
            locations: Slab::new(),
            branchpoints: Slab::new(),
            edges: Slab::new(),
            instances: Slab::new(),
            processes: Slab::new(),
            channel_priorities: Slab::new(),
            queries: Slab::new(),
            instance_lines: Slab::new(),
            messages: Slab::new(),
            conditions: Slab::new(),
            updates: Slab::new(),
            simregions: Slab::new(),
            global_frame,
            globals: Vec::new(),
            template_order: Vec::new(),
            system_processes: Vec::new(),
            flags: GlobalFlags::default(),
            supported_methods: SupportedMethods::default(),
            model_options: Vec::new(),
            before_update: None,
            after_update: None,
            interner: Interner::new(),
            strings: StringTable::new(),
            positions: PositionTable::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) -> bool {
        self.diagnostics.report(diagnostic)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Looks up `name` starting at `frame`, walking up through parent
    /// frames (4.2 "resolve").
    pub fn resolve(&self, frame: FrameId, name: netta_base::Name) -> Option<SymbolId> {
        let mut current = Some(frame);
        while let Some(id) = current {
            if let Some(sym) = self.lookup_local(id, name) {
                return Some(sym);
            }
            current = self.frames.get(id.index()).parent();
        }
        None
    }

    pub fn lookup_local(&self, frame: FrameId, name: netta_base::Name) -> Option<SymbolId> {
        self.frames
            .get(frame.index())
            .local_symbols()
            .iter()
            .copied()
            .find(|&sym| self.symbols.get(sym.index()).name == name)
    }

    /// Declares a new symbol named `name` directly in `frame`, erroring
    /// with `Err` (the caller turns this into an `ErrorKind::DuplicateDefinition`
    /// diagnostic - the Builder path in 7 "rejects hard-structural
    /// violations ... at call time") if the name is already declared
    /// locally.
    pub fn declare(
        &mut self,
        frame: FrameId,
        name: netta_base::Name,
        ty: TypeId,
        span: netta_base::Span,
        kind: crate::frame::SymbolKind,
        reference: u32,
    ) -> Result<SymbolId, SymbolId> {
        if let Some(existing) = self.lookup_local(frame, name) {
            return Err(existing);
        }
        let id = SymbolId::from_index(self.symbols.push(Symbol {
            name,
            ty,
            frame,
            span,
            kind,
            reference,
        }));
        self.frames.get_mut(frame.index()).local_symbols_mut().push(id);
        Ok(id)
    }

    pub fn new_child_frame(&mut self, parent: FrameId) -> FrameId {
        FrameId::from_index(self.frames.push(Frame::child_of(parent)))
    }

    /// True if `name` is already visible in an ancestor of `frame`; used
    /// to decide whether a fresh declaration should emit
    /// `ErrorKind::ShadowsAVariable`.
    pub fn shadows(&self, frame: FrameId, name: netta_base::Name) -> bool {
        match self.frames.get(frame.index()).parent() {
            Some(parent) => self.resolve(parent, name).is_some(),
            None => false,
        }
    }

    /// Reports `ErrorKind::ShadowsAVariable` at `span` if a just-declared
    /// `name` in `frame` shadows a symbol visible in an ancestor frame (4.2:
    /// "shadowing across frames is permitted but produces a warning").
    pub fn report_if_shadows(&mut self, frame: FrameId, name: netta_base::Name, span: netta_base::Span) {
        if self.shadows(frame, name) {
            let resolved = self.interner.resolve(name).to_string();
            self.report(
                crate::diagnostic::Diagnostic::new(crate::diagnostic::ErrorKind::ShadowsAVariable, span)
                    .with_param(resolved),
            );
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::SymbolKind;

    fn dummy_ty() -> TypeId {
        TypeId::from_index(0)
    }

    #[test]
    fn new_document_has_an_empty_global_frame() {
        let doc = Document::new();
        assert_eq!(doc.frames.get(doc.global_frame.index()).size(), 0);
    }

    #[test]
    fn declare_then_resolve_from_child_frame() {
        let mut doc = Document::new();
        let name = doc.interner.intern("x");
        let sym = doc
            .declare(doc.global_frame, name, dummy_ty(), netta_base::Span::point(0), SymbolKind::Variable, 0)
            .unwrap();
        let child = doc.new_child_frame(doc.global_frame);
        assert_eq!(doc.resolve(child, name), Some(sym));
    }

    #[test]
    fn declare_duplicate_in_same_frame_errors() {
        let mut doc = Document::new();
        let name = doc.interner.intern("a");
        doc.declare(doc.global_frame, name, dummy_ty(), netta_base::Span::point(0), SymbolKind::Variable, 0)
            .unwrap();
        let err = doc
            .declare(doc.global_frame, name, dummy_ty(), netta_base::Span::point(1), SymbolKind::Variable, 1)
            .unwrap_err();
        assert_eq!(doc.symbols.get(err.index()).name, name);
    }

    #[test]
    fn string_table_deduplicates_insertions() {
        let mut table = StringTable::new();
        let a = table.add_string_if_new("hello");
        let b = table.add_string_if_new("world");
        let c = table.add_string_if_new("hello");
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn supported_methods_default_all_true() {
        let methods = SupportedMethods::default();
        assert!(methods.symbolic && methods.stochastic && methods.concrete);
    }
}
