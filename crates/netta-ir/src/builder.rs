//! The Builder contract.
//!
//! This is the narrow, flat-call-sequence interface front-ends use to
//! populate a [`Document`]. Every operation takes a [`Span`] for
//! diagnostics and records its element in the appropriate container;
//! append-only, no deletions except [`Builder::remove_process`] (LSC
//! cleanup, valid only before type checking).
//!
//! Implemented directly on `Document` rather than as a separate object:
//! mutation is exposed through inherent methods rather than a detached
//! builder struct - front-ends hold a `&mut Document` and call these
//! methods in sequence.

use netta_base::{Name, Span};

use crate::decl::{Function, Variable};
use crate::document::{Document, Query};
use crate::expr::ExprKind;
use crate::frame::SymbolKind;
use crate::ids::{
    EdgeId, ExprId, FrameId, FunctionId, LocationId, Node, ProcessId, StmtId, SymbolId, TemplateId,
    TypeId, VariableId,
};
use crate::template::{ChannelPriority, Edge, Instance, Location, Process, Template};
use crate::types::{Kind, Type};

/// Raised by Builder operations that hit a hard-structural violation (7:
/// "The Builder path rejects only hard-structural violations ... at call
/// time"). Semantic problems are deferred to the checker and reported as
/// [`crate::diagnostic::Diagnostic`]s instead.
#[derive(Clone, Debug)]
pub enum BuilderError {
    DuplicateDefinition { name: Name, existing: SymbolId },
    UnknownTemplate(Name),
    UnknownProcess(Name),
}

pub type BuilderResult<T> = Result<T, BuilderError>;

/// The flat operation set front-ends use to populate a [`Document`],
/// implemented directly on it.
pub trait Builder {
    fn add_variable(
        &mut self,
        frame: FrameId,
        name: Name,
        ty: TypeId,
        initializer: Option<ExprId>,
        span: Span,
    ) -> BuilderResult<VariableId>;

    fn add_function(
        &mut self,
        frame: FrameId,
        name: Name,
        ty: TypeId,
        params: Vec<SymbolId>,
        body: StmtId,
        span: Span,
    ) -> BuilderResult<FunctionId>;

    fn add_template(&mut self, name: Name, span: Span) -> BuilderResult<TemplateId>;

    fn add_location(
        &mut self,
        template: TemplateId,
        name: Name,
        position: u32,
        span: Span,
    ) -> BuilderResult<LocationId>;

    fn add_edge(
        &mut self,
        template: TemplateId,
        source: Node,
        target: Node,
        controllable: bool,
        span: Span,
    ) -> EdgeId;

    fn add_sync(&mut self, edge: EdgeId, channel: ExprId, send: bool);

    fn add_guard(&mut self, edge: EdgeId, guard: ExprId);

    fn add_assign(&mut self, edge: EdgeId, assignment: ExprId);

    fn add_instance(
        &mut self,
        owner: Name,
        template: TemplateId,
        args: Vec<ExprId>,
        span: Span,
    ) -> BuilderResult<crate::ids::InstanceId>;

    fn add_process(&mut self, instance: crate::ids::InstanceId) -> ProcessId;

    fn add_query(&mut self, formula: String, options: Vec<String>) -> crate::ids::QueryId;

    fn begin_chan_priority(&mut self, head: ExprId) -> crate::ids::ChanPriorityId;

    fn add_chan_priority(
        &mut self,
        list: crate::ids::ChanPriorityId,
        separator: crate::template::PrioritySeparator,
        expr: ExprId,
    );

    fn add_progress_measure(&mut self, template: TemplateId, measure: ExprId);

    fn set_before_update(&mut self, expr: ExprId);

    fn set_after_update(&mut self, expr: ExprId);

    /// Removes a process from the document; the only permitted deletion,
    /// and only valid for LSC cleanup performed before type checking (5).
    fn remove_process(&mut self, process: ProcessId) -> BuilderResult<()>;
}

impl Builder for Document {
    fn add_variable(
        &mut self,
        frame: FrameId,
        name: Name,
        ty: TypeId,
        initializer: Option<ExprId>,
        span: Span,
    ) -> BuilderResult<VariableId> {
        let symbol = self
            .declare(frame, name, ty, span, SymbolKind::Variable, 0)
            .map_err(|existing| BuilderError::DuplicateDefinition { name, existing })?;
        self.report_if_shadows(frame, name, span);
        let id = VariableId::from_index(self.variables.push(Variable { symbol, initializer }));
        self.symbols.get_mut(symbol.index()).reference = id.index() as u32;
        if frame == self.global_frame {
            self.globals.push(id);
        }
        Ok(id)
    }

    fn add_function(
        &mut self,
        frame: FrameId,
        name: Name,
        ty: TypeId,
        params: Vec<SymbolId>,
        body: StmtId,
        span: Span,
    ) -> BuilderResult<FunctionId> {
        let symbol = self
            .declare(frame, name, ty, span, SymbolKind::Function, 0)
            .map_err(|existing| BuilderError::DuplicateDefinition { name, existing })?;
        self.report_if_shadows(frame, name, span);
        let fn_frame = self.new_child_frame(frame);
        let id = FunctionId::from_index(
            self.functions.push(Function::new(symbol, params, fn_frame, body)),
        );
        self.symbols.get_mut(symbol.index()).reference = id.index() as u32;
        Ok(id)
    }

    fn add_template(&mut self, name: Name, span: Span) -> BuilderResult<TemplateId> {
        let process_ty = TypeId::from_index(self.types.push(Type::new(Kind::Process)));
        let symbol = self
            .declare(self.global_frame, name, process_ty, span, SymbolKind::Template, 0)
            .map_err(|existing| BuilderError::DuplicateDefinition { name, existing })?;
        let frame = self.new_child_frame(self.global_frame);
        let id = TemplateId::from_index(self.templates.push(Template::new(symbol, frame)));
        self.symbols.get_mut(symbol.index()).reference = id.index() as u32;
        self.template_order.push(id);
        Ok(id)
    }

    fn add_location(
        &mut self,
        template: TemplateId,
        name: Name,
        position: u32,
        span: Span,
    ) -> BuilderResult<LocationId> {
        let tmpl = self.templates.get(template.index());
        let frame = tmpl.frame;
        let void_ty = TypeId::from_index(self.types.push(Type::new(Kind::Void)));
        let symbol = self
            .declare(frame, name, void_ty, span, SymbolKind::Variable, 0)
            .map_err(|existing| BuilderError::DuplicateDefinition { name, existing })?;
        self.report_if_shadows(frame, name, span);
        let id = LocationId::from_index(self.locations.push(Location::new(symbol, name, position)));
        self.templates.get_mut(template.index()).locations.push(id);
        Ok(id)
    }

    fn add_edge(
        &mut self,
        template: TemplateId,
        source: Node,
        target: Node,
        controllable: bool,
        span: Span,
    ) -> EdgeId {
        let tmpl = self.templates.get(template.index());
        let number = tmpl.edges.len() as u32;
        let id = EdgeId::from_index(self.edges.push(Edge::new(number, controllable, source, target, span)));
        self.templates.get_mut(template.index()).edges.push(id);
        id
    }

    fn add_sync(&mut self, edge: EdgeId, channel: ExprId, send: bool) {
        let kind = if send { crate::expr::SyncKind::Send } else { crate::expr::SyncKind::Receive };
        let span = self.exprs.get(channel.index()).span;
        let sync_expr = ExprId::from_index(
            self.exprs.push(crate::expr::Expr::new(ExprKind::Sync { channel, kind }, span)),
        );
        self.edges.get_mut(edge.index()).sync = Some(sync_expr);
    }

    fn add_guard(&mut self, edge: EdgeId, guard: ExprId) {
        self.edges.get_mut(edge.index()).guard = Some(guard);
    }

    fn add_assign(&mut self, edge: EdgeId, assignment: ExprId) {
        self.edges.get_mut(edge.index()).assignment = Some(assignment);
    }

    fn add_instance(
        &mut self,
        owner: Name,
        template: TemplateId,
        args: Vec<ExprId>,
        span: Span,
    ) -> BuilderResult<crate::ids::InstanceId> {
        let process_ty = TypeId::from_index(self.types.push(Type::new(Kind::Process)));
        let owner_symbol = self
            .declare(self.global_frame, owner, process_ty, span, SymbolKind::Instance, 0)
            .map_err(|existing| BuilderError::DuplicateDefinition { name: owner, existing })?;

        let param_names: Vec<(Name, TypeId, Span)> = self
            .templates
            .get(template.index())
            .params
            .iter()
            .map(|&p| {
                let sym = self.symbols.get(p.index());
                (sym.name, sym.ty, sym.span)
            })
            .collect();

        let bound_count = args.len().min(param_names.len());
        let unbound_count = param_names.len() - bound_count;
        let frame = self.new_child_frame(self.global_frame);

        let mut frame_symbols = Vec::with_capacity(param_names.len());
        for (name, ty, pspan) in param_names.iter().skip(bound_count) {
            let sym = self
                .declare(frame, *name, *ty, *pspan, SymbolKind::Variable, 0)
                .map_err(|existing| BuilderError::DuplicateDefinition { name: *name, existing })?;
            frame_symbols.push(sym);
        }
        let mut mapping = Vec::with_capacity(bound_count);
        for ((name, ty, pspan), &arg) in param_names.iter().take(bound_count).zip(args.iter()) {
            let sym = self
                .declare(frame, *name, *ty, *pspan, SymbolKind::Variable, 0)
                .map_err(|existing| BuilderError::DuplicateDefinition { name: *name, existing })?;
            frame_symbols.push(sym);
            mapping.push((sym, arg));
        }

        let id = crate::ids::InstanceId::from_index(self.instances.push(Instance {
            owner: owner_symbol,
            template,
            frame,
            unbound_count,
            bound_count,
            mapping,
            restricted: Default::default(),
        }));
        self.symbols.get_mut(owner_symbol.index()).reference = id.index() as u32;
        Ok(id)
    }

    fn add_process(&mut self, instance: crate::ids::InstanceId) -> ProcessId {
        let id = ProcessId::from_index(self.processes.push(Process { instance, priority: None }));
        self.system_processes.push(id);
        id
    }

    fn add_query(&mut self, formula: String, options: Vec<String>) -> crate::ids::QueryId {
        crate::ids::QueryId::from_index(self.queries.push(Query { formula, options }))
    }

    fn begin_chan_priority(&mut self, head: ExprId) -> crate::ids::ChanPriorityId {
        crate::ids::ChanPriorityId::from_index(
            self.channel_priorities.push(ChannelPriority { head, rest: Vec::new() }),
        )
    }

    fn add_chan_priority(
        &mut self,
        list: crate::ids::ChanPriorityId,
        separator: crate::template::PrioritySeparator,
        expr: ExprId,
    ) {
        self.channel_priorities.get_mut(list.index()).rest.push((separator, expr));
    }

    fn add_progress_measure(&mut self, template: TemplateId, measure: ExprId) {
        self.templates.get_mut(template.index()).progress_measures.push(measure);
    }

    fn set_before_update(&mut self, expr: ExprId) {
        self.before_update = Some(expr);
    }

    fn set_after_update(&mut self, expr: ExprId) {
        self.after_update = Some(expr);
    }

    fn remove_process(&mut self, process: ProcessId) -> BuilderResult<()> {
        self.system_processes.retain(|&p| p != process);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_variable_declares_symbol_and_errors_on_duplicate() {
        let mut doc = Document::new();
        let name = doc.interner.intern("x");
        let int_ty = TypeId::from_index(doc.types.push(Type::new(Kind::Int { range: None })));
        doc.add_variable(doc.global_frame, name, int_ty, None, Span::point(0)).unwrap();
        let err = doc.add_variable(doc.global_frame, name, int_ty, None, Span::point(1)).unwrap_err();
        assert!(matches!(err, BuilderError::DuplicateDefinition { .. }));
    }

    #[test]
    fn add_template_registers_it_in_declaration_order() {
        let mut doc = Document::new();
        let p = doc.interner.intern("P");
        let q = doc.interner.intern("Q");
        let t1 = doc.add_template(p, Span::point(0)).unwrap();
        let t2 = doc.add_template(q, Span::point(1)).unwrap();
        assert_eq!(doc.template_order, vec![t1, t2]);
    }

    #[test]
    fn add_edge_numbers_edges_within_a_template() {
        let mut doc = Document::new();
        let name = doc.interner.intern("P");
        let template = doc.add_template(name, Span::point(0)).unwrap();
        let l0 = doc.add_location(template, doc.interner.intern("L0"), 0, Span::point(0)).unwrap();
        let l1 = doc.add_location(template, doc.interner.intern("L1"), 1, Span::point(0)).unwrap();
        let e0 = doc.add_edge(template, Node::Location(l0), Node::Location(l1), true, Span::point(0));
        let e1 = doc.add_edge(template, Node::Location(l1), Node::Location(l0), true, Span::point(0));
        assert_eq!(doc.edges.get(e0.index()).number, 0);
        assert_eq!(doc.edges.get(e1.index()).number, 1);
    }

    #[test]
    fn declaring_a_variable_that_shadows_a_parent_frame_warns() {
        let mut doc = Document::new();
        let name = doc.interner.intern("x");
        let int_ty = TypeId::from_index(doc.types.push(Type::new(Kind::Int { range: None })));
        doc.add_variable(doc.global_frame, name, int_ty, None, Span::point(0)).unwrap();

        let child = doc.new_child_frame(doc.global_frame);
        doc.add_variable(child, name, int_ty, None, Span::point(1)).unwrap();

        assert_eq!(doc.diagnostics.warnings().count(), 1);
        assert!(matches!(
            doc.diagnostics.all()[0].kind,
            crate::diagnostic::ErrorKind::ShadowsAVariable
        ));
    }

    #[test]
    fn remove_process_drops_it_from_the_system_list() {
        let mut doc = Document::new();
        let name = doc.interner.intern("P");
        let template = doc.add_template(name, Span::point(0)).unwrap();
        let owner = doc.interner.intern("p");
        let instance = doc.add_instance(owner, template, vec![], Span::point(0)).unwrap();
        let process = doc.add_process(instance);
        assert_eq!(doc.system_processes, vec![process]);
        doc.remove_process(process).unwrap();
        assert!(doc.system_processes.is_empty());
    }
}
