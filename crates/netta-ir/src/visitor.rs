//! Double-dispatch traversal over a [`Document`].
//!
//! Extensibility is expressed as a capability set with default no-ops
//! (9 "Visitor extensibility") rather than inheritance: implement only the
//! callbacks a pass cares about. [`walk`] drives the fixed traversal
//! order: globals -> each template (before/locations/edges/functions/
//! after) -> each instance -> each process -> queries.

use crate::document::Document;
use crate::ids::{EdgeId, FunctionId, InstanceId, LocationId, ProcessId, QueryId, TemplateId, VariableId};

/// Capability set a traversal pass implements. Every method defaults to a
/// no-op (or, for `visit_template_before`, to continuing the traversal),
/// so a pass overrides only what it needs.
pub trait Visitor {
    fn visit_global_variable(&mut self, _doc: &Document, _variable: VariableId) {}

    /// Called before descending into a template's interior. Returning
    /// `false` skips the template's locations/edges/functions (4.7).
    fn visit_template_before(&mut self, _doc: &Document, _template: TemplateId) -> bool {
        true
    }

    fn visit_template_after(&mut self, _doc: &Document, _template: TemplateId) {}

    fn visit_location(&mut self, _doc: &Document, _template: TemplateId, _location: LocationId) {}

    fn visit_edge(&mut self, _doc: &Document, _template: TemplateId, _edge: EdgeId) {}

    fn visit_function(&mut self, _doc: &Document, _template: TemplateId, _function: FunctionId) {}

    fn visit_instance(&mut self, _doc: &Document, _instance: InstanceId) {}

    fn visit_process(&mut self, _doc: &Document, _process: ProcessId) {}

    fn visit_query(&mut self, _doc: &Document, _query: QueryId) {}
}

/// Drives `visitor` over `doc` in a fixed traversal order: globals, then
/// each template, then instances, processes, and queries.
pub fn walk(doc: &Document, visitor: &mut dyn Visitor) {
    for &var_id in &doc.globals {
        visitor.visit_global_variable(doc, var_id);
    }

    for &template in &doc.template_order {
        if !visitor.visit_template_before(doc, template) {
            continue;
        }
        let tmpl = doc.templates.get(template.index());
        for &location in &tmpl.locations {
            visitor.visit_location(doc, template, location);
        }
        for &edge in &tmpl.edges {
            visitor.visit_edge(doc, template, edge);
        }
        for &function in &tmpl.functions {
            visitor.visit_function(doc, template, function);
        }
        visitor.visit_template_after(doc, template);
    }

    for idx in 0..doc.instances.len() {
        visitor.visit_instance(doc, InstanceId::from_index(idx));
    }

    for idx in 0..doc.processes.len() {
        visitor.visit_process(doc, ProcessId::from_index(idx));
    }

    for idx in 0..doc.queries.len() {
        visitor.visit_query(doc, QueryId::from_index(idx));
    }
}
