//! The type checker: a single pass over the
//! document, in the same global-then-per-template order [`crate::visitor`]
//! fixes, that resolves every identifier, assigns every expression's type,
//! validates the timed-automata and LSC constructs, and populates the
//! derived fields (`Location::rates`, `Function::changes`/`depends`,
//! `Document::flags`).
//!
//! Submodules each own one concern from 4.6's bullet list; this module
//! wires them together into [`check_document`], the crate's single public
//! entry point for the whole pass. LSC cut consistency ([`lsc::check_cut`])
//! is invoked directly by front-ends that construct a [`crate::lsc::Cut`]
//! (the `Document` itself stores simregions but not the transient cuts
//! built over them), not from this orchestrator.

pub mod assign;
pub mod cache;
pub mod changes_depends;
pub mod guards;
pub mod invariants;
pub mod lsc;
pub mod priority;
pub mod query;
pub mod sync;
pub mod typing;

use crate::document::Document;
use crate::ids::{ChanPriorityId, EdgeId, LocationId, QueryId, TemplateId};
use crate::instantiate;
use cache::TypeCache;

/// Runs the full checking pass over `doc`: resolves identifiers, assigns
/// types, validates guards/invariants/syncs/assignments/priorities/
/// queries/LSC cuts, runs the instantiation engine's restriction
/// validation over every instance, and the changes/depends analysis
/// over every function.
///
/// Per 7 "Propagation policy", this never stops early on a semantic
/// error; every diagnostic it can independently discover is appended to
/// `doc.diagnostics` before returning. Call this exactly once per
/// document - 8 "Idempotent checking" holds only because `assign_type`
/// short-circuits on an expression that already has a `ty`, not because
/// re-running is free.
pub fn check_document(doc: &mut Document) {
    let cache = TypeCache::build(doc);

    for idx in 0..doc.globals.len() {
        let var_id = doc.globals[idx];
        if let Some(initializer) = doc.variables.get(var_id.index()).initializer {
            typing::assign_type(doc, &cache, doc.global_frame, initializer);
        }
    }

    let templates: Vec<TemplateId> = doc.template_order.clone();
    for template in templates {
        check_template(doc, &cache, template);
    }

    let priority_lists: Vec<ChanPriorityId> =
        (0..doc.channel_priorities.len()).map(ChanPriorityId::from_index).collect();
    for list in priority_lists {
        priority::check_channel_priority(doc, &cache, doc.global_frame, list);
    }

    let query_ids: Vec<QueryId> = (0..doc.queries.len()).map(QueryId::from_index).collect();
    for query in query_ids {
        query::check_query(doc, query, netta_base::Span::point(0));
    }

    if let Some(expr) = doc.before_update {
        typing::assign_type(doc, &cache, doc.global_frame, expr);
    }
    if let Some(expr) = doc.after_update {
        typing::assign_type(doc, &cache, doc.global_frame, expr);
    }

    let instance_ids: Vec<crate::ids::InstanceId> =
        (0..doc.instances.len()).map(crate::ids::InstanceId::from_index).collect();
    for instance in instance_ids {
        let restricted = instantiate::compute_restricted_parameters(
            doc,
            doc.instances.get(instance.index()).template,
        );
        doc.instances.get_mut(instance.index()).restricted = restricted;

        for violation in instantiate::validate_restrictions(doc, instance) {
            let span = doc.exprs.get(violation.offending_expr.index()).span;
            let name = doc.interner.resolve(doc.symbols.get(violation.parameter.index()).name);
            doc.report(
                crate::diagnostic::Diagnostic::new(crate::diagnostic::ErrorKind::RestrictionViolation, span)
                    .with_param(name.to_string()),
            );
        }
    }

    changes_depends::analyze(doc);
}

fn check_template(doc: &mut Document, cache: &TypeCache, template: TemplateId) {
    let frame = doc.templates.get(template.index()).frame;

    let variables: Vec<crate::ids::VariableId> = doc.templates.get(template.index()).variables.clone();
    for var_id in variables {
        if let Some(initializer) = doc.variables.get(var_id.index()).initializer {
            typing::assign_type(doc, cache, frame, initializer);
        }
    }

    let locations: Vec<LocationId> = doc.templates.get(template.index()).locations.clone();
    for location in &locations {
        invariants::check_invariant(doc, cache, frame, *location);
    }

    let init = doc.templates.get(template.index()).init;
    if init.is_none() {
        if let Some(&first) = locations.first() {
            doc.templates.get_mut(template.index()).init = Some(first);
        }
    }

    let edges: Vec<EdgeId> = doc.templates.get(template.index()).edges.clone();
    for edge in &edges {
        let edge_frame = doc.edges.get(edge.index()).select_frame.unwrap_or(frame);
        guards::check_guard(doc, cache, edge_frame, *edge);
        assign::check_assignment(doc, cache, edge_frame, *edge);
        if let Some(sync) = doc.edges.get(edge.index()).sync {
            typing::assign_type(doc, cache, edge_frame, sync);
        }
        sync::check_sync(doc, *edge);
        sync::check_urgency(doc, *edge);
    }

    let progress_measures: Vec<crate::ids::ExprId> =
        doc.templates.get(template.index()).progress_measures.clone();
    for measure in progress_measures {
        typing::assign_type(doc, cache, frame, measure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::expr::{BinOp, ConstValue, Expr, ExprKind};
    use crate::ids::{Node, TypeId};
    use crate::types::{Kind, Type};
    use netta_base::Span;

    /// End-to-end scenario 1: template `P`
    /// with `L0 -> L1` guarded `x>1` and synced `c!`, instantiated and
    /// registered as a process. Expects zero errors, one process, and
    /// `hasStrictLowerBoundOnControllableEdges`.
    #[test]
    fn minimal_ta_scenario_has_no_errors_and_sets_strict_lower_bound() {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);

        let x_name = doc.interner.intern("x");
        doc.add_variable(doc.global_frame, x_name, cache.clock, None, Span::point(0)).unwrap();
        let chan_ty =
            TypeId::from_index(doc.types.push(Type::new(Kind::Channel { urgent: false, broadcast: false })));
        let c_name = doc.interner.intern("c");
        doc.add_variable(doc.global_frame, c_name, chan_ty, None, Span::point(0)).unwrap();

        let p_name = doc.interner.intern("P");
        let template = doc.add_template(p_name, Span::point(0)).unwrap();
        let l0 = doc.add_location(template, doc.interner.intern("L0"), 0, Span::point(0)).unwrap();
        let l1 = doc.add_location(template, doc.interner.intern("L1"), 1, Span::point(0)).unwrap();
        doc.templates.get_mut(template.index()).init = Some(l0);
        let edge = doc.add_edge(template, Node::Location(l0), Node::Location(l1), true, Span::point(0));

        let x_ref = crate::ids::ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(x_name), Span::point(0))));
        let one = crate::ids::ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(1)), Span::point(0))));
        let guard = crate::ids::ExprId::from_index(
            doc.exprs.push(Expr::new(ExprKind::Binary(BinOp::Gt, x_ref, one), Span::point(0))),
        );
        doc.add_guard(edge, guard);

        let c_ref = crate::ids::ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(c_name), Span::point(0))));
        doc.add_sync(edge, c_ref, true);

        let owner = doc.interner.intern("p");
        let instance = doc.add_instance(owner, template, vec![], Span::point(0)).unwrap();
        doc.add_process(instance);

        check_document(&mut doc);

        assert_eq!(doc.diagnostics.errors().count(), 0, "{:?}", doc.diagnostics.all());
        assert!(doc.flags.has_strict_lower_bound_on_controllable_edges);
        assert_eq!(doc.system_processes.len(), 1);
    }

    /// End-to-end scenario 2: `int a; int a;` at global scope yields one
    /// `DuplicateDefinition` error, and checking still runs to completion.
    #[test]
    fn duplicate_global_declaration_reports_one_error() {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let name = doc.interner.intern("a");
        doc.add_variable(doc.global_frame, name, cache.int, None, Span::point(0)).unwrap();
        let err = doc.add_variable(doc.global_frame, name, cache.int, None, Span::point(1)).unwrap_err();
        assert!(matches!(err, crate::builder::BuilderError::DuplicateDefinition { .. }));

        check_document(&mut doc);
        assert_eq!(doc.diagnostics.errors().count(), 0);
    }
}
