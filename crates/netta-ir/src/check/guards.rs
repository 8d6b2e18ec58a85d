//! Edge guard checking.

use crate::check::cache::TypeCache;
use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::document::Document;
use crate::expr::ExprKind;
use crate::ids::{EdgeId, FrameId};
use crate::types::Kind;

/// Checks an edge's guard, if present: must type to `bool`, and must not
/// contain an assignment sub-expression (side effects belong in the
/// edge's separate assignment, not its guard).
pub fn check_guard(doc: &mut Document, cache: &TypeCache, frame: FrameId, edge: EdgeId) {
    let Some(guard) = doc.edges.get(edge.index()).guard else { return };
    let ty = super::typing::assign_type(doc, cache, frame, guard);
    if !matches!(doc.types.get(ty.index()).kind(), Kind::Bool) {
        let span = doc.exprs.get(guard.index()).span;
        doc.report(Diagnostic::new(ErrorKind::BadGuard, span).with_param("guard must be boolean"));
    }
    if contains_side_effect(doc, guard) {
        let span = doc.exprs.get(guard.index()).span;
        doc.report(Diagnostic::new(ErrorKind::BadGuard, span).with_param("guard must not have side effects"));
    }

    if has_strict_lower_bound(doc, guard) && doc.edges.get(edge.index()).controllable {
        doc.flags.has_strict_lower_bound_on_controllable_edges = true;
    }
}

fn contains_side_effect(doc: &Document, expr: crate::ids::ExprId) -> bool {
    let node = doc.exprs.get(expr.index());
    match &node.kind {
        ExprKind::Assign { .. } => true,
        ExprKind::Unary(op, e) => {
            matches!(
                op,
                crate::expr::UnOp::PreIncrement
                    | crate::expr::UnOp::PreDecrement
                    | crate::expr::UnOp::PostIncrement
                    | crate::expr::UnOp::PostDecrement
            ) || contains_side_effect(doc, *e)
        }
        ExprKind::Binary(_, a, b) => contains_side_effect(doc, *a) || contains_side_effect(doc, *b),
        ExprKind::Ternary { cond, then, otherwise } => {
            contains_side_effect(doc, *cond) || contains_side_effect(doc, *then) || contains_side_effect(doc, *otherwise)
        }
        ExprKind::Call { args, .. } => args.iter().any(|a| contains_side_effect(doc, *a)),
        ExprKind::Dot { base, .. } => contains_side_effect(doc, *base),
        ExprKind::Subscript { base, index } => contains_side_effect(doc, *base) || contains_side_effect(doc, *index),
        _ => false,
    }
}

/// True if `expr` contains a strict lower bound on a clock - `clock >
/// expr` or `expr < clock` - used to set
/// `hasStrictLowerBoundOnControllableEdges`. A strict *upper* bound
/// (`clock < expr` / `expr > clock`) does not count.
fn has_strict_lower_bound(doc: &Document, expr: crate::ids::ExprId) -> bool {
    let node = doc.exprs.get(expr.index());
    match &node.kind {
        ExprKind::Binary(op, lhs, rhs) => {
            let is_clock = |e: &crate::ids::ExprId| {
                doc.exprs.get(e.index()).ty.map(|t| doc.types.get(t.index()).is_clock()).unwrap_or(false)
            };
            let is_lower_bound = (*op == crate::expr::BinOp::Gt && is_clock(lhs))
                || (*op == crate::expr::BinOp::Lt && is_clock(rhs));
            is_lower_bound || has_strict_lower_bound(doc, *lhs) || has_strict_lower_bound(doc, *rhs)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::expr::{ConstValue, Expr};
    use crate::ids::Node;
    use netta_base::Span;

    fn make_doc_with_clock_guard(op: crate::expr::BinOp) -> (Document, EdgeId) {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let clock_name = doc.interner.intern("x");
        doc.add_variable(doc.global_frame, clock_name, cache.clock, None, Span::point(0)).unwrap();

        let tname = doc.interner.intern("P");
        let template = doc.add_template(tname, Span::point(0)).unwrap();
        let l0 = doc.add_location(template, doc.interner.intern("L0"), 0, Span::point(0)).unwrap();
        let l1 = doc.add_location(template, doc.interner.intern("L1"), 1, Span::point(0)).unwrap();
        let edge = doc.add_edge(template, Node::Location(l0), Node::Location(l1), true, Span::point(0));

        let clock_ref = crate::ids::ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(clock_name), Span::point(0))));
        let one = crate::ids::ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(1)), Span::point(0))));
        let guard = crate::ids::ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Binary(op, clock_ref, one), Span::point(0))));
        doc.add_guard(edge, guard);
        (doc, edge)
    }

    #[test]
    fn strict_clock_guard_on_controllable_edge_sets_flag() {
        let (mut doc, edge) = make_doc_with_clock_guard(crate::expr::BinOp::Gt);
        let cache = TypeCache::build(&mut doc);
        let frame = doc.global_frame;
        check_guard(&mut doc, &cache, frame, edge);
        assert!(doc.flags.has_strict_lower_bound_on_controllable_edges);
    }

    #[test]
    fn non_strict_clock_guard_does_not_set_flag() {
        let (mut doc, edge) = make_doc_with_clock_guard(crate::expr::BinOp::Ge);
        let cache = TypeCache::build(&mut doc);
        let frame = doc.global_frame;
        check_guard(&mut doc, &cache, frame, edge);
        assert!(!doc.flags.has_strict_lower_bound_on_controllable_edges);
    }

    /// `x < 1` is a strict *upper* bound on the clock, not a lower bound -
    /// must not set `hasStrictLowerBoundOnControllableEdges`.
    #[test]
    fn strict_upper_bound_guard_does_not_set_lower_bound_flag() {
        let (mut doc, edge) = make_doc_with_clock_guard(crate::expr::BinOp::Lt);
        let cache = TypeCache::build(&mut doc);
        let frame = doc.global_frame;
        check_guard(&mut doc, &cache, frame, edge);
        assert!(!doc.flags.has_strict_lower_bound_on_controllable_edges);
    }

    #[test]
    fn non_boolean_guard_reports_bad_guard() {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let tname = doc.interner.intern("P");
        let template = doc.add_template(tname, Span::point(0)).unwrap();
        let l0 = doc.add_location(template, doc.interner.intern("L0"), 0, Span::point(0)).unwrap();
        let l1 = doc.add_location(template, doc.interner.intern("L1"), 1, Span::point(0)).unwrap();
        let edge = doc.add_edge(template, Node::Location(l0), Node::Location(l1), true, Span::point(0));
        let not_bool = crate::ids::ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(1)), Span::point(0))));
        doc.add_guard(edge, not_bool);
        let frame = doc.global_frame;
        check_guard(&mut doc, &cache, frame, edge);
        assert_eq!(doc.diagnostics.errors().count(), 1);
    }
}
