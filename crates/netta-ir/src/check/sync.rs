//! Synchronization and urgency checks on edges.

use crate::document::Document;
use crate::expr::{ExprKind, SyncKind};
use crate::ids::EdgeId;
use crate::types::Kind;

/// If the edge synchronizes on a `broadcast` channel as the *receiver*
/// (`chan?`) and also carries a guard referencing a clock, sets
/// `hasGuardOnRecvBroadcast` (4.6).
pub fn check_sync(doc: &mut Document, edge: EdgeId) {
    let Some(sync) = doc.edges.get(edge.index()).sync else { return };
    let ExprKind::Sync { channel, kind } = doc.exprs.get(sync.index()).kind.clone() else { return };
    if kind != SyncKind::Receive {
        return;
    }
    let Some(channel_ty) = doc.exprs.get(channel.index()).ty else { return };
    let is_broadcast = matches!(doc.types.get(channel_ty.index()).kind(), Kind::Channel { broadcast: true, .. });
    if !is_broadcast {
        return;
    }
    let Some(guard) = doc.edges.get(edge.index()).guard else { return };
    if guard_references_clock(doc, guard) {
        doc.flags.has_guard_on_recv_broadcast = true;
    }
}

fn guard_references_clock(doc: &Document, expr: crate::ids::ExprId) -> bool {
    let node = doc.exprs.get(expr.index());
    if node.ty.map(|t| doc.types.get(t.index()).is_clock()).unwrap_or(false) {
        return true;
    }
    match &node.kind {
        ExprKind::Unary(_, e) => guard_references_clock(doc, *e),
        ExprKind::Binary(_, a, b) => guard_references_clock(doc, *a) || guard_references_clock(doc, *b),
        ExprKind::Ternary { cond, then, otherwise } => {
            guard_references_clock(doc, *cond) || guard_references_clock(doc, *then) || guard_references_clock(doc, *otherwise)
        }
        _ => false,
    }
}

/// Sets `hasUrgentTransition` if an outgoing edge's location is urgent,
/// or the edge synchronizes on an urgent channel.
pub fn check_urgency(doc: &mut Document, edge: EdgeId) {
    if let crate::ids::Node::Location(loc) = doc.edges.get(edge.index()).source {
        if doc.locations.get(loc.index()).urgent {
            doc.flags.has_urgent_transition = true;
            return;
        }
    }
    let Some(sync) = doc.edges.get(edge.index()).sync else { return };
    let ExprKind::Sync { channel, .. } = doc.exprs.get(sync.index()).kind.clone() else { return };
    if let Some(ty) = doc.exprs.get(channel.index()).ty {
        if matches!(doc.types.get(ty.index()).kind(), Kind::Channel { urgent: true, .. }) {
            doc.flags.has_urgent_transition = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::check::cache::TypeCache;
    use crate::expr::Expr;
    use crate::ids::Node;
    use crate::types::Type;
    use netta_base::Span;

    #[test]
    fn broadcast_receive_with_clock_guard_sets_flag() {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let chan_ty = crate::ids::TypeId::from_index(
            doc.types.push(Type::new(Kind::Channel { urgent: false, broadcast: true })),
        );
        let chan_name = doc.interner.intern("c");
        doc.add_variable(doc.global_frame, chan_name, chan_ty, None, Span::point(0)).unwrap();
        let clock_name = doc.interner.intern("t");
        doc.add_variable(doc.global_frame, clock_name, cache.clock, None, Span::point(0)).unwrap();

        let tname = doc.interner.intern("P");
        let template = doc.add_template(tname, Span::point(0)).unwrap();
        let l0 = doc.add_location(template, doc.interner.intern("L0"), 0, Span::point(0)).unwrap();
        let l1 = doc.add_location(template, doc.interner.intern("L1"), 1, Span::point(0)).unwrap();
        let edge = doc.add_edge(template, Node::Location(l0), Node::Location(l1), true, Span::point(0));

        let chan_ref = crate::ids::ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(chan_name), Span::point(0))));
        doc.add_sync(edge, chan_ref, false);

        let clock_ref = crate::ids::ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(clock_name), Span::point(0))));
        doc.add_guard(edge, clock_ref);

        let frame = doc.global_frame;
        super::super::typing::assign_type(&mut doc, &cache, frame, chan_ref);
        super::super::typing::assign_type(&mut doc, &cache, frame, clock_ref);
        let sync = doc.edges.get(edge.index()).sync.unwrap();
        super::super::typing::assign_type(&mut doc, &cache, frame, sync);

        check_sync(&mut doc, edge);
        assert!(doc.flags.has_guard_on_recv_broadcast);
    }
}
