//! Channel priority list checking.
//!
//! Each operand must evaluate to a channel (or array of channels); the
//! list becomes a strict total order at runtime, with `<` separators
//! introducing a new, strictly lower priority level and `,` separators
//! keeping operands at the same level.

use crate::check::cache::TypeCache;
use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::document::Document;
use crate::ids::{ChanPriorityId, FrameId};
use crate::types::Kind;

pub fn check_channel_priority(doc: &mut Document, cache: &TypeCache, frame: FrameId, list: ChanPriorityId) {
    let head = doc.channel_priorities.get(list.index()).head;
    check_operand(doc, cache, frame, head);

    let rest = doc.channel_priorities.get(list.index()).rest.clone();
    for (_, expr) in rest {
        check_operand(doc, cache, frame, expr);
    }
}

fn check_operand(doc: &mut Document, cache: &TypeCache, frame: FrameId, expr: crate::ids::ExprId) {
    let ty = super::typing::assign_type(doc, cache, frame, expr);
    let is_channel_or_array_of_channel = match doc.types.get(ty.index()).kind() {
        Kind::Channel { .. } => true,
        Kind::Array { element, .. } => matches!(doc.types.get(element.index()).kind(), Kind::Channel { .. }),
        _ => false,
    };
    if !is_channel_or_array_of_channel && ty != cache.unknown {
        let span = doc.exprs.get(expr.index()).span;
        doc.report(
            Diagnostic::new(ErrorKind::BadPriorityList, span).with_param("operand must be a channel"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::expr::{Expr, ExprKind};
    use crate::types::Type;
    use netta_base::Span;

    #[test]
    fn non_channel_operand_reports_bad_priority_list() {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let name = doc.interner.intern("notachannel");
        doc.add_variable(doc.global_frame, name, cache.int, None, Span::point(0)).unwrap();
        let head = crate::ids::ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(name), Span::point(0))));
        let list = doc.begin_chan_priority(head);
        let frame = doc.global_frame;
        check_channel_priority(&mut doc, &cache, frame, list);
        assert_eq!(doc.diagnostics.errors().count(), 1);
    }

    #[test]
    fn channel_operand_is_accepted() {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let chan_ty = crate::ids::TypeId::from_index(
            doc.types.push(Type::new(crate::types::Kind::Channel { urgent: false, broadcast: false })),
        );
        let name = doc.interner.intern("c");
        doc.add_variable(doc.global_frame, name, chan_ty, None, Span::point(0)).unwrap();
        let head = crate::ids::ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(name), Span::point(0))));
        let list = doc.begin_chan_priority(head);
        let frame = doc.global_frame;
        check_channel_priority(&mut doc, &cache, frame, list);
        assert_eq!(doc.diagnostics.errors().count(), 0);
    }
}
