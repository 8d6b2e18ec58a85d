//! Assignment validation: sequences of assignments on
//! edges, l-value checking, and compatible-type checking. The
//! changes/depends set collection itself lives in
//! [`super::changes_depends`], which reuses [`is_lvalue`] and
//! [`collect_reads_writes`] from this module.

use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::document::Document;
use crate::expr::ExprKind;
use crate::ids::{EdgeId, ExprId, FrameId, SymbolId};

use super::cache::TypeCache;

/// Checks an edge's assignment expression (itself a `Comma`-chained
/// sequence of `Assign` sub-expressions, per 4.3's `Comma` operator),
/// verifying every assignment target is an l-value of a type compatible
/// with its value.
pub fn check_assignment(doc: &mut Document, cache: &TypeCache, frame: FrameId, edge: EdgeId) {
    let Some(assignment) = doc.edges.get(edge.index()).assignment else { return };
    super::typing::assign_type(doc, cache, frame, assignment);
    for target in assignment_targets(doc, assignment) {
        if !is_lvalue(doc, target) {
            let span = doc.exprs.get(target.index()).span;
            doc.report(Diagnostic::new(ErrorKind::BadAssignment, span).with_param("target is not an l-value"));
        }
    }
}

/// Every `Assign` target reachable through a comma-chained sequence
/// rooted at `expr`.
fn assignment_targets(doc: &Document, expr: ExprId) -> Vec<ExprId> {
    let mut out = Vec::new();
    let mut stack = vec![expr];
    while let Some(id) = stack.pop() {
        match &doc.exprs.get(id.index()).kind {
            ExprKind::Binary(crate::expr::BinOp::Comma, lhs, rhs) => {
                stack.push(*lhs);
                stack.push(*rhs);
            }
            ExprKind::Assign { target, .. } => out.push(*target),
            _ => {}
        }
    }
    out
}

/// An l-value is an identifier, a dotted field access, or a subscript -
/// anything that denotes a storage location rather than a computed
/// value.
pub fn is_lvalue(doc: &Document, expr: ExprId) -> bool {
    matches!(
        doc.exprs.get(expr.index()).kind,
        ExprKind::Identifier(_) | ExprKind::Dot { .. } | ExprKind::Subscript { .. }
    )
}

/// Classifies every symbol reference under `root` as read, written, or
/// both, per 4.8's `depends`/`changes` definitions. Used by
/// `changes_depends.rs` to seed a function's sets from its own body
/// before propagating call-graph effects.
pub fn collect_reads_writes(doc: &Document, root: ExprId, reads: &mut Vec<SymbolId>, writes: &mut Vec<SymbolId>) {
    let node = doc.exprs.get(root.index());
    match &node.kind {
        ExprKind::Identifier(_) => {
            if let Some(sym) = node.resolved {
                reads.push(sym);
            }
        }
        ExprKind::Assign { op, target, value } => {
            collect_reads_writes(doc, *value, reads, writes);
            if op.is_some() {
                // Compound assignment (`+=`) reads before it writes.
                collect_reads_writes(doc, *target, reads, writes);
            }
            if let Some(sym) = lvalue_symbol(doc, *target) {
                writes.push(sym);
            }
        }
        ExprKind::Unary(op, operand) => {
            use crate::expr::UnOp::{PostDecrement, PostIncrement, PreDecrement, PreIncrement};
            if matches!(op, PreIncrement | PreDecrement | PostIncrement | PostDecrement) {
                if let Some(sym) = lvalue_symbol(doc, *operand) {
                    reads.push(sym);
                    writes.push(sym);
                }
            } else {
                collect_reads_writes(doc, *operand, reads, writes);
            }
        }
        ExprKind::Binary(_, a, b) => {
            collect_reads_writes(doc, *a, reads, writes);
            collect_reads_writes(doc, *b, reads, writes);
        }
        ExprKind::Ternary { cond, then, otherwise } => {
            collect_reads_writes(doc, *cond, reads, writes);
            collect_reads_writes(doc, *then, reads, writes);
            collect_reads_writes(doc, *otherwise, reads, writes);
        }
        ExprKind::Call { callee, args } => {
            collect_reads_writes(doc, *callee, reads, writes);
            for arg in args {
                collect_reads_writes(doc, *arg, reads, writes);
            }
        }
        ExprKind::Dot { base, .. } => collect_reads_writes(doc, *base, reads, writes),
        ExprKind::Subscript { base, index } => {
            collect_reads_writes(doc, *base, reads, writes);
            collect_reads_writes(doc, *index, reads, writes);
        }
        ExprKind::Sync { channel, .. } => collect_reads_writes(doc, *channel, reads, writes),
        ExprKind::Quantified { predicate, .. } => collect_reads_writes(doc, *predicate, reads, writes),
        ExprKind::ListLiteral(items) => {
            for item in items {
                collect_reads_writes(doc, *item, reads, writes);
            }
        }
        ExprKind::Const(_) | ExprKind::Deadlock => {}
    }
}

fn lvalue_symbol(doc: &Document, expr: ExprId) -> Option<SymbolId> {
    match &doc.exprs.get(expr.index()).kind {
        ExprKind::Identifier(_) => doc.exprs.get(expr.index()).resolved,
        ExprKind::Dot { base, .. } | ExprKind::Subscript { base, .. } => lvalue_symbol(doc, *base),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::expr::{ConstValue, Expr};
    use netta_base::Span;

    #[test]
    fn identifier_is_lvalue_but_literal_is_not() {
        let mut doc = Document::new();
        let name = doc.interner.intern("x");
        let id_expr = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(name), Span::point(0))));
        let lit = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(1)), Span::point(0))));
        assert!(is_lvalue(&doc, id_expr));
        assert!(!is_lvalue(&doc, lit));
    }

    #[test]
    fn simple_assignment_writes_target_and_reads_value() {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let x_name = doc.interner.intern("x");
        let y_name = doc.interner.intern("y");
        doc.add_variable(doc.global_frame, x_name, cache.int, None, Span::point(0)).unwrap();
        doc.add_variable(doc.global_frame, y_name, cache.int, None, Span::point(0)).unwrap();

        let target = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(x_name), Span::point(0))));
        let value = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(y_name), Span::point(0))));
        let assign = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Assign { op: None, target, value }, Span::point(0))));

        let frame = doc.global_frame;
        super::super::typing::assign_type(&mut doc, &cache, frame, assign);

        let mut reads = Vec::new();
        let mut writes = Vec::new();
        collect_reads_writes(&doc, assign, &mut reads, &mut writes);

        let x_sym = doc.resolve(doc.global_frame, x_name).unwrap();
        let y_sym = doc.resolve(doc.global_frame, y_name).unwrap();
        assert_eq!(writes, vec![x_sym]);
        assert_eq!(reads, vec![y_sym]);
    }
}
