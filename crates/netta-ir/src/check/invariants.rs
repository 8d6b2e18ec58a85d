//! Location invariant checking.
//!
//! An invariant is a conjunction of boolean constraints and
//! `clock <= expr` / `clock < expr` bounds. Strict upper bounds set
//! `hasStrictInvariants`; rate sub-expressions (`clock' == expr`) are
//! factored out into the location's `rates` field, and a zero rate sets
//! `stopsClock` (the "stopwatch" construct).

use crate::check::cache::TypeCache;
use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::document::Document;
use crate::expr::{BinOp, ConstValue, ExprKind};
use crate::ids::{ExprId, FrameId, LocationId};
use crate::types::Kind;

pub fn check_invariant(doc: &mut Document, cache: &TypeCache, frame: FrameId, location: LocationId) {
    let Some(invariant) = doc.locations.get(location.index()).invariant else { return };

    let mut rate_terms = Vec::new();
    let mut has_strict_upper_bound = false;
    extract_rates_and_check(doc, cache, frame, invariant, &mut rate_terms, &mut has_strict_upper_bound);

    if has_strict_upper_bound {
        doc.flags.has_strict_invariants = true;
    }

    for (clock_name_expr, rate_value) in rate_terms {
        let is_zero = match doc.exprs.get(rate_value.index()).const_value {
            Some(ConstValue::Int(0)) => true,
            Some(ConstValue::Double(v)) => v == 0.0,
            _ => false,
        };
        if is_zero {
            doc.flags.stops_clock = true;
        }
        if let ExprKind::Identifier(_) = &doc.exprs.get(clock_name_expr.index()).kind {
            if let Some(sym) = doc.exprs.get(clock_name_expr.index()).resolved {
                doc.locations.get_mut(location.index()).rates.push((sym, rate_value));
            }
        }
    }
}

/// Walks the (already type-assigned) invariant's conjunction, separating
/// `clock' == rate` terms (collected into `rates`) from the remaining
/// boolean/bound terms; sets `*has_strict` if any remaining term is a
/// strict clock bound.
fn extract_rates_and_check(
    doc: &mut Document,
    cache: &TypeCache,
    frame: FrameId,
    expr: ExprId,
    rates: &mut Vec<(ExprId, ExprId)>,
    has_strict: &mut bool,
) {
    super::typing::assign_type(doc, cache, frame, expr);

    let kind = doc.exprs.get(expr.index()).kind.clone();
    match kind {
        ExprKind::Binary(BinOp::And, lhs, rhs) => {
            extract_rates_and_check(doc, cache, frame, lhs, rates, has_strict);
            extract_rates_and_check(doc, cache, frame, rhs, rates, has_strict);
        }
        ExprKind::Binary(BinOp::Eq, lhs, rhs) if is_primed_clock(doc, lhs) => {
            rates.push((lhs, rhs));
        }
        ExprKind::Binary(op, lhs, _rhs) => {
            let lhs_ty = doc.exprs.get(lhs.index()).ty;
            let is_clock_bound = lhs_ty.map(|t| doc.types.get(t.index()).is_clock()).unwrap_or(false);
            if is_clock_bound && op == BinOp::Lt {
                *has_strict = true;
            }
            let ty = doc.exprs.get(expr.index()).ty.unwrap();
            if !matches!(doc.types.get(ty.index()).kind(), Kind::Bool) && ty != cache.unknown {
                doc.report(
                    Diagnostic::new(ErrorKind::BadInvariant, doc.exprs.get(expr.index()).span)
                        .with_param("invariant conjunct must be boolean"),
                );
            }
        }
        _ => {
            let ty = doc.exprs.get(expr.index()).ty.unwrap();
            if !matches!(doc.types.get(ty.index()).kind(), Kind::Bool) && ty != cache.unknown {
                doc.report(
                    Diagnostic::new(ErrorKind::BadInvariant, doc.exprs.get(expr.index()).span)
                        .with_param("invariant conjunct must be boolean"),
                );
            }
        }
    }
}

/// True if `expr` syntactically denotes a primed clock reference
/// (`clock'`), modeled here as an identifier node whose resolved symbol
/// is clock-typed and which appears as the left side of an equation -
/// this crate has no separate "primed" expression kind, so the
/// surface-level `'` is the front-end's problem; what reaches this IR as
/// `clock' == expr` is just an `Eq` whose LHS resolves to a clock symbol
/// and whose RHS is not itself clock-typed (distinguishing a rate
/// assertion from a plain clock-to-clock comparison).
fn is_primed_clock(doc: &Document, expr: ExprId) -> bool {
    let node = doc.exprs.get(expr.index());
    matches!(node.kind, ExprKind::Identifier(_))
        && node.ty.map(|t| doc.types.get(t.index()).is_clock()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::expr::Expr;
    use netta_base::Span;

    fn doc_with_clock(name: &str) -> (Document, crate::ids::SymbolId) {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let n = doc.interner.intern(name);
        let var = doc.add_variable(doc.global_frame, n, cache.clock, None, Span::point(0)).unwrap();
        let sym = doc.variables.get(var.index()).symbol;
        (doc, sym)
    }

    #[test]
    fn zero_rate_sets_stops_clock() {
        let (mut doc, _sym) = doc_with_clock("x");
        let cache = TypeCache::build(&mut doc);
        let clock_name = doc.interner.intern("x");
        let clock_ref = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(clock_name), Span::point(0))));
        let zero = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(0)), Span::point(0))));
        let invariant = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Binary(BinOp::Eq, clock_ref, zero), Span::point(0))));

        let tname = doc.interner.intern("P");
        let template = doc.add_template(tname, Span::point(0)).unwrap();
        let loc = doc.add_location(template, doc.interner.intern("L0"), 0, Span::point(0)).unwrap();
        doc.locations.get_mut(loc.index()).invariant = Some(invariant);

        let frame = doc.global_frame;
        check_invariant(&mut doc, &cache, frame, loc);
        assert!(doc.flags.stops_clock);
        assert_eq!(doc.locations.get(loc.index()).rates.len(), 1);
    }

    #[test]
    fn strict_upper_bound_sets_has_strict_invariants() {
        let (mut doc, _sym) = doc_with_clock("x");
        let cache = TypeCache::build(&mut doc);
        let clock_name = doc.interner.intern("x");
        let clock_ref = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(clock_name), Span::point(0))));
        let ten = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(10)), Span::point(0))));
        let invariant = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Binary(BinOp::Lt, clock_ref, ten), Span::point(0))));

        let tname = doc.interner.intern("P");
        let template = doc.add_template(tname, Span::point(0)).unwrap();
        let loc = doc.add_location(template, doc.interner.intern("L0"), 0, Span::point(0)).unwrap();
        doc.locations.get_mut(loc.index()).invariant = Some(invariant);

        let frame = doc.global_frame;
        check_invariant(&mut doc, &cache, frame, loc);
        assert!(doc.flags.has_strict_invariants);
    }

    /// `x > 1` is a strict *lower* bound, not an upper bound - must not set
    /// `hasStrictInvariants`.
    #[test]
    fn strict_lower_bound_does_not_set_has_strict_invariants() {
        let (mut doc, _sym) = doc_with_clock("x");
        let cache = TypeCache::build(&mut doc);
        let clock_name = doc.interner.intern("x");
        let clock_ref = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(clock_name), Span::point(0))));
        let one = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(1)), Span::point(0))));
        let invariant = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Binary(BinOp::Gt, clock_ref, one), Span::point(0))));

        let tname = doc.interner.intern("P");
        let template = doc.add_template(tname, Span::point(0)).unwrap();
        let loc = doc.add_location(template, doc.interner.intern("L0"), 0, Span::point(0)).unwrap();
        doc.locations.get_mut(loc.index()).invariant = Some(invariant);

        let frame = doc.global_frame;
        check_invariant(&mut doc, &cache, frame, loc);
        assert!(!doc.flags.has_strict_invariants);
    }
}
