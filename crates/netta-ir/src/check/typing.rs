//! Expression type assignment and identifier resolution.
//!
//! `assign_type` walks an expression bottom-up, resolving identifiers
//! against a given frame, assigning each node's `ty` field, and reporting
//! `UnknownIdentifier`/`TypeMismatch` diagnostics. It never panics on
//! malformed input; an expression whose type could not be determined gets
//! `Kind::Unknown` so dependent checks can detect and skip it instead of
//! cascading a second diagnostic (7 "Propagation policy").

use netta_base::Name;

use crate::check::cache::TypeCache;
use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::document::Document;
use crate::expr::{fold_binary, fold_unary, BinOp, ExprKind, UnOp};
use crate::ids::{ExprId, FrameId, TypeId};
use crate::types::Kind;

/// Assigns a type to `expr` and every sub-expression reachable from it,
/// resolving identifiers against `frame`. Returns the assigned type of
/// `expr` itself for convenience.
pub fn assign_type(doc: &mut Document, cache: &TypeCache, frame: FrameId, expr: ExprId) -> TypeId {
    if let Some(ty) = doc.exprs.get(expr.index()).ty {
        return ty;
    }

    let kind = doc.exprs.get(expr.index()).kind.clone();
    let ty = match kind {
        ExprKind::Const(value) => const_type(cache, value),
        ExprKind::Identifier(name) => resolve_identifier(doc, cache, frame, expr.clone(), name),
        ExprKind::Unary(op, operand) => {
            let operand_ty = assign_type(doc, cache, frame, operand);
            unary_result_type(doc, cache, expr, op, operand_ty)
        }
        ExprKind::Binary(op, lhs, rhs) => {
            let lhs_ty = assign_type(doc, cache, frame, lhs);
            let rhs_ty = assign_type(doc, cache, frame, rhs);
            binary_result_type(doc, cache, expr, op, lhs_ty, rhs_ty)
        }
        ExprKind::Ternary { cond, then, otherwise } => {
            let cond_ty = assign_type(doc, cache, frame, cond);
            check_is_bool(doc, cache, cond, cond_ty);
            let then_ty = assign_type(doc, cache, frame, then);
            let else_ty = assign_type(doc, cache, frame, otherwise);
            if types_equal(doc, then_ty, else_ty) {
                then_ty
            } else if is_numeric(doc, then_ty) && is_numeric(doc, else_ty) {
                cache.double
            } else {
                cache.unknown
            }
        }
        ExprKind::Call { callee, args } => {
            assign_type(doc, cache, frame, callee);
            for arg in &args {
                assign_type(doc, cache, frame, *arg);
            }
            call_result_type(doc, cache, callee)
        }
        ExprKind::Dot { base, field } => {
            let base_ty = assign_type(doc, cache, frame, base);
            dot_result_type(doc, cache, expr, base_ty, field)
        }
        ExprKind::Subscript { base, index } => {
            let base_ty = assign_type(doc, cache, frame, base);
            let index_ty = assign_type(doc, cache, frame, index);
            check_is_integral(doc, cache, index, index_ty);
            subscript_result_type(doc, base_ty)
        }
        ExprKind::Sync { channel, .. } => {
            let channel_ty = assign_type(doc, cache, frame, channel);
            if !matches!(doc.types.get(channel_ty.index()).kind(), Kind::Channel { .. }) {
                doc.report(
                    Diagnostic::new(ErrorKind::BadSync, doc.exprs.get(expr.index()).span)
                        .with_param("expected channel"),
                );
            }
            cache.void
        }
        ExprKind::Deadlock => cache.bool_,
        ExprKind::Quantified { bound_name, bound_type, predicate, .. } => {
            let child_frame = doc.new_child_frame(frame);
            let _ = doc.declare(
                child_frame,
                bound_name,
                bound_type,
                doc.exprs.get(expr.index()).span,
                crate::frame::SymbolKind::Variable,
                0,
            );
            let pred_ty = assign_type(doc, cache, child_frame, predicate);
            check_is_bool(doc, cache, predicate, pred_ty);
            cache.int
        }
        ExprKind::ListLiteral(items) => {
            for item in &items {
                assign_type(doc, cache, frame, *item);
            }
            cache.unknown
        }
        ExprKind::Assign { target, value, .. } => {
            let target_ty = assign_type(doc, cache, frame, target);
            let value_ty = assign_type(doc, cache, frame, value);
            if !is_assignable(doc, target_ty, value_ty) {
                doc.report(
                    Diagnostic::new(ErrorKind::BadAssignment, doc.exprs.get(expr.index()).span)
                        .with_param("incompatible types"),
                );
            }
            target_ty
        }
    };

    doc.exprs.get_mut(expr.index()).ty = Some(ty);
    fold_constant(doc, expr);
    ty
}

fn const_type(cache: &TypeCache, value: crate::expr::ConstValue) -> TypeId {
    match value {
        crate::expr::ConstValue::Int(_) => cache.int,
        crate::expr::ConstValue::Double(_) => cache.double,
        crate::expr::ConstValue::Bool(_) => cache.bool_,
    }
}

fn resolve_identifier(
    doc: &mut Document,
    cache: &TypeCache,
    frame: FrameId,
    expr: ExprId,
    name: Name,
) -> TypeId {
    match doc.resolve(frame, name) {
        Some(sym) => {
            doc.exprs.get_mut(expr.index()).resolved = Some(sym);
            doc.symbols.get(sym.index()).ty
        }
        None => {
            let span = doc.exprs.get(expr.index()).span;
            doc.report(Diagnostic::new(ErrorKind::UnknownIdentifier, span).with_param(doc.interner.resolve(name)));
            cache.unknown
        }
    }
}

fn is_numeric(doc: &Document, ty: TypeId) -> bool {
    doc.types.get(ty.index()).is_numeric()
}

fn is_integral(doc: &Document, ty: TypeId) -> bool {
    doc.types.get(ty.index()).is_integral()
}

fn types_equal(doc: &Document, a: TypeId, b: TypeId) -> bool {
    let a_ty = doc.types.get(a.index()).clone();
    a_ty.equals(doc.types.get(b.index()), &doc.types)
}

fn is_assignable(doc: &Document, target: TypeId, value: TypeId) -> bool {
    if types_equal(doc, target, value) {
        return true;
    }
    matches!(doc.types.get(target.index()).kind(), Kind::Double) && is_numeric(doc, value)
}

fn check_is_bool(doc: &mut Document, cache: &TypeCache, expr: ExprId, ty: TypeId) {
    if !matches!(doc.types.get(ty.index()).kind(), Kind::Bool) && ty != cache.unknown {
        let span = doc.exprs.get(expr.index()).span;
        doc.report(Diagnostic::new(ErrorKind::TypeMismatch, span).with_param("expected bool"));
    }
}

fn check_is_integral(doc: &mut Document, cache: &TypeCache, expr: ExprId, ty: TypeId) {
    if !is_integral(doc, ty) && ty != cache.unknown {
        let span = doc.exprs.get(expr.index()).span;
        doc.report(Diagnostic::new(ErrorKind::TypeMismatch, span).with_param("expected integral index"));
    }
}

/// Arithmetic promotion (4.6): `int (+) int -> int`; any operand `double`
/// promotes the result to `double`. Comparisons and boolean connectives
/// always yield `bool`.
fn binary_result_type(
    doc: &mut Document,
    cache: &TypeCache,
    expr: ExprId,
    op: BinOp,
    lhs: TypeId,
    rhs: TypeId,
) -> TypeId {
    use BinOp::{And, Comma, Div, Eq, Ge, Gt, Le, Lt, Max, Min, Mod, Ne, Or, Xor};

    match op {
        Eq | Ne | Lt | Le | Gt | Ge => cache.bool_,
        And | Or | Xor => {
            check_is_bool(doc, cache, expr, lhs);
            check_is_bool(doc, cache, expr, rhs);
            cache.bool_
        }
        Comma => rhs,
        Div | Mod | Max | Min => {
            if is_numeric(doc, lhs) && is_numeric(doc, rhs) {
                promote(doc, cache, lhs, rhs)
            } else {
                report_type_mismatch(doc, expr, "arithmetic operands must be numeric");
                cache.unknown
            }
        }
        _ => {
            if is_numeric(doc, lhs) && is_numeric(doc, rhs) {
                promote(doc, cache, lhs, rhs)
            } else {
                report_type_mismatch(doc, expr, "arithmetic operands must be numeric");
                cache.unknown
            }
        }
    }
}

fn unary_result_type(doc: &mut Document, cache: &TypeCache, expr: ExprId, op: UnOp, operand: TypeId) -> TypeId {
    match op {
        UnOp::Not => {
            check_is_bool(doc, cache, expr, operand);
            cache.bool_
        }
        UnOp::Neg | UnOp::BitNot => {
            if is_numeric(doc, operand) {
                operand
            } else {
                report_type_mismatch(doc, expr, "operand must be numeric");
                cache.unknown
            }
        }
        UnOp::PreIncrement | UnOp::PreDecrement | UnOp::PostIncrement | UnOp::PostDecrement => {
            if is_integral(doc, operand) {
                operand
            } else {
                report_type_mismatch(doc, expr, "increment/decrement operand must be integral");
                cache.unknown
            }
        }
    }
}

fn promote(doc: &Document, cache: &TypeCache, a: TypeId, b: TypeId) -> TypeId {
    if matches!(doc.types.get(a.index()).kind(), Kind::Double)
        || matches!(doc.types.get(b.index()).kind(), Kind::Double)
    {
        cache.double
    } else {
        cache.int
    }
}

fn report_type_mismatch(doc: &mut Document, expr: ExprId, msg: &str) {
    let span = doc.exprs.get(expr.index()).span;
    doc.report(Diagnostic::new(ErrorKind::TypeMismatch, span).with_param(msg));
}

fn call_result_type(doc: &mut Document, cache: &TypeCache, callee: ExprId) -> TypeId {
    let callee_ty = doc.exprs.get(callee.index()).ty.unwrap_or(cache.unknown);
    match doc.types.get(callee_ty.index()).kind().clone() {
        Kind::Function { ret, .. } => ret,
        _ => {
            report_type_mismatch(doc, callee, "callee is not a function");
            cache.unknown
        }
    }
}

fn dot_result_type(doc: &mut Document, cache: &TypeCache, expr: ExprId, base_ty: TypeId, field: Name) -> TypeId {
    let base = doc.types.get(base_ty.index()).clone();
    if !base.is_record() {
        let span = doc.exprs.get(expr.index()).span;
        doc.report(Diagnostic::new(ErrorKind::IsNotAStruct, span));
        return cache.unknown;
    }
    match base.get_label(field) {
        Some(ty) => ty,
        None => {
            let span = doc.exprs.get(expr.index()).span;
            doc.report(Diagnostic::new(ErrorKind::HasNoMember, span).with_param(doc.interner.resolve(field)));
            cache.unknown
        }
    }
}

fn subscript_result_type(doc: &Document, base_ty: TypeId) -> TypeId {
    match doc.types.get(base_ty.index()).kind() {
        Kind::Array { element, .. } => *element,
        _ => base_ty,
    }
}

fn fold_constant(doc: &mut Document, expr: ExprId) {
    let kind = doc.exprs.get(expr.index()).kind.clone();
    let value = match kind {
        ExprKind::Unary(op, operand) => {
            let operand_value = doc.exprs.get(operand.index()).const_value;
            fold_unary(op, operand_value)
        }
        ExprKind::Binary(op, lhs, rhs) => {
            let lhs_value = doc.exprs.get(lhs.index()).const_value;
            let rhs_value = doc.exprs.get(rhs.index()).const_value;
            fold_binary(op, lhs_value, rhs_value)
        }
        ExprKind::Const(v) => Some(v),
        _ => None,
    };
    doc.exprs.get_mut(expr.index()).const_value = value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::expr::{ConstValue, Expr};
    use netta_base::Span;

    #[test]
    fn integer_literal_gets_int_type() {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let e = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(5)), Span::point(0))));
        let ty = assign_type(&mut doc, &cache, doc.global_frame, e);
        assert_eq!(ty, cache.int);
    }

    #[test]
    fn adding_int_and_double_promotes_to_double() {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let lhs = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(1)), Span::point(0))));
        let rhs = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Double(1.5)), Span::point(0))));
        let add = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Binary(BinOp::Add, lhs, rhs), Span::point(0))));
        let ty = assign_type(&mut doc, &cache, doc.global_frame, add);
        assert_eq!(ty, cache.double);
    }

    #[test]
    fn unresolved_identifier_reports_and_yields_unknown() {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let missing = doc.interner.intern("missing");
        let e = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(missing), Span::point(0))));
        let ty = assign_type(&mut doc, &cache, doc.global_frame, e);
        assert_eq!(ty, cache.unknown);
        assert_eq!(doc.diagnostics.errors().count(), 1);
    }

    #[test]
    fn resolved_identifier_takes_its_symbols_type() {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let name = doc.interner.intern("x");
        doc.add_variable(doc.global_frame, name, cache.int, None, Span::point(0)).unwrap();
        let e = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(name), Span::point(0))));
        let ty = assign_type(&mut doc, &cache, doc.global_frame, e);
        assert_eq!(ty, cache.int);
    }

    #[test]
    fn comparison_always_yields_bool() {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let lhs = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(1)), Span::point(0))));
        let rhs = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(2)), Span::point(0))));
        let cmp = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Binary(BinOp::Lt, lhs, rhs), Span::point(0))));
        let ty = assign_type(&mut doc, &cache, doc.global_frame, cmp);
        assert_eq!(ty, cache.bool_);
    }

    #[test]
    fn constant_folder_reduces_literal_sum() {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let lhs = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(2)), Span::point(0))));
        let rhs = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(3)), Span::point(0))));
        let sum = ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Binary(BinOp::Add, lhs, rhs), Span::point(0))));
        assign_type(&mut doc, &cache, doc.global_frame, sum);
        assert_eq!(doc.exprs.get(sum.index()).const_value, Some(ConstValue::Int(5)));
    }
}
