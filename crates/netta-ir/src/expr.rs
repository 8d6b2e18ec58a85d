//! Expression AST.
//!
//! An [`Expr`] is immutable after construction except for the two fields
//! the checker fills in later: `ty` (assigned type) and, for identifier
//! nodes, `resolved` (the symbol the identifier names). Everything else -
//! `kind`, `span`, sub-expression ids - is fixed at construction time by
//! the [`crate::builder::Builder`].

use netta_base::{Name, Span};

use crate::ids::{ExprId, SymbolId, TypeId};

/// A statically computable literal value, attached to expressions the
/// constant folder was able to reduce (4.3).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ConstValue {
    Int(i64),
    Double(f64),
    Bool(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Xor,
    BitAnd,
    BitOr,
    Shl,
    Shr,
    /// `,` - evaluate both, yield the right operand's value.
    Comma,
    /// `chan!` when `rhs` is absent is a [`ExprKind::Sync`] instead; this
    /// variant is reserved for binary min/max-style builtins represented
    /// as operators in the surface grammar.
    Min,
    Max,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum UnOp {
    Neg,
    Not,
    BitNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

/// Send (`!`) or receive (`?`) synchronization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SyncKind {
    Send,
    Receive,
}

/// A bound variable quantifier (`forall`, `exists`, `sum`) ranging over a
/// declared type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Quantifier {
    Forall,
    Exists,
    Sum,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ExprKind {
    Const(ConstValue),
    /// An unresolved-until-checked name reference.
    Identifier(Name),
    Unary(UnOp, ExprId),
    Binary(BinOp, ExprId, ExprId),
    /// `cond ? then : otherwise`.
    Ternary { cond: ExprId, then: ExprId, otherwise: ExprId },
    /// `callee(args...)`, callee resolved to a [`crate::decl::Function`]
    /// via the identifier sub-expression's `resolved` symbol.
    Call { callee: ExprId, args: Vec<ExprId> },
    /// `base.field`.
    Dot { base: ExprId, field: Name },
    /// `base[index]`.
    Subscript { base: ExprId, index: ExprId },
    Sync { channel: ExprId, kind: SyncKind },
    /// `deadlock`.
    Deadlock,
    Quantified { quantifier: Quantifier, bound_name: Name, bound_type: TypeId, predicate: ExprId },
    /// `{e0, e1, ...}`, used for array/record literals.
    ListLiteral(Vec<ExprId>),
    /// An assignment used in an expression position (`x = e`,
    /// `x += e`, ...); the statement-level `Assign` in `stmt.rs` wraps one
    /// of these to model compound-assignment sequences uniformly.
    Assign { op: Option<BinOp>, target: ExprId, value: ExprId },
}

/// A single node of the expression tree.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    /// Populated by the checker; `None` until type-checked.
    pub ty: Option<TypeId>,
    /// Populated by the checker for [`ExprKind::Identifier`] nodes only.
    pub resolved: Option<SymbolId>,
    /// Populated by the constant folder at construction time, for
    /// sub-trees whose operands were all literals.
    pub const_value: Option<ConstValue>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span, ty: None, resolved: None, const_value: None }
    }

    pub fn is_const(&self) -> bool {
        self.const_value.is_some()
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, ExprKind::Identifier(_))
    }
}

/// Folds `kind` into a [`ConstValue`] when every operand is itself
/// constant, per the constant-folding rule in 4.3. The caller passes the
/// already-folded operand values (if any) rather than re-walking the
/// slab, keeping this function pure and independent of `Document` storage.
pub fn fold_binary(op: BinOp, lhs: Option<ConstValue>, rhs: Option<ConstValue>) -> Option<ConstValue> {
    use ConstValue::{Bool, Double, Int};
    match (op, lhs?, rhs?) {
        (BinOp::Add, Int(a), Int(b)) => Some(Int(a.wrapping_add(b))),
        (BinOp::Add, Double(a), Double(b)) => Some(Double(a + b)),
        (BinOp::Add, Int(a), Double(b)) | (BinOp::Add, Double(b), Int(a)) => Some(Double(a as f64 + b)),
        (BinOp::Sub, Int(a), Int(b)) => Some(Int(a.wrapping_sub(b))),
        (BinOp::Sub, Double(a), Double(b)) => Some(Double(a - b)),
        (BinOp::Mul, Int(a), Int(b)) => Some(Int(a.wrapping_mul(b))),
        (BinOp::Mul, Double(a), Double(b)) => Some(Double(a * b)),
        (BinOp::Div, Int(a), Int(b)) if b != 0 => Some(Int(a / b)),
        (BinOp::Div, Double(a), Double(b)) => Some(Double(a / b)),
        (BinOp::Mod, Int(a), Int(b)) if b != 0 => Some(Int(a % b)),
        (BinOp::Eq, Int(a), Int(b)) => Some(Bool(a == b)),
        (BinOp::Ne, Int(a), Int(b)) => Some(Bool(a != b)),
        (BinOp::Lt, Int(a), Int(b)) => Some(Bool(a < b)),
        (BinOp::Le, Int(a), Int(b)) => Some(Bool(a <= b)),
        (BinOp::Gt, Int(a), Int(b)) => Some(Bool(a > b)),
        (BinOp::Ge, Int(a), Int(b)) => Some(Bool(a >= b)),
        (BinOp::And, Bool(a), Bool(b)) => Some(Bool(a && b)),
        (BinOp::Or, Bool(a), Bool(b)) => Some(Bool(a || b)),
        (BinOp::Xor, Bool(a), Bool(b)) => Some(Bool(a ^ b)),
        (BinOp::Min, Int(a), Int(b)) => Some(Int(a.min(b))),
        (BinOp::Max, Int(a), Int(b)) => Some(Int(a.max(b))),
        (BinOp::Comma, _, b) => Some(b),
        _ => None,
    }
}

pub fn fold_unary(op: UnOp, operand: Option<ConstValue>) -> Option<ConstValue> {
    use ConstValue::{Bool, Double, Int};
    match (op, operand?) {
        (UnOp::Neg, Int(a)) => Some(Int(-a)),
        (UnOp::Neg, Double(a)) => Some(Double(-a)),
        (UnOp::Not, Bool(a)) => Some(Bool(!a)),
        (UnOp::BitNot, Int(a)) => Some(Int(!a)),
        _ => None,
    }
}
