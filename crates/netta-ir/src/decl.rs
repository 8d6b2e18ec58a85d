//! Variable and function declarations.

use std::collections::BTreeSet;

use crate::ids::{ExprId, FrameId, StmtId, SymbolId};

/// A symbol plus an optional initializer expression.
///
/// The initializer's type is checked after construction (it needs a
/// fully-typed `Document` to resolve identifiers against), so `initializer`
/// is populated at declaration time but only validated later.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Variable {
    pub symbol: SymbolId,
    pub initializer: Option<ExprId>,
}

/// A symbol of function type, its local frame, its body, and the two
/// derived read/write sets computed by [`crate::check::changes_depends`]
/// (4.8).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Function {
    pub symbol: SymbolId,
    pub params: Vec<SymbolId>,
    pub frame: FrameId,
    pub body: StmtId,
    /// Globals/parameters read anywhere in the body. `None` until the
    /// changes/depends pass has run.
    pub depends: Option<BTreeSet<SymbolId>>,
    /// Globals/parameters assigned, incremented/decremented, or passed as
    /// a mutated out-parameter to a callee. `None` until the pass has run.
    pub changes: Option<BTreeSet<SymbolId>>,
}

impl Function {
    pub fn new(symbol: SymbolId, params: Vec<SymbolId>, frame: FrameId, body: StmtId) -> Self {
        Self { symbol, params, frame, body, depends: None, changes: None }
    }

    pub fn is_analyzed(&self) -> bool {
        self.depends.is_some() && self.changes.is_some()
    }
}
