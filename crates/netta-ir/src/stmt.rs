//! Statement AST used in function bodies.

use netta_base::Span;

use crate::ids::{ExprId, FrameId, StmtId};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum StmtKind {
    /// A sequence of statements owning its own lexical frame for locals
    /// declared directly inside it.
    Block { frame: FrameId, body: Vec<StmtId> },
    /// A bare expression evaluated for its side effect (typically an
    /// assignment or function call).
    Expr(ExprId),
    If { cond: ExprId, then_branch: StmtId, else_branch: Option<StmtId> },
    While { cond: ExprId, body: StmtId },
    DoWhile { body: StmtId, cond: ExprId },
    For { init: Option<StmtId>, cond: Option<ExprId>, step: Option<ExprId>, body: StmtId },
    /// `for (x : T) body`, ranging over every value of a bounded type.
    ForEachRange { frame: FrameId, body: StmtId },
    Return(Option<ExprId>),
    Empty,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, StmtKind::Block { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::FrameId;

    #[test]
    fn block_statement_carries_its_frame() {
        let frame = FrameId::from_index(0);
        let stmt = Stmt::new(StmtKind::Block { frame, body: vec![] }, Span::point(0));
        assert!(stmt.is_block());
    }

    #[test]
    fn return_without_value_is_representable() {
        let stmt = Stmt::new(StmtKind::Return(None), Span::point(0));
        assert!(matches!(stmt.kind, StmtKind::Return(None)));
    }
}
