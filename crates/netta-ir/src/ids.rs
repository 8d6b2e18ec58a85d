//! Id types for every entity the [`crate::document::Document`] owns.
//!
//! Every cross-reference in the IR (an edge pointing at its source location,
//! a symbol pointing at its domain object, a simregion pointing at its
//! message) is one of these `Copy` handles into a [`netta_base::Slab`].
//! None of them are valid outside the `Document` that created them;
//! indices are never reused across documents.

use netta_base::define_id;

define_id!(pub struct SymbolId);
define_id!(pub struct FrameId);
define_id!(pub struct TypeId);
define_id!(pub struct ExprId);
define_id!(pub struct StmtId);
define_id!(pub struct VariableId);
define_id!(pub struct FunctionId);
define_id!(pub struct TemplateId);
define_id!(pub struct LocationId);
define_id!(pub struct BranchpointId);
define_id!(pub struct EdgeId);
define_id!(pub struct InstanceId);
define_id!(pub struct ProcessId);
define_id!(pub struct QueryId);
define_id!(pub struct ChanPriorityId);
define_id!(pub struct InstanceLineId);
define_id!(pub struct MessageId);
define_id!(pub struct ConditionId);
define_id!(pub struct UpdateId);
define_id!(pub struct SimregionId);
define_id!(pub struct CutId);

/// Either a [`LocationId`] or a [`BranchpointId`].
///
/// Edges connect to exactly one of the two (§3 "Edge" invariant); modeling
/// this as a two-variant enum rather than two `Option` fields makes the
/// "exactly one" invariant a type-level fact instead of a runtime check.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
pub enum Node {
    Location(LocationId),
    Branchpoint(BranchpointId),
}
