//! Templates, locations, edges, instances, and processes.

use std::collections::BTreeSet;

use netta_base::{Name, Span};

use crate::ids::{
    BranchpointId, EdgeId, ExprId, FrameId, FunctionId, InstanceId, LocationId, Node, SymbolId,
    TemplateId, VariableId,
};

/// A named parametric automaton.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Template {
    pub symbol: SymbolId,
    /// Parameter and local-declaration frame; the parameter prefix is the
    /// part an [`Instance`] binds against.
    pub frame: FrameId,
    pub params: Vec<SymbolId>,
    pub variables: Vec<VariableId>,
    pub functions: Vec<FunctionId>,
    pub locations: Vec<LocationId>,
    pub branchpoints: Vec<BranchpointId>,
    pub edges: Vec<EdgeId>,
    pub init: Option<LocationId>,
    pub is_ta: bool,
    pub dynamic: bool,
    pub has_prechart: bool,
    /// Progress-measure expressions declared on the template, used by
    /// liveness-style backends; opaque to this crate beyond storage.
    pub progress_measures: Vec<ExprId>,
    pub instance_lines: Vec<crate::ids::InstanceLineId>,
    pub messages: Vec<crate::ids::MessageId>,
    pub conditions: Vec<crate::ids::ConditionId>,
    pub updates: Vec<crate::ids::UpdateId>,
}

impl Template {
    pub fn new(symbol: SymbolId, frame: FrameId) -> Self {
        Self {
            symbol,
            frame,
            params: Vec::new(),
            variables: Vec::new(),
            functions: Vec::new(),
            locations: Vec::new(),
            branchpoints: Vec::new(),
            edges: Vec::new(),
            init: None,
            is_ta: true,
            dynamic: false,
            has_prechart: false,
            progress_measures: Vec::new(),
            instance_lines: Vec::new(),
            messages: Vec::new(),
            conditions: Vec::new(),
            updates: Vec::new(),
        }
    }
}

/// A state of a timed automaton.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Location {
    pub symbol: SymbolId,
    pub name: Name,
    pub invariant: Option<ExprId>,
    /// Rate sub-expressions factored out of the invariant by the checker
    /// (4.6): one entry per clock this location gives a non-unit rate.
    pub rates: Vec<(SymbolId, ExprId)>,
    pub cost_rate: Option<ExprId>,
    pub position: u32,
    pub urgent: bool,
    pub committed: bool,
}

impl Location {
    pub fn new(symbol: SymbolId, name: Name, position: u32) -> Self {
        Self {
            symbol,
            name,
            invariant: None,
            rates: Vec::new(),
            cost_rate: None,
            position,
            urgent: false,
            committed: false,
        }
    }
}

/// A pseudo-location joining several edges that share a source/guard/sync
/// (glossary: "Branchpoint").
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Branchpoint {
    pub symbol: SymbolId,
}

/// A transition between two [`Node`]s.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    pub number: u32,
    pub controllable: bool,
    pub source: Node,
    pub target: Node,
    /// Frame holding `select` bindings (`select i : int[0,3]`), child of
    /// the owning template's frame.
    pub select_frame: Option<FrameId>,
    pub guard: Option<ExprId>,
    pub assignment: Option<ExprId>,
    pub sync: Option<ExprId>,
    pub probability: Option<ExprId>,
    pub span: Span,
    /// Populated by the checker: the enumerated sequence of values each
    /// `select` binding ranges over, in declaration order.
    pub select_values: Option<Vec<Vec<i64>>>,
}

impl Edge {
    pub fn new(number: u32, controllable: bool, source: Node, target: Node, span: Span) -> Self {
        Self {
            number,
            controllable,
            source,
            target,
            select_frame: None,
            guard: None,
            assignment: None,
            sync: None,
            probability: None,
            span,
            select_values: None,
        }
    }
}

/// One `(separator, expression)` pair of a channel-priority declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PrioritySeparator {
    /// `,` - same priority level as the previous entry.
    SameLevel,
    /// `<` - introduces a new, strictly lower priority level.
    NewLevel,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ChannelPriority {
    pub head: ExprId,
    pub rest: Vec<(PrioritySeparator, ExprId)>,
}

/// A (possibly partial) application of a template to argument expressions
///.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Instance {
    pub owner: SymbolId,
    pub template: TemplateId,
    /// Parameter frame copied from the template; unbound symbols first,
    /// then bound ones, matching the template's declaration order within
    /// each partition.
    pub frame: FrameId,
    pub unbound_count: usize,
    pub bound_count: usize,
    /// Maps a bound parameter symbol (from `frame`) to the argument
    /// expression it was bound to.
    pub mapping: Vec<(SymbolId, ExprId)>,
    /// Transitive closure of parameters used to determine some array size
    /// within the template (4.5 step 4).
    pub restricted: BTreeSet<SymbolId>,
}

impl Instance {
    pub fn is_fully_bound(&self) -> bool {
        self.unbound_count == 0
    }
}

/// A fully bound [`Instance`] registered in the document as a running
/// component.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Process {
    pub instance: InstanceId,
    /// Scheduling priority among processes sharing a channel, lower binds
    /// first; `None` if unconstrained.
    pub priority: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_template_has_no_init_location_yet() {
        let t = Template::new(SymbolId::from_index(0), FrameId::from_index(0));
        assert!(t.init.is_none());
        assert!(t.is_ta);
    }

    #[test]
    fn instance_is_fully_bound_when_unbound_count_is_zero() {
        let instance = Instance {
            owner: SymbolId::from_index(0),
            template: TemplateId::from_index(0),
            frame: FrameId::from_index(0),
            unbound_count: 0,
            bound_count: 2,
            mapping: vec![],
            restricted: BTreeSet::new(),
        };
        assert!(instance.is_fully_bound());
    }

    #[test]
    fn edge_exactly_one_source_and_target_node() {
        let edge = Edge::new(
            0,
            true,
            Node::Location(LocationId::from_index(0)),
            Node::Branchpoint(BranchpointId::from_index(0)),
            Span::point(0),
        );
        assert!(matches!(edge.source, Node::Location(_)));
        assert!(matches!(edge.target, Node::Branchpoint(_)));
    }
}
