//! Live Sequence Chart constructs.

use netta_base::Name;

use crate::ids::{ConditionId, InstanceLineId, MessageId, SimregionId, UpdateId};

/// A vertical line representing one instance participating in an LSC,
/// derived from a (possibly partial) [`crate::template::Instance`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct InstanceLine {
    pub symbol: crate::ids::SymbolId,
    pub instance: crate::ids::InstanceId,
}

/// A message between two instance-lines.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub src: InstanceLineId,
    pub dst: InstanceLineId,
    pub label: Name,
    pub prechart: bool,
    /// Vertical position; simregions at the same `y` on different
    /// instance-lines are considered simultaneous.
    pub y: u32,
}

/// A condition anchored to one or more instance-lines.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Condition {
    pub anchors: Vec<InstanceLineId>,
    pub label: Name,
    pub prechart: bool,
    pub hot: bool,
    pub y: u32,
}

/// An update (local computation) anchored to an instance-line.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Update {
    pub anchor: InstanceLineId,
    pub label: Name,
    pub prechart: bool,
    pub y: u32,
}

/// A single logical step of an LSC: at most one message, condition, and
/// update, modeled as `Option<Id>` rather than an always-allocated
/// sentinel - absence is a type-level fact, not a convention callers
/// have to remember.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Simregion {
    pub message: Option<MessageId>,
    pub condition: Option<ConditionId>,
    pub update: Option<UpdateId>,
}

impl Simregion {
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.condition.is_none() && self.update.is_none()
    }
}

/// A horizontally consistent set of simregions (glossary: "Cut") - an
/// antichain in the partial order derived from `y`-position and prechart
/// containment.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Cut {
    pub simregions: Vec<SimregionId>,
}

impl Cut {
    /// A cut is in the prechart iff all of its simregions are, per 4.6.
    pub fn is_in_prechart(&self, simregion_in_prechart: impl Fn(SimregionId) -> bool) -> bool {
        self.simregions.iter().all(|&id| simregion_in_prechart(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_simregion_has_no_slots() {
        let s = Simregion::default();
        assert!(s.is_empty());
    }

    #[test]
    fn simregion_with_one_slot_is_not_empty() {
        let s = Simregion { message: Some(MessageId::from_index(0)), ..Default::default() };
        assert!(!s.is_empty());
    }

    #[test]
    fn cut_in_prechart_requires_all_simregions_in_prechart() {
        let cut = Cut { simregions: vec![SimregionId::from_index(0), SimregionId::from_index(1)] };
        assert!(cut.is_in_prechart(|_| true));
        assert!(!cut.is_in_prechart(|id| id.index() == 0));
    }

    #[test]
    fn empty_cut_is_vacuously_in_prechart() {
        let cut = Cut { simregions: vec![] };
        assert!(cut.is_in_prechart(|_| false));
    }
}
