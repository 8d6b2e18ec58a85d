//! LSC cut consistency checking.
//!
//! Each [`crate::lsc::Simregion`] already guarantees at most one message,
//! condition, and update by construction (`Option<Id>` slots, never a
//! sentinel). What remains to check is the antichain property: a
//! [`crate::lsc::Cut`] names simregions meant to be simultaneous, but two
//! simregions anchored to the same instance-line are ordered by the
//! line's own sequential position (`y`) - if a cut names two such
//! simregions at different `y`, it isn't actually an antichain.

use std::collections::HashMap;

use netta_base::Span;

use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::document::Document;
use crate::ids::InstanceLineId;
use crate::lsc::{Cut, Simregion};

pub fn check_cut(doc: &mut Document, cut: &Cut, span: Span) {
    let mut seen: HashMap<InstanceLineId, u32> = HashMap::new();
    for &sim_id in &cut.simregions {
        let sim = *doc.simregions.get(sim_id.index());
        for (line, y) in instance_lines_of(doc, sim) {
            match seen.get(&line) {
                Some(&prev_y) if prev_y != y => {
                    doc.report(
                        Diagnostic::new(ErrorKind::InconsistentLSC, span)
                            .with_param("cut orders two simregions on the same instance-line"),
                    );
                }
                _ => {
                    seen.insert(line, y);
                }
            }
        }
    }
}

/// Every `(instance-line, y)` pair a simregion's populated slots touch.
fn instance_lines_of(doc: &Document, sim: Simregion) -> Vec<(InstanceLineId, u32)> {
    let mut out = Vec::new();
    if let Some(id) = sim.message {
        let m = doc.messages.get(id.index());
        out.push((m.src, m.y));
        out.push((m.dst, m.y));
    }
    if let Some(id) = sim.condition {
        let c = doc.conditions.get(id.index());
        out.extend(c.anchors.iter().map(|&a| (a, c.y)));
    }
    if let Some(id) = sim.update {
        let u = doc.updates.get(id.index());
        out.push((u.anchor, u.y));
    }
    out
}
