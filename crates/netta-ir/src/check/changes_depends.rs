//! Function `changes`/`depends` analysis: a two-pass
//! call-graph-plus-liveness shape over statement bodies.
//!
//! Pass shape:
//!
//! 1. Walk every function's body once, collecting its *direct* reads and
//!    writes (`assign.rs::collect_reads_writes`) and its set of callees.
//! 2. Build a call graph over user-defined functions and compute strongly
//!    connected components so mutual recursion is handled as a unit
//!    rather than looping forever.
//! 3. Propagate: a function's `depends`/`changes` is the union of its own
//!    direct sets plus every callee's sets (everyone in the same SCC
//!    shares the union of the whole component - a safe
//!    over-approximation for cycles).

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::document::Document;
use crate::expr::ExprKind;
use crate::ids::{FunctionId, StmtId, SymbolId};
use crate::stmt::StmtKind;

#[derive(Default)]
struct DirectEffects {
    reads: BTreeSet<SymbolId>,
    writes: BTreeSet<SymbolId>,
    callees: Vec<FunctionId>,
}

/// Runs the full analysis over every function in `doc`, populating each
/// `Function`'s `depends`/`changes` fields.
pub fn analyze(doc: &mut Document) {
    let function_ids: Vec<FunctionId> =
        (0..doc.functions.len()).map(FunctionId::from_index).collect();

    let direct: HashMap<FunctionId, DirectEffects> = function_ids
        .iter()
        .map(|&f| (f, direct_effects(doc, f)))
        .collect();

    let graph: HashMap<FunctionId, Vec<FunctionId>> =
        direct.iter().map(|(&f, effects)| (f, effects.callees.clone())).collect();

    let sccs = compute_sccs(&function_ids, &graph);
    let component_of: HashMap<FunctionId, usize> = sccs
        .iter()
        .enumerate()
        .flat_map(|(i, members)| members.iter().map(move |&f| (f, i)))
        .collect();

    let mut component_reads: Vec<BTreeSet<SymbolId>> = vec![BTreeSet::new(); sccs.len()];
    let mut component_writes: Vec<BTreeSet<SymbolId>> = vec![BTreeSet::new(); sccs.len()];
    for (i, members) in sccs.iter().enumerate() {
        for &f in members {
            if let Some(effects) = direct.get(&f) {
                component_reads[i].extend(effects.reads.iter().copied());
                component_writes[i].extend(effects.writes.iter().copied());
            }
        }
    }

    // Topologically propagate callee effects into caller components.
    // `sccs` is already returned in reverse-postorder (callees processed
    // before callers) by `compute_sccs`, so a single forward pass over
    // components suffices.
    for (i, members) in sccs.iter().enumerate() {
        let mut extra_reads = BTreeSet::new();
        let mut extra_writes = BTreeSet::new();
        for &f in members {
            if let Some(callees) = graph.get(&f) {
                for callee in callees {
                    if let Some(&callee_component) = component_of.get(callee) {
                        if callee_component != i {
                            extra_reads.extend(component_reads[callee_component].iter().copied());
                            extra_writes.extend(component_writes[callee_component].iter().copied());
                        }
                    }
                }
            }
        }
        component_reads[i].extend(extra_reads);
        component_writes[i].extend(extra_writes);
    }

    for (i, members) in sccs.iter().enumerate() {
        for &f in members {
            let function = doc.functions.get_mut(f.index());
            function.depends = Some(component_reads[i].clone());
            function.changes = Some(component_writes[i].clone());
        }
    }
}

fn direct_effects(doc: &Document, function: FunctionId) -> DirectEffects {
    let mut effects = DirectEffects::default();
    let body = doc.functions.get(function.index()).body;
    walk_stmt(doc, body, &mut effects);
    effects
}

fn walk_stmt(doc: &Document, stmt: StmtId, effects: &mut DirectEffects) {
    let mut reads = Vec::new();
    let mut writes = Vec::new();
    match &doc.stmts.get(stmt.index()).kind {
        StmtKind::Block { body, .. } => {
            for &s in body {
                walk_stmt(doc, s, effects);
            }
            return;
        }
        StmtKind::Expr(e) => {
            super::assign::collect_reads_writes(doc, *e, &mut reads, &mut writes);
            collect_callees(doc, *e, effects);
        }
        StmtKind::If { cond, then_branch, else_branch } => {
            super::assign::collect_reads_writes(doc, *cond, &mut reads, &mut writes);
            collect_callees(doc, *cond, effects);
            walk_stmt(doc, *then_branch, effects);
            if let Some(e) = else_branch {
                walk_stmt(doc, *e, effects);
            }
        }
        StmtKind::While { cond, body } | StmtKind::DoWhile { body, cond } => {
            super::assign::collect_reads_writes(doc, *cond, &mut reads, &mut writes);
            collect_callees(doc, *cond, effects);
            walk_stmt(doc, *body, effects);
        }
        StmtKind::For { init, cond, step, body } => {
            if let Some(i) = init {
                walk_stmt(doc, *i, effects);
            }
            if let Some(c) = cond {
                super::assign::collect_reads_writes(doc, *c, &mut reads, &mut writes);
                collect_callees(doc, *c, effects);
            }
            if let Some(s) = step {
                super::assign::collect_reads_writes(doc, *s, &mut reads, &mut writes);
                collect_callees(doc, *s, effects);
            }
            walk_stmt(doc, *body, effects);
        }
        StmtKind::ForEachRange { body, .. } => {
            walk_stmt(doc, *body, effects);
        }
        StmtKind::Return(Some(e)) => {
            super::assign::collect_reads_writes(doc, *e, &mut reads, &mut writes);
            collect_callees(doc, *e, effects);
        }
        StmtKind::Return(None) | StmtKind::Empty => {}
    }
    effects.reads.extend(reads);
    effects.writes.extend(writes);
}

fn collect_callees(doc: &Document, expr: crate::ids::ExprId, effects: &mut DirectEffects) {
    let node = doc.exprs.get(expr.index());
    match &node.kind {
        ExprKind::Call { callee, args } => {
            if let ExprKind::Identifier(_) = &doc.exprs.get(callee.index()).kind {
                if let Some(sym) = doc.exprs.get(callee.index()).resolved {
                    if matches!(doc.symbols.get(sym.index()).kind, crate::frame::SymbolKind::Function) {
                        effects.callees.push(FunctionId::from_index(doc.symbols.get(sym.index()).reference as usize));
                    }
                }
            }
            for arg in args {
                collect_callees(doc, *arg, effects);
            }
        }
        ExprKind::Unary(_, e) => collect_callees(doc, *e, effects),
        ExprKind::Binary(_, a, b) => {
            collect_callees(doc, *a, effects);
            collect_callees(doc, *b, effects);
        }
        ExprKind::Ternary { cond, then, otherwise } => {
            collect_callees(doc, *cond, effects);
            collect_callees(doc, *then, effects);
            collect_callees(doc, *otherwise, effects);
        }
        ExprKind::Dot { base, .. } => collect_callees(doc, *base, effects),
        ExprKind::Subscript { base, index } => {
            collect_callees(doc, *base, effects);
            collect_callees(doc, *index, effects);
        }
        ExprKind::Assign { target, value, .. } => {
            collect_callees(doc, *target, effects);
            collect_callees(doc, *value, effects);
        }
        ExprKind::ListLiteral(items) => {
            for item in items {
                collect_callees(doc, *item, effects);
            }
        }
        ExprKind::Sync { channel, .. } => collect_callees(doc, *channel, effects),
        ExprKind::Quantified { predicate, .. } => collect_callees(doc, *predicate, effects),
        ExprKind::Const(_) | ExprKind::Identifier(_) | ExprKind::Deadlock => {}
    }
}

/// Tarjan's algorithm, returned in reverse-postorder (a component's
/// callees all appear at a lower index than the component itself).
fn compute_sccs(nodes: &[FunctionId], graph: &HashMap<FunctionId, Vec<FunctionId>>) -> Vec<Vec<FunctionId>> {
    struct State {
        index: HashMap<FunctionId, usize>,
        lowlink: HashMap<FunctionId, usize>,
        on_stack: HashSet<FunctionId>,
        stack: Vec<FunctionId>,
        counter: usize,
        components: Vec<Vec<FunctionId>>,
    }

    fn strongconnect(node: FunctionId, graph: &HashMap<FunctionId, Vec<FunctionId>>, state: &mut State) {
        state.index.insert(node, state.counter);
        state.lowlink.insert(node, state.counter);
        state.counter += 1;
        state.stack.push(node);
        state.on_stack.insert(node);

        if let Some(successors) = graph.get(&node) {
            for &succ in successors {
                if !state.index.contains_key(&succ) {
                    strongconnect(succ, graph, state);
                    let succ_low = state.lowlink[&succ];
                    let entry = state.lowlink.get_mut(&node).unwrap();
                    *entry = (*entry).min(succ_low);
                } else if state.on_stack.contains(&succ) {
                    let succ_index = state.index[&succ];
                    let entry = state.lowlink.get_mut(&node).unwrap();
                    *entry = (*entry).min(succ_index);
                }
            }
        }

        if state.lowlink[&node] == state.index[&node] {
            let mut component = Vec::new();
            loop {
                let member = state.stack.pop().unwrap();
                state.on_stack.remove(&member);
                component.push(member);
                if member == node {
                    break;
                }
            }
            state.components.push(component);
        }
    }

    let mut state = State {
        index: HashMap::new(),
        lowlink: HashMap::new(),
        on_stack: HashSet::new(),
        stack: Vec::new(),
        counter: 0,
        components: Vec::new(),
    };

    for &node in nodes {
        if !state.index.contains_key(&node) {
            strongconnect(node, graph, &mut state);
        }
    }

    // Tarjan already yields components in reverse topological order
    // (a component is finished, hence pushed, only after all its
    // successors have been), which is exactly the order this pass needs.
    state.components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::check::cache::TypeCache;
    use crate::document::Document;
    use crate::expr::{ConstValue, Expr};
    use crate::stmt::Stmt;
    use netta_base::Span;

    fn simple_function_doc() -> (Document, FunctionId) {
        let mut doc = Document::new();
        let cache = TypeCache::build(&mut doc);
        let x_name = doc.interner.intern("x");
        doc.add_variable(doc.global_frame, x_name, cache.int, None, Span::point(0)).unwrap();

        let body_frame = doc.new_child_frame(doc.global_frame);
        let block = crate::ids::StmtId::from_index(
            doc.stmts.push(Stmt::new(StmtKind::Block { frame: body_frame, body: vec![] }, Span::point(0))),
        );

        let target = crate::ids::ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Identifier(x_name), Span::point(0))));
        let value = crate::ids::ExprId::from_index(doc.exprs.push(Expr::new(ExprKind::Const(ConstValue::Int(1)), Span::point(0))));
        let assign = crate::ids::ExprId::from_index(
            doc.exprs.push(Expr::new(ExprKind::Assign { op: None, target, value }, Span::point(0))),
        );
        let frame = doc.global_frame;
        let cache2 = TypeCache::build(&mut doc);
        crate::check::typing::assign_type(&mut doc, &cache2, frame, assign);

        let expr_stmt = crate::ids::StmtId::from_index(doc.stmts.push(Stmt::new(StmtKind::Expr(assign), Span::point(0))));
        doc.stmts.get_mut(block.index()).kind = StmtKind::Block { frame: body_frame, body: vec![expr_stmt] };

        let fn_name = doc.interner.intern("setX");
        let void_ty = crate::ids::TypeId::from_index(doc.types.push(crate::types::Type::new(crate::types::Kind::Void)));
        let func = doc.add_function(doc.global_frame, fn_name, void_ty, vec![], block, Span::point(0)).unwrap();
        (doc, func)
    }

    #[test]
    fn function_with_direct_assignment_changes_that_symbol() {
        let (mut doc, func) = simple_function_doc();
        analyze(&mut doc);
        let x_sym = doc.resolve(doc.global_frame, doc.interner.lookup("x").unwrap()).unwrap();
        let changes = doc.functions.get(func.index()).changes.clone().unwrap();
        assert!(changes.contains(&x_sym));
    }

    #[test]
    fn function_with_no_body_has_empty_sets() {
        let mut doc = Document::new();
        let body_frame = doc.new_child_frame(doc.global_frame);
        let block = crate::ids::StmtId::from_index(
            doc.stmts.push(Stmt::new(StmtKind::Block { frame: body_frame, body: vec![] }, Span::point(0))),
        );
        let fn_name = doc.interner.intern("noop");
        let void_ty = crate::ids::TypeId::from_index(doc.types.push(crate::types::Type::new(crate::types::Kind::Void)));
        let func = doc.add_function(doc.global_frame, fn_name, void_ty, vec![], block, Span::point(0)).unwrap();
        analyze(&mut doc);
        assert!(doc.functions.get(func.index()).depends.as_ref().unwrap().is_empty());
        assert!(doc.functions.get(func.index()).changes.as_ref().unwrap().is_empty());
    }
}
