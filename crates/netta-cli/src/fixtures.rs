//! Fixture models exercising each end-to-end scenario, assembled by hand
//! through [`Builder`] calls the way a real front-end would after parsing.
//! Stands in for "a front-end": there is no parser here, only the same
//! IR construction calls a parser's grammar actions would emit.

use netta_base::Span;
use netta_ir::check::cache::TypeCache;
use netta_ir::check::lsc::check_cut;
use netta_ir::{
    check_document, BinOp, Builder, ConstValue, Cut, Document, Expr, ExprKind, Kind, Node, Simregion,
    Type,
};

fn expr(doc: &mut Document, kind: ExprKind) -> netta_ir::ids::ExprId {
    netta_ir::ids::ExprId::from_index(doc.exprs.push(Expr::new(kind, Span::point(0))))
}

/// "Minimal TA": one template `P` with a clock `x`, a broadcast channel
/// `c`, and an edge `L0 -> L1` guarded `x > 1` and synchronized `c!`,
/// instantiated once and registered as a running process.
pub fn minimal_ta() -> Document {
    let mut doc = Document::new();
    let cache = TypeCache::build(&mut doc);

    let x = doc.interner.intern("x");
    doc.add_variable(doc.global_frame, x, cache.clock, None, Span::point(0)).unwrap();
    let chan_ty = netta_ir::ids::TypeId::from_index(
        doc.types.push(Type::new(Kind::Channel { urgent: false, broadcast: false })),
    );
    let c = doc.interner.intern("c");
    doc.add_variable(doc.global_frame, c, chan_ty, None, Span::point(0)).unwrap();

    let p = doc.interner.intern("P");
    let template = doc.add_template(p, Span::point(0)).unwrap();
    let l0 = doc.add_location(template, doc.interner.intern("L0"), 0, Span::point(0)).unwrap();
    let l1 = doc.add_location(template, doc.interner.intern("L1"), 1, Span::point(0)).unwrap();
    doc.templates.get_mut(template.index()).init = Some(l0);
    let edge = doc.add_edge(template, Node::Location(l0), Node::Location(l1), true, Span::point(0));

    let x_ref = expr(&mut doc, ExprKind::Identifier(x));
    let one = expr(&mut doc, ExprKind::Const(ConstValue::Int(1)));
    let guard = expr(&mut doc, ExprKind::Binary(BinOp::Gt, x_ref, one));
    doc.add_guard(edge, guard);

    let c_ref = expr(&mut doc, ExprKind::Identifier(c));
    doc.add_sync(edge, c_ref, true);

    let owner = doc.interner.intern("p");
    let instance = doc.add_instance(owner, template, vec![], Span::point(0)).unwrap();
    doc.add_process(instance);

    check_document(&mut doc);
    doc
}

/// "Duplicate declaration": `int a; int a;` at global scope - one
/// `DuplicateDefinition` `BuilderError` surfaces at construction time
/// rather than as a checker diagnostic, per the Builder's
/// hard-structural-violation contract.
pub fn duplicate_declaration() -> Document {
    let mut doc = Document::new();
    let cache = TypeCache::build(&mut doc);
    let a = doc.interner.intern("a");
    doc.add_variable(doc.global_frame, a, cache.int, None, Span::point(0)).unwrap();
    if let Err(err) = doc.add_variable(doc.global_frame, a, cache.int, None, Span::point(1)) {
        tracing::warn!(?err, "second declaration of 'a' rejected by the Builder");
    }
    check_document(&mut doc);
    doc
}

/// "Restricted parameter": template `P(const int N)` declares a local
/// array `int arr[N]` whose size depends on `N`, which restricts `N` (4.5
/// step 4). A sibling template `Q(int x)` stands in for the enclosing
/// scope owning the free process parameter `x`; instantiating
/// `p = P(x);` binds the restricted `N` to that free parameter instead of
/// a constant, which step 5 rejects.
pub fn restricted_parameter() -> Document {
    let mut doc = Document::new();
    let cache = TypeCache::build(&mut doc);

    let p = doc.interner.intern("P");
    let template = doc.add_template(p, Span::point(0)).unwrap();
    let frame = doc.templates.get(template.index()).frame;

    let n = doc.interner.intern("N");
    let n_sym =
        doc.declare(frame, n, cache.int, Span::point(0), netta_ir::SymbolKind::Variable, 0).unwrap();
    doc.templates.get_mut(template.index()).params.push(n_sym);

    let n_ref = expr(&mut doc, ExprKind::Identifier(n));
    doc.exprs.get_mut(n_ref.index()).resolved = Some(n_sym);
    let array_ty =
        netta_ir::ids::TypeId::from_index(doc.types.push(Type::create_array(cache.int, Some(n_ref))));
    let arr = doc.interner.intern("arr");
    let arr_sym =
        doc.declare(frame, arr, array_ty, Span::point(0), netta_ir::SymbolKind::Variable, 0).unwrap();
    let arr_id = netta_ir::ids::VariableId::from_index(
        doc.variables.push(netta_ir::Variable { symbol: arr_sym, initializer: None }),
    );
    doc.templates.get_mut(template.index()).variables.push(arr_id);

    let q = doc.interner.intern("Q");
    let q_template = doc.add_template(q, Span::point(0)).unwrap();
    let q_frame = doc.templates.get(q_template.index()).frame;
    let x = doc.interner.intern("x");
    let x_sym =
        doc.declare(q_frame, x, cache.int, Span::point(0), netta_ir::SymbolKind::Variable, 0).unwrap();
    doc.templates.get_mut(q_template.index()).params.push(x_sym);

    let owner = doc.interner.intern("p");
    let x_ref = expr(&mut doc, ExprKind::Identifier(x));
    doc.exprs.get_mut(x_ref.index()).resolved = Some(x_sym);
    doc.add_instance(owner, template, vec![x_ref], Span::point(0)).unwrap();

    check_document(&mut doc);
    doc
}

/// "Broadcast with receiver guard": a broadcast channel `c`, a clock `t`,
/// and an edge receiving `c?` guarded by `t > 1` - sets
/// `hasGuardOnRecvBroadcast` (4.6), a construct several backends reject.
pub fn broadcast_receiver_guard() -> Document {
    let mut doc = Document::new();
    let cache = TypeCache::build(&mut doc);

    let chan_ty = netta_ir::ids::TypeId::from_index(
        doc.types.push(Type::new(Kind::Channel { urgent: false, broadcast: true })),
    );
    let c = doc.interner.intern("c");
    doc.add_variable(doc.global_frame, c, chan_ty, None, Span::point(0)).unwrap();
    let t = doc.interner.intern("t");
    doc.add_variable(doc.global_frame, t, cache.clock, None, Span::point(0)).unwrap();

    let p = doc.interner.intern("P");
    let template = doc.add_template(p, Span::point(0)).unwrap();
    let l0 = doc.add_location(template, doc.interner.intern("L0"), 0, Span::point(0)).unwrap();
    let l1 = doc.add_location(template, doc.interner.intern("L1"), 1, Span::point(0)).unwrap();
    doc.templates.get_mut(template.index()).init = Some(l0);
    let edge = doc.add_edge(template, Node::Location(l0), Node::Location(l1), true, Span::point(0));

    let c_ref = expr(&mut doc, ExprKind::Identifier(c));
    doc.add_sync(edge, c_ref, false);
    let t_ref = expr(&mut doc, ExprKind::Identifier(t));
    let one = expr(&mut doc, ExprKind::Const(ConstValue::Int(1)));
    let guard = expr(&mut doc, ExprKind::Binary(BinOp::Gt, t_ref, one));
    doc.add_guard(edge, guard);

    let owner = doc.interner.intern("p");
    let instance = doc.add_instance(owner, template, vec![], Span::point(0)).unwrap();
    doc.add_process(instance);

    check_document(&mut doc);
    doc
}

/// "Stopwatch": location `L0` with invariant `x' == 0` (a zero rate on
/// clock `x`) - sets `stopsClock`, the "stopwatch" extension flag.
pub fn stopwatch() -> Document {
    let mut doc = Document::new();
    let cache = TypeCache::build(&mut doc);

    let x = doc.interner.intern("x");
    doc.add_variable(doc.global_frame, x, cache.clock, None, Span::point(0)).unwrap();

    let p = doc.interner.intern("P");
    let template = doc.add_template(p, Span::point(0)).unwrap();
    let l0 = doc.add_location(template, doc.interner.intern("L0"), 0, Span::point(0)).unwrap();
    doc.templates.get_mut(template.index()).init = Some(l0);

    let x_ref = expr(&mut doc, ExprKind::Identifier(x));
    let zero = expr(&mut doc, ExprKind::Const(ConstValue::Int(0)));
    let invariant = expr(&mut doc, ExprKind::Binary(BinOp::Eq, x_ref, zero));
    doc.locations.get_mut(l0.index()).invariant = Some(invariant);

    let owner = doc.interner.intern("p");
    let instance = doc.add_instance(owner, template, vec![], Span::point(0)).unwrap();
    doc.add_process(instance);

    check_document(&mut doc);
    doc
}

/// "LSC prechart cut": two conditions anchored to the same instance-line
/// at different `y` positions, placed in a single cut - an inconsistent
/// antichain, caught by [`check_cut`] (not part of the document-wide
/// checking pass, since cuts are not themselves stored on `Document`).
pub fn lsc_prechart_cut() -> Document {
    let mut doc = Document::new();
    let owner_a = doc.interner.intern("A");
    let owner_b = doc.interner.intern("B");
    let p = doc.interner.intern("P");
    let template = doc.add_template(p, Span::point(0)).unwrap();
    let instance_a = doc.add_instance(owner_a, template, vec![], Span::point(0)).unwrap();
    let instance_b = doc.add_instance(owner_b, template, vec![], Span::point(0)).unwrap();

    let line_a = netta_ir::ids::InstanceLineId::from_index(doc.instance_lines.push(
        netta_ir::InstanceLine { symbol: doc.instances.get(instance_a.index()).owner, instance: instance_a },
    ));
    let line_b = netta_ir::ids::InstanceLineId::from_index(doc.instance_lines.push(
        netta_ir::InstanceLine { symbol: doc.instances.get(instance_b.index()).owner, instance: instance_b },
    ));

    let cond0 = netta_ir::ids::ConditionId::from_index(doc.conditions.push(netta_ir::Condition {
        anchors: vec![line_a, line_b],
        label: doc.interner.intern("inPrechart"),
        prechart: true,
        hot: false,
        y: 0,
    }));
    let cond1 = netta_ir::ids::ConditionId::from_index(doc.conditions.push(netta_ir::Condition {
        anchors: vec![line_a],
        label: doc.interner.intern("later"),
        prechart: true,
        hot: false,
        y: 1,
    }));

    let sim0 = netta_ir::ids::SimregionId::from_index(
        doc.simregions.push(Simregion { condition: Some(cond0), ..Default::default() }),
    );
    let sim1 = netta_ir::ids::SimregionId::from_index(
        doc.simregions.push(Simregion { condition: Some(cond1), ..Default::default() }),
    );

    check_document(&mut doc);
    let cut = Cut { simregions: vec![sim0, sim1] };
    check_cut(&mut doc, &cut, Span::point(0));
    doc
}

/// Every fixture, in the order presented by the `list`/`all` commands.
pub const FIXTURES: &[(&str, fn() -> Document)] = &[
    ("minimal-ta", minimal_ta),
    ("duplicate-declaration", duplicate_declaration),
    ("restricted-parameter", restricted_parameter),
    ("broadcast-receiver-guard", broadcast_receiver_guard),
    ("stopwatch", stopwatch),
    ("lsc-prechart-cut", lsc_prechart_cut),
];

pub fn find(name: &str) -> Option<fn() -> Document> {
    FIXTURES.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}
