//! Integration tests for whole-pass convergence behavior: iteration counts,
//! priority precedence, cycle handling, incremental re-layout, and pixel
//! snapping. These exercise the public API end to end rather than individual
//! resolution formulas.

use pretty_assertions::assert_eq;

use anchorframe::{
    Anchor, Constraint, FailureKind, Layout, LayoutConfig, Priority, Rect, Slot, ViewId, ViewTree,
};

fn window(width: f32, height: f32) -> ViewTree {
    ViewTree::new(Rect::new(0.0, 0.0, width, height))
}

fn pin(tree: &mut ViewTree, view: ViewId, x: f32, y: f32, w: f32, h: f32) {
    tree.add_constraint(Constraint::fixed(Anchor::leading(view), x)).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::top(view), y)).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::width(view), w)).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::height(view), h)).unwrap();
}

#[test]
fn absolute_constraints_converge_in_a_single_walk() {
    let mut tree = window(800.0, 600.0);
    let a = tree.add_view(tree.root()).unwrap();
    let b = tree.add_view(tree.root()).unwrap();
    pin(&mut tree, a, 10.0, 10.0, 100.0, 50.0);
    pin(&mut tree, b, 120.0, 10.0, 100.0, 50.0);

    let report = Layout::new(LayoutConfig::default()).process(&mut tree);
    assert!(report.converged());
    assert_eq!(report.iterations, 1);
    assert_eq!(tree.frame(a), Rect::new(10.0, 10.0, 100.0, 50.0));
    assert_eq!(tree.frame(b), Rect::new(120.0, 10.0, 100.0, 50.0));
}

#[test]
fn width_derives_from_pinned_edges() {
    // Leading at 0, trailing pinned `c` inside the parent's far edge: the
    // width comes out as the parent extent minus the inset.
    let mut tree = window(100.0, 100.0);
    let root = tree.root();
    let a = tree.add_view(root).unwrap();
    tree.add_constraint(Constraint::equal(Anchor::leading(a), Anchor::leading(root))).unwrap();
    tree.add_constraint(Constraint::offset(Anchor::trailing(a), 12.0, Anchor::trailing(root)))
        .unwrap();
    tree.add_constraint(Constraint::equal(Anchor::top(a), Anchor::top(root))).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::height(a), 10.0)).unwrap();

    let report = Layout::new(LayoutConfig::default()).process(&mut tree);
    assert!(report.converged());
    assert_eq!(tree.frame(a).width, 88.0);
}

#[test]
fn cyclic_constraints_hit_the_cap_with_one_failure() {
    let mut tree = window(100.0, 100.0);
    let root = tree.root();
    let a = tree.add_view_named(root, "a").unwrap();
    let b = tree.add_view_named(root, "b").unwrap();
    // a's position depends on b's and vice versa; neither ever grounds out
    tree.add_constraint(Constraint::equal(Anchor::leading(a), Anchor::trailing(b))).unwrap();
    tree.add_constraint(Constraint::equal(Anchor::leading(b), Anchor::trailing(a))).unwrap();

    let mut layout = Layout::new(LayoutConfig::default().with_max_iterations(10));
    let report = layout.process(&mut tree);

    assert_eq!(report.iterations, 10);
    let failure = report.failure.expect("cycle cannot resolve");
    assert_eq!(failure.kind, FailureKind::Unclosed);
    assert_eq!(failure.slot, Slot::X);
    // Both views keep their zero frames instead of receiving partial data
    assert_eq!(tree.frame(a), Rect::zero());
    assert_eq!(tree.frame(b), Rect::zero());
}

#[test]
fn higher_priority_constraint_wins() {
    let mut tree = window(100.0, 100.0);
    let a = tree.add_view(tree.root()).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::leading(a), 10.0)).unwrap();
    tree.add_constraint(
        Constraint::fixed(Anchor::leading(a), 50.0).with_priority(Priority::Required),
    )
    .unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::leading(a), 30.0).with_priority(Priority::Low))
        .unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::top(a), 0.0)).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::width(a), 10.0)).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::height(a), 10.0)).unwrap();

    Layout::new(LayoutConfig::default()).process(&mut tree);
    assert_eq!(tree.frame(a).x, 50.0);
}

#[test]
fn equal_priority_keeps_insertion_order() {
    let mut tree = window(100.0, 100.0);
    let a = tree.add_view(tree.root()).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::leading(a), 10.0)).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::leading(a), 99.0)).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::top(a), 0.0)).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::width(a), 10.0)).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::height(a), 10.0)).unwrap();

    Layout::new(LayoutConfig::default()).process(&mut tree);
    assert_eq!(tree.frame(a).x, 10.0);
}

#[test]
fn repeated_passes_are_idempotent() {
    let mut tree = window(200.0, 200.0);
    let a = tree.add_view(tree.root()).unwrap();
    pin(&mut tree, a, 5.0, 5.0, 20.0, 20.0);

    let mut layout = Layout::new(LayoutConfig::default());
    let first = layout.process(&mut tree);
    assert!(first.converged());
    let frame = tree.frame(a);

    for _ in 0..3 {
        let report = layout.process(&mut tree);
        assert_eq!(report.iterations, 0);
        assert_eq!(report.views_laid_out, 0);
    }
    assert_eq!(tree.frame(a), frame);
}

#[test]
fn dirtying_a_view_reflows_its_dependents() {
    let mut tree = window(400.0, 100.0);
    let root = tree.root();
    let a = tree.add_view(root).unwrap();
    let b = tree.add_view(root).unwrap();
    pin(&mut tree, a, 0.0, 0.0, 50.0, 50.0);
    tree.add_constraint(Constraint::offset(Anchor::leading(b), 10.0, Anchor::trailing(a)))
        .unwrap();
    tree.add_constraint(Constraint::equal(Anchor::top(b), Anchor::top(root))).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::width(b), 20.0)).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::height(b), 20.0)).unwrap();

    let mut layout = Layout::new(LayoutConfig::default());
    layout.process(&mut tree);
    assert_eq!(tree.frame(b).x, 60.0);

    // Widening a moves b even though b's own constraints never changed
    tree.remove_constraints(a, Slot::WIDTH).unwrap();
    tree.add_constraint(Constraint::fixed(Anchor::width(a), 120.0)).unwrap();
    let report = layout.process(&mut tree);
    assert!(report.converged());
    assert_eq!(tree.frame(b).x, 130.0);
}

#[test]
fn parent_auto_sizes_to_content() {
    let mut tree = window(500.0, 500.0);
    let root = tree.root();
    let panel = tree.add_view(root).unwrap();
    tree.add_constraint(Constraint::equal(Anchor::leading(panel), Anchor::leading(root))).unwrap();
    tree.add_constraint(Constraint::equal(Anchor::top(panel), Anchor::top(root))).unwrap();

    let a = tree.add_view(panel).unwrap();
    let b = tree.add_view(panel).unwrap();
    pin(&mut tree, a, 0.0, 0.0, 20.0, 30.0);
    pin(&mut tree, b, 50.0, 10.0, 20.0, 30.0);

    let report = Layout::new(LayoutConfig::default()).process(&mut tree);
    assert!(report.converged());
    // Farthest trailing edge: b at 50 + 20; farthest bottom: b at 10 + 30
    assert_eq!(tree.frame(panel), Rect::new(0.0, 0.0, 70.0, 40.0));
}

#[test]
fn frames_snap_to_the_scale_grid() {
    let mut tree = window(100.0, 100.0);
    let a = tree.add_view(tree.root()).unwrap();
    pin(&mut tree, a, 10.3, 0.25, 20.0, 20.0);

    let mut layout = Layout::new(LayoutConfig::default().with_interface_scale(2.0));
    layout.process(&mut tree);
    // Scale 2 snaps onto the half-point grid
    assert_eq!(tree.frame(a).x, 10.0);
    assert_eq!(tree.frame(a).y, 0.0);
}

#[test]
fn window_resize_drives_a_fresh_pass() {
    let mut tree = window(800.0, 600.0);
    let root = tree.root();
    let a = tree.add_view(root).unwrap();
    tree.add_constraint(Constraint::equal(Anchor::leading(a), Anchor::leading(root))).unwrap();
    tree.add_constraint(Constraint::equal(Anchor::top(a), Anchor::top(root))).unwrap();
    tree.add_constraint(Constraint::scaled(Anchor::width(a), Anchor::width(root), 0.5, 0.0))
        .unwrap();
    tree.add_constraint(Constraint::equal(Anchor::height(a), Anchor::height(root))).unwrap();

    let mut layout = Layout::new(LayoutConfig::default());
    layout.process(&mut tree);
    assert_eq!(tree.frame(a), Rect::new(0.0, 0.0, 400.0, 600.0));

    tree.set_root_frame(Rect::new(0.0, 0.0, 1000.0, 500.0));
    let report = layout.process(&mut tree);
    assert!(report.converged());
    assert_eq!(tree.frame(a), Rect::new(0.0, 0.0, 500.0, 500.0));

    // Setting the same frame again leaves everything clean
    tree.set_root_frame(Rect::new(0.0, 0.0, 1000.0, 500.0));
    assert_eq!(layout.process(&mut tree).iterations, 0);
}

#[test]
fn rejected_constraints_never_enter_the_store() {
    let mut tree = window(100.0, 100.0);
    let root = tree.root();
    let parent = tree.add_view(root).unwrap();
    let child = tree.add_view(parent).unwrap();
    let unrelated = tree.add_view(root).unwrap();

    // Axis mismatch
    assert!(tree
        .add_constraint(Constraint::equal(Anchor::leading(child), Anchor::top(parent)))
        .is_err());
    // Self reference
    assert!(tree
        .add_constraint(Constraint::equal(Anchor::leading(child), Anchor::trailing(child)))
        .is_err());
    // Location against a subview
    assert!(tree
        .add_constraint(Constraint::equal(Anchor::leading(parent), Anchor::leading(child)))
        .is_err());
    // Neither superview nor sibling
    assert!(tree
        .add_constraint(Constraint::equal(Anchor::leading(child), Anchor::leading(unrelated)))
        .is_err());

    assert!(tree.constraints(child, Slot::X).is_empty());
    assert!(tree.constraints(parent, Slot::X).is_empty());
}
