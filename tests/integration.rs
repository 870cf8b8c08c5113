use coilover_engine::assembly::{
    Assembly, AssemblyLayout, DimensionSet, HelperPlacement, HelperSpringSpec, PartKind, WireSection,
};
use coilover_engine::error::CoiloverError;
use coilover_engine::mechanics::SolverState;
use coilover_engine::{Engine, EngineError};

fn with_helper(placement: HelperPlacement) -> DimensionSet {
    DimensionSet {
        helper: Some(HelperSpringSpec {
            placement,
            ..HelperSpringSpec::default()
        }),
        ..DimensionSet::default()
    }
}

fn ids(parts: &[coilover_engine::PartExport]) -> Vec<&'static str> {
    parts.iter().map(|p| p.id).collect()
}

#[test]
fn engine_initializes() {
    let engine = Engine::new();
    assert!(engine.is_initialized());
    assert_eq!(engine.dimensions(), &DimensionSet::default());
}

#[test]
fn first_diff_adds_every_part() {
    let mut engine = Engine::new();
    engine.evaluate_snapshot().expect("evaluate");
    let diff = engine.geometry_diff().expect("diff");

    assert_eq!(
        ids(&diff.added),
        vec!["damper_body", "shaft", "lower_perch", "main_spring", "upper_perch", "upper_cone"]
    );
    assert!(diff.updated.is_empty());
    assert!(diff.removed.is_empty());

    // Nothing changed since the last call.
    engine.evaluate_snapshot().expect("evaluate again");
    assert!(engine.geometry_diff().expect("second diff").is_empty());
}

#[test]
fn travel_change_updates_only_moving_parts() {
    let mut engine = Engine::new();
    engine.evaluate_snapshot().expect("evaluate");
    engine.geometry_diff().expect("initial diff");

    engine.travel_percent(50.0);
    engine.evaluate_snapshot().expect("evaluate at 50%");
    let diff = engine.geometry_diff().expect("diff");

    assert!(diff.added.is_empty());
    assert!(diff.removed.is_empty());
    assert_eq!(ids(&diff.updated), vec!["shaft", "main_spring", "upper_perch", "upper_cone"]);
}

#[test]
fn toggling_helper_adds_and_removes_parts() {
    let mut engine = Engine::new();
    engine.evaluate_snapshot().expect("evaluate");
    engine.geometry_diff().expect("initial diff");

    engine
        .apply_dimensions(with_helper(HelperPlacement::Above))
        .expect("helper dims");
    engine.evaluate_snapshot().expect("evaluate with helper");
    let diff = engine.geometry_diff().expect("diff");
    let added = ids(&diff.added);
    assert!(added.contains(&"helper_perch"));
    assert!(added.contains(&"helper_spring"));
    assert!(!ids(&diff.updated).contains(&"damper_body"));

    engine.apply_dimensions(DimensionSet::default()).expect("default dims");
    engine.evaluate_snapshot().expect("evaluate without helper");
    let diff = engine.geometry_diff().expect("diff");
    assert_eq!(diff.removed, vec!["helper_perch", "helper_spring"]);
}

#[test]
fn geometry_diff_requires_evaluation_after_change() {
    let mut engine = Engine::new();
    engine.evaluate_snapshot().expect("evaluate");
    engine.travel_percent(10.0);
    assert_eq!(engine.geometry_diff(), Err(EngineError::NotEvaluated));
}

#[test]
fn invalid_dimensions_keep_previous_assembly() {
    let mut engine = Engine::new();
    let before = engine.readout().expect("readout");

    let mut dims = DimensionSet::default();
    dims.spring.rate = 0.0;
    let err = engine.apply_dimensions(dims).expect_err("zero rate");
    match err {
        EngineError::Coilover(inner) => assert_eq!(inner.field(), Some("spring.rate")),
        other => panic!("expected a dimension error, got {other:?}"),
    }

    assert_eq!(engine.dimensions(), &DimensionSet::default());
    assert_eq!(engine.readout().expect("readout"), before);
}

#[test]
fn readout_reports_solver_state() {
    let mut engine = Engine::new();
    let rest = engine.readout().expect("readout");
    assert_eq!(rest.travel_percent, 0.0);
    assert_eq!(rest.strut_length, 400.0);
    assert_eq!(rest.state, SolverState::SeriesCompressed);
    assert!(rest.helper_length.is_none());

    engine.travel_percent(100.0);
    let full = engine.readout().expect("readout");
    assert_eq!(full.strut_length, full.strut_length_min);
    assert_eq!(full.main_length, 50.0);
    assert_eq!(full.state, SolverState::MainBound);
    assert_eq!(full.state_label, "main bound");
}

#[test]
fn engine_force_curve_matches_layout() {
    let engine = Engine::new();
    let curve = engine.force_curve(11).expect("curve");
    assert_eq!(curve.len(), 11);
    assert!(curve.windows(2).all(|w| w[1].force >= w[0].force));
    assert!(matches!(
        engine.force_curve(0),
        Err(EngineError::Coilover(CoiloverError::InvalidDimension { field: "curve.samples", .. }))
    ));
}

#[test]
fn scenario_a_round_wire_coil_count() {
    let layout = AssemblyLayout::new(&DimensionSet::default()).expect("layout");
    let coils = layout.geometry().main.active_coils;
    let expected = 80000.0 * 10f64.powi(4) / (8.0 * 100.0 * 70f64.powi(3));

    assert!((coils - expected).abs() < 1e-9);
    // Three significant figures.
    assert_eq!((coils * 100.0).round(), (expected * 100.0).round());
}

#[test]
fn anchors_are_ordered_bottom_up() {
    for placement in [HelperPlacement::Above, HelperPlacement::Below] {
        let layout = AssemblyLayout::new(&with_helper(placement)).expect("layout");
        for step in 0..=20 {
            let state = layout.travel_state(f64::from(step) / 20.0);
            let a = state.anchors;
            let helper_bottom = a.helper_bottom.expect("helper bottom");
            let helper_top = a.helper_top.expect("helper top");
            let perch = a.helper_perch_center.expect("helper perch");

            assert!(a.body_center < a.lower_perch_center);
            let (lower_bottom, lower_top, upper_bottom, upper_top) = match placement {
                HelperPlacement::Above => (a.main_bottom, a.main_top, helper_bottom, helper_top),
                HelperPlacement::Below => (helper_bottom, helper_top, a.main_bottom, a.main_top),
            };
            assert!(a.lower_perch_center < lower_bottom);
            assert!(lower_bottom < lower_top);
            assert!(lower_top < perch && perch < upper_bottom);
            assert!(upper_bottom < upper_top);
            assert!(upper_top <= a.shaft_top + 1e-9);
            assert!(a.shaft_top < a.upper_perch_center && a.upper_perch_center < a.cone_base);
        }
    }
}

#[test]
fn travel_never_passes_bind_stack() {
    let mut dims = with_helper(HelperPlacement::Above);
    dims.damper.compressed_length = 100.0;
    let layout = AssemblyLayout::new(&dims).expect("layout");
    let g = layout.geometry();

    assert_eq!(g.strut_length_min, g.bind_stack);
    let state = layout.travel_state(1.0);
    assert_eq!(state.strut_length, g.bind_stack);

    let helper_bind = HelperSpringSpec::default().bind_length;
    assert!((state.solution.main_length - dims.spring.bind_length).abs() < 1e-9);
    assert!((state.solution.helper_length.expect("helper") - helper_bind).abs() < 1e-9);
    assert!((state.solution.force - g.main.limits.bind_force()).abs() < 1e-6);
}

#[test]
fn rectangular_main_wire_is_supported() {
    let mut dims = DimensionSet::default();
    dims.spring.wire = WireSection::Rectangular {
        width: 12.0,
        height: 8.0,
    };
    let assembly = Assembly::new(&dims).expect("assembly");
    let snapshot = assembly.snapshot(0.4).expect("snapshot");
    let spring = snapshot.part(PartKind::MainSpring).expect("main spring");

    assert!(spring.diagnostics.is_valid_solid(), "{}", spring.diagnostics.summary());
    assert!(snapshot.geometry.main.active_coils > 0.0);
}

#[test]
fn snapshot_parts_are_closed_and_sorted() {
    let assembly = Assembly::new(&with_helper(HelperPlacement::Below)).expect("assembly");
    let snapshot = assembly.snapshot(0.7).expect("snapshot");

    let kinds: Vec<PartKind> = snapshot.parts.iter().map(|p| p.kind).collect();
    let mut sorted = kinds.clone();
    sorted.sort();
    assert_eq!(kinds, sorted);
    assert_eq!(kinds.len(), PartKind::ALL.len());

    for part in &snapshot.parts {
        assert!(part.diagnostics.is_valid_solid(), "{}: {}", part.kind.id(), part.diagnostics.summary());
        assert!(part.mesh.validate().is_ok());
    }
}
