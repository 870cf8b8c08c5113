use coilover_engine::mechanics::{SolverState, SpringLimits, StrutForceSolver};

const MAIN: SpringLimits = SpringLimits::new(101.6, 60.0, 70.04);
const HELPER: SpringLimits = SpringLimits::new(101.6, 11.18, 2.63);

fn solvers() -> Vec<StrutForceSolver> {
    vec![
        StrutForceSolver::new(MAIN, Some(HELPER)),
        StrutForceSolver::new(MAIN, None),
        // Main spring binds before the helper does.
        StrutForceSolver::new(SpringLimits::new(120.0, 110.0, 20.0), Some(SpringLimits::new(80.0, 20.0, 15.0))),
        StrutForceSolver::new(SpringLimits::new(200.0, 50.0, 100.0), Some(SpringLimits::new(101.6, 11.18, 2.63))),
    ]
}

fn max_rate(solver: &StrutForceSolver) -> f64 {
    solver.helper().map_or(solver.main().rate, |h| h.rate.max(solver.main().rate))
}

#[test]
fn free_region_has_no_force() {
    for solver in solvers() {
        for extra in [0.0, 0.01, 10.0, 500.0] {
            let s = solver.solve(solver.free_stack() + extra);
            assert_eq!(s.state, SolverState::BothFree);
            assert_eq!(s.force, 0.0);
            assert_eq!(s.main_length, solver.main().free_length);
            assert_eq!(s.helper_length, solver.helper().map(|h| h.free_length));
        }
    }
}

#[test]
fn force_is_monotone_and_lengths_stay_in_range() {
    for solver in solvers() {
        let step = 0.05;
        let start = solver.free_stack() + 5.0;
        let end = solver.bind_stack() - 5.0;
        let mut previous = solver.solve(start);
        let mut length = start - step;

        while length > end {
            let s = solver.solve(length);
            assert!(s.force >= previous.force - 1e-9, "force dropped at {length}: {previous:?} -> {s:?}");
            assert!(s.force >= 0.0);

            let main = solver.main();
            assert!(s.main_length >= main.bind_length && s.main_length <= main.free_length);
            if let (Some(helper), Some(helper_length)) = (solver.helper(), s.helper_length) {
                assert!(helper_length >= helper.bind_length && helper_length <= helper.free_length);
            }

            // Continuity: no step larger than the stiffest spring allows.
            assert!(
                s.force - previous.force <= max_rate(&solver) * step + 1e-6,
                "force jumped at {length}: {previous:?} -> {s:?}"
            );

            previous = s;
            length -= step;
        }
        assert_eq!(previous.state, match solver.helper() {
            Some(_) => SolverState::FullyBound,
            None => SolverState::MainBound,
        });
    }
}

#[test]
fn scenario_b_series_split() {
    let solver = StrutForceSolver::new(MAIN, Some(HELPER));
    assert!((solver.free_stack() - 203.2).abs() < 1e-9);

    let s = solver.solve(180.0);
    assert_eq!(s.state, SolverState::SeriesCompressed);

    let force = 23.2 / (1.0 / 70.04 + 1.0 / 2.63);
    assert!((s.force - force).abs() < 1e-9);
    assert!((s.force - 58.9).abs() < 0.15, "force = {}", s.force);

    let main_deflection = force / 70.04;
    let helper_deflection = force / 2.63;
    assert!(helper_deflection > 25.0 * main_deflection);
    assert!((s.main_length - (101.6 - main_deflection)).abs() < 1e-9);
    assert!((s.helper_length.expect("helper") - (101.6 - helper_deflection)).abs() < 1e-9);
}

#[test]
fn scenario_b_helper_clamp_path() {
    let solver = StrutForceSolver::new(MAIN, Some(HELPER));
    // Deep enough that the series solution would push the helper below bind.
    let s = solver.solve(100.0);

    assert_eq!(s.state, SolverState::HelperBound);
    assert_eq!(s.helper_length, Some(HELPER.bind_length));
    assert!((s.main_length - (100.0 - HELPER.bind_length)).abs() < 1e-9);
    // The helper is solid, so the force now runs through the main spring alone
    // and is at least what the helper carried when it reached bind.
    assert!(s.force >= HELPER.rate * (HELPER.free_length - HELPER.bind_length));
    assert!((s.force - MAIN.force_at(s.main_length)).abs() < 1e-9);
}

#[test]
fn helper_bind_boundary_is_continuous() {
    let solver = StrutForceSolver::new(MAIN, Some(HELPER));

    // Available length at which the series solution puts the helper exactly at bind.
    let boundary_force = HELPER.bind_force();
    let deflection = boundary_force * (1.0 / MAIN.rate + 1.0 / HELPER.rate);
    let boundary = solver.free_stack() - deflection;

    let at = solver.solve(boundary);
    assert!((at.force - boundary_force).abs() < 1e-6, "{at:?}");
    assert!((at.helper_length.expect("helper") - HELPER.bind_length).abs() < 1e-9);

    let above = solver.solve(boundary + 0.01);
    let below = solver.solve(boundary - 0.01);
    assert_eq!(above.state, SolverState::SeriesCompressed);
    assert_eq!(below.state, SolverState::HelperBound);

    // Series stiffness above the boundary, main stiffness below it.
    assert!((at.force - above.force).abs() <= 0.01 * MAIN.rate);
    assert!((below.force - at.force).abs() <= 0.01 * MAIN.rate + 1e-6);
    assert!(below.force >= at.force - 1e-9 && at.force >= above.force - 1e-9);
}
