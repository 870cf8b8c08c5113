//! World-Z anchors of every part for a dimension set and travel fraction.
//!
//! The strut axis is +Z with z = 0 at the bottom of the damper body. The chain
//! is built bottom-up: body, lower perch, first spring, helper perch, second
//! spring, shaft top, upper perch, cone. Coil counts are solved once in
//! [`AssemblyLayout::new`]; every [`AssemblyLayout::travel_state`] call runs
//! the strut solver exactly once.

use serde::Serialize;

use super::dimensions::{DimensionSet, HelperPlacement, WireSection};
use crate::error::{CoiloverError, CoiloverResult};
use crate::geom::{Helix, HelixError};
use crate::mechanics::{
    CoilError, SpringLimits, StrutForceSolver, StrutSolution, active_coils_rectangular,
    active_coils_rectangular_section, active_coils_round,
};

/// Solved coil data for one spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpringGeometry {
    pub active_coils: f64,
    pub wire: WireSection,
    /// Radius of the wire centerline helix.
    pub coil_radius: f64,
    pub limits: SpringLimits,
}

impl SpringGeometry {
    /// Centerline anchors of a spring whose seats are at `bottom` and `top`.
    #[must_use]
    pub fn centerline_span(&self, bottom: f64, top: f64) -> (f64, f64) {
        let inset = self.wire.axial() * 0.5;
        (bottom + inset, top - inset)
    }

    /// Turns swept between the seats. A helix of `n - 1` turns stacks `n`
    /// wire layers on any vertical line, which is the solid height `n·axial`.
    #[must_use]
    pub fn helix_turns(&self) -> f64 {
        self.active_coils - 1.0
    }

    /// Wire centerline for seats at `bottom` and `top`. At bind length the
    /// pitch equals the axial wire size, so neighbouring turns touch.
    pub fn helix(&self, bottom: f64, top: f64) -> Result<Helix, HelixError> {
        let (z_bottom, z_top) = self.centerline_span(bottom, top);
        Helix::new(self.coil_radius, z_bottom, z_top, self.helix_turns())
    }
}

/// Z positions for one travel sample. Centers refer to the part's own center;
/// spring values are seat positions (wire contact faces).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anchors {
    pub body_center: f64,
    pub lower_perch_center: f64,
    pub main_bottom: f64,
    pub main_top: f64,
    pub helper_perch_center: Option<f64>,
    pub helper_bottom: Option<f64>,
    pub helper_top: Option<f64>,
    pub shaft_top: f64,
    pub shaft_center: f64,
    pub upper_perch_center: f64,
    pub cone_base: f64,
}

/// Derived once per dimension change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssemblyGeometry {
    pub main: SpringGeometry,
    pub helper: Option<SpringGeometry>,
    pub placement: HelperPlacement,
    /// Seat of the lowest spring (top face of the lower perch).
    pub stack_base: f64,
    pub helper_perch_thickness: f64,
    /// Strut length (shaft top Z) at full extension.
    pub strut_length_max: f64,
    /// Strut length at full travel; never shorter than the bind stack.
    pub strut_length_min: f64,
    /// Strut length at which every spring sits at bind.
    pub bind_stack: f64,
    pub shaft_length: f64,
    pub lower_perch_diameter: f64,
    pub upper_perch_diameter: f64,
    /// Anchors at zero travel.
    pub rest: Anchors,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TravelState {
    /// Travel fraction in `[0, 1]`.
    pub fraction: f64,
    /// Shaft top Z.
    pub strut_length: f64,
    /// Shaft travel from full extension in mm.
    pub travel: f64,
    /// Axial room between the lower perch and the shaft top left for springs.
    pub available_length: f64,
    pub solution: StrutSolution,
    pub anchors: Anchors,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyLayout {
    dims: DimensionSet,
    geometry: AssemblyGeometry,
    solver: StrutForceSolver,
}

fn coil_error(field: &'static str) -> impl Fn(CoilError) -> CoiloverError {
    move |err| CoiloverError::invalid(field, err.to_string())
}

impl AssemblyLayout {
    pub fn new(dims: &DimensionSet) -> CoiloverResult<Self> {
        dims.validate()?;

        let g = dims.material.shear_modulus;
        let spring = &dims.spring;

        let main_coils = match spring.wire {
            WireSection::Round { diameter } => {
                active_coils_round(spring.rate, diameter, spring.inner_diameter, g).map_err(coil_error("spring.rate"))?
            }
            WireSection::Rectangular { width, height } => active_coils_rectangular_section(
                spring.rate,
                spring.inner_diameter + width,
                g,
                width,
                height,
            )
            .map_err(coil_error("spring.wire"))?,
        };
        let main = SpringGeometry {
            active_coils: main_coils,
            wire: spring.wire,
            coil_radius: (spring.inner_diameter + spring.wire.radial()) * 0.5,
            limits: SpringLimits::new(spring.free_length, spring.bind_length, spring.rate),
        };
        check_solid_height(&main, "spring.rate", "spring.bind_length")?;

        let helper = match &dims.helper {
            None => None,
            Some(spec) => {
                let coil = active_coils_rectangular(
                    spec.rate,
                    spec.inner_diameter,
                    spec.outer_diameter,
                    g,
                    spec.wire_width(),
                    Some(spec.bind_length),
                )
                .map_err(coil_error("helper.bind_length"))?;
                let geometry = SpringGeometry {
                    active_coils: coil.active_coils,
                    wire: WireSection::Rectangular {
                        width: coil.width,
                        height: coil.height,
                    },
                    coil_radius: coil.mean_diameter * 0.5,
                    limits: SpringLimits::new(spec.free_length, spec.bind_length, spec.rate),
                };
                check_solid_height(&geometry, "helper.rate", "helper.bind_length")?;
                Some(geometry)
            }
        };

        let damper = &dims.damper;
        let stack_base = damper.body_length + dims.setup.lower_perch_offset;
        let helper_perch_thickness = dims.helper.map_or(0.0, |h| h.perch.thickness);
        let solver = StrutForceSolver::new(main.limits, helper.map(|h| h.limits));

        let bind_stack = stack_base + helper_perch_thickness + solver.bind_stack();
        if bind_stack > damper.free_length {
            return Err(CoiloverError::invalid(
                "damper.free_length",
                format!(
                    "springs at bind need a strut length of {bind_stack:.2} mm but the damper extends to {:.2} mm",
                    damper.free_length
                ),
            ));
        }
        let strut_length_min = damper.compressed_length.max(bind_stack);

        let mut layout = Self {
            dims: *dims,
            geometry: AssemblyGeometry {
                main,
                helper,
                placement: dims.helper.map_or(HelperPlacement::Above, |h| h.placement),
                stack_base,
                helper_perch_thickness,
                strut_length_max: damper.free_length,
                strut_length_min,
                bind_stack,
                shaft_length: damper.shaft_length(),
                lower_perch_diameter: spring.outer_diameter() + dims.lower_perch.clearance,
                upper_perch_diameter: spring.outer_diameter() + dims.upper_perch.clearance,
                rest: empty_anchors(),
            },
            solver,
        };
        layout.geometry.rest = layout.travel_state(0.0).anchors;

        log::debug!(
            "coilover layout: main n={:.3}, helper n={:?}, strut {:.2}..{:.2} mm (bind stack {:.2})",
            main.active_coils,
            helper.map(|h| h.active_coils),
            strut_length_min,
            damper.free_length,
            bind_stack
        );

        Ok(layout)
    }

    #[must_use]
    pub fn dimensions(&self) -> &DimensionSet {
        &self.dims
    }

    #[must_use]
    pub fn geometry(&self) -> &AssemblyGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn solver(&self) -> &StrutForceSolver {
        &self.solver
    }

    /// `free − f·(free − min)` with `f` clamped to `[0, 1]`. Written as a
    /// blend so both ends are hit exactly.
    #[must_use]
    pub fn strut_length_at(&self, fraction: f64) -> f64 {
        let f = clamp_fraction(fraction);
        let g = &self.geometry;
        (1.0 - f) * g.strut_length_max + f * g.strut_length_min
    }

    /// Room left for the spring stack at a given strut length.
    #[must_use]
    pub fn available_length(&self, strut_length: f64) -> f64 {
        strut_length - self.geometry.stack_base - self.geometry.helper_perch_thickness
    }

    #[must_use]
    pub fn travel_state(&self, fraction: f64) -> TravelState {
        let fraction = clamp_fraction(fraction);
        let strut_length = self.strut_length_at(fraction);
        let available_length = self.available_length(strut_length);
        let solution = self.solver.solve(available_length);
        let anchors = self.anchors(strut_length, &solution);

        TravelState {
            fraction,
            strut_length,
            travel: self.geometry.strut_length_max - strut_length,
            available_length,
            solution,
            anchors,
        }
    }

    fn anchors(&self, strut_length: f64, solution: &StrutSolution) -> Anchors {
        let dims = &self.dims;
        let g = &self.geometry;
        let base = g.stack_base;

        let (main_bottom, main_top, helper_perch_center, helper_bottom, helper_top) =
            match (solution.helper_length, g.placement) {
                (None, _) => (base, base + solution.main_length, None, None, None),
                (Some(helper_length), HelperPlacement::Above) => {
                    let main_top = base + solution.main_length;
                    let helper_bottom = main_top + g.helper_perch_thickness;
                    (
                        base,
                        main_top,
                        Some(main_top + g.helper_perch_thickness * 0.5),
                        Some(helper_bottom),
                        Some(helper_bottom + helper_length),
                    )
                }
                (Some(helper_length), HelperPlacement::Below) => {
                    let helper_top = base + helper_length;
                    let main_bottom = helper_top + g.helper_perch_thickness;
                    (
                        main_bottom,
                        main_bottom + solution.main_length,
                        Some(helper_top + g.helper_perch_thickness * 0.5),
                        Some(base),
                        Some(helper_top),
                    )
                }
            };

        Anchors {
            body_center: dims.damper.body_length * 0.5,
            lower_perch_center: base - dims.lower_perch.thickness * 0.5,
            main_bottom,
            main_top,
            helper_perch_center,
            helper_bottom,
            helper_top,
            shaft_top: strut_length,
            shaft_center: strut_length - g.shaft_length * 0.5,
            upper_perch_center: strut_length + dims.upper_perch.thickness * 0.5,
            cone_base: strut_length + dims.upper_perch.thickness,
        }
    }
}

/// Relative slack for the helper, whose solid height equals its bind length
/// up to rounding.
const SOLID_HEIGHT_SLACK: f64 = 1e-9;

fn check_solid_height(spring: &SpringGeometry, coils_field: &'static str, bind_field: &'static str) -> CoiloverResult<()> {
    let n = spring.active_coils;
    if n <= 1.0 {
        return Err(CoiloverError::invalid(
            coils_field,
            format!("{n:.3} active coils leave no full turn between the seats"),
        ));
    }

    let axial = spring.wire.axial();
    let solid = n * axial;
    let bind = spring.limits.bind_length;
    if solid > bind * (1.0 + SOLID_HEIGHT_SLACK) {
        return Err(CoiloverError::invalid(
            bind_field,
            format!("bind length {bind:.3} is shorter than the solid height {n:.3} x {axial:.3} = {solid:.3}"),
        ));
    }
    Ok(())
}

fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) }
}

const fn empty_anchors() -> Anchors {
    Anchors {
        body_center: 0.0,
        lower_perch_center: 0.0,
        main_bottom: 0.0,
        main_top: 0.0,
        helper_perch_center: None,
        helper_bottom: None,
        helper_top: None,
        shaft_top: 0.0,
        shaft_center: 0.0,
        upper_perch_center: 0.0,
        cone_base: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::dimensions::HelperSpringSpec;
    use crate::mechanics::SolverState;

    fn with_helper(placement: HelperPlacement) -> DimensionSet {
        DimensionSet {
            helper: Some(HelperSpringSpec {
                placement,
                ..HelperSpringSpec::default()
            }),
            ..DimensionSet::default()
        }
    }

    #[test]
    fn default_strut_range_is_limited_by_bind_stack() {
        let layout = AssemblyLayout::new(&DimensionSet::default()).expect("layout");
        let g = layout.geometry();

        assert_eq!(g.stack_base, 210.0);
        assert_eq!(g.bind_stack, 260.0);
        assert_eq!(g.strut_length_min, 260.0);
        assert_eq!(g.strut_length_max, 400.0);
        assert_eq!(layout.strut_length_at(0.0), 400.0);
        assert_eq!(layout.strut_length_at(1.0), 260.0);
        assert_eq!(layout.strut_length_at(0.5), 330.0);
    }

    #[test]
    fn compressed_length_limits_travel_when_longer_than_bind_stack() {
        let mut dims = DimensionSet::default();
        dims.damper.compressed_length = 300.0;
        let layout = AssemblyLayout::new(&dims).expect("layout");
        assert_eq!(layout.geometry().strut_length_min, 300.0);
    }

    #[test]
    fn fraction_is_clamped() {
        let layout = AssemblyLayout::new(&DimensionSet::default()).expect("layout");
        assert_eq!(layout.travel_state(-0.5).fraction, 0.0);
        assert_eq!(layout.travel_state(3.0).fraction, 1.0);
        assert_eq!(layout.travel_state(f64::NAN).fraction, 0.0);
    }

    #[test]
    fn single_spring_anchor_chain() {
        let layout = AssemblyLayout::new(&DimensionSet::default()).expect("layout");
        let state = layout.travel_state(0.0);
        let a = state.anchors;

        assert_eq!(state.available_length, 190.0);
        assert_eq!(state.solution.state, SolverState::SeriesCompressed);
        assert!((state.solution.force - 1000.0).abs() < 1e-9);

        assert_eq!(a.body_center, 100.0);
        assert_eq!(a.lower_perch_center, 207.5);
        assert_eq!(a.main_bottom, 210.0);
        assert_eq!(a.main_top, 400.0);
        assert_eq!(a.shaft_top, 400.0);
        assert_eq!(a.shaft_center, 300.0);
        assert_eq!(a.upper_perch_center, 402.5);
        assert_eq!(a.cone_base, 405.0);
        assert!(a.helper_perch_center.is_none());
    }

    #[test]
    fn full_travel_reaches_main_bind() {
        let layout = AssemblyLayout::new(&DimensionSet::default()).expect("layout");
        let state = layout.travel_state(1.0);
        assert_eq!(state.solution.state, SolverState::MainBound);
        assert_eq!(state.solution.main_length, 50.0);
        assert_eq!(state.travel, 140.0);
    }

    #[test]
    fn helper_above_sits_on_main_spring() {
        let layout = AssemblyLayout::new(&with_helper(HelperPlacement::Above)).expect("layout");
        let state = layout.travel_state(0.3);
        let a = state.anchors;
        let t = layout.geometry().helper_perch_thickness;

        assert_eq!(a.main_bottom, layout.geometry().stack_base);
        let helper_bottom = a.helper_bottom.expect("helper bottom");
        let helper_top = a.helper_top.expect("helper top");
        assert!((helper_bottom - (a.main_top + t)).abs() < 1e-9);
        assert!((a.helper_perch_center.expect("perch") - (a.main_top + t * 0.5)).abs() < 1e-9);
        assert!(helper_top <= a.shaft_top + 1e-9);
        assert!(a.main_bottom < a.main_top && a.main_top < helper_bottom && helper_bottom < helper_top);
    }

    #[test]
    fn helper_below_sits_on_lower_perch() {
        let layout = AssemblyLayout::new(&with_helper(HelperPlacement::Below)).expect("layout");
        let state = layout.travel_state(0.3);
        let a = state.anchors;
        let t = layout.geometry().helper_perch_thickness;

        assert_eq!(a.helper_bottom, Some(layout.geometry().stack_base));
        let helper_top = a.helper_top.expect("helper top");
        assert!((a.main_bottom - (helper_top + t)).abs() < 1e-9);
        assert!(a.main_top <= a.shaft_top + 1e-9);
    }

    #[test]
    fn helper_coil_is_solved_from_solid_height() {
        let layout = AssemblyLayout::new(&with_helper(HelperPlacement::Above)).expect("layout");
        let helper = layout.geometry().helper.expect("helper");
        assert!((helper.active_coils - 4.53).abs() < 0.01);
        assert!(matches!(helper.wire, WireSection::Rectangular { .. }));
        assert!(helper.wire.axial() < helper.wire.radial());
    }

    #[test]
    fn oversized_bind_stack_is_invalid() {
        let mut dims = DimensionSet::default();
        dims.spring.bind_length = 195.0;
        dims.spring.free_length = 250.0;
        let err = AssemblyLayout::new(&dims).expect_err("bind stack too long");
        assert_eq!(err.field(), Some("damper.free_length"));
    }

    #[test]
    fn bind_shorter_than_solid_height_is_invalid() {
        // 2.915 coils of 10 mm wire stack to 29.15 mm.
        let mut dims = DimensionSet::default();
        dims.spring.bind_length = 29.0;
        let err = AssemblyLayout::new(&dims).expect_err("bind < solid height");
        assert_eq!(err.field(), Some("spring.bind_length"));

        dims.spring.bind_length = 29.2;
        assert!(AssemblyLayout::new(&dims).is_ok());
    }

    #[test]
    fn less_than_one_coil_is_invalid() {
        // Twenty times the default rate needs only 0.146 coils.
        let mut dims = DimensionSet::default();
        dims.spring.rate = 2000.0;
        let err = AssemblyLayout::new(&dims).expect_err("n < 1");
        assert_eq!(err.field(), Some("spring.rate"));
    }

    #[test]
    fn coils_touch_but_never_overlap_at_bind() {
        let layout = AssemblyLayout::new(&with_helper(HelperPlacement::Above)).expect("layout");
        let g = layout.geometry();
        let helper = g.helper.expect("helper");
        let state = layout.travel_state(1.0);
        let a = state.anchors;

        let helper_bottom = a.helper_bottom.expect("helper bottom");
        let helper_top = a.helper_top.expect("helper top");
        let helper_length = state.solution.helper_length.expect("helper length");
        assert!((helper_length - helper.limits.bind_length).abs() < 1e-9);

        let axial = helper.wire.axial();
        let pitch = helper.helix(helper_bottom, helper_top).expect("helper helix").pitch();
        assert!(pitch >= axial - 1e-9, "pitch {pitch} < wire height {axial}");
        assert!((pitch - axial).abs() < 1e-9, "flat wire should be solid: {pitch} vs {axial}");

        let main_pitch = g.main.helix(a.main_bottom, a.main_top).expect("main helix").pitch();
        assert!(main_pitch >= g.main.wire.axial());
    }

    #[test]
    fn helix_stays_between_seats() {
        let layout = AssemblyLayout::new(&DimensionSet::default()).expect("layout");
        let main = layout.geometry().main;
        let helix = main.helix(210.0, 400.0).expect("helix");

        assert!((helix.z_bottom - 215.0).abs() < 1e-12);
        assert!((helix.z_top - 395.0).abs() < 1e-12);
        assert!((helix.coils - (main.active_coils - 1.0)).abs() < 1e-12);
    }
}
