pub mod coil;
pub mod strut;

pub use coil::{
    CoilError, RectangularCoil, STEEL_SHEAR_MODULUS, active_coils_rectangular,
    active_coils_rectangular_section, active_coils_round, rate_rectangular, rate_round,
};
pub use strut::{SolverState, SpringLimits, StrutForceSolver, StrutSolution};
