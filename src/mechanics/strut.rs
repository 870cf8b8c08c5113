//! Axial force balance for one or two springs stacked in series between the
//! lower perch and the shaft top.
//!
//! The springs share a series deflection until one of them reaches bind. That
//! spring is then held at its bind length and the other one takes the rest of
//! the available length, floored at its own bind length.

use serde::Serialize;

/// Length limits and rate of one spring, in mm and N/mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpringLimits {
    pub free_length: f64,
    pub bind_length: f64,
    pub rate: f64,
}

impl SpringLimits {
    #[must_use]
    pub const fn new(free_length: f64, bind_length: f64, rate: f64) -> Self {
        Self {
            free_length,
            bind_length,
            rate,
        }
    }

    /// Force transmitted when the spring sits exactly at bind.
    #[must_use]
    pub fn bind_force(&self) -> f64 {
        self.rate * (self.free_length - self.bind_length)
    }

    /// Force at `length`, which callers keep within `[bind, free]`.
    #[must_use]
    pub fn force_at(&self, length: f64) -> f64 {
        self.rate * (self.free_length - length)
    }

    fn clamp_length(&self, length: f64) -> f64 {
        length.clamp(self.bind_length, self.free_length)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverState {
    /// Enough room for every spring at free length; no force.
    BothFree,
    /// Springs share the deflection in inverse proportion to their rates.
    SeriesCompressed,
    HelperBound,
    MainBound,
    /// Every spring at bind; force stays at the last transmitted value.
    FullyBound,
}

impl SolverState {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BothFree => "free",
            Self::SeriesCompressed => "series compressed",
            Self::HelperBound => "helper bound",
            Self::MainBound => "main bound",
            Self::FullyBound => "fully bound",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrutSolution {
    pub state: SolverState,
    pub main_length: f64,
    pub helper_length: Option<f64>,
    /// Axial force in N, never negative.
    pub force: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrutForceSolver {
    main: SpringLimits,
    helper: Option<SpringLimits>,
}

impl StrutForceSolver {
    #[must_use]
    pub const fn new(main: SpringLimits, helper: Option<SpringLimits>) -> Self {
        Self { main, helper }
    }

    #[must_use]
    pub fn main(&self) -> SpringLimits {
        self.main
    }

    #[must_use]
    pub fn helper(&self) -> Option<SpringLimits> {
        self.helper
    }

    /// Summed free lengths; the force is zero at or above this length.
    #[must_use]
    pub fn free_stack(&self) -> f64 {
        self.main.free_length + self.helper.map_or(0.0, |h| h.free_length)
    }

    /// Summed bind lengths; the shortest length the springs can occupy.
    #[must_use]
    pub fn bind_stack(&self) -> f64 {
        self.main.bind_length + self.helper.map_or(0.0, |h| h.bind_length)
    }

    /// Spring lengths and force for the axial length available to the stack.
    #[must_use]
    pub fn solve(&self, available_length: f64) -> StrutSolution {
        match self.helper {
            None => self.solve_single(available_length),
            Some(helper) => self.solve_series(helper, available_length),
        }
    }

    fn solve_single(&self, available_length: f64) -> StrutSolution {
        let main = self.main;
        let state = if available_length >= main.free_length {
            SolverState::BothFree
        } else if available_length <= main.bind_length {
            SolverState::MainBound
        } else {
            SolverState::SeriesCompressed
        };
        let main_length = main.clamp_length(available_length);

        StrutSolution {
            state,
            main_length,
            helper_length: None,
            force: main.force_at(main_length).max(0.0),
        }
    }

    fn solve_series(&self, helper: SpringLimits, available_length: f64) -> StrutSolution {
        let main = self.main;

        let deflection = self.free_stack() - available_length;
        if deflection <= 0.0 {
            return StrutSolution {
                state: SolverState::BothFree,
                main_length: main.free_length,
                helper_length: Some(helper.free_length),
                force: 0.0,
            };
        }

        let force = deflection / (1.0 / main.rate + 1.0 / helper.rate);
        let main_length = main.free_length - force / main.rate;
        let helper_length = helper.free_length - force / helper.rate;

        let helper_under = helper_length < helper.bind_length;
        let main_under = main_length < main.bind_length;

        // Helper is checked first. When both undercut, the one with the lower
        // bind force reached bind first and is the one held.
        if helper_under && (!main_under || helper.bind_force() <= main.bind_force()) {
            let remaining = available_length - helper.bind_length;
            let (state, main_length) = if remaining <= main.bind_length {
                (SolverState::FullyBound, main.bind_length)
            } else {
                (SolverState::HelperBound, main.clamp_length(remaining))
            };
            return StrutSolution {
                state,
                main_length,
                helper_length: Some(helper.bind_length),
                force: main.force_at(main_length).max(0.0),
            };
        }

        if main_under {
            let remaining = available_length - main.bind_length;
            let (state, helper_length) = if remaining <= helper.bind_length {
                (SolverState::FullyBound, helper.bind_length)
            } else {
                (SolverState::MainBound, helper.clamp_length(remaining))
            };
            return StrutSolution {
                state,
                main_length: main.bind_length,
                helper_length: Some(helper_length),
                force: helper.force_at(helper_length).max(0.0),
            };
        }

        StrutSolution {
            state: SolverState::SeriesCompressed,
            main_length,
            helper_length: Some(helper_length),
            force,
        }
    }
}
