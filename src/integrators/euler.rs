use serde::{Deserialize, Serialize};

use crate::integrators::Integrator;
use crate::state::State;
use crate::thermostats::Dynamics;

/// Explicit (forward) Euler, v' = v + f(v) dt.
///
/// First order. The stochastic thermostat must use this scheme: its noise
/// is scaled for exactly one derivative evaluation per step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Euler {
    dt: f64,
}

impl Euler {
    pub fn new(dt: f64) -> Self {
        Euler { dt }
    }
}

impl Integrator for Euler {
    fn step<D: Dynamics + ?Sized>(&self, state: &State, model: &mut D) -> State {
        *state + model.derivative(state) * self.dt
    }

    fn dt(&self) -> f64 {
        self.dt
    }

    fn name(&self) -> &str {
        "euler"
    }

    fn order(&self) -> usize {
        1
    }
}
