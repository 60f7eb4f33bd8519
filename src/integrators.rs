/*
Fixed step integrators.

An integrator advances a State by one step of size `dt` using whatever
thermostat it is handed. It holds no state of its own besides `dt`, so
the same integrator value can drive any number of runs.
 */
pub mod euler;
pub mod runge_kutta;

use serde::{Deserialize, Serialize};

use crate::state::State;
use crate::thermostats::Dynamics;

pub use euler::Euler;
pub use runge_kutta::RungeKutta4;

pub trait Integrator {
    /// Advance `state` by one step.
    fn step<D: Dynamics + ?Sized>(&self, state: &State, model: &mut D) -> State;

    fn dt(&self) -> f64;

    fn name(&self) -> &str;

    /// Order of the local truncation error.
    fn order(&self) -> usize;

    /// Conserved quantity of `model` at `state`, forwarded unchanged.
    fn energy<D: Dynamics + ?Sized>(&self, state: &State, model: &D) -> f64 {
        model.energy(state)
    }
}

/// Runtime choice of integrator, dispatched by `match`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum IntegratorKind {
    Euler(Euler),
    RungeKutta4(RungeKutta4),
}

impl IntegratorKind {
    pub fn euler(dt: f64) -> Self {
        IntegratorKind::Euler(Euler::new(dt))
    }

    pub fn runge_kutta4(dt: f64) -> Self {
        IntegratorKind::RungeKutta4(RungeKutta4::new(dt))
    }
}

impl Integrator for IntegratorKind {
    fn step<D: Dynamics + ?Sized>(&self, state: &State, model: &mut D) -> State {
        match self {
            IntegratorKind::Euler(i) => i.step(state, model),
            IntegratorKind::RungeKutta4(i) => i.step(state, model),
        }
    }

    fn dt(&self) -> f64 {
        match self {
            IntegratorKind::Euler(i) => i.dt(),
            IntegratorKind::RungeKutta4(i) => i.dt(),
        }
    }

    fn name(&self) -> &str {
        match self {
            IntegratorKind::Euler(i) => i.name(),
            IntegratorKind::RungeKutta4(i) => i.name(),
        }
    }

    fn order(&self) -> usize {
        match self {
            IntegratorKind::Euler(i) => i.order(),
            IntegratorKind::RungeKutta4(i) => i.order(),
        }
    }
}
