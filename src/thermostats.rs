/*
Thermostats for the one dimensional harmonic oscillator.

Each thermostat is a right-hand side of a coupled ODE system. It maps a
State to its time derivative and, when the extended system has one,
evaluates the conserved pseudo-Hamiltonian that a correct deterministic
integration keeps (nearly) constant.

Any thermostat can be driven by any integrator, see `crate::integrators`.
 */
pub mod kinetic_moments;
pub mod langevin;
pub mod nose_hoover;
pub mod nose_hoover_chain;

use serde::{Deserialize, Serialize};

use crate::state::State;

pub use kinetic_moments::KineticMoments;
pub use langevin::Langevin;
pub use nose_hoover::NoseHoover;
pub use nose_hoover_chain::NoseHooverChain;

pub trait Dynamics {
    /// Time derivative of `state`.
    ///
    /// Takes `&mut self` because stochastic models advance their generator
    /// on every evaluation; deterministic models never change.
    fn derivative(&mut self, state: &State) -> State;

    /// Conserved quantity of the extended system, if this model tracks one.
    fn conserved_quantity(&self, _state: &State) -> Option<f64> {
        None
    }

    /// Conserved quantity, or zero when none is tracked.
    fn energy(&self, state: &State) -> f64 {
        self.conserved_quantity(state).unwrap_or(0.0)
    }

    fn is_stochastic(&self) -> bool {
        false
    }

    fn name(&self) -> &str;
}

/// Coefficient normalisation of the extended-system thermostats.
///
/// `Extended` divides the friction felt by `p` by the thermostat mass and
/// carries the bookkeeping integral in `theta`, so every deterministic
/// scheme has a conserved quantity. `Reduced` leaves the friction unscaled
/// and divides the thermostat forces by the mass instead; only the plain
/// Nose-Hoover scheme keeps a conserved quantity there (through `eta`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Convention {
    #[default]
    Extended,
    Reduced,
}
