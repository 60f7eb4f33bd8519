/*
Phase-space state of the thermostatted oscillator.

Every scheme shares the same five slots:

    p      momentum
    q      position
    zeta   first thermostat variable (friction / 2nd moment control)
    eta    second thermostat variable, or the log-term of the reduced
           Nose-Hoover scheme
    theta  accumulated bookkeeping term of the extended Hamiltonian

A dynamics model that does not use a slot returns a zero derivative for
it, so the slot stays at its initial value (zero) for the whole run and
states of one run can always be added together.
 */
use std::fmt;
use std::ops::{Add, Mul};

use nalgebra::SVector;
use serde::{Deserialize, Serialize};

pub type StateVector = SVector<f64, 5>;

const P: usize = 0;
const Q: usize = 1;
const ZETA: usize = 2;
const ETA: usize = 3;
const THETA: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct State(StateVector);

impl State {
    pub fn new(p: f64, q: f64, zeta: f64, eta: f64, theta: f64) -> Self {
        State(StateVector::new(p, q, zeta, eta, theta))
    }

    /// Bare oscillator coordinates with every thermostat slot at zero.
    pub fn oscillator(p: f64, q: f64) -> Self {
        State::new(p, q, 0.0, 0.0, 0.0)
    }

    /// Initial condition used by every run: at rest, displaced by one.
    pub fn initial() -> Self {
        State::oscillator(0.0, 1.0)
    }

    pub fn zeros() -> Self {
        State(StateVector::zeros())
    }

    pub fn p(&self) -> f64 {
        self.0[P]
    }

    pub fn q(&self) -> f64 {
        self.0[Q]
    }

    pub fn zeta(&self) -> f64 {
        self.0[ZETA]
    }

    pub fn eta(&self) -> f64 {
        self.0[ETA]
    }

    pub fn theta(&self) -> f64 {
        self.0[THETA]
    }

    pub fn as_vector(&self) -> &StateVector {
        &self.0
    }

    /// Kinetic plus potential energy of the bare oscillator, p^2/2 + q^2/2.
    pub fn oscillator_energy(&self) -> f64 {
        0.5 * self.p() * self.p() + 0.5 * self.q() * self.q()
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }
}

impl Default for State {
    fn default() -> Self {
        State::initial()
    }
}

impl From<StateVector> for State {
    fn from(v: StateVector) -> Self {
        State(v)
    }
}

impl Add for State {
    type Output = State;

    fn add(self, rhs: State) -> State {
        State(self.0 + rhs.0)
    }
}

impl Mul<f64> for State {
    type Output = State;

    fn mul(self, f: f64) -> State {
        State(self.0 * f)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p={} q={} zeta={} eta={} theta={}",
            self.p(),
            self.q(),
            self.zeta(),
            self.eta(),
            self.theta()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_state() {
        let s = State::initial();
        assert_eq!(s.p(), 0.0);
        assert_eq!(s.q(), 1.0);
        assert_eq!(s.zeta(), 0.0);
        assert_eq!(s.eta(), 0.0);
        assert_eq!(s.theta(), 0.0);
        assert_relative_eq!(s.oscillator_energy(), 0.5);
    }

    #[test]
    fn test_componentwise_arithmetic() {
        let a = State::new(1.0, 2.0, 3.0, 4.0, 5.0);
        let b = State::new(0.5, -1.0, 0.0, 2.0, -5.0);
        let c = a + b * 2.0;
        assert_eq!(c, State::new(2.0, 0.0, 3.0, 8.0, -5.0));
    }

    #[test]
    fn test_non_finite_detection() {
        assert!(State::initial().is_finite());
        assert!(!State::new(f64::NAN, 0.0, 0.0, 0.0, 0.0).is_finite());
        assert!(!State::new(0.0, 0.0, 0.0, 0.0, f64::INFINITY).is_finite());
    }
}
