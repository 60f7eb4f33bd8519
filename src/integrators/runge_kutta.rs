use serde::{Deserialize, Serialize};

use crate::integrators::Integrator;
use crate::state::State;
use crate::thermostats::Dynamics;

/// Classic four stage Runge-Kutta.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RungeKutta4 {
    dt: f64,
}

impl RungeKutta4 {
    pub fn new(dt: f64) -> Self {
        RungeKutta4 { dt }
    }
}

impl Integrator for RungeKutta4 {
    fn step<D: Dynamics + ?Sized>(&self, state: &State, model: &mut D) -> State {
        /*
        k1 = f(v)
        k2 = f(v + k1 dt/2)
        k3 = f(v + k2 dt/2)
        k4 = f(v + k3 dt)
        v' = v + (k1 + 2 k2 + 2 k3 + k4) dt/6
         */
        let dt = self.dt;
        let hdt = 0.5 * dt;
        let v = *state;

        let k1 = model.derivative(&v);
        let k2 = model.derivative(&(v + k1 * hdt));
        let k3 = model.derivative(&(v + k2 * hdt));
        let k4 = model.derivative(&(v + k3 * dt));

        v + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
    }

    fn dt(&self) -> f64 {
        self.dt
    }

    fn name(&self) -> &str {
        "runge_kutta4"
    }

    fn order(&self) -> usize {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermostats::{Convention, NoseHoover};

    #[test]
    fn test_matches_exact_oscillator() {
        // with a vanishing friction the (p, q) pair is a pure oscillator:
        // q(t) = cos t, p(t) = -sin t
        let mut nh = NoseHoover::new(1.0, 1e300, Convention::Extended);
        let rk4 = RungeKutta4::new(0.01);
        let mut v = State::initial();
        for _ in 0..100 {
            v = rk4.step(&v, &mut nh);
        }
        assert!((v.q() - 1.0_f64.cos()).abs() < 1e-9);
        assert!((v.p() + 1.0_f64.sin()).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let rk4 = RungeKutta4::new(0.001);
        let mut a = NoseHoover::default();
        let mut b = NoseHoover::default();
        let mut va = State::initial();
        let mut vb = State::initial();
        for _ in 0..1000 {
            va = rk4.step(&va, &mut a);
            vb = rk4.step(&vb, &mut b);
            assert_eq!(va, vb);
        }
    }
}
