use serde::{Deserialize, Serialize};

use crate::constants::{TEMPERATURE, THERMOSTAT_MASS};
use crate::state::State;
use crate::thermostats::{Convention, Dynamics};

/// Two-link chain: `zeta` damps the momentum and is itself damped by `eta`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoseHooverChain {
    pub temperature: f64,
    pub q_zeta: f64,
    pub q_eta: f64,
    pub convention: Convention,
}

impl NoseHooverChain {
    pub fn new(temperature: f64, q_zeta: f64, q_eta: f64, convention: Convention) -> Self {
        NoseHooverChain {
            temperature,
            q_zeta,
            q_eta,
            convention,
        }
    }
}

impl Default for NoseHooverChain {
    fn default() -> Self {
        NoseHooverChain::new(
            TEMPERATURE,
            THERMOSTAT_MASS,
            THERMOSTAT_MASS,
            Convention::default(),
        )
    }
}

impl Dynamics for NoseHooverChain {
    fn derivative(&mut self, v: &State) -> State {
        let t = self.temperature;
        let (p, q, zeta, eta) = (v.p(), v.q(), v.zeta(), v.eta());

        match self.convention {
            Convention::Extended => State::new(
                -q - p * zeta / self.q_zeta,
                p,
                p * p - t - eta * zeta / self.q_eta,
                zeta * zeta / self.q_zeta - t,
                t * (zeta / self.q_zeta + eta / self.q_eta),
            ),
            Convention::Reduced => State::new(
                -q - p * zeta,
                p,
                (p * p - t) / self.q_zeta - eta * zeta,
                (zeta * zeta - t) / self.q_eta,
                0.0,
            ),
        }
    }

    fn conserved_quantity(&self, v: &State) -> Option<f64> {
        match self.convention {
            Convention::Extended => {
                let (zeta, eta) = (v.zeta(), v.eta());
                Some(
                    v.oscillator_energy()
                        + zeta * zeta / (2.0 * self.q_zeta)
                        + eta * eta / (2.0 * self.q_eta)
                        + v.theta(),
                )
            }
            Convention::Reduced => None,
        }
    }

    fn name(&self) -> &str {
        "nose_hoover_chain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_chain_coupling() {
        let mut nhc = NoseHooverChain::new(1.0, 1.0, 1.0, Convention::Extended);
        let d = nhc.derivative(&State::new(1.0, 0.0, 2.0, 0.5, 0.0));
        assert_relative_eq!(d.p(), -2.0);
        assert_relative_eq!(d.q(), 1.0);
        // 1 - 1 - 0.5 * 2
        assert_relative_eq!(d.zeta(), -1.0);
        assert_relative_eq!(d.eta(), 3.0);
        assert_relative_eq!(d.theta(), 2.5);
    }

    #[test]
    fn test_conserved_quantity_has_zero_rate() {
        let v = State::new(-0.4, 1.1, 0.6, -0.2, 0.3);
        let mut nhc = NoseHooverChain::new(1.2, 0.9, 1.7, Convention::Extended);
        let h0 = nhc.conserved_quantity(&v).unwrap();
        let d = nhc.derivative(&v);
        let eps = 1e-7;
        let h1 = nhc.conserved_quantity(&(v + d * eps)).unwrap();
        assert!(((h1 - h0) / eps).abs() < 1e-5);
    }
}
