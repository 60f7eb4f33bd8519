use serde::{Deserialize, Serialize};

use crate::constants::{TEMPERATURE, THERMOSTAT_MASS};
use crate::state::State;
use crate::thermostats::{Convention, Dynamics};

/// Controls the second (`zeta`) and fourth (`eta`) kinetic moments.
///
/// The quartic feedback `p^3 eta` forces <p^4> = 3T<p^2>, which the plain
/// Nose-Hoover thermostat cannot enforce on a single oscillator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KineticMoments {
    pub temperature: f64,
    pub q_zeta: f64,
    pub q_eta: f64,
    pub convention: Convention,
}

impl KineticMoments {
    pub fn new(temperature: f64, q_zeta: f64, q_eta: f64, convention: Convention) -> Self {
        KineticMoments {
            temperature,
            q_zeta,
            q_eta,
            convention,
        }
    }
}

impl Default for KineticMoments {
    fn default() -> Self {
        KineticMoments::new(
            TEMPERATURE,
            THERMOSTAT_MASS,
            THERMOSTAT_MASS,
            Convention::default(),
        )
    }
}

impl Dynamics for KineticMoments {
    fn derivative(&mut self, v: &State) -> State {
        let t = self.temperature;
        let (p, q, zeta, eta) = (v.p(), v.q(), v.zeta(), v.eta());
        let p2 = p * p;
        let p3 = p2 * p;
        let p4 = p2 * p2;

        match self.convention {
            Convention::Extended => State::new(
                -q - p * zeta / self.q_zeta - p3 * eta / self.q_eta,
                p,
                p2 - t,
                p4 - 3.0 * t * p2,
                zeta * t / self.q_zeta + 3.0 * t * p2 * eta / self.q_eta,
            ),
            Convention::Reduced => State::new(
                -q - p * zeta - p3 * eta,
                p,
                (p2 - t) / self.q_zeta,
                (p4 - 3.0 * t * p2) / self.q_eta,
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
        "kinetic_moments"
    }
}
