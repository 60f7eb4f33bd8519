use serde::{Deserialize, Serialize};

use crate::constants::{TEMPERATURE, THERMOSTAT_MASS};
use crate::state::State;
use crate::thermostats::{Convention, Dynamics};

/// Single friction variable `zeta` coupled to the momentum.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoseHoover {
    pub temperature: f64,
    pub thermostat_mass: f64,
    pub convention: Convention,
}

impl NoseHoover {
    pub fn new(temperature: f64, thermostat_mass: f64, convention: Convention) -> Self {
        NoseHoover {
            temperature,
            thermostat_mass,
            convention,
        }
    }
}

impl Default for NoseHoover {
    fn default() -> Self {
        NoseHoover::new(TEMPERATURE, THERMOSTAT_MASS, Convention::default())
    }
}

impl Dynamics for NoseHoover {
    fn derivative(&mut self, v: &State) -> State {
        let t = self.temperature;
        let mass = self.thermostat_mass;
        let (p, q, zeta) = (v.p(), v.q(), v.zeta());

        match self.convention {
            // dp = -q - p zeta / Q, dzeta = p^2 - T, dtheta = zeta T / Q
            Convention::Extended => State::new(
                -q - p * zeta / mass,
                p,
                p * p - t,
                0.0,
                zeta * t / mass,
            ),
            // dp = -q - p zeta, dzeta = (p^2 - T) / Q, deta = T zeta
            Convention::Reduced => State::new(-q - p * zeta, p, (p * p - t) / mass, t * zeta, 0.0),
        }
    }

    fn conserved_quantity(&self, v: &State) -> Option<f64> {
        let mass = self.thermostat_mass;
        let zeta = v.zeta();
        let h = match self.convention {
            Convention::Extended => v.oscillator_energy() + zeta * zeta / (2.0 * mass) + v.theta(),
            Convention::Reduced => v.oscillator_energy() + 0.5 * mass * zeta * zeta + v.eta(),
        };
        Some(h)
    }

    fn name(&self) -> &str {
        "nose_hoover"
    }
}
