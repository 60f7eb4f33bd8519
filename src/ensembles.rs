/*
Catalogue of the thermostat schemes that are run, in order:

    nose_hoover        Nose-Hoover, RK4
    kinetic_moments    kinetic moments (2nd + 4th), RK4
    nose_hoover_chain  two-link Nose-Hoover chain, RK4
    langevin           Langevin, Euler

`Thermostat` is the runtime-selected model; it dispatches to the concrete
thermostats so one driver can handle every scheme.
 */
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{FRICTION, THERMOSTAT_MASS};
use crate::error::SimulationError;
use crate::integrators::IntegratorKind;
use crate::simulation::SimulationConfig;
use crate::state::State;
use crate::thermostats::{
    Convention, Dynamics, KineticMoments, Langevin, NoseHoover, NoseHooverChain,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    NoseHoover,
    KineticMoments,
    NoseHooverChain,
    Langevin,
}

impl Scheme {
    pub const ALL: [Scheme; 4] = [
        Scheme::NoseHoover,
        Scheme::KineticMoments,
        Scheme::NoseHooverChain,
        Scheme::Langevin,
    ];

    /// Label used for log lines and output file names.
    pub fn label(&self) -> &'static str {
        match self {
            Scheme::NoseHoover => "nose_hoover",
            Scheme::KineticMoments => "kinetic_moments",
            Scheme::NoseHooverChain => "nose_hoover_chain",
            Scheme::Langevin => "langevin",
        }
    }

    pub fn is_stochastic(&self) -> bool {
        matches!(self, Scheme::Langevin)
    }

    /// RK4 for the deterministic schemes, Euler for Langevin.
    pub fn default_integrator(&self, dt: f64) -> IntegratorKind {
        if self.is_stochastic() {
            IntegratorKind::euler(dt)
        } else {
            IntegratorKind::runge_kutta4(dt)
        }
    }

    pub fn build(
        &self,
        config: &SimulationConfig,
        params: &ThermostatParameters,
    ) -> Result<Thermostat, SimulationError> {
        let t = config.temperature;
        let thermostat = match self {
            Scheme::NoseHoover => Thermostat::NoseHoover(NoseHoover::new(
                t,
                params.thermostat_mass,
                params.convention,
            )),
            Scheme::KineticMoments => Thermostat::KineticMoments(KineticMoments::new(
                t,
                params.q_zeta,
                params.q_eta,
                params.convention,
            )),
            Scheme::NoseHooverChain => Thermostat::NoseHooverChain(NoseHooverChain::new(
                t,
                params.q_zeta,
                params.q_eta,
                params.convention,
            )),
            Scheme::Langevin => Thermostat::Langevin(Langevin::new(
                params.gamma,
                t,
                config.dt,
                config.seed,
            )?),
        };
        Ok(thermostat)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coupling coefficients shared by the schemes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThermostatParameters {
    /// Q of the single-variable Nose-Hoover thermostat.
    pub thermostat_mass: f64,
    pub q_zeta: f64,
    pub q_eta: f64,
    /// Langevin friction.
    pub gamma: f64,
    pub convention: Convention,
}

impl Default for ThermostatParameters {
    fn default() -> Self {
        ThermostatParameters {
            thermostat_mass: THERMOSTAT_MASS,
            q_zeta: THERMOSTAT_MASS,
            q_eta: THERMOSTAT_MASS,
            gamma: FRICTION,
            convention: Convention::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Thermostat {
    NoseHoover(NoseHoover),
    KineticMoments(KineticMoments),
    NoseHooverChain(NoseHooverChain),
    Langevin(Langevin),
}

impl Dynamics for Thermostat {
    fn derivative(&mut self, state: &State) -> State {
        match self {
            Thermostat::NoseHoover(m) => m.derivative(state),
            Thermostat::KineticMoments(m) => m.derivative(state),
            Thermostat::NoseHooverChain(m) => m.derivative(state),
            Thermostat::Langevin(m) => m.derivative(state),
        }
    }

    fn conserved_quantity(&self, state: &State) -> Option<f64> {
        match self {
            Thermostat::NoseHoover(m) => m.conserved_quantity(state),
            Thermostat::KineticMoments(m) => m.conserved_quantity(state),
            Thermostat::NoseHooverChain(m) => m.conserved_quantity(state),
            Thermostat::Langevin(m) => m.conserved_quantity(state),
        }
    }

    fn is_stochastic(&self) -> bool {
        matches!(self, Thermostat::Langevin(_))
    }

    fn name(&self) -> &str {
        match self {
            Thermostat::NoseHoover(m) => m.name(),
            Thermostat::KineticMoments(m) => m.name(),
            Thermostat::NoseHooverChain(m) => m.name(),
            Thermostat::Langevin(m) => m.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrators::Integrator;

    #[test]
    fn test_labels_match_model_names() {
        let config = SimulationConfig::default();
        let params = ThermostatParameters::default();
        for scheme in Scheme::ALL {
            let model = scheme.build(&config, &params).unwrap();
            assert_eq!(model.name(), scheme.label());
            assert_eq!(model.is_stochastic(), scheme.is_stochastic());
            assert_eq!(scheme.to_string(), scheme.label());
        }
    }

    #[test]
    fn test_default_integrators() {
        assert_eq!(Scheme::Langevin.default_integrator(0.001).name(), "euler");
        for scheme in [
            Scheme::NoseHoover,
            Scheme::KineticMoments,
            Scheme::NoseHooverChain,
        ] {
            assert_eq!(scheme.default_integrator(0.001).name(), "runge_kutta4");
        }
    }

    #[test]
    fn test_langevin_build_uses_config_step() {
        let config = SimulationConfig {
            dt: 0.01,
            temperature: 2.0,
            ..SimulationConfig::default()
        };
        let params = ThermostatParameters {
            gamma: 0.5,
            ..ThermostatParameters::default()
        };
        match Scheme::Langevin.build(&config, &params).unwrap() {
            Thermostat::Langevin(l) => {
                assert!((l.noise_scale() - (2.0 * 0.5 * 2.0 / 0.01_f64).sqrt()).abs() < 1e-12);
                assert_eq!(l.seed(), config.seed);
            }
            other => panic!("expected Langevin, got {other:?}"),
        }
    }
}
