use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::SimulationError;
use crate::state::State;
use crate::thermostats::Dynamics;

/// Stochastic friction: dp = -q - gamma p + R, dq = p.
///
/// `R` is drawn fresh on every derivative call from N(0, D) with
/// D = sqrt(2 gamma T / dt), which balances dissipation and fluctuation for
/// an explicit Euler step of size `dt`. Only meaningful under Euler.
#[derive(Clone, Debug)]
pub struct Langevin {
    gamma: f64,
    temperature: f64,
    noise_scale: f64,
    seed: u64,
    noise: Normal<f64>,
    rng: StdRng,
}

impl Langevin {
    /// The generator is always seeded explicitly; there is no entropy-based
    /// constructor, so two models built with the same arguments produce
    /// the same noise sequence.
    pub fn new(gamma: f64, temperature: f64, dt: f64, seed: u64) -> Result<Self, SimulationError> {
        if dt <= 0.0 || !dt.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "Langevin time step must be positive and finite, got {dt}"
            )));
        }
        if gamma < 0.0 || temperature < 0.0 {
            return Err(SimulationError::InvalidConfig(format!(
                "Langevin needs gamma >= 0 and T >= 0, got gamma={gamma} T={temperature}"
            )));
        }

        let noise_scale = (2.0 * gamma * temperature / dt).sqrt();
        if !noise_scale.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "Langevin noise scale is not finite (gamma={gamma} T={temperature} dt={dt})"
            )));
        }
        let noise = Normal::new(0.0, noise_scale)?;

        Ok(Langevin {
            gamma,
            temperature,
            noise_scale,
            seed,
            noise,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn noise_scale(&self) -> f64 {
        self.noise_scale
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Dynamics for Langevin {
    fn derivative(&mut self, v: &State) -> State {
        let kick = self.noise.sample(&mut self.rng);
        State::new(-v.q() - self.gamma * v.p() + kick, v.p(), 0.0, 0.0, 0.0)
    }

    fn is_stochastic(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "langevin"
    }
}
