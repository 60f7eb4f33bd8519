/*

=========================================================
 Thermostatted harmonic oscillator
=========================================================

A single particle in a harmonic well, p' = -q, q' = p, is coupled to a
heat bath in several ways and integrated for a long time. The sampled
energy distribution of each run is compared against the canonical one,
P(E) ~ exp(-E/T).

Thermostats
-----------
- Nose-Hoover: one friction variable. Famously non-ergodic for a single
  oscillator.
- Kinetic moments: controls <p^2> and <p^4> with two variables.
- Nose-Hoover chain: the friction variable is itself thermostatted.
- Langevin: random kicks plus linear friction.

The deterministic schemes conserve an extended Hamiltonian, which is
recorded as a check on the integration.

Layout
------
- `state`        five slot state vector (p, q, zeta, eta, theta)
- `thermostats`  right-hand sides and conserved quantities
- `integrators`  explicit Euler and RK4
- `simulation`   sampling loop and configuration
- `stat_mech`    empirical CDF and summary statistics
- `ensembles`    the catalogue of runs
- `output`       .dat / json sinks
- `driver`       ties one run together

=========================================================

*/
pub mod constants;
pub mod driver;
pub mod ensembles;
pub mod error;
pub mod integrators;
pub mod output;
pub mod simulation;
pub mod stat_mech;
pub mod state;
pub mod thermostats;

pub use error::{OutputError, RunError, SimulationError};
pub use simulation::{run, Sample, Sampler, SimulationConfig, SimulationRunner};
pub use state::State;
