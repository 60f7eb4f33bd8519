/*
Sampling loop.

Starting from an initial state at t = 0, the runner repeats `total_steps`
times:

    t += dt
    state = integrator.step(state, model)
    if step % sample_interval == 0 -> record (t, state, H(state), p^2/2 + q^2/2)

The first step (index 0) is always sampled, so 10_000_000 steps with an
interval of 1000 give exactly 10_000 samples. Samples come out of a lazy
iterator; writing them anywhere is left to the caller.
 */
use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::constants::{DT, LOOP, SAMPLE_INTERVAL, SEED, TEMPERATURE};
use crate::error::SimulationError;
use crate::integrators::Integrator;
use crate::state::State;
use crate::thermostats::Dynamics;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub total_steps: u64,
    pub sample_interval: u64,
    pub dt: f64,
    pub temperature: f64,
    /// Seed of the stochastic thermostat's generator.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            total_steps: LOOP,
            sample_interval: SAMPLE_INTERVAL,
            dt: DT,
            temperature: TEMPERATURE,
            seed: SEED,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.sample_interval == 0 {
            return Err(SimulationError::InvalidConfig(
                "sample_interval must be at least 1".to_string(),
            ));
        }
        if self.dt <= 0.0 || !self.dt.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "dt must be positive and finite, got {}",
                self.dt
            )));
        }
        if self.temperature <= 0.0 || !self.temperature.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "temperature must be positive and finite, got {}",
                self.temperature
            )));
        }
        Ok(())
    }

    /// Number of samples a full run records.
    pub fn expected_samples(&self) -> u64 {
        expected_samples(self.total_steps, self.sample_interval)
    }
}

fn expected_samples(total_steps: u64, sample_interval: u64) -> u64 {
    if total_steps == 0 || sample_interval == 0 {
        0
    } else {
        (total_steps - 1) / sample_interval + 1
    }
}

/// One recorded point of a trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub step: u64,
    pub time: f64,
    pub state: State,
    /// Conserved quantity of the thermostat, when it tracks one.
    pub conserved: Option<f64>,
    /// p^2/2 + q^2/2, the quantity whose distribution is summarised.
    pub energy: f64,
}

impl Sample {
    /// Conserved quantity if available, otherwise the oscillator energy.
    pub fn diagnostic(&self) -> f64 {
        self.conserved.unwrap_or(self.energy)
    }
}

/// Lazy, finite, non-restartable stream of samples.
///
/// Yields `Err(NonFinite)` once and then stops if the integration diverges.
pub struct Sampler<'a, D: ?Sized, I> {
    model: &'a mut D,
    integrator: &'a I,
    state: State,
    time: f64,
    step: u64,
    total_steps: u64,
    sample_interval: u64,
    finished: bool,
}

impl<'a, D, I> Sampler<'a, D, I>
where
    D: Dynamics + ?Sized,
    I: Integrator,
{
    pub fn new(
        model: &'a mut D,
        integrator: &'a I,
        total_steps: u64,
        sample_interval: u64,
        initial_state: State,
    ) -> Result<Self, SimulationError> {
        if sample_interval == 0 {
            return Err(SimulationError::InvalidConfig(
                "sample_interval must be at least 1".to_string(),
            ));
        }
        if !initial_state.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "initial state is not finite: {initial_state}"
            )));
        }
        check_pairing(&*model, integrator)?;
        Ok(Sampler {
            model,
            integrator,
            state: initial_state,
            time: 0.0,
            step: 0,
            total_steps,
            sample_interval,
            finished: false,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn steps_done(&self) -> u64 {
        self.step
    }

    pub fn expected_samples(&self) -> u64 {
        expected_samples(self.total_steps, self.sample_interval)
    }
}

impl<D, I> Iterator for Sampler<'_, D, I>
where
    D: Dynamics + ?Sized,
    I: Integrator,
{
    type Item = Result<Sample, SimulationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while self.step < self.total_steps {
            let index = self.step;
            self.step += 1;
            self.time += self.integrator.dt();
            self.state = self.integrator.step(&self.state, &mut *self.model);

            if !self.state.is_finite() {
                self.finished = true;
                log::error!(
                    "{} diverged at step {index} (t = {:.6}): {}",
                    self.model.name(),
                    self.time,
                    self.state
                );
                return Some(Err(SimulationError::NonFinite {
                    step: index,
                    time: self.time,
                    state: self.state,
                }));
            }

            if index % self.sample_interval == 0 {
                return Some(Ok(Sample {
                    step: index,
                    time: self.time,
                    state: self.state,
                    conserved: self.model.conserved_quantity(&self.state),
                    energy: self.state.oscillator_energy(),
                }));
            }
        }

        self.finished = true;
        None
    }
}

impl<D, I> FusedIterator for Sampler<'_, D, I>
where
    D: Dynamics + ?Sized,
    I: Integrator,
{
}

/// Run to completion and keep every sample.
pub fn run<D, I>(
    model: &mut D,
    integrator: &I,
    total_steps: u64,
    sample_interval: u64,
    initial_state: State,
) -> Result<Vec<Sample>, SimulationError>
where
    D: Dynamics + ?Sized,
    I: Integrator,
{
    Sampler::new(model, integrator, total_steps, sample_interval, initial_state)?.collect()
}

/// Stochastic thermostats scale their noise for one derivative evaluation
/// per step, so they only pair with a first order integrator.
fn check_pairing<D, I>(model: &D, integrator: &I) -> Result<(), SimulationError>
where
    D: Dynamics + ?Sized,
    I: Integrator,
{
    if model.is_stochastic() && integrator.order() > 1 {
        return Err(SimulationError::InvalidConfig(format!(
            "{} is stochastic and needs a first order integrator, got {} (order {})",
            model.name(),
            integrator.name(),
            integrator.order()
        )));
    }
    Ok(())
}

/// A thermostat paired with an integrator and the run parameters.
pub struct SimulationRunner<D, I> {
    model: D,
    integrator: I,
    config: SimulationConfig,
}

impl<D, I> SimulationRunner<D, I>
where
    D: Dynamics,
    I: Integrator,
{
    pub fn new(model: D, integrator: I, config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        if integrator.dt() != config.dt {
            return Err(SimulationError::InvalidConfig(format!(
                "{} uses dt = {} but the configuration asks for dt = {}",
                integrator.name(),
                integrator.dt(),
                config.dt
            )));
        }
        check_pairing(&model, &integrator)?;
        Ok(SimulationRunner {
            model,
            integrator,
            config,
        })
    }

    pub fn model(&self) -> &D {
        &self.model
    }

    pub fn integrator(&self) -> &I {
        &self.integrator
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn samples(&mut self, initial_state: State) -> Result<Sampler<'_, D, I>, SimulationError> {
        Sampler::new(
            &mut self.model,
            &self.integrator,
            self.config.total_steps,
            self.config.sample_interval,
            initial_state,
        )
    }

    pub fn run(&mut self, initial_state: State) -> Result<Vec<Sample>, SimulationError> {
        self.samples(initial_state)?.collect()
    }

    /// Conserved quantity of the wrapped thermostat, through the integrator.
    pub fn energy(&self, state: &State) -> f64 {
        self.integrator.energy(state, &self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrators::{Euler, RungeKutta4};
    use crate::stat_mech::distribution::Moments;
    use crate::thermostats::{Convention, KineticMoments, Langevin, NoseHoover, NoseHooverChain};
    use approx::assert_relative_eq;

    /// Blows up on the first step.
    struct Exploding;

    impl Dynamics for Exploding {
        fn derivative(&mut self, _state: &State) -> State {
            State::new(f64::INFINITY, 0.0, 0.0, 0.0, 0.0)
        }

        fn name(&self) -> &str {
            "exploding"
        }
    }

    #[test]
    fn test_sample_count_and_spacing() {
        let mut nh = NoseHoover::default();
        let rk4 = RungeKutta4::new(0.001);
        let samples = run(&mut nh, &rk4, 10_000, 1000, State::initial()).unwrap();
        assert_eq!(samples.len(), 10);
        assert_eq!(samples[0].step, 0);
        assert_relative_eq!(samples[0].time, 0.001);
        for pair in samples.windows(2) {
            assert!(pair[1].time > pair[0].time);
            assert_relative_eq!(pair[1].time - pair[0].time, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_expected_samples() {
        let config = SimulationConfig::default();
        assert_eq!(config.expected_samples(), 10_000);
        assert_eq!(expected_samples(10_000, 1000), 10);
        assert_eq!(expected_samples(10_001, 1000), 11);
        assert_eq!(expected_samples(0, 1000), 0);
    }

    #[test]
    fn test_deterministic_models_repeat_exactly() {
        let rk4 = RungeKutta4::new(0.001);
        let a = run(&mut KineticMoments::default(), &rk4, 20_000, 100, State::initial()).unwrap();
        let b = run(&mut KineticMoments::default(), &rk4, 20_000, 100, State::initial()).unwrap();
        assert_eq!(a, b);

        let a = run(&mut NoseHooverChain::default(), &rk4, 20_000, 100, State::initial()).unwrap();
        let b = run(&mut NoseHooverChain::default(), &rk4, 20_000, 100, State::initial()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_langevin_reproducible_with_same_seed() {
        let euler = Euler::new(0.001);
        let mut a = Langevin::new(1.0, 1.0, 0.001, 42).unwrap();
        let mut b = Langevin::new(1.0, 1.0, 0.001, 42).unwrap();
        let ra = run(&mut a, &euler, 20_000, 100, State::initial()).unwrap();
        let rb = run(&mut b, &euler, 20_000, 100, State::initial()).unwrap();
        assert_eq!(ra, rb);

        let mut c = Langevin::new(1.0, 1.0, 0.001, 43).unwrap();
        let rc = run(&mut c, &euler, 20_000, 100, State::initial()).unwrap();
        assert_ne!(ra, rc);
    }

    #[test]
    fn test_conserved_quantity_stays_put_under_rk4() {
        let rk4 = RungeKutta4::new(0.001);
        let models: Vec<Box<dyn Dynamics>> = vec![
            Box::new(NoseHoover::default()),
            Box::new(KineticMoments::default()),
            Box::new(NoseHooverChain::default()),
            Box::new(NoseHoover::new(1.0, 1.0, Convention::Reduced)),
        ];
        for mut model in models {
            let samples = run(model.as_mut(), &rk4, 200_000, 100, State::initial()).unwrap();
            let h: Vec<f64> = samples.iter().map(|s| s.conserved.unwrap()).collect();
            let moments = Moments::of(&h).unwrap();
            assert!(
                moments.std_dev < 0.05 * moments.mean.abs(),
                "{}: {moments:?}",
                model.name()
            );
        }
    }

    #[test]
    fn test_divergence_is_reported() {
        let euler = Euler::new(0.001);
        let mut model = Exploding;
        let mut sampler = Sampler::new(&mut model, &euler, 100, 10, State::initial()).unwrap();
        match sampler.next() {
            Some(Err(SimulationError::NonFinite { step, .. })) => assert_eq!(step, 0),
            other => panic!("expected a non-finite error, got {other:?}"),
        }
        assert!(sampler.next().is_none());
        assert_eq!(sampler.steps_done(), 1);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let euler = Euler::new(0.001);
        let mut nh = NoseHoover::default();
        assert!(run(&mut nh, &euler, 10, 0, State::initial()).is_err());
        let config = SimulationConfig {
            sample_interval: 0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stochastic_model_needs_first_order_integrator() {
        let config = SimulationConfig {
            total_steps: 200_000,
            ..SimulationConfig::default()
        };
        let langevin = || Langevin::new(1.0, 1.0, config.dt, config.seed).unwrap();

        let rk4 = SimulationRunner::new(langevin(), RungeKutta4::new(config.dt), config.clone());
        assert!(matches!(rk4, Err(SimulationError::InvalidConfig(_))));

        let mut model = langevin();
        let rk4 = RungeKutta4::new(config.dt);
        assert!(run(&mut model, &rk4, 1000, 100, State::initial()).is_err());

        assert!(SimulationRunner::new(langevin(), Euler::new(config.dt), config.clone()).is_ok());
    }

    #[test]
    fn test_step_size_mismatch_rejected() {
        let config = SimulationConfig::default();
        let langevin = Langevin::new(1.0, 1.0, config.dt, config.seed).unwrap();
        let mismatched = SimulationRunner::new(langevin, Euler::new(0.01), config.clone());
        assert!(matches!(mismatched, Err(SimulationError::InvalidConfig(_))));

        let nh = SimulationRunner::new(NoseHoover::default(), RungeKutta4::new(0.01), config);
        assert!(matches!(nh, Err(SimulationError::InvalidConfig(_))));
    }

    #[test]
    fn test_runner_forwards_energy() {
        let config = SimulationConfig {
            total_steps: 1000,
            ..SimulationConfig::default()
        };
        let mut runner =
            SimulationRunner::new(NoseHoover::default(), RungeKutta4::new(config.dt), config)
                .unwrap();
        assert_relative_eq!(runner.energy(&State::initial()), 0.5);
        let samples = runner.run(State::initial()).unwrap();
        assert_eq!(samples.len(), 1);
        assert_relative_eq!(samples[0].diagnostic(), 0.5, epsilon = 1e-9);
    }
}
