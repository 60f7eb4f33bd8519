/*
Runs one labelled scheme end to end: build the thermostat and its
integrator, stream the samples into the trajectory file, then sort the
energies into the empirical CDF and write the distribution and report.

Runs are independent. `run_all` does them one after the other; nothing
is shared between them, so an outer driver may also farm them out.
 */
use std::path::PathBuf;

use chrono::Utc;
use kdam::{tqdm, BarExt};

use crate::ensembles::{Scheme, ThermostatParameters};
use crate::error::{OutputError, RunError};
use crate::integrators::Integrator;
use crate::output::{
    commit, distribution_path, report_path, stage, trajectory_path, write_distribution_to,
    write_report_to, LogProgress, ProgressSink, RunReport, SampleSink, TrajectoryWriter,
};
use crate::simulation::{SimulationConfig, SimulationRunner};
use crate::stat_mech::{ks_distance, Aggregator, Moments};
use crate::state::State;

#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Directory receiving the `.dat` and report files.
    pub out_dir: PathBuf,
    pub params: ThermostatParameters,
    /// Draw a terminal progress bar while integrating.
    pub progress_bar: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            out_dir: PathBuf::from("."),
            params: ThermostatParameters::default(),
            progress_bar: true,
        }
    }
}

pub fn run_scheme(
    scheme: Scheme,
    config: &SimulationConfig,
    options: &RunOptions,
    progress: &mut dyn ProgressSink,
) -> Result<RunReport, RunError> {
    let label = scheme.label();
    let sim_err = |e| RunError::simulation(label, e);
    let out_err = |e| RunError::output(label, e);

    progress.start(label);
    let started_at = Utc::now();

    let model = scheme.build(config, &options.params).map_err(sim_err)?;
    let integrator = scheme.default_integrator(config.dt);
    let integrator_name = integrator.name().to_string();
    let mut runner = SimulationRunner::new(model, integrator, config.clone()).map_err(sim_err)?;

    // everything is written to temporary files first; a run that fails
    // part way leaves nothing under the final names
    let dir = options.out_dir.as_path();
    let mut trajectory = TrajectoryWriter::staged(dir).map_err(out_err)?;
    let expected = config.expected_samples() as usize;
    let mut aggregator = Aggregator::with_capacity(expected);
    let mut conserved: Vec<f64> = Vec::new();

    let mut pb = tqdm!(
        total = expected,
        desc = label,
        disable = !options.progress_bar
    );

    let mut sampler = runner.samples(State::initial()).map_err(sim_err)?;
    for sample in &mut sampler {
        let sample = sample.map_err(sim_err)?;
        trajectory.record(&sample).map_err(out_err)?;
        aggregator.add_sample(sample.energy);
        if let Some(h) = sample.conserved {
            conserved.push(h);
        }
        pb.update(1)
            .map_err(|e| out_err(OutputError::Progress(e)))?;
    }
    let final_state = *sampler.state();
    let trajectory = trajectory.finish().map_err(out_err)?;

    let samples = aggregator.len();
    let energy = aggregator.moments();
    let cdf = aggregator.summarize();
    let distribution = stage(dir, |w| {
        write_distribution_to(w, &cdf)?;
        Ok(())
    })
    .map_err(out_err)?;

    let report = RunReport {
        label: label.to_string(),
        scheme,
        integrator: integrator_name,
        convention: options.params.convention,
        config: config.clone(),
        started_at,
        finished_at: Utc::now(),
        samples,
        final_state,
        energy,
        conserved: Moments::of(&conserved),
        ks_distance: ks_distance(&cdf, config.temperature),
    };
    let report_file = stage(dir, |w| write_report_to(w, &report)).map_err(out_err)?;

    commit(vec![
        (trajectory, trajectory_path(dir, label)),
        (distribution, distribution_path(dir, label)),
        (report_file, report_path(dir, label)),
    ])
    .map_err(out_err)?;

    if let Some(h) = &report.conserved {
        log::info!(
            "{label}: {samples} samples, conserved quantity {:.8} +/- {:.3e}",
            h.mean,
            h.std_dev
        );
    }
    if let Some(d) = report.ks_distance {
        log::info!("{label}: KS distance from the canonical energy distribution {d:.4}");
    }

    Ok(report)
}

/// Every scheme in `Scheme::ALL` order.
pub fn run_all(config: &SimulationConfig, options: &RunOptions) -> Result<Vec<RunReport>, RunError> {
    let mut progress = LogProgress;
    Scheme::ALL
        .iter()
        .map(|&scheme| run_scheme(scheme, config, options, &mut progress))
        .collect()
}
