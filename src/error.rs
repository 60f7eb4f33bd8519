use std::path::PathBuf;

use thiserror::Error;

use crate::state::State;

/// Failures of the numerical core.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// The integration diverged; the offending state is kept for the report.
    #[error("non-finite state at step {step} (t = {time}): {state}")]
    NonFinite { step: u64, time: f64, state: State },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid Langevin noise distribution: {0}")]
    InvalidNoise(#[from] rand_distr::NormalError),
}

/// Failures while persisting samples or reports.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("progress bar error: {0}")]
    Progress(std::io::Error),
}

/// Top level failure of one labelled run.
///
/// Core failures and environment failures stay apart so a caller can tell
/// a diverging thermostat from a full disk.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("run '{label}' failed: {source}")]
    Simulation {
        label: String,
        source: SimulationError,
    },

    #[error("run '{label}' could not write its output: {source}")]
    Output { label: String, source: OutputError },
}

impl RunError {
    pub fn simulation(label: impl Into<String>, source: SimulationError) -> Self {
        RunError::Simulation {
            label: label.into(),
            source,
        }
    }

    pub fn output(label: impl Into<String>, source: OutputError) -> Self {
        RunError::Output {
            label: label.into(),
            source,
        }
    }
}
