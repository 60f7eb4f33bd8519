/*
Sinks for the results of a run.

    <label>_ps.dat       time p q diagnostic      (one line per sample)
    <label>.dat          energy rank              (empirical CDF)
    <label>_report.json  run metadata and summary statistics

The `.dat` files are space separated without a header so they can be
plotted directly.
 */
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::ensembles::Scheme;
use crate::error::OutputError;
use crate::simulation::{Sample, SimulationConfig};
use crate::stat_mech::{CdfPoint, Moments};
use crate::state::State;
use crate::thermostats::Convention;

pub fn trajectory_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!("{label}_ps.dat"))
}

pub fn distribution_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!("{label}.dat"))
}

pub fn report_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!("{label}_report.json"))
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> OutputError + '_ {
    move |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn staged_writer(dir: &Path) -> Result<BufWriter<NamedTempFile>, OutputError> {
    let file = NamedTempFile::new_in(dir).map_err(io_error(dir))?;
    Ok(BufWriter::new(file))
}

fn finish_staged(writer: BufWriter<NamedTempFile>) -> Result<NamedTempFile, OutputError> {
    let path = writer.get_ref().path().to_path_buf();
    writer.into_inner().map_err(|e| OutputError::Io {
        path,
        source: e.into_error(),
    })
}

/// Writes into a temporary file inside `dir`; nothing shows up under a
/// final name until `commit`.
pub fn stage<F>(dir: &Path, write: F) -> Result<NamedTempFile, OutputError>
where
    F: FnOnce(&mut BufWriter<NamedTempFile>) -> Result<(), OutputError>,
{
    let mut writer = staged_writer(dir)?;
    write(&mut writer)?;
    finish_staged(writer)
}

/// Moves staged files to their final names. If one move fails the ones
/// already moved are removed again, so a run leaves all of its files or
/// none of them.
pub fn commit(staged: Vec<(NamedTempFile, PathBuf)>) -> Result<(), OutputError> {
    let mut moved: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for (file, target) in staged {
        if let Err(e) = file.persist(&target) {
            for path in &moved {
                let _ = std::fs::remove_file(path);
            }
            return Err(OutputError::Io {
                path: target,
                source: e.error,
            });
        }
        log::debug!("wrote {}", target.display());
        moved.push(target);
    }
    Ok(())
}

fn dat_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .from_writer(writer)
}

/// Receives samples as they are produced.
pub trait SampleSink {
    fn record(&mut self, sample: &Sample) -> Result<(), OutputError>;

    fn flush(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

impl SampleSink for Vec<Sample> {
    fn record(&mut self, sample: &Sample) -> Result<(), OutputError> {
        self.push(*sample);
        Ok(())
    }
}

/// Writes `time p q diagnostic` lines.
pub struct TrajectoryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl TrajectoryWriter<BufWriter<NamedTempFile>> {
    /// Streams into a temporary file in `dir`, see `stage`.
    pub fn staged(dir: &Path) -> Result<Self, OutputError> {
        Ok(TrajectoryWriter::from_writer(staged_writer(dir)?))
    }

    pub fn finish(self) -> Result<NamedTempFile, OutputError> {
        finish_staged(self.into_inner()?)
    }
}

impl<W: Write> TrajectoryWriter<W> {
    pub fn from_writer(writer: W) -> Self {
        TrajectoryWriter {
            writer: dat_writer(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, OutputError> {
        self.writer
            .into_inner()
            .map_err(|e| OutputError::Csv(csv::Error::from(e.into_error())))
    }
}

impl<W: Write> SampleSink for TrajectoryWriter<W> {
    fn record(&mut self, sample: &Sample) -> Result<(), OutputError> {
        let s = &sample.state;
        self.writer
            .serialize((sample.time, s.p(), s.q(), sample.diagnostic()))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush().map_err(|e| OutputError::Csv(e.into()))
    }
}

pub fn write_distribution_to<W: Write>(writer: W, cdf: &[CdfPoint]) -> Result<W, OutputError> {
    let mut wtr = dat_writer(writer);
    for point in cdf {
        wtr.serialize((point.value, point.rank))?;
    }
    wtr.into_inner()
        .map_err(|e| OutputError::Csv(csv::Error::from(e.into_error())))
}

/// Announces each run.
pub trait ProgressSink {
    fn start(&mut self, label: &str);
}

/// Logs the label at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn start(&mut self, label: &str) {
        log::info!("{label}");
    }
}

impl ProgressSink for Vec<String> {
    fn start(&mut self, label: &str) {
        self.push(label.to_string());
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub label: String,
    pub scheme: Scheme,
    pub integrator: String,
    pub convention: Convention,
    pub config: SimulationConfig,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub samples: usize,
    pub final_state: State,
    /// Moments of p^2/2 + q^2/2 over the samples.
    pub energy: Option<Moments>,
    /// Moments of the conserved quantity, for schemes that track one.
    pub conserved: Option<Moments>,
    /// Distance of the energy CDF from the canonical one.
    pub ks_distance: Option<f64>,
}

pub fn write_report_to<W: Write>(writer: W, report: &RunReport) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}
