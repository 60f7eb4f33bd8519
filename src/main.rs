//! ----------------------
//! Author: Sang Young Noh
//! ----------------------
//!
//! Runs every thermostat on the harmonic oscillator with the default
//! parameters and writes `<label>_ps.dat`, `<label>.dat` and
//! `<label>_report.json` into the working directory.

use sang_thermostats::driver::{self, RunOptions};
use sang_thermostats::simulation::SimulationConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimulationConfig::default();
    let options = RunOptions::default();

    match driver::run_all(&config, &options) {
        Ok(reports) => {
            log::info!("finished {} runs", reports.len());
        }
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}
