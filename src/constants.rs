pub const LOOP: u64 = 10_000_000; // Number of integration steps per run
pub const SAMPLE_INTERVAL: u64 = 1000; // Steps between recorded samples
pub const DT: f64 = 0.001; // Time step
pub const TEMPERATURE: f64 = 1.0; // Target temperature (k_B = 1)
pub const SEED: u64 = 1; // Seed for the Langevin noise generator

pub const THERMOSTAT_MASS: f64 = 1.0; // Default Q, Qzeta and Qeta
pub const FRICTION: f64 = 1.0; // Default Langevin gamma
