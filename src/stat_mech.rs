pub mod distribution;

pub use distribution::{
    canonical_energy_cdf, empirical_cdf, ks_distance, summarize, Aggregator, CdfPoint, Moments,
};
