/*
Energy distribution of a run.

The sampled oscillator energies are sorted and the i-th smallest value
(0-indexed) is paired with i/N. For a one dimensional oscillator in the
canonical ensemble E = p^2/2 + q^2/2 is exponentially distributed,

    P(E <= e) = 1 - exp(-e / T),

so a thermostat that samples correctly gives an empirical CDF that
approaches that curve.
 */
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::simulation::Sample;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CdfPoint {
    pub value: f64,
    pub rank: f64,
}

/// Collects diagnostic values over a run and turns them into an empirical CDF.
#[derive(Clone, Debug, Default)]
pub struct Aggregator {
    values: Vec<f64>,
}

impl Aggregator {
    pub fn new() -> Self {
        Aggregator { values: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Aggregator {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn add_sample(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn add_samples<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = f64>,
    {
        self.values.extend(values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn moments(&self) -> Option<Moments> {
        Moments::of(&self.values)
    }

    pub fn summarize(self) -> Vec<CdfPoint> {
        empirical_cdf(&self.values)
    }
}

/// Empirical CDF of the oscillator energy of `samples`.
pub fn summarize(samples: &[Sample]) -> Vec<CdfPoint> {
    let mut aggregator = Aggregator::with_capacity(samples.len());
    aggregator.add_samples(samples.iter().map(|s| s.energy));
    aggregator.summarize()
}

pub fn empirical_cdf(values: &[f64]) -> Vec<CdfPoint> {
    let n = values.len() as f64;
    values
        .iter()
        .copied()
        .sorted_by(|a, b| a.total_cmp(b))
        .enumerate()
        .map(|(i, value)| CdfPoint {
            value,
            rank: i as f64 / n,
        })
        .collect()
}

/// Canonical CDF of the energy of a 1D harmonic oscillator at temperature `t`.
pub fn canonical_energy_cdf(energy: f64, t: f64) -> f64 {
    if energy <= 0.0 {
        0.0
    } else {
        1.0 - (-energy / t).exp()
    }
}

/// Kolmogorov-Smirnov distance between an empirical CDF and the canonical one.
pub fn ks_distance(cdf: &[CdfPoint], t: f64) -> Option<f64> {
    if cdf.is_empty() {
        return None;
    }
    let step = 1.0 / cdf.len() as f64;
    cdf.iter()
        .map(|point| {
            let reference = canonical_energy_cdf(point.value, t);
            (point.rank - reference)
                .abs()
                .max((point.rank + step - reference).abs())
        })
        .reduce(f64::max)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Moments {
    pub fn of(values: &[f64]) -> Option<Moments> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        Some(Moments {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }

    /// Standard deviation relative to |mean|; a drift measure for
    /// quantities that should be conserved.
    pub fn relative_spread(&self) -> f64 {
        self.std_dev / self.mean.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::State;
    use approx::assert_relative_eq;

    fn sample_with_energy(energy: f64) -> Sample {
        Sample {
            step: 0,
            time: 0.0,
            state: State::initial(),
            conserved: None,
            energy,
        }
    }

    #[test]
    fn test_empirical_cdf_ordering() {
        let cdf = empirical_cdf(&[3.0, 1.0, 2.0]);
        let expected = [(1.0, 0.0), (2.0, 1.0 / 3.0), (3.0, 2.0 / 3.0)];
        assert_eq!(cdf.len(), 3);
        for (point, (value, rank)) in cdf.iter().zip(expected) {
            assert_eq!(point.value, value);
            assert_relative_eq!(point.rank, rank);
        }
    }

    #[test]
    fn test_summarize_uses_oscillator_energy() {
        let samples: Vec<Sample> = [3.0, 1.0, 2.0].into_iter().map(sample_with_energy).collect();
        let cdf = summarize(&samples);
        assert_eq!(cdf, empirical_cdf(&[1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_empty_input() {
        assert!(empirical_cdf(&[]).is_empty());
        assert!(ks_distance(&[], 1.0).is_none());
        assert!(Moments::of(&[]).is_none());
        assert!(Aggregator::new().summarize().is_empty());
    }

    #[test]
    fn test_canonical_cdf() {
        assert_eq!(canonical_energy_cdf(0.0, 1.0), 0.0);
        assert_relative_eq!(canonical_energy_cdf(1.0, 1.0), 1.0 - (-1.0_f64).exp());
        assert_relative_eq!(canonical_energy_cdf(2.0, 2.0), 1.0 - (-1.0_f64).exp());
    }

    #[test]
    fn test_ks_distance_of_exact_quantiles_is_small() {
        // energies at the midpoints of the canonical quantiles
        let n = 1000;
        let values: Vec<f64> = (0..n)
            .map(|i| -(1.0 - (i as f64 + 0.5) / n as f64).ln())
            .collect();
        let d = ks_distance(&empirical_cdf(&values), 1.0).unwrap();
        assert!(d <= 1.0 / n as f64 + 1e-12, "{d}");
    }

    #[test]
    fn test_moments() {
        let m = Moments::of(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_relative_eq!(m.mean, 2.5);
        assert_relative_eq!(m.std_dev, 1.25_f64.sqrt());
        assert_eq!(m.min, 1.0);
        assert_eq!(m.max, 4.0);
        assert_relative_eq!(m.relative_spread(), 1.25_f64.sqrt() / 2.5);
    }
}
