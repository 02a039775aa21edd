//! Reductions that collapse one group of values into a single score.
//!
//! All reductions implement the [`Reducer`] trait so the [`Ranker`](crate::Ranker)
//! can be parameterised by any of them.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Collapses the values of one group into one comparable score.
///
/// `V` is the per-row value type; `Output` is what the group is ranked by.
/// Groups handed to `reduce` are never empty.
pub trait Reducer<V> {
    type Output: PartialOrd + Copy;

    fn reduce(&self, values: &[V]) -> Self::Output;
}

/// Number of members in the group
#[derive(Debug, Clone, Copy, Default)]
pub struct Count;

impl<V> Reducer<V> for Count {
    type Output = usize;

    fn reduce(&self, values: &[V]) -> usize {
        values.len()
    }
}

/// Arithmetic mean
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean;

impl Reducer<f64> for Mean {
    type Output = f64;

    fn reduce(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Middle value of the sorted group.
///
/// Odd-length groups take the middle element. Even-length groups average the
/// element at `len / 2` with itself, so `[1, 2, 3, 4]` gives `3.0`, not `2.5`.
/// Existing reports depend on this value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Median;

impl Reducer<f64> for Median {
    type Output = f64;

    fn reduce(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 1 {
            sorted[mid]
        } else {
            (sorted[mid] + sorted[mid]) / 2.0
        }
    }
}

/// Sample variance (divides by `n - 1`).
///
/// A single-member group reduces to that member's value, not to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleVariance;

impl Reducer<f64> for SampleVariance {
    type Output = f64;

    fn reduce(&self, values: &[f64]) -> f64 {
        match values {
            [] => 0.0,
            [only] => *only,
            _ => {
                let mean = Mean.reduce(values);
                let squared: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
                squared / (values.len() - 1) as f64
            }
        }
    }
}

/// Largest member length in the group (values are lengths already)
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxLength;

impl Reducer<usize> for MaxLength {
    type Output = usize;

    fn reduce(&self, values: &[usize]) -> usize {
        values.iter().copied().max().unwrap_or(0)
    }
}

/// Caller-selectable central tendency for rating reports.
///
/// Parsed from the strings `"average"` and `"median"`; anything else is a
/// [`ConfigError::UnknownMetric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    Average,
    Median,
}

impl Reducer<f64> for Metric {
    type Output = f64;

    fn reduce(&self, values: &[f64]) -> f64 {
        match self {
            Metric::Average => Mean.reduce(values),
            Metric::Median => Median.reduce(values),
        }
    }
}

impl FromStr for Metric {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average" => Ok(Metric::Average),
            "median" => Ok(Metric::Median),
            _ => Err(ConfigError::UnknownMetric(s.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Average => write!(f, "average"),
            Metric::Median => write!(f, "median"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count() {
        let values: &[&str] = &["a", "b", "c"];
        assert_eq!(Count.reduce(values), 3);
    }

    #[test]
    fn test_mean() {
        assert_eq!(Mean.reduce(&[4.0, 2.0]), 3.0);
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(Median.reduce(&[5.0, 1.0, 3.0]), 3.0);
    }

    #[test]
    fn test_median_even_uses_upper_middle() {
        assert_eq!(Median.reduce(&[1.0, 2.0, 3.0, 4.0]), 3.0);
        assert_eq!(Median.reduce(&[4.0, 3.0, 2.0, 1.0]), 3.0);
    }

    #[test]
    fn test_sample_variance() {
        assert_eq!(SampleVariance.reduce(&[4.0, 2.0]), 2.0);
        // (1 + 0 + 1) / 2
        assert_eq!(SampleVariance.reduce(&[1.0, 2.0, 3.0]), 1.0);
    }

    #[test]
    fn test_sample_variance_single_value_is_the_value() {
        assert_eq!(SampleVariance.reduce(&[3.5]), 3.5);
    }

    #[test]
    fn test_max_length() {
        assert_eq!(MaxLength.reduce(&[3, 9, 4]), 9);
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("average".parse::<Metric>().unwrap(), Metric::Average);
        assert_eq!("Median".parse::<Metric>().unwrap(), Metric::Median);
        assert_eq!(
            "mode".parse::<Metric>(),
            Err(ConfigError::UnknownMetric("mode".to_string()))
        );
    }

    #[test]
    fn test_metric_dispatch() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(Metric::Average.reduce(&values), 2.5);
        assert_eq!(Metric::Median.reduce(&values), 3.0);
    }
}
