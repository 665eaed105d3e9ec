use serde::Serialize;

pub const DEFAULT_PERCENTILES: [f64; 4] = [50.0, 90.0, 95.0, 99.0];

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct BasicStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub std_dev: f64,
    pub variance: f64,
}

/// Sample statistics over a duration list. All fields are 0 for empty
/// input; std-dev and variance are 0 below two samples.
pub fn basic_stats(values: &[f64]) -> BasicStats {
    if values.is_empty() {
        return BasicStats::default();
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let median = if count % 2 == 1 {
        sorted[count / 2]
    } else {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    };

    let variance = if count < 2 {
        0.0
    } else {
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count as f64 - 1.0)
    };

    let min = sorted[0];
    let max = sorted[count - 1];
    BasicStats {
        count,
        mean,
        median,
        min,
        max,
        range: max - min,
        std_dev: variance.sqrt(),
        variance,
    }
}

/// Percentiles by linear interpolation between order statistics at
/// fractional rank `(p/100)·(n−1)`. Empty input yields 0 for every
/// requested percentile.
pub fn percentiles(values: &[f64], ps: &[f64]) -> Vec<(f64, f64)> {
    if values.is_empty() {
        return ps.iter().map(|&p| (p, 0.0)).collect();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    ps.iter()
        .map(|&p| (p, percentile_of_sorted(&sorted, p)))
        .collect()
}

fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = rank - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

/// Std-dev as a percentage of the mean. 0 for an empty list or a zero mean
/// (guards the division, not a claim of zero variability).
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let stats = basic_stats(values);
    if stats.mean == 0.0 {
        return 0.0;
    }
    (stats.std_dev / stats.mean) * 100.0
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Stability {
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

pub fn stability_rating(cv: f64) -> Stability {
    if cv < 10.0 {
        Stability::Excellent
    } else if cv < 20.0 {
        Stability::Good
    } else if cv < 30.0 {
        Stability::Fair
    } else {
        Stability::Poor
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Outliers {
    pub count: usize,
    pub values: Vec<f64>,
    pub percentage: f64,
}

/// 1.5×IQR fence from the quartile boundaries. Below four samples the
/// quartiles degrade to min/max.
pub fn outliers(values: &[f64]) -> Outliers {
    if values.is_empty() {
        return Outliers::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let (q1, q3) = if sorted.len() < 4 {
        (sorted[0], sorted[sorted.len() - 1])
    } else {
        (
            percentile_of_sorted(&sorted, 25.0),
            percentile_of_sorted(&sorted, 75.0),
        )
    };

    let iqr = q3 - q1;
    let lower = q1 - 1.5 * iqr;
    let upper = q3 + 1.5 * iqr;

    let out: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| *v < lower || *v > upper)
        .collect();

    Outliers {
        count: out.len(),
        percentage: (out.len() as f64 / values.len() as f64) * 100.0,
        values: out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_all_zero() {
        let stats = basic_stats(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.median, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.variance, 0.0);
    }

    #[test]
    fn computes_basic_stats() {
        let stats = basic_stats(&[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 25.0);
        assert_eq!(stats.median, 25.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 40.0);
        assert_eq!(stats.range, 30.0);
        assert!((stats.variance - 500.0 / 3.0).abs() < 1e-9);
        assert!((stats.std_dev - (500.0f64 / 3.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn single_sample_has_zero_spread() {
        let stats = basic_stats(&[42.0]);
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.variance, 0.0);
    }

    #[test]
    fn odd_count_median_is_middle_value() {
        assert_eq!(basic_stats(&[30.0, 10.0, 20.0]).median, 20.0);
    }

    #[test]
    fn median_percentile_interpolates() {
        let out = percentiles(&[10.0, 20.0, 30.0, 40.0], &[50.0]);
        assert_eq!(out, vec![(50.0, 25.0)]);
    }

    #[test]
    fn percentile_hits_exact_order_statistics() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        let out = percentiles(&values, &[0.0, 25.0, 100.0]);
        assert_eq!(out[0].1, 10.0);
        assert_eq!(out[1].1, 20.0);
        assert_eq!(out[2].1, 50.0);
    }

    #[test]
    fn percentiles_of_empty_are_zero() {
        let out = percentiles(&[], &DEFAULT_PERCENTILES);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn cv_guards_empty_and_zero_mean() {
        assert_eq!(coefficient_of_variation(&[]), 0.0);
        assert_eq!(coefficient_of_variation(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn cv_is_percent_of_mean() {
        let values = [10.0, 20.0, 30.0, 40.0];
        let expected = (500.0f64 / 3.0).sqrt() / 25.0 * 100.0;
        assert!((coefficient_of_variation(&values) - expected).abs() < 1e-9);
    }

    #[test]
    fn stability_thresholds() {
        assert_eq!(stability_rating(9.9), Stability::Excellent);
        assert_eq!(stability_rating(10.0), Stability::Good);
        assert_eq!(stability_rating(19.9), Stability::Good);
        assert_eq!(stability_rating(20.0), Stability::Fair);
        assert_eq!(stability_rating(30.0), Stability::Poor);
    }

    #[test]
    fn flags_iqr_outliers() {
        let out = outliers(&[10.0, 11.0, 12.0, 13.0, 100.0]);
        assert_eq!(out.count, 1);
        assert_eq!(out.values, vec![100.0]);
        assert_eq!(out.percentage, 20.0);
    }

    #[test]
    fn few_samples_use_min_max_quartiles() {
        let out = outliers(&[1.0, 2.0, 3.0]);
        assert_eq!(out.count, 0);
        assert!(out.values.is_empty());
    }

    #[test]
    fn empty_outliers_are_zero() {
        let out = outliers(&[]);
        assert_eq!(out.count, 0);
        assert_eq!(out.percentage, 0.0);
    }
}
