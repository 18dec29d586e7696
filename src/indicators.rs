//! Technical indicators
//!
//! Rolling statistics backing the Bollinger band math.

use statrs::statistics::Statistics;

use crate::types::BandStats;

/// Arithmetic mean, `0.0` for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

/// Sample standard deviation (n - 1 denominator), `0.0` for fewer than two values
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    values.iter().std_dev()
}

/// Bollinger bands over the whole window: mean +/- `num_std` sample deviations
pub fn bollinger_bands(window: &[f64], num_std: f64) -> BandStats {
    let mean = mean(window);
    let stddev = sample_std_dev(window);

    BandStats {
        mean,
        stddev,
        upper: mean + num_std * stddev,
        lower: mean - num_std * stddev,
    }
}
