//! Small descriptive helpers shared by the detector and the incremental updater.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation over mean. 0.0 for empty input or a zero mean.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    if m.abs() < f64::EPSILON {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt() / m.abs()
}

/// Least-squares slope of `values` against their index (0, 1, 2, …).
/// 0.0 with fewer than two points.
pub fn linear_regression_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cv_of_constant_series_is_zero() {
        assert_eq!(coefficient_of_variation(&[3.0, 3.0, 3.0]), 0.0);
    }

    #[test]
    fn cv_matches_hand_computation() {
        // mean 2, population std 1
        let cv = coefficient_of_variation(&[1.0, 3.0]);
        assert!((cv - 0.5).abs() < 1e-12);
    }

    #[test]
    fn slope_of_linear_series() {
        assert!((linear_regression_slope(&[0.1, 0.2, 0.3, 0.4]) - 0.1).abs() < 1e-12);
        assert_eq!(linear_regression_slope(&[0.5]), 0.0);
    }
}
