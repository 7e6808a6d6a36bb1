//! Wilson score interval for a binomial proportion.

use pulse_core::errors::{PulseResult, StatsError};
use pulse_core::models::WilsonInterval;
use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided critical value for a confidence level in (0, 1).
pub fn z_for_level(level: f64) -> PulseResult<f64> {
    if !(level > 0.0 && level < 1.0) {
        return Err(StatsError::InvalidConfidenceLevel { level }.into());
    }
    Ok(Normal::standard().inverse_cdf(1.0 - (1.0 - level) / 2.0))
}

/// Wilson interval at `level`. With no attempts the interval is the whole
/// unit range centered on 0.5.
pub fn wilson_interval(success_count: u64, total: u64, level: f64) -> PulseResult<WilsonInterval> {
    if success_count > total {
        return Err(StatsError::SuccessExceedsTotal {
            success_count,
            total_attempts: total,
        }
        .into());
    }
    let z = z_for_level(level)?;
    if total == 0 {
        return Ok(WilsonInterval {
            lower: 0.0,
            upper: 1.0,
            center: 0.5,
        });
    }
    Ok(wilson_with_z(success_count as f64 / total as f64, total as f64, z))
}

/// Interval for an observed proportion `p` over `n` trials. `n` may be
/// fractional when the caller applies a continuity adjustment.
pub(crate) fn wilson_with_z(p: f64, n: f64, z: f64) -> WilsonInterval {
    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let margin = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denom;
    WilsonInterval {
        lower: (center - margin).max(0.0),
        upper: (center + margin).min(1.0),
        center,
    }
}
