//! Subscore building blocks — pure functions over value series.
//!
//! All return NaN on insufficient data; percentile ranking treats non-finite
//! entries as the neutral midpoint so one bad series cannot poison the
//! universe.

/// Return over the trailing `period` samples: `(last - base) / |base|`.
pub fn period_return(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() <= period {
        return f64::NAN;
    }
    let last = values[values.len() - 1];
    let base = values[values.len() - 1 - period];
    if !base.is_finite() || base.abs() < 1e-12 {
        return f64::NAN;
    }
    (last - base) / base.abs()
}

/// Relative distance of the last value from its trailing simple MA:
/// `(last - ma) / |ma|`.
pub fn distance_from_ma(values: &[f64], window: usize) -> f64 {
    if window == 0 || values.len() < window {
        return f64::NAN;
    }
    let tail = &values[values.len() - window..];
    if tail.iter().any(|v| !v.is_finite()) {
        return f64::NAN;
    }
    let ma = tail.iter().sum::<f64>() / window as f64;
    if ma.abs() < 1e-12 {
        return f64::NAN;
    }
    (values[values.len() - 1] - ma) / ma.abs()
}

/// Annualized realized volatility of percent changes over the trailing
/// `window` samples (sqrt-252 scaling).
pub fn annualized_volatility(values: &[f64], window: usize) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let start = values.len().saturating_sub(window + 1);
    let tail = &values[start..];
    let mut returns = Vec::with_capacity(tail.len() - 1);
    for w in tail.windows(2) {
        if w[0].is_finite() && w[1].is_finite() && w[0].abs() > 1e-12 {
            returns.push((w[1] - w[0]) / w[0].abs());
        }
    }
    if returns.len() < 2 {
        return f64::NAN;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let var = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / returns.len() as f64;
    var.sqrt() * 252.0_f64.sqrt()
}

/// Maximum drawdown over the trailing `window` samples, as a negative
/// fraction (-0.15 = 15% drawdown). 0.0 for flat or rising series.
pub fn max_drawdown(values: &[f64], window: usize) -> f64 {
    let start = values.len().saturating_sub(window + 1);
    let tail = &values[start..];
    if tail.len() < 2 {
        return 0.0;
    }
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &v in tail {
        if !v.is_finite() {
            continue;
        }
        if v > peak {
            peak = v;
        }
        if peak > 0.0 {
            let dd = (v - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Midrank percentile of each entry against the others, in [0, 1].
///
/// Ties share the midpoint of their rank range, so identical inputs always
/// get identical percentiles. Non-finite entries score 0.5 and are excluded
/// from everyone else's comparison base.
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    values
        .iter()
        .map(|&v| {
            if !v.is_finite() || finite.len() < 2 {
                return 0.5;
            }
            let less = finite.iter().filter(|&&x| x < v).count() as f64;
            let equal = finite.iter().filter(|&&x| x == v).count() as f64;
            (less + 0.5 * (equal - 1.0)) / (finite.len() as f64 - 1.0)
        })
        .collect()
}

/// Mean of the finite entries; 0.0 when none are finite.
pub fn finite_mean(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        0.0
    } else {
        finite.iter().sum::<f64>() / finite.len() as f64
    }
}

/// Median of the finite entries; 0.0 when none are finite.
pub fn finite_median(values: &[f64]) -> f64 {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return 0.0;
    }
    finite.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = finite.len() / 2;
    if finite.len() % 2 == 0 {
        (finite[mid - 1] + finite[mid]) / 2.0
    } else {
        finite[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-10, "{a} != {b}");
    }

    #[test]
    fn period_return_basic() {
        let values = [100.0, 105.0, 110.0];
        approx(period_return(&values, 2), 0.10);
    }

    #[test]
    fn period_return_insufficient_is_nan() {
        assert!(period_return(&[100.0, 110.0], 2).is_nan());
        assert!(period_return(&[], 1).is_nan());
    }

    #[test]
    fn distance_from_ma_basic() {
        // MA of [90, 100, 110] = 100, last = 110 -> +10%.
        approx(distance_from_ma(&[90.0, 100.0, 110.0], 3), 0.10);
    }

    #[test]
    fn volatility_zero_for_constant_series() {
        let values = [50.0; 30];
        approx(annualized_volatility(&values, 20), 0.0);
    }

    #[test]
    fn volatility_scales_with_swings() {
        let calm: Vec<f64> = (0..30).map(|i| 100.0 + ((i as f64) * 0.8).sin() * 0.5).collect();
        let wild: Vec<f64> = (0..30).map(|i| 100.0 + ((i as f64) * 0.8).sin() * 5.0).collect();
        assert!(annualized_volatility(&wild, 20) > annualized_volatility(&calm, 20));
    }

    #[test]
    fn drawdown_known_case() {
        // Peak 120, trough 90: -25%.
        let values = [100.0, 120.0, 90.0, 110.0];
        approx(max_drawdown(&values, 10), -0.25);
    }

    #[test]
    fn drawdown_monotonic_rise_is_zero() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        approx(max_drawdown(&values, 10), 0.0);
    }

    #[test]
    fn percentile_ranks_ordered() {
        let pr = percentile_ranks(&[10.0, 20.0, 30.0]);
        approx(pr[0], 0.0);
        approx(pr[1], 0.5);
        approx(pr[2], 1.0);
    }

    #[test]
    fn percentile_ranks_ties_share_midrank() {
        let pr = percentile_ranks(&[10.0, 20.0, 20.0, 30.0]);
        approx(pr[1], pr[2]);
        approx(pr[1], 0.5);
    }

    #[test]
    fn percentile_ranks_nan_is_neutral() {
        let pr = percentile_ranks(&[10.0, f64::NAN, 30.0]);
        approx(pr[1], 0.5);
        approx(pr[0], 0.0);
        approx(pr[2], 1.0);
    }

    #[test]
    fn percentile_single_entry_is_neutral() {
        approx(percentile_ranks(&[42.0])[0], 0.5);
    }

    #[test]
    fn median_even_and_odd() {
        approx(finite_median(&[3.0, 1.0, 2.0]), 2.0);
        approx(finite_median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
        approx(finite_median(&[f64::NAN, 5.0]), 5.0);
    }
}
