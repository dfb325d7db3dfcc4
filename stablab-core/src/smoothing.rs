//! Smoothing and sparkline quantization for time-series display.
//!
//! Sequences longer than 90 points are down-sampled to the most recent 60
//! before smoothing. Smoothing is a 3-point weighted moving average
//! (0.25/0.5/0.25) on interior points; the first and last point are
//! preserved exactly. Categorical states smooth through their ordinal
//! mapping and re-quantize at fixed midpoints.

use crate::regime::SignalLight;

/// Sequences longer than this are down-sampled.
pub const DOWNSAMPLE_TRIGGER: usize = 90;
/// Number of most-recent points kept after down-sampling.
pub const DOWNSAMPLE_KEEP: usize = 60;

const KERNEL: [f64; 3] = [0.25, 0.5, 0.25];

/// Keep the most recent `DOWNSAMPLE_KEEP` points of sequences longer than
/// `DOWNSAMPLE_TRIGGER`; shorter sequences pass through unchanged.
pub fn downsample<T: Clone>(points: &[T]) -> Vec<T> {
    if points.len() > DOWNSAMPLE_TRIGGER {
        points[points.len() - DOWNSAMPLE_KEEP..].to_vec()
    } else {
        points.to_vec()
    }
}

/// 3-point weighted moving average with endpoint preservation.
///
/// For sequences of length < 3 this is the identity. Idempotence over the
/// same window is not claimed for the numeric path (repeated smoothing keeps
/// flattening); restartability is: the output depends only on the input.
pub fn smooth(values: &[f64]) -> Vec<f64> {
    if values.len() < 3 {
        return values.to_vec();
    }
    let mut out = Vec::with_capacity(values.len());
    out.push(values[0]);
    for i in 1..values.len() - 1 {
        out.push(KERNEL[0] * values[i - 1] + KERNEL[1] * values[i] + KERNEL[2] * values[i + 1]);
    }
    out.push(values[values.len() - 1]);
    out
}

/// Down-sample then smooth: the numeric sparkline pipeline.
pub fn sparkline(values: &[f64]) -> Vec<f64> {
    smooth(&downsample(values))
}

/// Smooth a categorical state sequence through its ordinal mapping, then
/// re-quantize at the fixed midpoints.
pub fn smooth_states(states: &[SignalLight]) -> Vec<SignalLight> {
    let ordinals: Vec<f64> = states.iter().map(|s| s.ordinal()).collect();
    smooth(&ordinals).iter().map(|&v| SignalLight::from_ordinal(v)).collect()
}

/// Down-sample then smooth a categorical sequence.
pub fn sparkline_states(states: &[SignalLight]) -> Vec<SignalLight> {
    smooth_states(&downsample(states))
}

#[cfg(test)]
mod tests {
    use super::*;
    use SignalLight::{Green, Red, Yellow};

    #[test]
    fn short_sequences_pass_through_downsample() {
        let v: Vec<f64> = (0..90).map(|i| i as f64).collect();
        assert_eq!(downsample(&v).len(), 90);
    }

    #[test]
    fn long_sequences_keep_most_recent_60() {
        let v: Vec<f64> = (0..91).map(|i| i as f64).collect();
        let d = downsample(&v);
        assert_eq!(d.len(), 60);
        assert_eq!(d[0], 31.0);
        assert_eq!(d[59], 90.0);
    }

    #[test]
    fn endpoints_preserved() {
        let v = [10.0, 50.0, 90.0, 20.0, 70.0];
        let s = smooth(&v);
        assert_eq!(s[0], 10.0);
        assert_eq!(s[4], 70.0);
    }

    #[test]
    fn interior_uses_kernel() {
        let v = [0.0, 4.0, 8.0];
        let s = smooth(&v);
        // 0.25*0 + 0.5*4 + 0.25*8 = 4.0
        assert_eq!(s[1], 4.0);

        let v = [0.0, 0.0, 8.0];
        let s = smooth(&v);
        assert_eq!(s[1], 2.0);
    }

    #[test]
    fn tiny_sequences_are_identity() {
        assert_eq!(smooth(&[]), Vec::<f64>::new());
        assert_eq!(smooth(&[5.0]), vec![5.0]);
        assert_eq!(smooth(&[5.0, 7.0]), vec![5.0, 7.0]);
    }

    #[test]
    fn restartable_same_window_same_output() {
        let v: Vec<f64> = (0..40).map(|i| ((i as f64) * 0.3).sin() * 50.0 + 50.0).collect();
        assert_eq!(sparkline(&v), sparkline(&v));
    }

    /// [RED,RED,YELLOW,GREEN,GREEN] keeps its endpoints; the
    /// interior shifts per the 0.25/0.5/0.25 kernel before re-quantization.
    #[test]
    fn state_sequence_endpoints_unchanged() {
        let states = [Red, Red, Yellow, Green, Green];
        let s = smooth_states(&states);
        assert_eq!(s[0], Red);
        assert_eq!(s[4], Green);
        // Interior ordinals: 0.25, 1.0, 1.75 -> Red, Yellow, Green.
        assert_eq!(s[1], Red);
        assert_eq!(s[2], Yellow);
        assert_eq!(s[3], Green);
    }

    #[test]
    fn state_smoothing_pulls_isolated_spike_toward_neighbors() {
        // A lone Green between Reds smooths to ordinal 1.0 -> Yellow.
        let states = [Red, Green, Red];
        let s = smooth_states(&states);
        assert_eq!(s, vec![Red, Yellow, Red]);
    }

    #[test]
    fn state_downsample_keeps_tail() {
        let mut states = vec![Red; 80];
        states.extend(vec![Green; 20]);
        let s = sparkline_states(&states);
        assert_eq!(s.len(), 60);
        assert_eq!(*s.last().unwrap(), Green);
    }
}
