// Clip length normalization
// Every recording is forced to a fixed sample count before feature extraction

/// Force a recording to exactly `target_len` samples.
///
/// Longer clips keep the contiguous window whose discarded edge has the
/// lower raw signed sum: the first `remain` samples are compared against the
/// last `remain` samples (`remain` = excess length) and the window adjacent
/// to the higher-sum edge survives. Note this compares signed sums, not
/// energy, so a positive-biased edge wins over a louder negative-biased one.
/// Shorter clips are left-padded with zeros.
pub fn fix_length(samples: &[f32], target_len: usize) -> Vec<f32> {
    let len = samples.len();

    if len > target_len {
        let remain = len - target_len;
        let head_sum: f32 = samples[..remain].iter().sum();
        let tail_sum: f32 = samples[len - remain..].iter().sum();

        if head_sum > tail_sum {
            samples[..target_len].to_vec()
        } else {
            samples[len - target_len..].to_vec()
        }
    } else if len < target_len {
        let mut padded = vec![0.0; target_len - len];
        padded.extend_from_slice(samples);
        padded
    } else {
        samples.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_length_passthrough() {
        let samples = vec![0.5, -0.5, 0.25, -0.25];
        let fixed = fix_length(&samples, 4);
        assert_eq!(fixed, samples);
    }

    #[test]
    fn test_short_clip_left_padded() {
        let samples = vec![0.1, 0.2, 0.3];
        let fixed = fix_length(&samples, 6);

        assert_eq!(fixed.len(), 6);
        assert_eq!(&fixed[..3], &[0.0, 0.0, 0.0]);
        // Original signal preserved at the tail
        assert_eq!(&fixed[3..], &samples[..]);
    }

    #[test]
    fn test_long_clip_keeps_higher_sum_side() {
        // Head sum (1.0) > tail sum (0.0): keep the leading window
        let samples = vec![1.0, 0.2, 0.3, 0.4, 0.0];
        let fixed = fix_length(&samples, 4);
        assert_eq!(fixed, vec![1.0, 0.2, 0.3, 0.4]);

        // Tail sum (1.0) > head sum (0.0): keep the trailing window
        let samples = vec![0.0, 0.2, 0.3, 0.4, 1.0];
        let fixed = fix_length(&samples, 4);
        assert_eq!(fixed, vec![0.2, 0.3, 0.4, 1.0]);
    }

    #[test]
    fn test_trim_is_contiguous_subsequence() {
        let samples: Vec<f32> = (0..100).map(|i| (i as f32 * 0.37).sin()).collect();
        let fixed = fix_length(&samples, 60);

        assert_eq!(fixed.len(), 60);
        let is_head = fixed[..] == samples[..60];
        let is_tail = fixed[..] == samples[40..];
        assert!(is_head || is_tail);
    }

    #[test]
    fn test_signed_sum_bias() {
        // The trailing edge is far louder but negative-valued; the signed
        // comparison still prefers it only when its sum is higher.
        let mut samples = vec![0.01; 6];
        samples[4] = -0.9;
        samples[5] = -0.9;
        let fixed = fix_length(&samples, 4);
        // head sum = 0.02 > tail sum = -1.8, so the leading window survives
        assert_eq!(fixed, vec![0.01, 0.01, 0.01, 0.01]);
    }
}
