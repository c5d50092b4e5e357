// Stationary spectral-gate noise reduction
// One generic pass over the stacked dataset, no per-class branching:
// per-bin magnitude statistics form a noise threshold, bins below the
// gate are attenuated, and frames are resynthesized by overlap-add.

use log::debug;
use realfft::num_complex::Complex;
use realfft::RealFftPlanner;

/// Configuration for the spectral gate
#[derive(Debug, Clone)]
pub struct DenoiseConfig {
    /// FFT window size in samples (power of 2)
    pub window_size: usize,

    /// Hop size in samples (advance between frames)
    pub hop_size: usize,

    /// Threshold multiplier for the per-bin noise gate
    /// Threshold = mean(magnitude) + n_std_thresh * std(magnitude)
    pub n_std_thresh: f32,

    /// Fraction of energy removed from gated-out bins [0.0, 1.0]
    /// 1.0 silences them entirely
    pub prop_decrease: f32,

    /// Width of the moving average applied to the gate mask over time
    /// frames, softens attack/release artifacts
    pub smooth_frames: usize,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        DenoiseConfig {
            window_size: 1024,
            hop_size: 256,
            n_std_thresh: 1.5,
            prop_decrease: 1.0,
            smooth_frames: 3,
        }
    }
}

/// Apply the spectral gate to every recording in the stacked matrix.
/// Row shapes are preserved.
pub fn reduce_noise_batch(x: &mut [Vec<f32>], sample_rate: u32, config: &DenoiseConfig) {
    debug!(
        "spectral gate over {} recordings at {} Hz (window {}, hop {})",
        x.len(),
        sample_rate,
        config.window_size,
        config.hop_size
    );

    for row in x.iter_mut() {
        let cleaned = reduce_noise(row, config);
        *row = cleaned;
    }
}

/// Apply the spectral gate to a single recording
pub fn reduce_noise(samples: &[f32], config: &DenoiseConfig) -> Vec<f32> {
    let window_size = config.window_size;
    let hop_size = config.hop_size;

    if hop_size == 0 || samples.len() < window_size {
        return samples.to_vec();
    }

    // Pad one window of zeros on each side so every real sample is covered
    // by a full set of overlapping frames. Without the pad, edge samples
    // see only one frame's window taper, and dividing by that near-zero
    // accumulated weight blows the gated signal up at the head and tail.
    let pad = window_size;
    let mut padded = vec![0.0f32; samples.len() + 2 * pad];
    padded[pad..pad + samples.len()].copy_from_slice(samples);

    let num_frames = (padded.len() - window_size) / hop_size + 1;
    let num_bins = window_size / 2 + 1;

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(window_size);
    let ifft = planner.plan_fft_inverse(window_size);

    let window = hann_window(window_size);

    // Forward pass: windowed STFT, keeping complex spectra for resynthesis
    let mut spectra: Vec<Vec<Complex<f32>>> = Vec::with_capacity(num_frames);
    let mut magnitudes: Vec<Vec<f32>> = Vec::with_capacity(num_frames);

    for frame_idx in 0..num_frames {
        let start = frame_idx * hop_size;
        let mut input: Vec<f32> = padded[start..start + window_size]
            .iter()
            .zip(window.iter())
            .map(|(s, w)| s * w)
            .collect();

        let mut spectrum = fft.make_output_vec();
        fft.process(&mut input, &mut spectrum).unwrap();

        magnitudes.push(spectrum.iter().map(|c| c.norm()).collect());
        spectra.push(spectrum);
    }

    // Per-bin noise threshold from magnitude statistics over time
    let thresholds = bin_thresholds(&magnitudes, num_bins, config.n_std_thresh);

    // Binary gate, then a moving average over time frames
    let mut mask: Vec<Vec<f32>> = magnitudes
        .iter()
        .map(|frame| {
            frame
                .iter()
                .zip(thresholds.iter())
                .map(|(mag, thresh)| if mag > thresh { 1.0 } else { 0.0 })
                .collect()
        })
        .collect();
    smooth_mask(&mut mask, config.smooth_frames);

    // Inverse pass: attenuate gated bins and overlap-add
    let mut output = vec![0.0f32; padded.len()];
    let mut weight = vec![0.0f32; padded.len()];
    let scale = 1.0 / window_size as f32;

    for (frame_idx, spectrum) in spectra.iter_mut().enumerate() {
        for (bin, value) in spectrum.iter_mut().enumerate() {
            let gate = mask[frame_idx][bin];
            let gain = gate + (1.0 - gate) * (1.0 - config.prop_decrease);
            *value *= gain;
        }

        let mut frame = ifft.make_output_vec();
        ifft.process(spectrum, &mut frame).unwrap();

        let start = frame_idx * hop_size;
        for (i, value) in frame.iter().enumerate() {
            output[start + i] += value * scale * window[i];
            weight[start + i] += window[i] * window[i];
        }
    }

    // Normalize by the accumulated window energy and trim the pad.
    // Real samples always sit in the full-overlap region, so the weight is
    // the constant window-energy sum; the guard only covers degenerate
    // configurations.
    let mut result = Vec::with_capacity(samples.len());
    for (i, &sample) in samples.iter().enumerate() {
        let j = pad + i;
        if weight[j] > 1e-8 {
            result.push(output[j] / weight[j]);
        } else {
            result.push(sample);
        }
    }

    result
}

/// Per-bin gate threshold: mean + n_std * std of magnitude over frames
fn bin_thresholds(magnitudes: &[Vec<f32>], num_bins: usize, n_std: f32) -> Vec<f32> {
    let num_frames = magnitudes.len();
    let mut thresholds = vec![0.0f32; num_bins];

    if num_frames == 0 {
        return thresholds;
    }

    for bin in 0..num_bins {
        let mut sum = 0.0f32;
        for frame in magnitudes {
            sum += frame[bin];
        }
        let mean = sum / num_frames as f32;

        let mut var = 0.0f32;
        for frame in magnitudes {
            let d = frame[bin] - mean;
            var += d * d;
        }
        let std = (var / num_frames as f32).sqrt();

        thresholds[bin] = mean + n_std * std;
    }

    thresholds
}

/// Centered moving average of the gate mask along the time axis
fn smooth_mask(mask: &mut [Vec<f32>], smooth_frames: usize) {
    if smooth_frames < 2 || mask.is_empty() {
        return;
    }

    let num_frames = mask.len();
    let num_bins = mask[0].len();
    let half = smooth_frames / 2;

    let original = mask.to_vec();

    for frame_idx in 0..num_frames {
        let lo = frame_idx.saturating_sub(half);
        let hi = (frame_idx + half + 1).min(num_frames);
        let span = (hi - lo) as f32;

        for bin in 0..num_bins {
            let mut sum = 0.0;
            for neighbor in &original[lo..hi] {
                sum += neighbor[bin];
            }
            mask[frame_idx][bin] = sum / span;
        }
    }
}

/// Hann window of length n
fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / n as f32).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (std::f32::consts::TAU * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn test_shape_preserved() {
        let mut x = vec![sine(440.0, 48000, 9600), sine(880.0, 48000, 9600)];
        reduce_noise_batch(&mut x, 48000, &DenoiseConfig::default());

        assert_eq!(x.len(), 2);
        assert_eq!(x[0].len(), 9600);
        assert_eq!(x[1].len(), 9600);
    }

    #[test]
    fn test_short_input_passthrough() {
        let samples = vec![0.5; 100];
        let cleaned = reduce_noise(&samples, &DenoiseConfig::default());
        assert_eq!(cleaned, samples);
    }

    #[test]
    fn test_noise_attenuated() {
        // Deterministic pseudo-noise, no dominant spectral peak
        let noise: Vec<f32> = (0..9600)
            .map(|i| ((i as f32 * 12.9898).sin() * 43758.547).fract())
            .collect();

        let cleaned = reduce_noise(&noise, &DenoiseConfig::default());
        assert!(rms(&cleaned) < rms(&noise) * 0.8);
    }

    #[test]
    fn test_bounded_input_stays_bounded() {
        // Overlap-add must not amplify at the frame edges, where fewer
        // windows cover each sample
        let noise: Vec<f32> = (0..9600)
            .map(|i| ((i as f32 * 12.9898).sin() * 43758.547).fract())
            .collect();

        let cleaned = reduce_noise(&noise, &DenoiseConfig::default());

        let max_abs =
            |s: &[f32]| s.iter().fold(0.0f32, |acc, v| acc.max(v.abs()));
        assert!(max_abs(&cleaned) <= max_abs(&noise) * 1.5);

        // Head and tail hop-sized regions stay at or below the input level
        let hop = DenoiseConfig::default().hop_size;
        assert!(rms(&cleaned[..hop]) <= rms(&noise));
        assert!(rms(&cleaned[9600 - hop..]) <= rms(&noise));
    }

    #[test]
    fn test_burst_survives_gate() {
        // A loud transient over a quiet floor sits far above the per-bin
        // threshold, so the gate keeps it while silencing the floor
        let mut samples = vec![0.0f32; 9600];
        let burst = sine(750.0, 48000, 1600);
        for (i, value) in burst.iter().enumerate() {
            samples[4000 + i] = value * 0.8;
        }

        let cleaned = reduce_noise(&samples, &DenoiseConfig::default());

        // Interior of the burst, away from the taper at its edges
        let burst_region = 4400..5200;
        assert!(rms(&cleaned[burst_region.clone()]) > rms(&samples[burst_region]) * 0.5);

        // The quiet floor stays quiet
        assert!(rms(&cleaned[..3000]) < 1e-3);
    }

    #[test]
    fn test_silence_stays_silent() {
        let silence = vec![0.0f32; 4096];
        let cleaned = reduce_noise(&silence, &DenoiseConfig::default());
        assert!(cleaned.iter().all(|s| s.abs() < 1e-6));
    }
}
