// Short-time Fourier transform
// Hamming-windowed magnitude spectrogram, FFT size = window size

use realfft::RealFftPlanner;

/// STFT framing parameters
#[derive(Debug, Clone)]
pub struct StftConfig {
    /// Analysis window length in samples, also the FFT size
    pub window_size: usize,

    /// Hop size in samples (advance between frames)
    pub hop_size: usize,
}

impl StftConfig {
    /// The classifier's framing: 0.1 s windows with 50% overlap
    pub fn for_sample_rate(sample_rate: u32) -> Self {
        let window_size = (sample_rate as f64 * 0.1) as usize;
        StftConfig {
            window_size,
            hop_size: window_size / 2,
        }
    }

    /// Number of analysis frames over a signal of `len` samples
    pub fn num_frames(&self, len: usize) -> usize {
        if len < self.window_size || self.hop_size == 0 {
            return 0;
        }
        (len - self.window_size) / self.hop_size + 1
    }

    /// Number of frequency bins per frame
    pub fn num_bins(&self) -> usize {
        self.window_size / 2 + 1
    }
}

/// Compute the magnitude spectrogram of one recording.
/// Returns one Vec per frame, each `num_bins()` long.
pub fn stft_magnitude(samples: &[f32], config: &StftConfig) -> Vec<Vec<f32>> {
    let num_frames = config.num_frames(samples.len());
    if num_frames == 0 {
        return Vec::new();
    }

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(config.window_size);
    let window = hamming_window(config.window_size);

    let mut frames = Vec::with_capacity(num_frames);

    for frame_idx in 0..num_frames {
        let start = frame_idx * config.hop_size;
        let mut input: Vec<f32> = samples[start..start + config.window_size]
            .iter()
            .zip(window.iter())
            .map(|(s, w)| s * w)
            .collect();

        let mut spectrum = fft.make_output_vec();
        fft.process(&mut input, &mut spectrum).unwrap();

        frames.push(spectrum.iter().map(|c| c.norm()).collect());
    }

    frames
}

/// Symmetric Hamming window of length n
fn hamming_window(n: usize) -> Vec<f32> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| {
            0.54 - 0.46 * (std::f32::consts::TAU * i as f32 / (n - 1) as f32).cos()
        })
        .collect()
}
