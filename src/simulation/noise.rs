use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    pub additive: Option<AdditiveNoiseConfig>,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_awgn(mut self, snr_db: f32) -> Self {
        self.additive = Some(AdditiveNoiseConfig { snr_db });
        self
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct AdditiveNoiseConfig {
    pub snr_db: f32,
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

pub fn signal_power(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|&x| x * x).sum::<f32>() / signal.len() as f32
}

fn apply_additive_noise(signal: &mut [f32], config: &AdditiveNoiseConfig, rng: &mut ChaCha8Rng) {
    let power = signal_power(signal);
    if power == 0.0 {
        return;
    }

    let noise_power = power / 10.0f32.powf(config.snr_db / 10.0);
    let Ok(normal) = Normal::new(0.0, noise_power.sqrt()) else {
        log::warn!(
            "Skipping additive noise: SNR {} dB gives no valid noise level",
            config.snr_db
        );
        return;
    };

    for sample in signal.iter_mut() {
        *sample += normal.sample(rng);
    }
}

/// Apply every configured impairment to `signal` in place
pub fn apply_noise(signal: &mut [f32], config: &NoiseConfig) {
    let mut rng = create_rng(config.seed);

    if let Some(ref additive) = config.additive {
        apply_additive_noise(signal, additive, &mut rng);
    }
}

#[cfg(test)]
mod tests {
    use super::super::signal::generate_sine;
    use super::*;

    #[test]
    fn test_additive_noise_changes_signal() {
        let clean = generate_sine(1000.0, 48000.0, 4800);
        let mut noisy = clean.clone();
        apply_noise(&mut noisy, &NoiseConfig::default().with_seed(1).with_awgn(10.0));
        assert_ne!(clean, noisy);
    }

    #[test]
    fn test_additive_noise_snr() {
        let clean = generate_sine(1000.0, 48000.0, 48000);
        let mut noisy = clean.clone();
        apply_noise(&mut noisy, &NoiseConfig::default().with_seed(7).with_awgn(20.0));

        let noise: Vec<f32> = noisy.iter().zip(&clean).map(|(n, c)| n - c).collect();
        let snr_db = 10.0 * (signal_power(&clean) / signal_power(&noise)).log10();
        assert!((snr_db - 20.0).abs() < 0.5, "SNR was {} dB", snr_db);
    }

    #[test]
    fn test_seeded_rng_reproducibility() {
        let config = NoiseConfig::default().with_seed(42).with_awgn(0.0);
        let mut a = generate_sine(500.0, 8000.0, 100);
        let mut b = a.clone();
        apply_noise(&mut a, &config);
        apply_noise(&mut b, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_snr_leaves_signal_unchanged() {
        let clean = generate_sine(1000.0, 48000.0, 480);
        let mut signal = clean.clone();
        apply_noise(&mut signal, &NoiseConfig::default().with_seed(5).with_awgn(f32::NAN));
        assert_eq!(signal, clean);
    }

    #[test]
    fn test_silence_stays_silent() {
        let mut signal = vec![0.0; 100];
        apply_noise(&mut signal, &NoiseConfig::default().with_seed(3).with_awgn(10.0));
        assert!(signal.iter().all(|&s| s == 0.0));
    }
}
