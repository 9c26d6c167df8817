use rustfft::{num_complex::Complex, FftPlanner};

/// Descriptores espectrales, en el orden en que se ensamblan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectralStat {
    MeanFreq,
    SpectralEntropy,
    DomFreq,
    DomFreqPower,
    SpectralEnergy,
    SpectralCentroid,
    SpectralSpread,
}

impl SpectralStat {
    pub const ALL: [SpectralStat; 7] = [
        SpectralStat::MeanFreq,
        SpectralStat::SpectralEntropy,
        SpectralStat::DomFreq,
        SpectralStat::DomFreqPower,
        SpectralStat::SpectralEnergy,
        SpectralStat::SpectralCentroid,
        SpectralStat::SpectralSpread,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpectralStat::MeanFreq => "meanFreq",
            SpectralStat::SpectralEntropy => "entropy",
            SpectralStat::DomFreq => "domFreq",
            SpectralStat::DomFreqPower => "domFreqPower",
            SpectralStat::SpectralEnergy => "energy",
            SpectralStat::SpectralCentroid => "centroid",
            SpectralStat::SpectralSpread => "spread",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpectrumFeatures {
    pub mean_freq: f64,
    pub spectral_entropy: f64,
    pub dom_freq: f64,
    pub dom_freq_power: f64,
    pub spectral_energy: f64,
    pub spectral_centroid: f64,
    pub spectral_spread: f64,
}

impl SpectrumFeatures {
    pub fn get(&self, stat: SpectralStat) -> f64 {
        match stat {
            SpectralStat::MeanFreq => self.mean_freq,
            SpectralStat::SpectralEntropy => self.spectral_entropy,
            SpectralStat::DomFreq => self.dom_freq,
            SpectralStat::DomFreqPower => self.dom_freq_power,
            SpectralStat::SpectralEnergy => self.spectral_energy,
            SpectralStat::SpectralCentroid => self.spectral_centroid,
            SpectralStat::SpectralSpread => self.spectral_spread,
        }
    }
}

/// Análisis FFT de una señal real. Reutiliza el planner entre ventanas.
pub struct SpectralAnalyzer {
    planner: FftPlanner<f64>,
    sample_rate_hz: f64,
}

impl SpectralAnalyzer {
    pub fn new(sample_rate_hz: f64) -> Self {
        Self {
            planner: FftPlanner::new(),
            sample_rate_hz,
        }
    }

    /// Espectro de magnitud de un solo lado (bins `0..=N/2`) y la frecuencia de cada bin.
    /// La señal se rellena con ceros hasta la siguiente potencia de dos.
    pub fn magnitude_spectrum(&mut self, signal: &[f64]) -> (Vec<f64>, Vec<f64>) {
        if signal.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let padded_len = signal.len().next_power_of_two();
        let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        buffer.resize(padded_len, Complex::new(0.0, 0.0));

        let fft = self.planner.plan_fft_forward(padded_len);
        fft.process(&mut buffer);

        let bins = padded_len / 2 + 1;
        let magnitudes: Vec<f64> = buffer.iter().take(bins).map(|c| c.norm()).collect();
        let freqs: Vec<f64> = (0..magnitudes.len())
            .map(|i| i as f64 * self.sample_rate_hz / padded_len as f64)
            .collect();

        (magnitudes, freqs)
    }

    pub fn spectrum(&mut self, signal: &[f64]) -> SpectrumFeatures {
        let (magnitudes, freqs) = self.magnitude_spectrum(signal);
        if magnitudes.is_empty() {
            return SpectrumFeatures::default();
        }

        let mag_sum: f64 = magnitudes.iter().sum();
        let spectral_energy: f64 = magnitudes.iter().map(|m| m * m).sum();

        let spectral_centroid = if mag_sum > 0.0 {
            freqs.iter().zip(&magnitudes).map(|(f, m)| f * m).sum::<f64>() / mag_sum
        } else {
            0.0
        };

        let spectral_spread = if mag_sum > 0.0 {
            let weighted: f64 = freqs
                .iter()
                .zip(&magnitudes)
                .map(|(f, m)| (f - spectral_centroid).powi(2) * m)
                .sum();
            (weighted / mag_sum).sqrt()
        } else {
            0.0
        };

        // Entropía de Shannon de la PSD normalizada, sólo sobre bins no nulos
        let spectral_entropy = if spectral_energy > 0.0 {
            -magnitudes
                .iter()
                .map(|m| m * m / spectral_energy)
                .filter(|&p| p > 0.0)
                .map(|p| p * p.ln())
                .sum::<f64>()
        } else {
            0.0
        };

        // Primer bin con magnitud máxima (incluye DC)
        let mut dom_idx = 0;
        for (i, &m) in magnitudes.iter().enumerate() {
            if m > magnitudes[dom_idx] {
                dom_idx = i;
            }
        }

        SpectrumFeatures {
            mean_freq: spectral_centroid,
            spectral_entropy,
            dom_freq: freqs[dom_idx],
            dom_freq_power: magnitudes[dom_idx] * magnitudes[dom_idx],
            spectral_energy,
            spectral_centroid,
            spectral_spread,
        }
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn zero_signal_yields_all_zero() {
        let mut analyzer = SpectralAnalyzer::new(50.0);
        assert_eq!(analyzer.spectrum(&[0.0; 128]), SpectrumFeatures::default());
        assert_eq!(analyzer.spectrum(&[]), SpectrumFeatures::default());
    }

    #[test]
    fn sine_dominant_frequency() {
        let mut analyzer = SpectralAnalyzer::new(50.0);
        // 128 muestras a 50 Hz: bin 16 = 6.25 Hz
        let signal: Vec<f64> = (0..128)
            .map(|i| (2.0 * PI * 6.25 * i as f64 / 50.0).sin())
            .collect();
        let features = analyzer.spectrum(&signal);

        assert!((features.dom_freq - 6.25).abs() < 1e-9);
        assert!((features.dom_freq_power - 64.0 * 64.0).abs() < 1e-6);
        assert!((features.spectral_centroid - 6.25).abs() < 1e-6);
        assert!(features.spectral_spread < 1e-3);
        assert!(features.spectral_entropy.abs() < 1e-9);
    }

    #[test]
    fn alternating_signal_peaks_at_nyquist() {
        let mut analyzer = SpectralAnalyzer::new(50.0);
        let signal: Vec<f64> = (0..128).map(|i| if i % 2 == 0 { -5.0 } else { 5.0 }).collect();
        let features = analyzer.spectrum(&signal);

        assert!((features.dom_freq - 25.0).abs() < 1e-9);
        assert!(features.spectral_energy > 0.0);
    }

    #[test]
    fn non_power_of_two_is_zero_padded() {
        let mut analyzer = SpectralAnalyzer::new(50.0);
        let signal: Vec<f64> = (0..100).map(|i| (i as f64 * 0.7).sin()).collect();
        let (magnitudes, freqs) = analyzer.magnitude_spectrum(&signal);

        assert_eq!(magnitudes.len(), 65);
        assert!((freqs[64] - 25.0).abs() < 1e-9);
        assert!((freqs[1] - 50.0 / 128.0).abs() < 1e-12);
    }

    #[test]
    fn energy_is_non_negative_and_mean_freq_tracks_centroid() {
        let mut analyzer = SpectralAnalyzer::new(50.0);
        let signal: Vec<f64> = (0..77).map(|i| ((i * 37 % 11) as f64) - 5.0).collect();
        let features = analyzer.spectrum(&signal);

        assert!(features.spectral_energy >= 0.0);
        assert!(features.spectral_entropy >= 0.0);
        assert_eq!(features.mean_freq, features.spectral_centroid);
        assert_eq!(features.get(SpectralStat::DomFreq), features.dom_freq);
    }
}
