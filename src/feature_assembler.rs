use tracing::trace;

use crate::derived_signals::SignalSet;
use crate::feature_layout::{FeatureLayout, FeatureSlot};
use crate::spectral::{SpectralAnalyzer, SpectrumFeatures};
use crate::time_domain::{correlation, TimeStatistics};
use crate::types::{FeatureVector, ProcessedSample, SignalId, NUM_SIGNALS};

/// Ajusta un vector a exactamente `dimension` valores:
/// rellena con ceros a la derecha o trunca por el final.
pub fn fit_to_dimension(mut features: Vec<f32>, dimension: usize) -> Vec<f32> {
    features.resize(dimension, 0.0);
    features
}

/// Calcula todas las características de una ventana en el orden de `FeatureLayout`
pub struct FeatureVectorAssembler {
    layout: FeatureLayout,
    analyzer: SpectralAnalyzer,
    dt: f32,
}

impl FeatureVectorAssembler {
    pub fn new(layout: FeatureLayout, sample_rate_hz: f64) -> Self {
        Self {
            layout,
            analyzer: SpectralAnalyzer::new(sample_rate_hz),
            dt: (1.0 / sample_rate_hz) as f32,
        }
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    /// Vector de `D` valores para una ventana de cualquier longitud
    pub fn assemble(&mut self, window: &[ProcessedSample]) -> FeatureVector {
        let signals = SignalSet::from_window(window, self.dt);
        let series: [Vec<f64>; NUM_SIGNALS] = std::array::from_fn(|_| Vec::new());
        let series = SignalId::all().fold(series, |mut acc, id| {
            acc[id.index()] = signals.get(id).iter().map(|&v| f64::from(v)).collect();
            acc
        });

        let time_stats: [TimeStatistics; NUM_SIGNALS] =
            std::array::from_fn(|i| TimeStatistics::compute(&series[i]));
        let mut spectra = [SpectrumFeatures::default(); NUM_SIGNALS];
        for (spectrum, signal) in spectra.iter_mut().zip(&series) {
            *spectrum = self.analyzer.spectrum(signal);
        }

        let mut features = Vec::with_capacity(self.layout.len());
        for slot in self.layout.slots() {
            let value = match *slot {
                FeatureSlot::Time(stat, signal) => time_stats[signal.index()].get(stat),
                FeatureSlot::Sma(group) => time_stats[SignalId::Magnitude(group).index()].mean,
                FeatureSlot::Reserved { .. } => 0.0,
                FeatureSlot::Correlation(group, pair) => {
                    let (a, b) = pair.axes();
                    correlation(
                        &series[SignalId::Axis(group, a).index()],
                        &series[SignalId::Axis(group, b).index()],
                    )
                }
                FeatureSlot::Spectral(stat, signal) => spectra[signal.index()].get(stat),
                FeatureSlot::Angle(angle) => angle.compute(&signals),
                FeatureSlot::Padding(_) => 0.0,
            };

            let value = value as f32;
            features.push(if value.is_finite() { value } else { 0.0 });
        }

        trace!(samples = window.len(), features = features.len(), "Ventana ensamblada");
        fit_to_dimension(features, self.layout.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_layout::AxisPair;
    use crate::gravity_filter::{FilterState, GravitySeparationFilter};
    use crate::time_domain::TimeStat;
    use crate::types::{Axis, AxisGroup, RawSample};

    fn processed(raw: &[RawSample]) -> Vec<ProcessedSample> {
        let filter = GravitySeparationFilter::default();
        let mut state = FilterState::new();
        raw.iter().map(|s| filter.apply(*s, &mut state)).collect()
    }

    fn assembler(dimension: usize) -> FeatureVectorAssembler {
        FeatureVectorAssembler::new(FeatureLayout::new(dimension), 50.0)
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit_to_dimension(vec![1.0, 2.0], 4), vec![1.0, 2.0, 0.0, 0.0]);
        assert_eq!(fit_to_dimension(vec![1.0, 2.0, 3.0], 2), vec![1.0, 2.0]);
        assert_eq!(fit_to_dimension(vec![1.0], 1), vec![1.0]);
    }

    #[test]
    fn length_is_always_dimension() {
        let mut asm = assembler(561);
        for n in [0usize, 1, 2, 3, 17, 128, 200] {
            let raw: Vec<RawSample> = (0..n)
                .map(|i| RawSample::new([i as f32, 1.0, 9.8], [0.1, 0.0, -0.1]))
                .collect();
            assert_eq!(asm.assemble(&processed(&raw)).len(), 561, "n = {n}");
        }
    }

    #[test]
    fn other_dimensions_are_respected() {
        let raw: Vec<RawSample> = (0..64).map(|i| RawSample::new([(i as f32).sin(), 0.0, 9.8], [0.0; 3])).collect();
        let window = processed(&raw);

        assert_eq!(assembler(100).assemble(&window).len(), 100);
        assert_eq!(assembler(1000).assemble(&window).len(), 1000);

        let full = assembler(1000).assemble(&window);
        let short = assembler(100).assemble(&window);
        assert_eq!(&full[..100], &short[..]);
        assert!(full[544..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn reserved_and_padding_slots_are_zero() {
        let raw: Vec<RawSample> = (0..128)
            .map(|i| RawSample::new([(i as f32 * 0.2).sin(), (i as f32 * 0.5).cos(), 9.8], [0.3, -0.2, (i as f32).sin()]))
            .collect();
        let mut asm = assembler(561);
        let features = asm.assemble(&processed(&raw));

        for (i, slot) in asm.layout().slots().iter().enumerate() {
            if matches!(slot, FeatureSlot::Reserved { .. } | FeatureSlot::Padding(_)) {
                assert_eq!(features[i], 0.0, "{}", slot.name());
            }
        }
    }

    #[test]
    fn values_land_in_their_slots() {
        let raw: Vec<RawSample> = (0..128)
            .map(|i| RawSample::new([0.0, 0.0, 9.8], [i as f32 * 0.01, 2.0 * i as f32 * 0.01, 0.0]))
            .collect();
        let mut asm = assembler(561);
        let features = asm.assemble(&processed(&raw));
        let layout = asm.layout();

        let gyro_x_mean = layout
            .index_of(FeatureSlot::Time(TimeStat::Mean, SignalId::Axis(AxisGroup::BodyGyro, Axis::X)))
            .unwrap();
        assert!((features[gyro_x_mean] - 0.635).abs() < 1e-4);

        // gyroY = 2 * gyroX: correlación perfecta
        let corr = layout
            .index_of(FeatureSlot::Correlation(AxisGroup::BodyGyro, AxisPair::XY))
            .unwrap();
        assert!((features[corr] - 1.0).abs() < 1e-6);

        // gyroZ constante: correlación 0
        let corr_z = layout
            .index_of(FeatureSlot::Correlation(AxisGroup::BodyGyro, AxisPair::XZ))
            .unwrap();
        assert_eq!(features[corr_z], 0.0);
    }
}
