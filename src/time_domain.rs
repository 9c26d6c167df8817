//! Estadísticas en el dominio del tiempo por señal.
//!
//! Todas las funciones son totales: una entrada degenerada (vacía, una sola
//! muestra, varianza nula) produce 0 en lugar de error, porque el clasificador
//! necesita un vector de forma fija siempre.

use crate::derived_signals::SignalError;

/// Descriptores temporales, en el orden en que se ensamblan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeStat {
    Mean,
    Std,
    Mad,
    Max,
    Min,
    Energy,
    Iqr,
    Rms,
    Range,
    Skewness,
    Kurtosis,
    P10,
    P25,
    P50,
    P75,
    P90,
}

impl TimeStat {
    pub const ALL: [TimeStat; 16] = [
        TimeStat::Mean,
        TimeStat::Std,
        TimeStat::Mad,
        TimeStat::Max,
        TimeStat::Min,
        TimeStat::Energy,
        TimeStat::Iqr,
        TimeStat::Rms,
        TimeStat::Range,
        TimeStat::Skewness,
        TimeStat::Kurtosis,
        TimeStat::P10,
        TimeStat::P25,
        TimeStat::P50,
        TimeStat::P75,
        TimeStat::P90,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TimeStat::Mean => "mean",
            TimeStat::Std => "std",
            TimeStat::Mad => "mad",
            TimeStat::Max => "max",
            TimeStat::Min => "min",
            TimeStat::Energy => "energy",
            TimeStat::Iqr => "iqr",
            TimeStat::Rms => "rms",
            TimeStat::Range => "range",
            TimeStat::Skewness => "skewness",
            TimeStat::Kurtosis => "kurtosis",
            TimeStat::P10 => "p10",
            TimeStat::P25 => "p25",
            TimeStat::P50 => "p50",
            TimeStat::P75 => "p75",
            TimeStat::P90 => "p90",
        }
    }
}

/// Resumen estadístico de una señal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeStatistics {
    pub mean: f64,
    pub std: f64,
    pub mad: f64,
    pub max: f64,
    pub min: f64,
    pub energy: f64,
    pub iqr: f64,
    pub rms: f64,
    pub range: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

impl TimeStatistics {
    pub fn compute(signal: &[f64]) -> Self {
        if signal.is_empty() {
            return Self::default();
        }

        let n = signal.len() as f64;
        let mean = mean(signal);
        let min = signal.iter().copied().fold(f64::INFINITY, f64::min);
        let max = signal.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let energy = signal.iter().map(|x| x * x).sum::<f64>() / n;

        let mut sorted = signal.to_vec();
        sorted.sort_by(f64::total_cmp);
        let p25 = percentile_sorted(&sorted, 25.0);
        let p75 = percentile_sorted(&sorted, 75.0);

        // Con una sola muestra la dispersión no está definida
        let (std, mad, rms, skewness, kurtosis) = if signal.len() < 2 {
            (0.0, 0.0, 0.0, 0.0, 0.0)
        } else if max == min {
            // Señal constante: la media puede no ser exacta y dejar residuos de redondeo
            (0.0, 0.0, energy.sqrt(), 0.0, 0.0)
        } else {
            let (mut m2, mut m3, mut m4, mut abs_dev) = (0.0, 0.0, 0.0, 0.0);
            for &x in signal {
                let d = x - mean;
                abs_dev += d.abs();
                m2 += d * d;
                m3 += d * d * d;
                m4 += d * d * d * d;
            }
            let variance = m2 / n;
            let std = variance.sqrt();

            let skewness = if signal.len() >= 3 && std > 0.0 {
                (m3 / n) / (std * std * std)
            } else {
                0.0
            };
            let kurtosis = if signal.len() >= 4 && variance > 0.0 {
                (m4 / n) / (variance * variance)
            } else {
                0.0
            };

            (std, abs_dev / n, energy.sqrt(), skewness, kurtosis)
        };

        Self {
            mean,
            std,
            mad,
            max,
            min,
            energy,
            iqr: p75 - p25,
            rms,
            range: max - min,
            skewness,
            kurtosis,
            p10: percentile_sorted(&sorted, 10.0),
            p25,
            p50: percentile_sorted(&sorted, 50.0),
            p75,
            p90: percentile_sorted(&sorted, 90.0),
        }
    }

    pub fn get(&self, stat: TimeStat) -> f64 {
        match stat {
            TimeStat::Mean => self.mean,
            TimeStat::Std => self.std,
            TimeStat::Mad => self.mad,
            TimeStat::Max => self.max,
            TimeStat::Min => self.min,
            TimeStat::Energy => self.energy,
            TimeStat::Iqr => self.iqr,
            TimeStat::Rms => self.rms,
            TimeStat::Range => self.range,
            TimeStat::Skewness => self.skewness,
            TimeStat::Kurtosis => self.kurtosis,
            TimeStat::P10 => self.p10,
            TimeStat::P25 => self.p25,
            TimeStat::P50 => self.p50,
            TimeStat::P75 => self.p75,
            TimeStat::P90 => self.p90,
        }
    }
}

pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Percentil con interpolación lineal entre rangos vecinos
pub fn percentile(data: &[f64], p: f64) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, p)
}

fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
        }
    }
}

/// Correlación de Pearson. Devuelve 0 si alguna señal es constante o hay menos de 2 muestras.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Result<f64, SignalError> {
    if x.len() != y.len() {
        return Err(SignalError::LengthMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    Ok(correlation(x, y))
}

/// Igual que `pearson_correlation` para señales de la misma ventana.
/// Si las longitudes difieren sólo se usa el prefijo común.
pub(crate) fn correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    let (x, y) = (&x[..n], &y[..n]);
    if n < 2 || is_constant(x) || is_constant(y) {
        return 0.0;
    }

    let (mx, my) = (mean(x), mean(y));
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return 0.0;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

fn is_constant(data: &[f64]) -> bool {
    data.iter().all(|&v| v == data[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn basic_statistics() {
        let stats = TimeStatistics::compute(&[1.0, 2.0, 3.0, 4.0]);
        assert!(close(stats.mean, 2.5));
        assert!(close(stats.std, 1.25f64.sqrt()));
        assert!(close(stats.mad, 1.0));
        assert!(close(stats.energy, 7.5));
        assert!(close(stats.rms, 7.5f64.sqrt()));
        assert!(close(stats.range, 3.0));
        assert!(close(stats.min, 1.0));
        assert!(close(stats.max, 4.0));
        assert!(close(stats.p50, 2.5));
        assert!(close(stats.iqr, 1.5));
        assert!(close(stats.skewness, 0.0));
        assert!(close(stats.kurtosis, 1.64));
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let data = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert!(close(percentile(&data, 10.0), 14.0));
        assert!(close(percentile(&data, 90.0), 46.0));
        assert!(close(percentile(&data, 0.0), 10.0));
        assert!(close(percentile(&data, 100.0), 50.0));
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn degenerate_signals_yield_zero_dispersion() {
        assert_eq!(TimeStatistics::compute(&[]), TimeStatistics::default());

        let single = TimeStatistics::compute(&[7.0]);
        assert_eq!(single.mean, 7.0);
        assert_eq!(single.std, 0.0);
        assert_eq!(single.mad, 0.0);
        assert_eq!(single.rms, 0.0);
        assert_eq!(single.skewness, 0.0);
        assert_eq!(single.kurtosis, 0.0);

        let constant = TimeStatistics::compute(&[3.0; 16]);
        assert_eq!(constant.std, 0.0);
        assert_eq!(constant.skewness, 0.0);
        assert_eq!(constant.kurtosis, 0.0);
        assert_eq!(constant.iqr, 0.0);
    }

    #[test]
    fn constant_signal_with_inexact_mean_has_zero_moments() {
        for n in [3, 6, 128] {
            let stats = TimeStatistics::compute(&vec![0.1; n]);
            assert_eq!(stats.std, 0.0, "n = {n}");
            assert_eq!(stats.mad, 0.0, "n = {n}");
            assert_eq!(stats.skewness, 0.0, "n = {n}");
            assert_eq!(stats.kurtosis, 0.0, "n = {n}");
            assert!(close(stats.rms, 0.1));
        }
    }

    #[test]
    fn small_samples_skip_higher_moments() {
        let three = TimeStatistics::compute(&[0.0, 0.0, 3.0]);
        assert!(three.skewness > 0.0);
        assert_eq!(three.kurtosis, 0.0);
    }

    #[test]
    fn get_matches_fields() {
        let stats = TimeStatistics::compute(&[1.0, 5.0, 2.0, 8.0, 3.0]);
        assert_eq!(stats.get(TimeStat::Max), stats.max);
        assert_eq!(stats.get(TimeStat::P90), stats.p90);
        assert_eq!(stats.get(TimeStat::Kurtosis), stats.kurtosis);
    }

    #[test]
    fn correlation_bounds() {
        let x: Vec<f64> = (0..64).map(|i| (i as f64 * 0.37).sin()).collect();
        let y: Vec<f64> = (0..64).map(|i| (i as f64 * 0.11).cos() * 3.0 + 1.0).collect();
        let r = pearson_correlation(&x, &y).unwrap();
        assert!((-1.0..=1.0).contains(&r));

        let neg: Vec<f64> = x.iter().map(|v| -2.0 * v).collect();
        assert!(close(pearson_correlation(&x, &x).unwrap(), 1.0));
        assert!(close(pearson_correlation(&x, &neg).unwrap(), -1.0));
    }

    #[test]
    fn correlation_degenerate_cases() {
        assert_eq!(pearson_correlation(&[1.0, 2.0, 3.0], &[5.0; 3]).unwrap(), 0.0);
        assert_eq!(pearson_correlation(&[1.0], &[2.0]).unwrap(), 0.0);
        assert_eq!(pearson_correlation(&[0.1; 3], &[1.0, 2.0, 7.0]).unwrap(), 0.0);
        assert_eq!(pearson_correlation(&[1.0, 2.0, 7.0], &[0.1; 3]).unwrap(), 0.0);
        assert!(pearson_correlation(&[1.0, 2.0], &[1.0]).is_err());
    }
}
