use thiserror::Error;

use crate::types::{Axis, AxisGroup, ProcessedSample, SignalId, NUM_SIGNALS};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("Longitudes distintas: se esperaba {expected}, se recibió {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Derivada discreta: `jerk[i] = (s[i] - s[i-1]) / dt`, con `jerk[0] = 0`.
/// Señales de menos de 2 muestras devuelven ceros.
pub fn jerk(signal: &[f32], dt: f32) -> Vec<f32> {
    let mut out = vec![0.0; signal.len()];
    if signal.len() < 2 || dt <= 0.0 {
        return out;
    }

    for (i, pair) in signal.windows(2).enumerate() {
        out[i + 1] = (pair[1] - pair[0]) / dt;
    }
    out
}

/// Norma euclídea por índice. Las tres señales deben tener la misma longitud.
pub fn magnitude(x: &[f32], y: &[f32], z: &[f32]) -> Result<Vec<f32>, SignalError> {
    for other in [y, z] {
        if other.len() != x.len() {
            return Err(SignalError::LengthMismatch {
                expected: x.len(),
                actual: other.len(),
            });
        }
    }

    Ok(norm3(x, y, z))
}

fn norm3(x: &[f32], y: &[f32], z: &[f32]) -> Vec<f32> {
    x.iter()
        .zip(y)
        .zip(z)
        .map(|((a, b), c)| (a * a + b * b + c * c).sqrt())
        .collect()
}

/// Las 20 señales de una ventana, indexadas por `SignalId`.
/// Se construye una vez por ventana y no se modifica después.
#[derive(Debug, Clone)]
pub struct SignalSet {
    signals: [Vec<f32>; NUM_SIGNALS],
    len: usize,
}

impl SignalSet {
    /// Calcula cuerpo, gravedad, jerk y magnitudes a partir de una ventana.
    /// Todas las señales salen de la misma ventana, así que tienen la misma longitud.
    pub fn from_window(window: &[ProcessedSample], dt: f32) -> Self {
        let len = window.len();
        let mut signals: [Vec<f32>; NUM_SIGNALS] = std::array::from_fn(|_| Vec::with_capacity(len));

        for axis in Axis::ALL {
            let a = axis.index();
            let body: Vec<f32> = window.iter().map(|s| s.body_acc[a]).collect();
            let gravity: Vec<f32> = window.iter().map(|s| s.gravity_acc[a]).collect();
            let gyro: Vec<f32> = window.iter().map(|s| s.raw.gyro()[a]).collect();

            signals[SignalId::Axis(AxisGroup::BodyAccJerk, axis).index()] = jerk(&body, dt);
            signals[SignalId::Axis(AxisGroup::BodyGyroJerk, axis).index()] = jerk(&gyro, dt);
            signals[SignalId::Axis(AxisGroup::BodyAcc, axis).index()] = body;
            signals[SignalId::Axis(AxisGroup::GravityAcc, axis).index()] = gravity;
            signals[SignalId::Axis(AxisGroup::BodyGyro, axis).index()] = gyro;
        }

        for group in AxisGroup::ALL {
            let [x, y, z] = Axis::ALL.map(|axis| &signals[SignalId::Axis(group, axis).index()]);
            let mag = norm3(x, y, z);
            signals[SignalId::Magnitude(group).index()] = mag;
        }

        Self { signals, len }
    }

    pub fn get(&self, id: SignalId) -> &[f32] {
        &self.signals[id.index()]
    }

    /// Longitud común de todas las señales (tamaño de ventana)
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawSample;

    #[test]
    fn jerk_first_sample_is_zero() {
        let out = jerk(&[1.0, 2.0, 4.0], 0.02);
        assert_eq!(out[0], 0.0);
        assert!((out[1] - 50.0).abs() < 1e-4);
        assert!((out[2] - 100.0).abs() < 1e-4);
    }

    #[test]
    fn jerk_degenerate_signals() {
        assert!(jerk(&[], 0.02).is_empty());
        assert_eq!(jerk(&[3.0], 0.02), vec![0.0]);
    }

    #[test]
    fn magnitude_is_euclidean_norm() {
        let mag = magnitude(&[3.0, 0.0], &[4.0, 0.0], &[0.0, 2.0]).unwrap();
        assert_eq!(mag, vec![5.0, 2.0]);
    }

    #[test]
    fn magnitude_rejects_mismatched_lengths() {
        let err = magnitude(&[1.0, 2.0], &[1.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, SignalError::LengthMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn derived_signals_are_pure() {
        let signal: Vec<f32> = (0..32).map(|i| (i as f32 * 0.3).sin()).collect();
        assert_eq!(jerk(&signal, 0.02), jerk(&signal, 0.02));
        assert_eq!(
            magnitude(&signal, &signal, &signal).unwrap(),
            magnitude(&signal, &signal, &signal).unwrap()
        );
    }

    #[test]
    fn signal_set_routes_channels() {
        let window: Vec<ProcessedSample> = (0..4)
            .map(|i| ProcessedSample {
                raw: RawSample::new([0.0; 3], [i as f32, 0.0, 0.0]),
                body_acc: [0.0, 3.0, 4.0],
                gravity_acc: [0.0, 0.0, 9.8],
            })
            .collect();

        let set = SignalSet::from_window(&window, 0.5);
        assert_eq!(set.len(), 4);
        assert_eq!(set.get(SignalId::Axis(AxisGroup::BodyGyro, Axis::X)), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(
            set.get(SignalId::Axis(AxisGroup::BodyGyroJerk, Axis::X)),
            &[0.0, 2.0, 2.0, 2.0]
        );
        assert!(set.get(SignalId::Magnitude(AxisGroup::BodyAcc)).iter().all(|v| (*v - 5.0).abs() < 1e-6));
        assert!(set
            .get(SignalId::Magnitude(AxisGroup::BodyAccJerk))
            .iter()
            .all(|v| *v == 0.0));
    }
}
