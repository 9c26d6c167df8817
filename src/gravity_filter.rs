use crate::types::{ProcessedSample, RawSample, DEFAULT_FILTER_ALPHA};

/// Estimación de gravedad acumulada (x, y, z).
/// Se actualiza exactamente una vez por muestra y en orden de llegada.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterState {
    pub gravity: [f32; 3],
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arranca el filtro desde una gravedad conocida en lugar de cero
    pub fn from_gravity(gravity: [f32; 3]) -> Self {
        Self { gravity }
    }

    pub fn reset(&mut self) {
        self.gravity = [0.0; 3];
    }
}

/// Filtro paso bajo de un polo que separa gravedad y aceleración corporal:
///
/// `g = α·g + (1-α)·a`, `body = a - g`
///
/// Con α = 0.8 a 50 Hz aproxima un corte de ~0.3 Hz.
#[derive(Debug, Clone, Copy)]
pub struct GravitySeparationFilter {
    alpha: f32,
}

impl GravitySeparationFilter {
    pub fn new(alpha: f32) -> Self {
        Self { alpha }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Procesa una muestra. El estado es secuencial: reordenar las muestras cambia la salida.
    pub fn apply(&self, raw: RawSample, state: &mut FilterState) -> ProcessedSample {
        let acc = raw.acc();
        let mut body_acc = [0.0f32; 3];

        for axis in 0..3 {
            state.gravity[axis] = self.alpha * state.gravity[axis] + (1.0 - self.alpha) * acc[axis];
            body_acc[axis] = acc[axis] - state.gravity[axis];
        }

        ProcessedSample {
            raw,
            body_acc,
            gravity_acc: state.gravity,
        }
    }
}

impl Default for GravitySeparationFilter {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_ALPHA)
    }
}
