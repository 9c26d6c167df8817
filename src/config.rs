use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    DEFAULT_FEATURE_DIMENSION, DEFAULT_FILTER_ALPHA, DEFAULT_OVERLAP_RATIO,
    DEFAULT_SAMPLING_RATE, DEFAULT_WINDOW_DURATION_S,
};

/// Tamaño máximo de ventana aceptado (unos 22 minutos a 50 Hz)
pub const MAX_WINDOW_SIZE: usize = 1 << 16;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No se pudo leer {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML inválido en {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("La ventana debe tener al menos 2 muestras (calculado: {window_size})")]
    WindowTooShort { window_size: usize },

    #[error("window_duration_s debe ser finito y positivo (recibido: {0})")]
    InvalidWindowDuration(f64),

    #[error("La ventana de {requested} muestras supera el máximo de {max}")]
    WindowTooLong { requested: f64, max: usize },

    #[error("overlap_ratio debe estar en [0, 1) (recibido: {0})")]
    OverlapOutOfRange(f64),

    #[error("filter_alpha debe estar en [0, 1] (recibido: {0})")]
    AlphaOutOfRange(f32),

    #[error("sample_rate_hz debe ser positivo (recibido: {0})")]
    InvalidSampleRate(f64),

    #[error("feature_dimension debe ser mayor que 0")]
    ZeroDimension,
}

/// Parámetros fijos del pipeline. No se modifican después de construirlo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Frecuencia nominal de muestreo (Hz)
    pub sample_rate_hz: f64,
    /// Duración de la ventana (s); `window_size = round(duración * frecuencia)`
    pub window_duration_s: f64,
    /// Fracción de muestras compartidas entre ventanas consecutivas
    pub overlap_ratio: f64,
    /// Constante de suavizado del filtro de gravedad
    pub filter_alpha: f32,
    /// Dimensión `D` del vector que espera el clasificador
    pub feature_dimension: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLING_RATE,
            window_duration_s: DEFAULT_WINDOW_DURATION_S,
            overlap_ratio: DEFAULT_OVERLAP_RATIO,
            filter_alpha: DEFAULT_FILTER_ALPHA,
            feature_dimension: DEFAULT_FEATURE_DIMENSION,
        }
    }
}

/// Tamaños derivados de la configuración, ya validados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub window_size: usize,
    /// Muestras más antiguas que se descartan en cada deslizamiento.
    /// Tras deslizar quedan `window_size - overlap`.
    pub overlap: usize,
    /// Distancia entre el inicio de dos ventanas consecutivas (igual a `overlap`)
    pub step: usize,
}

impl PipelineConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Muestras por ventana antes de validar; puede no ser entero ni finito
    fn requested_window_size(&self) -> f64 {
        (self.window_duration_s * self.sample_rate_hz).round()
    }

    /// Tamaño de ventana saturado a `[0, MAX_WINDOW_SIZE]`; `validate` rechaza lo que queda fuera
    pub fn window_size(&self) -> usize {
        let requested = self.requested_window_size();
        if requested.is_nan() {
            return 0;
        }
        requested.clamp(0.0, MAX_WINDOW_SIZE as f64) as usize
    }

    /// Valida la configuración y calcula la geometría de ventana
    pub fn validate(&self) -> Result<WindowGeometry, ConfigError> {
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate_hz));
        }
        if !(0.0..=1.0).contains(&self.filter_alpha) {
            return Err(ConfigError::AlphaOutOfRange(self.filter_alpha));
        }
        if !(0.0..1.0).contains(&self.overlap_ratio) {
            return Err(ConfigError::OverlapOutOfRange(self.overlap_ratio));
        }
        if self.feature_dimension == 0 {
            return Err(ConfigError::ZeroDimension);
        }

        if !(self.window_duration_s.is_finite() && self.window_duration_s > 0.0) {
            return Err(ConfigError::InvalidWindowDuration(self.window_duration_s));
        }

        let requested = self.requested_window_size();
        if requested > MAX_WINDOW_SIZE as f64 {
            return Err(ConfigError::WindowTooLong {
                requested,
                max: MAX_WINDOW_SIZE,
            });
        }
        let window_size = self.window_size();
        if window_size < 2 {
            return Err(ConfigError::WindowTooShort { window_size });
        }

        // Cada deslizamiento descarta al menos una muestra
        let overlap = ((window_size as f64 * self.overlap_ratio).round() as usize).clamp(1, window_size);

        Ok(WindowGeometry {
            window_size,
            overlap,
            step: overlap,
        })
    }

    pub fn sample_period_s(&self) -> f64 {
        1.0 / self.sample_rate_hz
    }
}
