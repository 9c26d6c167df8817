//! Extracción de características de actividad humana (convención UCI-HAR) a
//! partir de un flujo de muestras de acelerómetro y giroscopio.
//!
//! Flujo: `RawSample` -> filtro de gravedad -> buffer de ventana -> (ventana
//! lista) -> estadísticas temporales + espectrales + correlaciones/ángulos ->
//! vector de dimensión fija -> clasificador externo.
//!
//! ```no_run
//! use har_extractor::config::PipelineConfig;
//! use har_extractor::pipeline::HarPipeline;
//! use har_extractor::types::RawSample;
//!
//! let mut pipeline = HarPipeline::new(PipelineConfig::default()).unwrap();
//! for _ in 0..128 {
//!     if let Some(features) = pipeline.push(RawSample::new([0.0, 0.0, 9.8], [0.0; 3])) {
//!         assert_eq!(features.len(), 561);
//!     }
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod csv_loader;
pub mod derived_signals;
pub mod export;
pub mod feature_assembler;
pub mod feature_layout;
pub mod geometry;
pub mod gravity_filter;
pub mod pipeline;
pub mod spectral;
pub mod time_domain;
pub mod types;
pub mod window_buffer;

pub use config::PipelineConfig;
pub use pipeline::HarPipeline;
pub use types::{FeatureVector, ProcessedSample, RawSample};
