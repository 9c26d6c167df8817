//! Pipeline completo: muestra cruda -> filtro de gravedad -> buffer de ventana
//! -> (ventana lista) -> vector de características.
//!
//! Es síncrono y de un solo escritor: cada llamada a `push` termina antes de
//! aceptar la siguiente muestra. El vector producido es inmutable y se puede
//! enviar a otro hilo sin más sincronización.

use tracing::debug;

use crate::config::{ConfigError, PipelineConfig, WindowGeometry};
use crate::feature_assembler::FeatureVectorAssembler;
use crate::feature_layout::FeatureLayout;
use crate::gravity_filter::{FilterState, GravitySeparationFilter};
use crate::types::{FeatureVector, RawSample};
use crate::window_buffer::WindowBuffer;

pub struct HarPipeline {
    config: PipelineConfig,
    geometry: WindowGeometry,
    filter: GravitySeparationFilter,
    state: FilterState,
    buffer: WindowBuffer,
    assembler: FeatureVectorAssembler,
    samples_seen: u64,
    windows_emitted: u64,
}

impl HarPipeline {
    /// Valida la configuración; una ventana de menos de 2 muestras falla aquí
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        let geometry = config.validate()?;
        let layout = FeatureLayout::new(config.feature_dimension);

        debug!(
            window_size = geometry.window_size,
            overlap = geometry.overlap,
            dimension = layout.len(),
            natural_len = layout.natural_len(),
            "Pipeline HAR inicializado"
        );

        Ok(Self {
            filter: GravitySeparationFilter::new(config.filter_alpha),
            state: FilterState::new(),
            buffer: WindowBuffer::new(geometry),
            assembler: FeatureVectorAssembler::new(layout, config.sample_rate_hz),
            config,
            geometry,
            samples_seen: 0,
            windows_emitted: 0,
        })
    }

    /// Procesa una muestra. Devuelve un vector cuando se completa una ventana;
    /// el buffer se desliza inmediatamente después.
    pub fn push(&mut self, raw: RawSample) -> Option<FeatureVector> {
        let processed = self.filter.apply(raw, &mut self.state);
        self.buffer.push(processed);
        self.samples_seen += 1;

        let window = self.buffer.snapshot()?;
        let features = self.assembler.assemble(window);
        self.buffer.slide();
        self.windows_emitted += 1;

        debug!(
            window = self.windows_emitted,
            sample = self.samples_seen,
            retained = self.buffer.len(),
            "Ventana procesada"
        );

        Some(features)
    }

    /// Procesa una secuencia completa y devuelve todos los vectores producidos
    pub fn process_all<I>(&mut self, samples: I) -> Vec<FeatureVector>
    where
        I: IntoIterator<Item = RawSample>,
    {
        samples.into_iter().filter_map(|sample| self.push(sample)).collect()
    }

    /// Olvida el estado del filtro y las muestras acumuladas
    pub fn reset(&mut self) {
        self.state.reset();
        self.buffer.clear();
    }

    pub fn is_ready(&self) -> bool {
        self.buffer.is_ready()
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn layout(&self) -> &FeatureLayout {
        self.assembler.layout()
    }

    pub fn geometry(&self) -> WindowGeometry {
        self.geometry
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn filter_state(&self) -> FilterState {
        self.state
    }

    pub fn windows_emitted(&self) -> u64 {
        self.windows_emitted
    }
}
