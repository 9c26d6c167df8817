use std::collections::VecDeque;

use crate::config::WindowGeometry;
use crate::types::ProcessedSample;

/// Vista sobre las últimas `window_size` muestras del buffer
pub type Window<'a> = &'a [ProcessedSample];

/// Buffer deslizante para acumular ventanas con solapamiento.
/// Nunca guarda más de `window_size` muestras.
#[derive(Debug, Clone)]
pub struct WindowBuffer {
    buffer: VecDeque<ProcessedSample>,
    window_size: usize,
    overlap: usize,
}

impl WindowBuffer {
    pub fn new(geometry: WindowGeometry) -> Self {
        Self {
            buffer: VecDeque::with_capacity(geometry.window_size),
            window_size: geometry.window_size,
            overlap: geometry.overlap,
        }
    }

    /// Añade una muestra. Si el buffer ya está lleno se descarta la más antigua.
    pub fn push(&mut self, sample: ProcessedSample) {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(sample);
    }

    /// Verifica si hay suficientes muestras para formar una ventana completa
    pub fn is_ready(&self) -> bool {
        self.buffer.len() >= self.window_size
    }

    /// Las últimas `window_size` muestras, sin copiar
    pub fn snapshot(&mut self) -> Option<Window<'_>> {
        if !self.is_ready() {
            return None;
        }
        let start = self.buffer.len() - self.window_size;
        Some(&self.buffer.make_contiguous()[start..])
    }

    /// Descarta las `overlap` muestras más antiguas; quedan `window_size - overlap`
    pub fn slide(&mut self) {
        let drop = self.overlap.min(self.buffer.len());
        self.buffer.drain(..drop);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
