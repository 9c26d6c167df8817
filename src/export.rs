use std::io::Write;

use thiserror::Error;

use crate::classifier::Prediction;
use crate::types::FeatureVector;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Una fila exportada: índice de ventana, predicción opcional y el vector
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    pub window: u64,
    pub prediction: Option<Prediction>,
    pub features: FeatureVector,
}

/// Escritor CSV con cabecera `window,label,confidence,<nombres de features>`
pub struct FeatureCsvWriter<W: Write> {
    writer: csv::Writer<W>,
    rows_written: usize,
}

impl<W: Write> FeatureCsvWriter<W> {
    pub fn new(inner: W, feature_names: &[String]) -> Result<Self, ExportError> {
        let mut writer = csv::Writer::from_writer(inner);
        let mut header = vec!["window".to_string(), "label".to_string(), "confidence".to_string()];
        header.extend(feature_names.iter().cloned());
        writer.write_record(&header)?;

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    pub fn write(&mut self, record: &ExportRecord) -> Result<(), ExportError> {
        let (label, confidence) = match &record.prediction {
            Some(p) => (p.label.clone(), p.confidence.to_string()),
            None => (String::new(), String::new()),
        };

        let mut row = Vec::with_capacity(record.features.len() + 3);
        row.push(record.window.to_string());
        row.push(label);
        row.push(confidence);
        row.extend(record.features.iter().map(|v| v.to_string()));

        self.writer.write_record(&row)?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ExportError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn into_inner(self) -> Result<W, ExportError> {
        self.writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }
}

/// Acumulador de filas con capacidad fija, propiedad del llamador.
/// `push` indica cuándo está lleno; `flush_to` vacía todas las filas en orden.
#[derive(Debug, Clone)]
pub struct ExportBuffer {
    rows: Vec<ExportRecord>,
    capacity: usize,
}

impl ExportBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            rows: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Añade una fila y devuelve `true` si el buffer quedó lleno
    pub fn push(&mut self, record: ExportRecord) -> bool {
        self.rows.push(record);
        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.rows.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Escribe y descarta todas las filas; devuelve cuántas se escribieron
    pub fn flush_to<W: Write>(&mut self, sink: &mut FeatureCsvWriter<W>) -> Result<usize, ExportError> {
        let count = self.rows.len();
        for record in self.rows.drain(..) {
            sink.write(&record)?;
        }
        sink.flush()?;
        Ok(count)
    }
}
