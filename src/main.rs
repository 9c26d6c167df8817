/*
Reconocimiento de actividad en streaming a partir de muestras IMU.

1. Lee muestras (accX..gyroZ) desde un CSV o desde stdin
2. Un hilo productor alimenta el pipeline en orden estricto
3. Cada vector de 561 features viaja por un canal al hilo clasificador
4. Se clasifica (ONNX si está disponible, si no reglas) y se exporta a CSV

Ejemplo:
    RUST_LOG=debug ./target/release/har-extractor muestras.csv --export features.csv
*/

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossbeam_channel::bounded;
use tracing::{info, warn};

use har_extractor::classifier::{Classifier, RuleBasedClassifier, RuleThresholds};
use har_extractor::csv_loader::{load_samples_from_csv, read_samples};
use har_extractor::export::{ExportBuffer, ExportRecord, FeatureCsvWriter};
use har_extractor::feature_layout::FeatureLayout;
use har_extractor::{FeatureVector, HarPipeline, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "har-extractor")]
#[command(about = "Extracción de características UCI-HAR y clasificación de actividad")]
#[command(version)]
struct CliArgs {
    /// CSV con columnas accX,accY,accZ,gyroX,gyroY,gyroZ (stdin si se omite)
    input: Option<PathBuf>,

    /// Configuración TOML del pipeline
    #[arg(short, long, env = "HAR_CONFIG")]
    config: Option<PathBuf>,

    /// Exportar los vectores (y la predicción) a este CSV
    #[arg(long, value_name = "CSV")]
    export: Option<PathBuf>,

    /// Filas acumuladas antes de escribir al CSV
    #[arg(long, default_value = "32")]
    export_batch: usize,

    /// Modelo ONNX (requiere la feature `onnx`)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Etiquetas del modelo (classes.json)
    #[arg(long, default_value = "classes.json")]
    classes: PathBuf,

    /// Imprimir cada predicción como una línea JSON
    #[arg(long)]
    json: bool,
}

#[cfg(feature = "onnx")]
fn load_onnx(model: &Path, classes: &Path, dimension: usize) -> Option<Box<dyn Classifier>> {
    match har_extractor::classifier::OnnxClassifier::new(model, classes, dimension) {
        Ok(onnx) => Some(Box::new(onnx)),
        Err(e) => {
            warn!(error = %e, "Modelo no disponible, usando clasificador de reglas");
            None
        }
    }
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(model: &Path, _classes: &Path, _dimension: usize) -> Option<Box<dyn Classifier>> {
    warn!(
        model = %model.display(),
        "Compilado sin la feature `onnx`, usando clasificador de reglas"
    );
    None
}

fn build_classifier(args: &CliArgs, layout: &FeatureLayout) -> Box<dyn Classifier> {
    args.model
        .as_deref()
        .and_then(|model| load_onnx(model, &args.classes, layout.len()))
        .unwrap_or_else(|| {
            Box::new(RuleBasedClassifier::new(layout, RuleThresholds::default())) as Box<dyn Classifier>
        })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => PipelineConfig::load_from_file(path)?,
        None => PipelineConfig::default(),
    };
    let geometry = config.validate()?;
    let layout = FeatureLayout::new(config.feature_dimension);

    let samples = match &args.input {
        Some(path) => load_samples_from_csv(path)?,
        None => read_samples(std::io::stdin().lock()).context("No se pudo leer stdin")?,
    };
    info!(
        samples = samples.len(),
        window_size = geometry.window_size,
        overlap = geometry.overlap,
        "Muestras cargadas"
    );

    let mut classifier = build_classifier(&args, &layout);
    println!("🎯 Clasificador: {}", classifier.name());

    let mut exporter = match &args.export {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("No se pudo crear {:?}", path))?;
            Some((
                FeatureCsvWriter::new(BufWriter::new(file), &layout.names())?,
                ExportBuffer::new(args.export_batch),
            ))
        }
        None => None,
    };

    // Como mucho una ventana pendiente entre productor y consumidor
    let (tx, rx) = bounded::<(u64, FeatureVector)>(1);

    let producer = thread::spawn(move || -> Result<u64> {
        let mut pipeline = HarPipeline::new(config)?;
        for sample in samples {
            if let Some(features) = pipeline.push(sample) {
                if tx.send((pipeline.windows_emitted(), features)).is_err() {
                    break;
                }
            }
        }
        Ok(pipeline.windows_emitted())
    });

    for (window, features) in rx {
        let prediction = match classifier.classify(&features) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(window, error = %e, "Fallo al clasificar la ventana");
                None
            }
        };

        if let Some(p) = &prediction {
            if args.json {
                println!("{}", serde_json::json!({ "window": window, "prediction": p }));
            } else {
                println!("🪟 Ventana {:>4}: {:<20} {:>6.2}%", window, p.label, p.confidence * 100.0);
            }
        }

        if let Some((writer, buffer)) = exporter.as_mut() {
            let full = buffer.push(ExportRecord {
                window,
                prediction,
                features,
            });
            if full {
                buffer.flush_to(writer)?;
            }
        }
    }

    let windows = producer
        .join()
        .map_err(|_| anyhow!("El hilo productor terminó con pánico"))??;

    if let Some((mut writer, mut buffer)) = exporter {
        buffer.flush_to(&mut writer)?;
        info!(rows = writer.rows_written(), "Exportación completada");
    }

    println!("✅ {} ventanas procesadas", windows);
    Ok(())
}
