use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use har_extractor::csv_loader::load_samples_from_csv;
use har_extractor::{HarPipeline, PipelineConfig};

/// Reproduce un CSV de muestras y vuelca las features de una ventana con su nombre
#[derive(Parser, Debug)]
#[command(name = "dump_features")]
struct Args {
    /// CSV con columnas accX,accY,accZ,gyroX,gyroY,gyroZ
    csv: PathBuf,

    /// Configuración TOML del pipeline
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ventana a volcar (0 = la primera)
    #[arg(long, default_value = "0")]
    window: usize,

    /// Omitir las posiciones reservadas y de relleno
    #[arg(long)]
    skip_reserved: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    println!("🎞️  Reproduciendo muestras desde {:?}", args.csv);

    let config = match &args.config {
        Some(path) => PipelineConfig::load_from_file(path)?,
        None => PipelineConfig::default(),
    };

    let samples = load_samples_from_csv(&args.csv)?;
    let mut pipeline = HarPipeline::new(config)?;
    let vectors = pipeline.process_all(samples.iter().copied());

    let Some(features) = vectors.get(args.window) else {
        bail!(
            "Sólo se produjeron {} ventanas ({} muestras, ventana de {})",
            vectors.len(),
            samples.len(),
            pipeline.geometry().window_size
        );
    };

    let layout = pipeline.layout();
    println!(
        "\n📊 {} features (orden exacto, {} calculadas):",
        layout.len(),
        layout.natural_len()
    );
    for (idx, (slot, value)) in layout.slots().iter().zip(features).enumerate() {
        if args.skip_reserved && idx >= layout.natural_len() {
            break;
        }
        if args.skip_reserved
            && matches!(slot, har_extractor::feature_layout::FeatureSlot::Reserved { .. })
        {
            continue;
        }
        println!("  {:03}: {:<40} {:>14.6}", idx, slot.name(), value);
    }

    Ok(())
}
