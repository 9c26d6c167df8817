use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;

use crate::types::RawSample;

/// Columnas obligatorias, en el orden de `RawSample`
pub const SAMPLE_COLUMNS: [&str; 6] = ["accX", "accY", "accZ", "gyroX", "gyroY", "gyroZ"];

/// Carga una secuencia de RawSample desde un CSV con cabecera
/// accX,accY,accZ,gyroX,gyroY,gyroZ (columnas extra se ignoran).
pub fn load_samples_from_csv(path: impl AsRef<Path>) -> Result<Vec<RawSample>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;
    read_samples(file).with_context(|| format!("CSV inválido: {:?}", path))
}

pub fn read_samples<R: Read>(reader: R) -> Result<Vec<RawSample>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().context("No se pudo leer la cabecera")?.clone();
    let mut columns = [0usize; 6];
    for (slot, name) in columns.iter_mut().zip(SAMPLE_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("Falta la columna {}", name))?;
    }

    let mut samples = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Fila {} inválida", row_idx + 1))?;

        let mut values = [0.0f32; 6];
        for (value, (&col, name)) in values.iter_mut().zip(columns.iter().zip(SAMPLE_COLUMNS)) {
            let Some(field) = record.get(col) else {
                bail!("La fila {} no tiene la columna {}", row_idx + 1, name);
            };
            *value = field
                .parse()
                .with_context(|| format!("{} inválido en fila {}: {:?}", name, row_idx + 1, field))?;
        }

        samples.push(RawSample::new(
            [values[0], values[1], values[2]],
            [values[3], values[4], values[5]],
        ));
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_columns_by_name() {
        let data = "t,gyroX,gyroY,gyroZ,accX,accY,accZ\n0,0.1,0.2,0.3,1,2,9.8\n1, 0.4 ,0.5,0.6,3,4,9.7\n";
        let samples = read_samples(data.as_bytes()).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], RawSample::new([1.0, 2.0, 9.8], [0.1, 0.2, 0.3]));
        assert_eq!(samples[1].gyro_x, 0.4);
    }

    #[test]
    fn missing_column_is_an_error() {
        let data = "accX,accY,accZ,gyroX,gyroY\n1,2,3,4,5\n";
        let err = read_samples(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("gyroZ"));
    }

    #[test]
    fn bad_number_reports_row() {
        let data = "accX,accY,accZ,gyroX,gyroY,gyroZ\n1,2,3,4,5,6\n1,2,x,4,5,6\n";
        let err = read_samples(data.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("fila 2"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "accX,accY,accZ,gyroX,gyroY,gyroZ").unwrap();
        for i in 0..5 {
            writeln!(file, "{},0,9.8,0,0,0", i).unwrap();
        }

        let samples = load_samples_from_csv(file.path()).unwrap();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[4].acc_x, 4.0);
    }
}
