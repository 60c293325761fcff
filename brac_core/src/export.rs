//! CSV export of a simulated time series.
//!
//! Three columns: time (h), BAC (g/L), BrAC (mg/L air).

use crate::{Result, SimulationOutput};
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    t_h: f64,
    #[serde(rename = "BAC_g_per_L")]
    bac_g_per_l: f64,
    #[serde(rename = "BrAC_mg_per_L")]
    brac_mg_per_l: f64,
}

fn write_rows<W: Write>(writer: &mut csv::Writer<W>, output: &SimulationOutput) -> Result<()> {
    for ((&t_h, &bac_g_per_l), &brac_mg_per_l) in
        output.times.iter().zip(&output.blood).zip(&output.breath)
    {
        writer.serialize(CsvRow {
            t_h,
            bac_g_per_l,
            brac_mg_per_l,
        })?;
    }
    Ok(())
}

/// Write the series to any writer, with a header row
pub fn write_csv_to<W: Write>(writer: W, output: &SimulationOutput) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    write_rows(&mut writer, output)?;
    writer.flush()?;
    Ok(())
}

/// Write the series to `path`, replacing any existing file
///
/// Parent directories are created as needed and the file is synced
/// to disk before returning.
pub fn write_csv(path: &Path, output: &SimulationOutput) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = std::fs::File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    write_rows(&mut writer, output)?;
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Wrote {} samples to {:?}", output.len(), path);

    Ok(output.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::default_catalog, simulate, IntakeEvent, ModelConfig, Subject};

    fn sample_output() -> SimulationOutput {
        simulate(
            &Subject::default(),
            &[IntakeEvent::new(0.0, 40.0, "liquor")],
            &ModelConfig::default(),
            default_catalog(),
            1.0,
            0.25,
        )
        .unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        let out = sample_output();
        let mut buf = Vec::new();
        write_csv_to(&mut buf, &out).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("t_h,BAC_g_per_L,BrAC_mg_per_L"));
        assert_eq!(lines.count(), 4);
    }

    #[test]
    fn test_write_csv_creates_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("runs").join("brac.csv");

        let out = sample_output();
        let count = write_csv(&csv_path, &out).unwrap();
        assert_eq!(count, 4);
        assert!(csv_path.exists());

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 4);
        let bac: f64 = rows[2][1].parse().unwrap();
        assert_eq!(bac, out.blood[2]);
    }

    #[test]
    fn test_write_csv_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("brac.csv");

        let out = sample_output();
        write_csv(&csv_path, &out).unwrap();
        write_csv(&csv_path, &out).unwrap();

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 4);
    }
}
