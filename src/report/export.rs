//! CSV export of forecasts

use super::{CorrelationMatrix, Forecast};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Write `date,actual,predicted` rows in chronological order
pub fn write_predictions<W: Write>(forecast: &Forecast, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for point in forecast.chronological() {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the correlation matrix with a leading header column
pub fn write_correlation<W: Write>(matrix: &CorrelationMatrix, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut header = vec![String::new()];
    header.extend(matrix.columns.iter().cloned());
    writer.write_record(&header)?;

    for (name, row) in matrix.rows() {
        let mut record = vec![name.to_string()];
        record.extend(row.iter().map(|v| format!("{:.4}", v)));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Save predictions to a CSV file
pub fn save_predictions(forecast: &Forecast, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_predictions(forecast, file)
}

/// Save the correlation matrix to a CSV file
pub fn save_correlation(matrix: &CorrelationMatrix, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_correlation(matrix, file)
}
