use std::path::Path;

use chrono::FixedOffset;

use crate::errors::AppError;
use crate::models::disposition::{DispositionRecord, SortKey};
use crate::utils::format::format_date;

/// Write records to a CSV file in the given order, one row per record,
/// columns in table order with dates formatted as on screen.
pub fn write_dispositions_csv(
    records: &[&DispositionRecord],
    offset: FixedOffset,
    path: &Path,
) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::FileWrite(format!("Cannot create CSV: {}", e)))?;

    wtr.write_record(SortKey::COLUMNS.iter().map(|k| k.label()))?;

    for r in records {
        let stock_date = format_date(r.stock_date.as_deref(), offset);
        let start = format_date(r.start.as_deref(), offset);
        let end = format_date(r.end.as_deref(), offset);
        wtr.write_record([
            r.symbol.as_str(),
            r.name.as_str(),
            stock_date.as_str(),
            r.market.as_deref().unwrap_or(""),
            start.as_str(),
            end.as_str(),
        ])?;
    }

    wtr.flush()
        .map_err(|e| AppError::FileWrite(e.to_string()))?;
    Ok(())
}
