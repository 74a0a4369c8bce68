//! Export an indicator's computed series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per display point, with the moving-average value joined
//! on date where one exists.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{ms_to_date, IndicatorReport};
use crate::error::AppError;

/// Write one indicator's display series and moving-average line to CSV.
pub fn write_indicator_csv(path: &Path, report: &IndicatorReport) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "date,source,value,ma_value,risk")
        .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    let ma_by_date: HashMap<i64, f64> = report
        .ma_line
        .iter()
        .map(|p| (p.date, p.ma_value))
        .collect();

    let risk = format!("{:?}", report.risk_level).to_lowercase();
    for point in &report.display_series {
        writeln!(
            file,
            "{},{},{},{},{}",
            ms_to_date(point.date),
            report.source_id,
            point.value.map(|v| format!("{v:.6}")).unwrap_or_default(),
            ma_by_date
                .get(&point.date)
                .map(|v| format!("{v:.6}"))
                .unwrap_or_default(),
            risk,
        )
        .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
