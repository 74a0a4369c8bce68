//! Read/write dashboard snapshot JSON files.
//!
//! A snapshot is the "portable" representation of a computed dashboard:
//! every indicator's report plus the composite probability, keyed by the
//! window it was computed for. Snapshots let a run be re-rendered or diffed
//! later without refetching anything.
//!
//! The schema is defined by `domain::SnapshotFile`.

use std::fs::File;
use std::path::Path;

use crate::app::pipeline::DashboardRun;
use crate::domain::{ms_to_date, SnapshotFile};
use crate::error::AppError;

/// Write a dashboard snapshot JSON file.
pub fn write_snapshot_json(path: &Path, run: &DashboardRun) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create snapshot JSON '{}': {e}",
            path.display()
        ))
    })?;

    let snapshot = SnapshotFile {
        tool: "rlens".to_string(),
        start_date: ms_to_date(run.range.start),
        end_date: ms_to_date(run.range.end),
        probability: run.probability,
        reports: run.reports.clone(),
    };

    serde_json::to_writer_pretty(file, &snapshot)
        .map_err(|e| AppError::usage(format!("Failed to write snapshot JSON: {e}")))?;

    Ok(())
}

/// Read a dashboard snapshot JSON file.
pub fn read_snapshot_json(path: &Path) -> Result<SnapshotFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to open snapshot JSON '{}': {e}",
            path.display()
        ))
    })?;
    let snapshot: SnapshotFile = serde_json::from_reader(file)
        .map_err(|e| AppError::usage(format!("Invalid snapshot JSON: {e}")))?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::{load_dashboard_data, run_dashboard};
    use crate::domain::DashConfig;
    use chrono::NaiveDate;

    #[test]
    fn snapshot_round_trips() {
        let config = DashConfig {
            offline: true,
            ..DashConfig::default()
        };
        let data = load_dashboard_data(None, &config).unwrap();
        let run = run_dashboard(
            &data,
            &config,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        );

        let dir = std::env::temp_dir();
        let path = dir.join("rlens_snapshot_test.json");
        write_snapshot_json(&path, &run).unwrap();
        let snapshot = read_snapshot_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(snapshot.tool, "rlens");
        assert_eq!(snapshot.probability, run.probability);
        assert_eq!(snapshot.reports.len(), run.reports.len());
        for (a, b) in snapshot.reports.iter().zip(&run.reports) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.display_series, b.display_series);
            assert_eq!(a.risk_level, b.risk_level);
        }
    }
}
