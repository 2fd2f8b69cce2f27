//! Login Aggregation Module
//! Derives the dashboard tables (totals, breakdowns, time series) from a dataset.

use crate::data::{
    load_dataset, Dataset, LoadError, OptionalField, PreviewTable, PREVIEW_ROWS, STATUS_COLUMN,
    TIMESTAMP_COLUMN,
};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;

pub const SUCCESS_STATUS: &str = "success";
pub const FAILED_STATUS: &str = "failed";

const COUNT: &str = "count";
const DATE: &str = "date";
/// Days from 0001-01-01 to the Unix epoch, the origin of polars `Date` values.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Headline counts shown in the metric tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoginTotals {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

/// Value → count, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub entries: Vec<(String, usize)>,
    /// Rows whose value was null.
    pub missing: usize,
}

impl Breakdown {
    /// Sum of all counted categories, excluding `missing`.
    pub fn counted(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub status: String,
    pub count: usize,
}

/// Logins per (date, status), ordered by date then status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeSeries {
    pub points: Vec<TimeSeriesPoint>,
    /// Non-empty timestamp cells that failed to parse.
    pub coerced: usize,
    /// Rows left out of the series (null timestamp or null status).
    pub missing: usize,
}

impl TimeSeries {
    /// Distinct statuses in first-seen order.
    pub fn statuses(&self) -> Vec<&str> {
        let mut statuses: Vec<&str> = Vec::new();
        for point in &self.points {
            if !statuses.contains(&point.status.as_str()) {
                statuses.push(&point.status);
            }
        }
        statuses
    }

    /// Points for one status, in date order.
    pub fn for_status<'a>(&'a self, status: &'a str) -> impl Iterator<Item = &'a TimeSeriesPoint> {
        self.points.iter().filter(move |p| p.status == status)
    }

    pub fn counted(&self) -> usize {
        self.points.iter().map(|p| p.count).sum()
    }
}

/// Every table the dashboard draws, built from one load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub totals: LoginTotals,
    pub status: Breakdown,
    pub timeline: Option<TimeSeries>,
    pub devices: Option<Breakdown>,
    pub locations: Option<Breakdown>,
    pub preview: PreviewTable,
}

/// Handles the dashboard aggregations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Count rows and the two recognized statuses (case-insensitive).
    pub fn compute_totals(df: &DataFrame) -> PolarsResult<LoginTotals> {
        let count_status = |status: &str| -> PolarsResult<usize> {
            let matched = df
                .clone()
                .lazy()
                .filter(col(STATUS_COLUMN).str().to_lowercase().eq(lit(status)))
                .collect()?;
            Ok(matched.height())
        };

        Ok(LoginTotals {
            total: df.height(),
            success: count_status(SUCCESS_STATUS)?,
            failed: count_status(FAILED_STATUS)?,
        })
    }

    /// Frequency count of raw values in `column`, descending, ties in
    /// first-seen order.
    pub fn value_counts(df: &DataFrame, column: &str) -> PolarsResult<Breakdown> {
        let missing = df.column(column)?.null_count();

        let counts = df
            .clone()
            .lazy()
            .filter(col(column).is_not_null())
            .group_by_stable([col(column)])
            .agg([len().alias(COUNT)])
            .sort(
                [COUNT],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_maintain_order(true),
            )
            .collect()?;

        let values = counts.column(column)?.as_materialized_series().str()?;
        let lens = counts.column(COUNT)?.as_materialized_series().cast(&DataType::UInt64)?;
        let entries = values
            .into_iter()
            .zip(lens.u64()?)
            .filter_map(|(value, n)| Some((value?.to_string(), n? as usize)))
            .collect();

        Ok(Breakdown { entries, missing })
    }

    /// Group rows by (calendar date, status).
    ///
    /// `df` must carry the parsed Datetime `timestamp` column the loader builds.
    pub fn compute_time_series(df: &DataFrame, coerced: usize) -> PolarsResult<TimeSeries> {
        let grouped = df
            .clone()
            .lazy()
            .filter(
                col(TIMESTAMP_COLUMN)
                    .is_not_null()
                    .and(col(STATUS_COLUMN).is_not_null()),
            )
            .group_by([
                col(TIMESTAMP_COLUMN).dt().date().alias(DATE),
                col(STATUS_COLUMN),
            ])
            .agg([len().alias(COUNT)])
            .sort([DATE, STATUS_COLUMN], SortMultipleOptions::default())
            .collect()?;

        let days = grouped.column(DATE)?.as_materialized_series().cast(&DataType::Int32)?;
        let statuses = grouped.column(STATUS_COLUMN)?.as_materialized_series().str()?;
        let lens = grouped.column(COUNT)?.as_materialized_series().cast(&DataType::UInt64)?;

        let points: Vec<TimeSeriesPoint> = days
            .i32()?
            .into_iter()
            .zip(statuses)
            .zip(lens.u64()?)
            .filter_map(|((day, status), n)| {
                Some(TimeSeriesPoint {
                    date: NaiveDate::from_num_days_from_ce_opt(day? + EPOCH_DAYS_FROM_CE)?,
                    status: status?.to_string(),
                    count: n? as usize,
                })
            })
            .collect();

        let counted: usize = points.iter().map(|p| p.count).sum();
        Ok(TimeSeries {
            points,
            coerced,
            missing: df.height().saturating_sub(counted),
        })
    }

    /// Load `path` and build its report. Every call rereads the file.
    pub fn run(path: &Path) -> Result<DashboardReport, LoadError> {
        let dataset = load_dataset(path)?;
        Self::build_report(&dataset)
    }

    /// Run every aggregation the dataset's schema allows.
    pub fn build_report(dataset: &Dataset) -> Result<DashboardReport, LoadError> {
        let df = dataset.frame();

        let timeline = match dataset.column_for(OptionalField::Timestamp) {
            Some(_) => Some(Self::compute_time_series(df, dataset.coerced_timestamps())?),
            None => None,
        };
        let devices = dataset
            .column_for(OptionalField::Device)
            .map(|column| Self::value_counts(df, column))
            .transpose()?;
        let locations = dataset
            .column_for(OptionalField::Location)
            .map(|column| Self::value_counts(df, column))
            .transpose()?;

        Ok(DashboardReport {
            totals: Self::compute_totals(df)?,
            status: Self::value_counts(df, STATUS_COLUMN)?,
            timeline,
            devices,
            locations,
            preview: dataset.preview(PREVIEW_ROWS)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DEFAULT_CSV;
    use std::fs;
    use tempfile::TempDir;

    fn report_for(contents: &str) -> DashboardReport {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CSV);
        fs::write(&path, contents).unwrap();
        let dataset = load_dataset(&path).unwrap();
        StatsCalculator::build_report(&dataset).unwrap()
    }

    fn frame(name: &str, values: &[Option<&str>]) -> DataFrame {
        polars::df!(name => values).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn totals_are_case_insensitive() {
        let report = report_for("login_status\nSuccess\nfailed\nSUCCESS\n");
        assert_eq!(
            report.totals,
            LoginTotals {
                total: 3,
                success: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn other_statuses_only_count_toward_total() {
        let statuses = [Some("success"), Some("locked"), None, Some("FAILED"), Some(" success")];
        let totals = StatsCalculator::compute_totals(&frame(STATUS_COLUMN, &statuses)).unwrap();
        assert_eq!(totals.total, 5);
        assert_eq!(totals.success, 1);
        assert_eq!(totals.failed, 1);
        assert!(totals.success + totals.failed <= totals.total);
    }

    #[test]
    fn success_plus_failed_equals_total_when_only_known_statuses() {
        let statuses = [Some("Success"), Some("failed"), Some("FAILED")];
        let totals = StatsCalculator::compute_totals(&frame(STATUS_COLUMN, &statuses)).unwrap();
        assert_eq!(totals.success + totals.failed, totals.total);
    }

    #[test]
    fn status_breakdown_keeps_raw_values_by_frequency() {
        let report =
            report_for("login_status\nfailed\nSuccess\nsuccess\nsuccess\nSuccess\nSuccess\n");
        assert_eq!(
            report.status.entries,
            vec![
                ("Success".to_string(), 3),
                ("success".to_string(), 2),
                ("failed".to_string(), 1),
            ]
        );
        assert_eq!(report.status.counted() + report.status.missing, report.totals.total);
    }

    #[test]
    fn value_count_ties_keep_first_seen_order() {
        let values = [Some("tablet"), Some("mobile"), Some("desktop"), Some("mobile"), Some("desktop")];
        let breakdown =
            StatsCalculator::value_counts(&frame("device", &values), "device").unwrap();
        assert_eq!(
            breakdown.entries,
            vec![
                ("mobile".to_string(), 2),
                ("desktop".to_string(), 2),
                ("tablet".to_string(), 1),
            ]
        );
    }

    #[test]
    fn null_values_are_reported_as_missing() {
        let breakdown =
            StatsCalculator::value_counts(&frame("location", &[Some("a"), None, None]), "location")
                .unwrap();
        assert_eq!(breakdown.entries, vec![("a".to_string(), 1)]);
        assert_eq!(breakdown.missing, 2);
    }

    #[test]
    fn time_series_drops_unparsed_timestamps() {
        let report = report_for(
            "timestamp,login_status\n2024-01-01T08:00:00,success\nnot-a-date,failed\n",
        );
        let timeline = report.timeline.unwrap();

        assert_eq!(
            timeline.points,
            vec![TimeSeriesPoint {
                date: date(2024, 1, 1),
                status: "success".to_string(),
                count: 1,
            }]
        );
        assert_eq!(timeline.coerced, 1);
        assert_eq!(timeline.missing, 1);
        assert_eq!(report.totals.total, 2);
    }

    #[test]
    fn time_series_is_ordered_by_date_then_status() {
        let report = report_for(
            "timestamp,login_status\n\
             2024-01-02 10:00:00,success\n\
             2024-01-01 23:59:59,success\n\
             2024-01-02 01:00:00,failed\n\
             2024-01-01 00:00:01,success\n\
             2024-01-02 12:30:00,success\n",
        );
        let timeline = report.timeline.unwrap();
        let keys: Vec<(NaiveDate, &str, usize)> = timeline
            .points
            .iter()
            .map(|p| (p.date, p.status.as_str(), p.count))
            .collect();

        assert_eq!(
            keys,
            vec![
                (date(2024, 1, 1), "success", 2),
                (date(2024, 1, 2), "failed", 1),
                (date(2024, 1, 2), "success", 2),
            ]
        );
        assert_eq!(timeline.counted(), 5);
        assert_eq!(timeline.statuses(), vec!["success", "failed"]);
        assert_eq!(timeline.for_status("success").count(), 2);
    }

    #[test]
    fn time_series_sum_matches_parsed_rows() {
        let report = report_for(
            "timestamp,login_status\n2024-02-01,success\n,failed\n2024-02-03,failed\nnope,success\n",
        );
        let timeline = report.timeline.unwrap();
        assert_eq!(timeline.counted(), 2);
        assert_eq!(timeline.counted() + timeline.missing, report.totals.total);
    }

    #[test]
    fn absent_optional_columns_produce_no_aggregate() {
        let report = report_for("login_status,location\nsuccess,Paris\nfailed,Paris\n");
        assert!(report.devices.is_none());
        assert!(report.timeline.is_none());
        assert_eq!(
            report.locations.unwrap().entries,
            vec![("Paris".to_string(), 2)]
        );
    }

    #[test]
    fn quoted_empty_values_count_as_missing() {
        let report = report_for("login_status,device\nsuccess,\"\"\nfailed,\nsuccess,mobile\n");
        let devices = report.devices.unwrap();
        assert_eq!(devices.entries, vec![("mobile".to_string(), 1)]);
        assert_eq!(devices.missing, 2);
    }

    #[test]
    fn device_breakdown_uses_raw_values() {
        let report = report_for("login_status,Device\nsuccess,Mobile\nfailed,mobile\nsuccess,Mobile\n");
        let devices = report.devices.unwrap();
        assert_eq!(
            devices.entries,
            vec![("Mobile".to_string(), 2), ("mobile".to_string(), 1)]
        );
    }

    #[test]
    fn header_only_file_gives_empty_report() {
        let report = report_for("timestamp,login_status,device,location\n");
        assert_eq!(report.totals, LoginTotals::default());
        assert!(report.status.is_empty());
        assert!(report.timeline.unwrap().points.is_empty());
        assert!(report.devices.unwrap().is_empty());
        assert!(report.locations.unwrap().is_empty());
        assert!(report.preview.is_empty());
    }

    #[test]
    fn pipeline_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CSV);
        fs::write(
            &path,
            "timestamp,login_status,device,location\n\
             2024-01-01T08:00:00,success,mobile,NYC\n\
             2024-01-01T09:00:00,failed,desktop,LA\n\
             bad,success,mobile,NYC\n",
        )
        .unwrap();

        let first = StatsCalculator::run(&path).unwrap();
        let second = StatsCalculator::run(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_file_halts_the_run() {
        let dir = TempDir::new().unwrap();
        let err = StatsCalculator::run(&dir.path().join(DEFAULT_CSV)).unwrap_err();
        assert!(matches!(err, LoadError::DatasetNotFound(_)));
        assert!(err.to_string().contains(DEFAULT_CSV));
    }
}
