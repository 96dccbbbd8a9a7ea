//! Report record types for CACTI cache-model output analysis.
//!
//! This crate defines the data model shared by the extraction library and
//! the command-line tool:
//!
//! - [`ReportRecord`]: one per report file, a file name plus a
//!   [`ReportOutcome`].
//! - [`ReportOutcome`]: valid (with a [`ValidReport`] payload), invalid or
//!   error (with a reason).
//! - [`Metric`] and [`MetricValue`]: the fixed metric vocabulary and the
//!   number-or-text values matched for it.
//! - [`AreaMetrics`]: height, width and their product, present together.
//!
//! # Example
//!
//! ```
//! use cacti_report_core::*;
//!
//! let mut report = ValidReport::default();
//! report.metrics.insert(Metric::AccessTime, MetricValue::Number(1.25));
//! report.area = Some(AreaMetrics::new(2.0, 3.0));
//!
//! let record = ReportRecord::valid("cache_4096_64_8.out", report);
//! assert_eq!(record.status(), ReportStatus::Valid);
//! assert_eq!(record.valid_report().unwrap().area.unwrap().area_mm2, 6.0);
//! ```

mod types;

pub use types::*;
