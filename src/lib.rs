//! Elevate Stats
//!
//! Activity statistics from a CSV export of the Elevate web extension.
//!
//! This library provides:
//! - `parser`: CSV rows to typed `Activity` records
//! - `aggregate`: year/type indices and the year-by-type totals tables
//! - `ranking`: top-N leaderboards, all-time and per year
//! - `report` / `html`: report assembly and HTML rendering
//! - `pipeline`: file-level entry points used by the CLI
//!
//! Binaries:
//! - `elevate-stats`: writes the stats page for one export

pub mod activity;
pub mod aggregate;
pub mod error;
pub mod html;
pub mod parser;
pub mod pipeline;
pub mod ranking;
pub mod report;

pub use activity::{Activity, ActivityType, ActivityTypeGroup, Measure};
pub use error::{MalformedRecordError, StatsError};
