//! Conversion of raw CSV rows into [`Activity`] records.
//!
//! Rows are positional: the header is never consulted, so the column
//! order has to match the [`ColumnLayout`] of the export.

use crate::activity::{Activity, ActivityType};
use crate::error::{MalformedRecordError, StatsError};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::str::FromStr;

/// Largest magnitude accepted for distance, elevation gain, duration and
/// average climb. Keeps every sum over an in-memory list within `Decimal` range.
pub const MAX_MAGNITUDE: i64 = 1_000_000_000_000;

/// Column positions of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLayout {
    /// `startedAt, name, type, duration, distanceKm, elevationGainM`
    WithName,
    /// `startedAt, type, duration, distanceKm, elevationGainM`
    WithoutName,
}

impl ColumnLayout {
    fn started(self) -> usize {
        0
    }

    fn name(self) -> Option<usize> {
        match self {
            ColumnLayout::WithName => Some(1),
            ColumnLayout::WithoutName => None,
        }
    }

    fn offset(self) -> usize {
        match self {
            ColumnLayout::WithName => 1,
            ColumnLayout::WithoutName => 0,
        }
    }

    fn activity_type(self) -> usize {
        1 + self.offset()
    }

    fn duration(self) -> usize {
        2 + self.offset()
    }

    fn distance(self) -> usize {
        3 + self.offset()
    }

    fn elevation(self) -> usize {
        4 + self.offset()
    }

    /// Minimum number of fields a row must have.
    pub fn width(self) -> usize {
        5 + self.offset()
    }

    pub fn has_names(self) -> bool {
        self.name().is_some()
    }
}

/// Parse one row into an activity.
pub fn parse_record<S: AsRef<str>>(
    fields: &[S],
    layout: ColumnLayout,
) -> Result<Activity, MalformedRecordError> {
    if fields.len() < layout.width() {
        return Err(MalformedRecordError::MissingColumns {
            expected: layout.width(),
            found: fields.len(),
        });
    }
    let field = |i: usize| fields[i].as_ref();

    let activity = Activity {
        started: parse_started(field(layout.started()))?,
        activity_type: ActivityType::from_str(field(layout.activity_type()))?,
        name: layout.name().map(|i| field(i).to_string()),
        duration_seconds: parse_duration(field(layout.duration()))?,
        distance_km: parse_decimal("distance", field(layout.distance()))?,
        elevation_gain_m: parse_decimal("elevation gain", field(layout.elevation()))?,
    };

    let climb_in_range = activity
        .checked_avg_climb()
        .is_some_and(|climb| climb.abs() <= Decimal::from(MAX_MAGNITUDE));
    if !climb_in_range {
        return Err(MalformedRecordError::OutOfRange {
            field: "average climb",
            value: format!("{} / {}", activity.elevation_gain_m, activity.distance_km),
        });
    }

    Ok(activity)
}

/// Parse an ISO-8601 date-time with offset, e.g. `2023-01-01T08:00:00Z`.
///
/// Seconds and fractional seconds are optional; the date and time must be
/// separated by a literal `T`.
pub fn parse_started(text: &str) -> Result<DateTime<FixedOffset>, MalformedRecordError> {
    let normalized = match text.strip_suffix('Z') {
        Some(local) => Cow::Owned(format!("{}+00:00", local)),
        None => Cow::Borrowed(text),
    };

    DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f%:z")
        .or_else(|first| {
            DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z").map_err(|_| first)
        })
        .map_err(|source| MalformedRecordError::StartTime {
            value: text.to_string(),
            source,
        })
}

/// Parse all rows in order, stopping at the first malformed one.
pub fn parse_records<S: AsRef<str>>(
    rows: &[Vec<S>],
    layout: ColumnLayout,
) -> Result<Vec<Activity>, StatsError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            parse_record(row, layout)
                .map_err(|source| StatsError::MalformedRecord { row: i + 1, source })
        })
        .collect()
}

/// Parse an `H:M:S` duration into whole seconds.
pub fn parse_duration(text: &str) -> Result<Decimal, MalformedRecordError> {
    let malformed = || MalformedRecordError::Duration(text.to_string());

    let parts: Vec<&str> = text.split(':').collect();
    let [h, m, s] = parts.as_slice() else {
        return Err(malformed());
    };
    let h: u64 = h.parse().map_err(|_| malformed())?;
    let m: u64 = m.parse().map_err(|_| malformed())?;
    let s: u64 = s.parse().map_err(|_| malformed())?;

    let total = h
        .checked_mul(3600)
        .and_then(|t| t.checked_add(m.checked_mul(60)?))
        .and_then(|t| t.checked_add(s))
        .filter(|t| *t <= MAX_MAGNITUDE as u64)
        .ok_or_else(malformed)?;
    Ok(Decimal::from(total))
}

/// Parse a plain or scientific-notation decimal of at most [`MAX_MAGNITUDE`].
fn parse_decimal(field: &'static str, text: &str) -> Result<Decimal, MalformedRecordError> {
    let malformed = || MalformedRecordError::Decimal {
        field,
        value: text.to_string(),
    };
    // rust_decimal skips '_' digit separators
    if text.contains('_') {
        return Err(malformed());
    }

    let value = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| malformed())?;
    if value.abs() > Decimal::from(MAX_MAGNITUDE) {
        return Err(MalformedRecordError::OutOfRange {
            field,
            value: text.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1:02:03").unwrap(), Decimal::from(3723));
        assert_eq!(parse_duration("0:30:00").unwrap(), Decimal::from(1800));
        assert_eq!(parse_duration("0:00:00").unwrap(), Decimal::ZERO);
        assert_eq!(parse_duration("26:00:00").unwrap(), Decimal::from(93600));
        // minutes and seconds are not range checked
        assert_eq!(parse_duration("0:75:00").unwrap(), Decimal::from(4500));
    }

    #[test]
    fn test_parse_duration_wrong_arity() {
        assert!(matches!(
            parse_duration("1:2"),
            Err(MalformedRecordError::Duration(ref s)) if s == "1:2"
        ));
        assert!(parse_duration("1:2:3:4").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("3723").is_err());
    }

    #[test]
    fn test_parse_duration_non_numeric() {
        assert!(parse_duration("1:xx:03").is_err());
        assert!(parse_duration("1::03").is_err());
        assert!(parse_duration("-1:00:00").is_err());
        assert!(parse_duration("1.5:00:00").is_err());
    }

    #[test]
    fn test_parse_record_with_name() {
        let row = [
            "2023-06-01T08:00:00+02:00",
            "Morning ride",
            "Ride",
            "1:00:00",
            "20.0",
            "100",
        ];
        let a = parse_record(&row, ColumnLayout::WithName).unwrap();
        assert_eq!(a.activity_type, ActivityType::Ride);
        assert_eq!(a.name.as_deref(), Some("Morning ride"));
        assert_eq!(a.duration_seconds, Decimal::from(3600));
        assert_eq!(a.distance_km, dec("20.0"));
        assert_eq!(a.elevation_gain_m, dec("100"));
        assert_eq!(a.started.year(), 2023);
        assert_eq!(a.started.hour(), 8);
        assert_eq!(a.started.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_parse_record_without_name() {
        let row = ["2023-01-01T08:00:00Z", "Run", "0:30:00", "5.0", "50"];
        let a = parse_record(&row, ColumnLayout::WithoutName).unwrap();
        assert_eq!(a.activity_type, ActivityType::Run);
        assert_eq!(a.name, None);
        assert_eq!(a.duration_seconds, Decimal::from(1800));
        assert_eq!(a.distance_km, dec("5.0"));
    }

    #[test]
    fn test_parse_record_negative_elevation_is_kept() {
        let row = ["2023-01-01T08:00:00Z", "Walk", "0:10:00", "1.2", "-3.5"];
        let a = parse_record(&row, ColumnLayout::WithoutName).unwrap();
        assert_eq!(a.elevation_gain_m, dec("-3.5"));
    }

    #[test]
    fn test_parse_record_errors() {
        let bad_date = ["2023-01-01 08:00", "Run", "0:30:00", "5.0", "50"];
        assert!(matches!(
            parse_record(&bad_date, ColumnLayout::WithoutName),
            Err(MalformedRecordError::StartTime { .. })
        ));

        let bad_type = ["2023-01-01T08:00:00Z", "Swim", "0:30:00", "5.0", "50"];
        assert!(matches!(
            parse_record(&bad_type, ColumnLayout::WithoutName),
            Err(MalformedRecordError::UnknownType(_))
        ));

        let bad_distance = ["2023-01-01T08:00:00Z", "Run", "0:30:00", "1,000.5", "50"];
        assert!(matches!(
            parse_record(&bad_distance, ColumnLayout::WithoutName),
            Err(MalformedRecordError::Decimal { field: "distance", .. })
        ));

        let underscored = ["2023-01-01T08:00:00Z", "Run", "0:30:00", "1_000", "5_0"];
        assert!(matches!(
            parse_record(&underscored, ColumnLayout::WithoutName),
            Err(MalformedRecordError::Decimal { field: "distance", .. })
        ));

        let short = ["2023-01-01T08:00:00Z", "Run", "0:30:00"];
        assert!(matches!(
            parse_record(&short, ColumnLayout::WithoutName),
            Err(MalformedRecordError::MissingColumns { expected: 5, found: 3 })
        ));
    }

    #[test]
    fn test_parse_record_start_time_without_seconds() {
        let row = ["2023-01-01T08:00Z", "Run", "0:30:00", "5.0", "50"];
        let a = parse_record(&row, ColumnLayout::WithoutName).unwrap();
        assert_eq!(a.started.hour(), 8);
        assert_eq!(a.started.second(), 0);

        let offset = parse_started("2023-06-01T08:15+02:00").unwrap();
        assert_eq!(offset.minute(), 15);
        assert_eq!(offset.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_parse_started_formats() {
        let fractional = parse_started("2023-06-01T08:15:30.250-05:00").unwrap();
        assert_eq!(fractional.second(), 30);
        assert_eq!(fractional.nanosecond(), 250_000_000);
        assert_eq!(fractional.offset().local_minus_utc(), -5 * 3600);

        assert!(matches!(
            parse_started("2023-01-01 08:00:00Z"),
            Err(MalformedRecordError::StartTime { .. })
        ));
        assert!(parse_started("2023-01-01T08:00:00").is_err());
        assert!(parse_started("2023-01-01").is_err());
    }

    #[test]
    fn test_parse_record_rejects_out_of_range_values() {
        let huge = ["2023-01-01T08:00:00Z", "Ride", "1:00:00", "20.0", "5e28"];
        assert!(matches!(
            parse_record(&huge, ColumnLayout::WithoutName),
            Err(MalformedRecordError::OutOfRange { field: "elevation gain", .. })
        ));

        let huge_distance = ["2023-01-01T08:00:00Z", "Ride", "1:00:00", "-2000000000000", "5"];
        assert!(matches!(
            parse_record(&huge_distance, ColumnLayout::WithoutName),
            Err(MalformedRecordError::OutOfRange { field: "distance", .. })
        ));

        let steep = [
            "2023-01-01T08:00:00Z",
            "Hike",
            "1:00:00",
            "0.00000000000000000001",
            "1000",
        ];
        assert!(matches!(
            parse_record(&steep, ColumnLayout::WithoutName),
            Err(MalformedRecordError::OutOfRange { field: "average climb", .. })
        ));

        assert!(parse_duration("1000000000:00:00").is_err());

        let limit = ["2023-01-01T08:00:00Z", "Ride", "1:00:00", "1000000000000", "0"];
        assert!(parse_record(&limit, ColumnLayout::WithoutName).is_ok());
    }

    #[test]
    fn test_parse_records_reports_row_number() {
        let rows = vec![
            vec!["2023-01-01T08:00:00Z", "Run", "0:30:00", "5.0", "50"],
            vec!["2023-01-02T08:00:00Z", "Run", "1:2", "5.0", "50"],
        ];
        let err = parse_records(&rows, ColumnLayout::WithoutName).unwrap_err();
        match err {
            StatsError::MalformedRecord { row, source } => {
                assert_eq!(row, 2);
                assert!(matches!(source, MalformedRecordError::Duration(_)));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_parse_records_keeps_input_order() {
        let rows = vec![
            vec!["2024-01-01T08:00:00Z", "Run", "0:30:00", "5.0", "50"],
            vec!["2023-01-01T08:00:00Z", "Hike", "2:00:00", "8.0", "600"],
        ];
        let activities = parse_records(&rows, ColumnLayout::WithoutName).unwrap();
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].year(), 2024);
        assert_eq!(activities[1].activity_type, ActivityType::Hike);
    }
}
