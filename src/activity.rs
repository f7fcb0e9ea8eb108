//! Activity records and the closed sets they are classified by.

use crate::error::MalformedRecordError;
use chrono::{DateTime, Datelike, FixedOffset};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

/// Sport type of an activity, in report column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActivityType {
    Run,
    Ride,
    VirtualRide,
    Hike,
    Walk,
    Kayaking,
    Rowing,
}

impl ActivityType {
    /// All types in declaration order.
    pub const ALL: [ActivityType; 7] = [
        ActivityType::Run,
        ActivityType::Ride,
        ActivityType::VirtualRide,
        ActivityType::Hike,
        ActivityType::Walk,
        ActivityType::Kayaking,
        ActivityType::Rowing,
    ];

    /// Name as it appears in the CSV export.
    pub fn name(self) -> &'static str {
        match self {
            ActivityType::Run => "Run",
            ActivityType::Ride => "Ride",
            ActivityType::VirtualRide => "VirtualRide",
            ActivityType::Hike => "Hike",
            ActivityType::Walk => "Walk",
            ActivityType::Kayaking => "Kayaking",
            ActivityType::Rowing => "Rowing",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivityType {
    type Err = MalformedRecordError;

    /// Case-sensitive: "run" is not a `Run`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| MalformedRecordError::UnknownType(s.to_string()))
    }
}

/// Named union of related activity types, used for roll-up columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActivityTypeGroup {
    Cycling,
    Walking,
}

impl ActivityTypeGroup {
    pub const ALL: [ActivityTypeGroup; 2] = [ActivityTypeGroup::Cycling, ActivityTypeGroup::Walking];

    pub fn name(self) -> &'static str {
        match self {
            ActivityTypeGroup::Cycling => "Cycling",
            ActivityTypeGroup::Walking => "Walking",
        }
    }

    /// Member types of the group.
    pub fn types(self) -> &'static [ActivityType] {
        match self {
            ActivityTypeGroup::Cycling => &[ActivityType::Ride, ActivityType::VirtualRide],
            ActivityTypeGroup::Walking => &[ActivityType::Hike, ActivityType::Walk],
        }
    }
}

impl fmt::Display for ActivityTypeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One recorded exercise session.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    /// Start time with the offset it was recorded in
    pub started: DateTime<FixedOffset>,
    pub activity_type: ActivityType,
    /// Free-text title; `None` when the export has no name column
    pub name: Option<String>,
    /// Moving time in whole seconds
    pub duration_seconds: Decimal,
    pub distance_km: Decimal,
    /// Not checked for sign; corrupt exports can carry negative gain
    pub elevation_gain_m: Decimal,
}

impl Activity {
    /// Calendar year of the start time, in the recorded offset.
    pub fn year(&self) -> i32 {
        self.started.year()
    }

    /// Duration rounded up to whole minutes.
    pub fn duration_minutes(&self) -> Decimal {
        (self.duration_seconds / Decimal::from(60))
            .round_dp_with_strategy(0, RoundingStrategy::AwayFromZero)
    }

    /// Average climb in metres per kilometre, rounded half-up to 2 places.
    ///
    /// Zero when the distance is zero. Saturates at `Decimal::MAX`/`MIN` when
    /// the quotient is out of range; parsed activities never get there.
    pub fn avg_climb(&self) -> Decimal {
        self.checked_avg_climb().unwrap_or_else(|| {
            if self.elevation_gain_m.is_sign_negative() == self.distance_km.is_sign_negative() {
                Decimal::MAX
            } else {
                Decimal::MIN
            }
        })
    }

    /// Like [`avg_climb`](Self::avg_climb), but `None` on overflow.
    pub fn checked_avg_climb(&self) -> Option<Decimal> {
        if self.distance_km.is_zero() {
            return Some(Decimal::ZERO);
        }
        self.elevation_gain_m
            .checked_div(self.distance_km)
            .map(|climb| climb.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}

/// A numeric value of an activity that tables aggregate or rank by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    Distance,
    ElevationGain,
    DurationMinutes,
    AvgClimb,
}

impl Measure {
    pub fn value(self, activity: &Activity) -> Decimal {
        match self {
            Measure::Distance => activity.distance_km,
            Measure::ElevationGain => activity.elevation_gain_m,
            Measure::DurationMinutes => activity.duration_minutes(),
            Measure::AvgClimb => activity.avg_climb(),
        }
    }

    /// Lowercase label with unit, e.g. "distance (km)".
    pub fn label(self) -> &'static str {
        match self {
            Measure::Distance => "distance (km)",
            Measure::ElevationGain => "elevation gain (m)",
            Measure::DurationMinutes => "duration (min)",
            Measure::AvgClimb => "climb (m/km)",
        }
    }

    /// Heading of the year-by-type aggregate table for this measure.
    pub fn aggregate_title(self) -> &'static str {
        match self {
            Measure::Distance => "Distance aggregates (km)",
            Measure::ElevationGain => "Elevation gain aggregates (m)",
            Measure::DurationMinutes => "Duration aggregates (min)",
            Measure::AvgClimb => "Climb aggregates (m/km)",
        }
    }
}
