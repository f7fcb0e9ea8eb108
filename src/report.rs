//! Assembles aggregate tables and leaderboards into one report.
//!
//! The three export flavours only differ in columns and sections, so a
//! single [`ReportConfig`] drives all of them.

use crate::activity::{ActivityType, ActivityTypeGroup, Measure};
use crate::aggregate::{ActivityIndex, Column, CrossTable};
use crate::parser::ColumnLayout;
use crate::ranking::Leaderboard;

/// Default leaderboard size
pub const DEFAULT_TOP_N: usize = 10;

/// Predefined report flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportVariant {
    /// Named activities, aggregates and leaderboards
    #[default]
    Full,
    /// Export without a name column; leaderboards omit names
    Anonymous,
    /// Aggregate tables only
    Totals,
}

/// Which subjects get leaderboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardScope {
    pub groups: bool,
    pub types: bool,
}

impl LeaderboardScope {
    /// Groups first, then types, each in declaration order.
    pub fn subjects(self) -> Vec<Column> {
        let mut subjects = Vec::new();
        if self.groups {
            subjects.extend(ActivityTypeGroup::ALL.iter().map(|g| Column::Group(*g)));
        }
        if self.types {
            subjects.extend(ActivityType::ALL.iter().map(|t| Column::Type(*t)));
        }
        subjects
    }
}

/// Configuration for a report run
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Column layout of the input export
    pub layout: ColumnLayout,
    /// Page title and top-level heading
    pub title: String,
    /// One year-by-type table per measure, in order
    pub aggregate_measures: Vec<Measure>,
    /// One leaderboard per measure and subject, measure-major
    pub leaderboard_measures: Vec<Measure>,
    pub leaderboard_scope: LeaderboardScope,
    /// Entries per leaderboard table
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::for_variant(ReportVariant::Full)
    }
}

impl ReportConfig {
    pub fn for_variant(variant: ReportVariant) -> Self {
        let layout = match variant {
            ReportVariant::Full | ReportVariant::Totals => ColumnLayout::WithName,
            ReportVariant::Anonymous => ColumnLayout::WithoutName,
        };
        let leaderboard_measures = match variant {
            ReportVariant::Full | ReportVariant::Anonymous => {
                vec![Measure::Distance, Measure::ElevationGain, Measure::AvgClimb]
            }
            ReportVariant::Totals => Vec::new(),
        };
        Self {
            layout,
            title: "Activity stats".to_string(),
            aggregate_measures: vec![
                Measure::Distance,
                Measure::ElevationGain,
                Measure::DurationMinutes,
            ],
            leaderboard_measures,
            leaderboard_scope: LeaderboardScope {
                groups: true,
                types: true,
            },
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Set the leaderboard size
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

/// One block of the report.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<'a> {
    Aggregate(CrossTable),
    Leaderboard(Leaderboard<'a>),
}

/// Structured report, ready for rendering.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub title: String,
    /// Whether leaderboard rows carry activity names
    pub show_names: bool,
    pub sections: Vec<Section<'a>>,
}

impl<'a> Report<'a> {
    pub fn aggregates(&self) -> impl Iterator<Item = &CrossTable> {
        self.sections.iter().filter_map(|s| match s {
            Section::Aggregate(t) => Some(t),
            Section::Leaderboard(_) => None,
        })
    }

    pub fn leaderboards(&self) -> impl Iterator<Item = &Leaderboard<'a>> {
        self.sections.iter().filter_map(|s| match s {
            Section::Aggregate(_) => None,
            Section::Leaderboard(b) => Some(b),
        })
    }
}

/// Build every section `config` asks for: aggregate tables first, then
/// leaderboards by measure, groups before types.
pub fn assemble_report<'a>(index: &ActivityIndex<'a>, config: &ReportConfig) -> Report<'a> {
    let mut sections = Vec::new();

    for measure in &config.aggregate_measures {
        log::debug!("Building {}", measure.aggregate_title());
        sections.push(Section::Aggregate(CrossTable::build(index, *measure)));
    }

    let subjects = config.leaderboard_scope.subjects();
    for measure in &config.leaderboard_measures {
        log::debug!("Ranking {} for {} subjects", measure.label(), subjects.len());
        for subject in &subjects {
            sections.push(Section::Leaderboard(Leaderboard::build(
                index,
                *subject,
                *measure,
                config.top_n,
            )));
        }
    }

    Report {
        title: config.title.clone(),
        show_names: config.layout.has_names(),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::tests::activity;
    use crate::activity::Activity;

    fn fixture() -> Vec<Activity> {
        vec![
            activity("2023-01-01T08:00:00Z", ActivityType::Run, 1800, "5.0", "50"),
            activity("2023-06-01T08:00:00Z", ActivityType::Ride, 3600, "20.0", "100"),
        ]
    }

    #[test]
    fn test_config_variants() {
        let full = ReportConfig::for_variant(ReportVariant::Full);
        assert_eq!(full.layout, ColumnLayout::WithName);
        assert_eq!(full.leaderboard_measures.len(), 3);
        assert_eq!(full.top_n, 10);

        let anonymous = ReportConfig::for_variant(ReportVariant::Anonymous);
        assert_eq!(anonymous.layout, ColumnLayout::WithoutName);
        assert_eq!(anonymous.aggregate_measures, full.aggregate_measures);

        let totals = ReportConfig::for_variant(ReportVariant::Totals);
        assert!(totals.leaderboard_measures.is_empty());

        assert_eq!(ReportConfig::default().with_top_n(3).top_n, 3);
    }

    #[test]
    fn test_section_order() {
        let activities = fixture();
        let index = ActivityIndex::new(&activities);
        let report = assemble_report(&index, &ReportConfig::default());

        let measures: Vec<_> = report.aggregates().map(|t| t.measure).collect();
        assert_eq!(
            measures,
            vec![Measure::Distance, Measure::ElevationGain, Measure::DurationMinutes]
        );

        // (2 groups + 7 types) x 3 measures
        let titles: Vec<_> = report.leaderboards().map(|b| b.title()).collect();
        assert_eq!(titles.len(), 27);
        assert_eq!(titles[0], "Top 10 distance (km) - Cycling");
        assert_eq!(titles[1], "Top 10 distance (km) - Walking");
        assert_eq!(titles[2], "Top 10 distance (km) - Run");
        assert_eq!(titles[9], "Top 10 elevation gain (m) - Cycling");
        assert_eq!(titles[26], "Top 10 climb (m/km) - Rowing");

        // aggregates come before any leaderboard
        assert!(matches!(report.sections[2], Section::Aggregate(_)));
        assert!(matches!(report.sections[3], Section::Leaderboard(_)));
    }

    #[test]
    fn test_scope_subjects() {
        let groups_only = LeaderboardScope {
            groups: true,
            types: false,
        };
        assert_eq!(
            groups_only.subjects(),
            vec![
                Column::Group(ActivityTypeGroup::Cycling),
                Column::Group(ActivityTypeGroup::Walking)
            ]
        );
        let none = LeaderboardScope {
            groups: false,
            types: false,
        };
        assert!(none.subjects().is_empty());
    }

    #[test]
    fn test_totals_variant_has_no_leaderboards() {
        let activities = fixture();
        let index = ActivityIndex::new(&activities);
        let report = assemble_report(&index, &ReportConfig::for_variant(ReportVariant::Totals));
        assert_eq!(report.sections.len(), 3);
        assert_eq!(report.leaderboards().count(), 0);
        assert!(report.show_names);
    }
}
