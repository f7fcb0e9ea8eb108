//! Grouped views over a parsed activity list and sums over them.
//!
//! The indices store input positions rather than references, so any subset
//! can be rebuilt as a set union of index entries and handed back in
//! input order.

use crate::activity::{Activity, ActivityType, ActivityTypeGroup, Measure};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

/// Sum `measure` over `activities`. Zero for an empty subset.
///
/// Saturates at `Decimal::MAX`/`MIN`; parsed values are bounded well below that.
pub fn sum_measure<'a, I, F>(activities: I, measure: F) -> Decimal
where
    I: IntoIterator<Item = &'a Activity>,
    F: Fn(&Activity) -> Decimal,
{
    activities
        .into_iter()
        .fold(Decimal::ZERO, |sum, a| sum.saturating_add(measure(a)))
}

/// What a table column (or a leaderboard) selects from the activity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Group(ActivityTypeGroup),
    Type(ActivityType),
    All,
}

impl Column {
    /// Columns of a cross table: groups, then types, then `All`.
    pub fn cross_table_columns() -> Vec<Column> {
        ActivityTypeGroup::ALL
            .iter()
            .map(|g| Column::Group(*g))
            .chain(ActivityType::ALL.iter().map(|t| Column::Type(*t)))
            .chain(std::iter::once(Column::All))
            .collect()
    }

    /// Style tag used to color-code cells.
    pub fn style_tag(self) -> &'static str {
        match self {
            Column::Group(group) => group.name(),
            Column::Type(t) => t.name(),
            Column::All => "all",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Group(group) => f.write_str(group.name()),
            Column::Type(t) => f.write_str(t.name()),
            Column::All => f.write_str("All"),
        }
    }
}

/// Year, type and type-by-year indices over one immutable activity list.
#[derive(Debug)]
pub struct ActivityIndex<'a> {
    activities: &'a [Activity],
    by_year: BTreeMap<i32, Vec<usize>>,
    by_type: BTreeMap<ActivityType, Vec<usize>>,
    by_type_and_year: BTreeMap<ActivityType, BTreeMap<i32, Vec<usize>>>,
}

impl<'a> ActivityIndex<'a> {
    pub fn new(activities: &'a [Activity]) -> Self {
        let mut by_year: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        let mut by_type: BTreeMap<ActivityType, Vec<usize>> = BTreeMap::new();
        let mut by_type_and_year: BTreeMap<ActivityType, BTreeMap<i32, Vec<usize>>> =
            BTreeMap::new();

        for (pos, activity) in activities.iter().enumerate() {
            let year = activity.year();
            by_year.entry(year).or_default().push(pos);
            by_type.entry(activity.activity_type).or_default().push(pos);
            by_type_and_year
                .entry(activity.activity_type)
                .or_default()
                .entry(year)
                .or_default()
                .push(pos);
        }

        log::debug!(
            "Indexed {} activities over {} years and {} types",
            activities.len(),
            by_year.len(),
            by_type.len()
        );

        Self {
            activities,
            by_year,
            by_type,
            by_type_and_year,
        }
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.by_year.keys().copied().collect()
    }

    pub fn year(&self, year: i32) -> Vec<&'a Activity> {
        self.resolve(self.by_year.get(&year).map(Vec::as_slice).unwrap_or(&[]))
    }

    pub fn of_type(&self, activity_type: ActivityType) -> Vec<&'a Activity> {
        self.resolve(self.type_positions(activity_type, None))
    }

    pub fn of_type_in_year(&self, activity_type: ActivityType, year: i32) -> Vec<&'a Activity> {
        self.resolve(self.type_positions(activity_type, Some(year)))
    }

    /// Activities selected by `column`, restricted to `year` when given.
    ///
    /// Groups are the set union of their member types' entries, in input order.
    pub fn select(&self, column: Column, year: Option<i32>) -> Vec<&'a Activity> {
        match column {
            Column::All => match year {
                Some(y) => self.year(y),
                None => self.activities.iter().collect(),
            },
            Column::Type(t) => self.resolve(self.type_positions(t, year)),
            Column::Group(group) => {
                let mut union: Vec<usize> = group
                    .types()
                    .iter()
                    .flat_map(|t| self.type_positions(*t, year).iter().copied())
                    .collect();
                union.sort_unstable();
                union.dedup();
                self.resolve(&union)
            }
        }
    }

    /// Years in which `column` has at least one activity, ascending.
    pub fn years_of(&self, column: Column) -> Vec<i32> {
        self.years()
            .into_iter()
            .filter(|y| !self.select(column, Some(*y)).is_empty())
            .collect()
    }

    fn type_positions(&self, activity_type: ActivityType, year: Option<i32>) -> &[usize] {
        let positions = match year {
            Some(y) => self
                .by_type_and_year
                .get(&activity_type)
                .and_then(|years| years.get(&y)),
            None => self.by_type.get(&activity_type),
        };
        positions.map(Vec::as_slice).unwrap_or(&[])
    }

    fn resolve(&self, positions: &[usize]) -> Vec<&'a Activity> {
        positions.iter().map(|&pos| &self.activities[pos]).collect()
    }
}

/// Row label of a cross table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLabel {
    Year(i32),
    Total,
}

impl fmt::Display for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLabel::Year(y) => write!(f, "{}", y),
            RowLabel::Total => f.write_str("Total"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossRow {
    pub label: RowLabel,
    /// One value per column of the owning table
    pub cells: Vec<Decimal>,
}

/// Year-by-column totals of one measure, with a trailing `Total` row.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTable {
    pub measure: Measure,
    pub columns: Vec<Column>,
    pub rows: Vec<CrossRow>,
    pub total: CrossRow,
}

impl CrossTable {
    pub fn build(index: &ActivityIndex<'_>, measure: Measure) -> Self {
        let columns = Column::cross_table_columns();
        let row = |label: RowLabel| {
            let year = match label {
                RowLabel::Year(y) => Some(y),
                RowLabel::Total => None,
            };
            let cells = columns
                .iter()
                .map(|c| sum_measure(index.select(*c, year), |a| measure.value(a)))
                .collect();
            CrossRow { label, cells }
        };

        let rows = index
            .years()
            .into_iter()
            .map(|y| row(RowLabel::Year(y)))
            .collect();
        let total = row(RowLabel::Total);

        Self {
            measure,
            columns,
            rows,
            total,
        }
    }

    /// Value at (`label`, `column`), if both exist.
    pub fn cell(&self, label: RowLabel, column: Column) -> Option<Decimal> {
        let col = self.columns.iter().position(|c| *c == column)?;
        let row = match label {
            RowLabel::Total => &self.total,
            RowLabel::Year(_) => self.rows.iter().find(|r| r.label == label)?,
        };
        row.cells.get(col).copied()
    }
}
