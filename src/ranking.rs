//! Top-N leaderboards.

use crate::activity::{Activity, Measure};
use crate::aggregate::{ActivityIndex, Column};
use rust_decimal::Decimal;

/// The `n` activities with the highest `measure`, highest first.
///
/// The sort is stable: activities with equal values keep their input order.
pub fn top_n<'a, I, F>(activities: I, measure: F, n: usize) -> Vec<&'a Activity>
where
    I: IntoIterator<Item = &'a Activity>,
    F: Fn(&Activity) -> Decimal,
{
    let mut keyed: Vec<(Decimal, &'a Activity)> =
        activities.into_iter().map(|a| (measure(a), a)).collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().take(n).map(|(_, a)| a).collect()
}

/// Top-N of one year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearBoard<'a> {
    pub year: i32,
    pub entries: Vec<&'a Activity>,
}

/// Independent top-N per year for `subject`, ascending by year.
///
/// Years without any activity for `subject` are left out.
pub fn top_n_by_year<'a>(
    index: &ActivityIndex<'a>,
    subject: Column,
    measure: Measure,
    n: usize,
) -> Vec<YearBoard<'a>> {
    index
        .years_of(subject)
        .into_iter()
        .map(|year| YearBoard {
            year,
            entries: top_n(index.select(subject, Some(year)), |a| measure.value(a), n),
        })
        .collect()
}

/// All-time and per-year top-N of one measure for one type or group.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard<'a> {
    pub subject: Column,
    pub measure: Measure,
    pub size: usize,
    pub all_time: Vec<&'a Activity>,
    pub by_year: Vec<YearBoard<'a>>,
}

impl<'a> Leaderboard<'a> {
    pub fn build(index: &ActivityIndex<'a>, subject: Column, measure: Measure, size: usize) -> Self {
        Self {
            subject,
            measure,
            size,
            all_time: top_n(index.select(subject, None), |a| measure.value(a), size),
            by_year: top_n_by_year(index, subject, measure, size),
        }
    }

    /// e.g. "Top 10 distance (km) - Cycling"
    pub fn title(&self) -> String {
        format!("Top {} {} - {}", self.size, self.measure.label(), self.subject)
    }
}
