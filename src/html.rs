//! HTML rendering of a [`Report`].

use crate::activity::Activity;
use crate::aggregate::{CrossRow, CrossTable, RowLabel};
use crate::ranking::Leaderboard;
use crate::report::{Report, Section};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use rust_decimal::{Decimal, RoundingStrategy};

const CSS: &str = r#"
html {
    font-size: 12pt;
    line-height: 1.2;
}
body {
    font-family: georgia;
    max-width: 1000px;
    margin: 0 auto;
}
table {
    border-collapse: collapse;
}
table, th, td {
    border: 1px solid black;
}
th, td {
    min-width: 80px;
    padding: 5px;
}
td.number {
    text-align: right;
}
td.Ride, td.VirtualRide, td.Cycling {
    background: #B1D4EC;
}
td.Walk, td.Hike, td.Walking {
    background: #F1D8C5;
}
td.Run {
    background: #F9F0C2;
}
td.Rowing {
    background: #B3B8DF;
}
td.Kayaking {
    background: #ECE9DD;
}
td.all {
    background: #D6F8E0;
}
td.total, td.all, th {
    font-weight: bold;
}
th {
    background: lightgray;
}
"#;

/// Render the whole report as a standalone page.
pub fn render_report(report: &Report<'_>) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (report.title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                h1 { (report.title) }
                @for section in &report.sections {
                    @match section {
                        Section::Aggregate(table) => (cross_table(table)),
                        Section::Leaderboard(board) => (leaderboard(board, report.show_names)),
                    }
                }
            }
        }
    }
}

fn cross_table(table: &CrossTable) -> Markup {
    html! {
        h2 { (table.measure.aggregate_title()) }
        table {
            thead {
                tr {
                    th { "\\" }
                    @for column in &table.columns {
                        th { (column.to_string()) }
                    }
                }
            }
            tbody {
                @for row in &table.rows {
                    (cross_row(table, row))
                }
                (cross_row(table, &table.total))
            }
        }
    }
}

fn cross_row(table: &CrossTable, row: &CrossRow) -> Markup {
    let total = if row.label == RowLabel::Total { " total" } else { "" };
    html! {
        tr {
            th { (row.label.to_string()) }
            @for (column, value) in table.columns.iter().zip(&row.cells) {
                td class=(format!("number{} {}", total, column.style_tag())) {
                    (format_aggregate(*value))
                }
            }
        }
    }
}

fn leaderboard(board: &Leaderboard<'_>, show_names: bool) -> Markup {
    html! {
        h2 { (board.title()) }
        (leaderboard_table(board, &board.all_time, show_names))
        @for year in &board.by_year {
            h3 { (year.year) }
            (leaderboard_table(board, &year.entries, show_names))
        }
    }
}

fn leaderboard_table(board: &Leaderboard<'_>, entries: &[&Activity], show_names: bool) -> Markup {
    html! {
        table {
            thead {
                tr {
                    th { "Measure" }
                    th { "Date" }
                    @if show_names {
                        th { "Name" }
                    }
                }
            }
            tbody {
                @for activity in entries {
                    tr {
                        td class=(format!("number {}", activity.activity_type)) {
                            (format_single(board.measure.value(activity)))
                        }
                        td class=(format!("date {}", activity.activity_type)) {
                            (activity.started.date_naive().to_string())
                        }
                        @if show_names {
                            td class=(format!("name {}", activity.activity_type)) {
                                (activity.name.as_deref().unwrap_or(""))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Whole number with thousands separators, rounded half-up: `12,346`.
pub fn format_aggregate(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "0".to_string();
    }
    rounded.rescale(0);
    let text = rounded.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", text.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}", sign, grouped)
}

/// One decimal place, rounded half-up: `12.3`.
pub fn format_single(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(1);
    rounded.to_string()
}
