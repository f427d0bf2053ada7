//! Table structures and the per-kind table builder.

use serde::{Deserialize, Serialize};
use varstat_core::Subject;
use varstat_stats::{format_count, format_decimal, quartiles, Statistic, Summary};

use crate::axis::Axis;
use crate::classify::{classify, ComparisonKind};
use crate::pair::Pair;

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Rendered text.
    pub text: String,
    /// Presentation class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Number of columns the cell spans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<usize>,
}

impl Cell {
    /// Plain cell.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: None,
            span: None,
        }
    }

    fn total(text: impl Into<String>) -> Self {
        Self {
            class: Some("total".to_string()),
            ..Self::text(text)
        }
    }

    fn spanning(text: impl Into<String>, span: usize) -> Self {
        Self {
            span: Some(span),
            ..Self::text(text)
        }
    }
}

/// Table-ready summary of one field pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table title.
    pub title: String,
    /// Stratum label for per-stratum tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Header rows.
    pub headers: Vec<Vec<Cell>>,
    /// Body rows.
    pub rows: Vec<Vec<Cell>>,
    /// Footer rows.
    pub footers: Vec<Vec<Cell>>,
}

struct Column<'s> {
    header: String,
    members: Vec<&'s Subject>,
}

/// Builds the table for a pair; `None` when there is nothing to tabulate.
///
/// The kind comes from the type pair alone. Subjects lacking a target value
/// stay in the table and are reported as unknown.
pub fn build_table<'s>(pair: &Pair<'_, 's>, subtitle: Option<String>) -> Option<Table> {
    if pair.lacks_data() {
        return None;
    }
    let kind = classify(
        pair.target.field.field_type,
        Some(pair.comparison.field.field_type),
    )?;
    let subjects: Vec<&'s Subject> = pair
        .subjects
        .iter()
        .copied()
        .filter(|subject| pair.comparison.is_present(subject))
        .collect();
    if subjects.is_empty() {
        return None;
    }

    let columns = match kind {
        ComparisonKind::NumericVsChoices | ComparisonKind::ChoicesVsChoices => {
            option_columns(pair.comparison, &subjects)
        }
        ComparisonKind::NumericVsNumeric | ComparisonKind::ChoicesVsNumeric => {
            quartile_columns(pair.comparison, subjects.clone())
        }
        ComparisonKind::Histogram => return None,
    };
    let rows = if pair.target.field.field_type.is_numeric() {
        statistic_rows(pair.target, &columns, &subjects)
    } else {
        count_rows(pair.target, &columns, &subjects)
    };

    let mut header = vec![Cell::text("")];
    header.extend(columns.iter().map(|column| Cell::text(column.header.clone())));
    header.push(Cell::total("Total"));

    let mut footer = vec![Cell::total("Total")];
    footer.extend(
        columns
            .iter()
            .map(|column| Cell::total(format_count(column.members.len()))),
    );
    footer.push(Cell::total(format_count(subjects.len())));

    Some(Table {
        title: format!(
            "{} by {}",
            pair.target.field.display_name, pair.comparison.field.display_name
        ),
        subtitle,
        headers: vec![
            vec![
                Cell::text(""),
                Cell::spanning(pair.comparison.field.display_name.clone(), columns.len()),
                Cell::text(""),
            ],
            header,
        ],
        rows,
        footers: vec![footer],
    })
}

fn option_columns<'s>(comparison: Axis<'_>, subjects: &[&'s Subject]) -> Vec<Column<'s>> {
    comparison
        .filtered_options(subjects.iter().copied())
        .into_iter()
        .map(|option| Column {
            header: option.display_name.clone(),
            members: subjects
                .iter()
                .copied()
                .filter(|subject| comparison.has_option(subject, option))
                .collect(),
        })
        .collect()
}

fn quartile_columns<'s>(comparison: Axis<'_>, mut subjects: Vec<&'s Subject>) -> Vec<Column<'s>> {
    comparison.sort_by_number(&mut subjects);
    quartiles(&subjects)
        .iter()
        .map(|members| {
            let values: Vec<f64> = members
                .iter()
                .filter_map(|subject| comparison.number(subject))
                .collect();
            let summary = Summary::from_values(values.into_iter().map(Some));
            let header = match (summary.min, summary.max) {
                (Some(min), Some(max)) => format!(
                    "{} to {}",
                    format_decimal(Some(min), None),
                    format_decimal(Some(max), None)
                ),
                _ => "-".to_string(),
            };
            Column {
                header,
                members: members.to_vec(),
            }
        })
        .collect()
}

fn statistic_cell(summary: &Summary, statistic: Statistic) -> String {
    if statistic.is_count() {
        let count = match statistic {
            Statistic::Unknown => summary.unknown,
            _ => summary.n,
        };
        format_count(count)
    } else {
        format_decimal(summary.get(statistic), statistic.template())
    }
}

fn statistic_rows(target: Axis<'_>, columns: &[Column<'_>], all: &[&Subject]) -> Vec<Vec<Cell>> {
    let summarise =
        |members: &[&Subject]| Summary::from_values(members.iter().map(|s| target.number(s)));
    let summaries: Vec<Summary> = columns
        .iter()
        .map(|column| summarise(&column.members))
        .collect();
    let total = summarise(all);

    Statistic::ALL
        .iter()
        .map(|&statistic| {
            let mut row = vec![Cell::text(statistic.label())];
            row.extend(
                summaries
                    .iter()
                    .map(|summary| Cell::text(statistic_cell(summary, statistic))),
            );
            row.push(Cell::total(statistic_cell(&total, statistic)));
            row
        })
        .collect()
}

fn count_rows(target: Axis<'_>, columns: &[Column<'_>], all: &[&Subject]) -> Vec<Vec<Cell>> {
    let count_row = |label: String, matches: &dyn Fn(&Subject) -> bool| {
        let mut row = vec![Cell::text(label)];
        row.extend(columns.iter().map(|column| {
            Cell::text(format_count(
                column.members.iter().filter(|&&s| matches(s)).count(),
            ))
        }));
        row.push(Cell::total(format_count(
            all.iter().filter(|&&s| matches(s)).count(),
        )));
        row
    };

    let mut rows: Vec<Vec<Cell>> = target
        .filtered_options(all.iter().copied())
        .into_iter()
        .map(|option| {
            count_row(option.display_name.clone(), &|subject: &Subject| {
                target.has_option(subject, option)
            })
        })
        .collect();
    if all.iter().any(|subject| !target.is_present(subject)) {
        rows.push(count_row("Unknown".to_string(), &|subject: &Subject| {
            !target.is_present(subject)
        }));
    }
    rows
}
