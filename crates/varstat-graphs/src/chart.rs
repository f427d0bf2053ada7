//! Chart structures and the per-kind chart builder.

use serde::{Deserialize, Serialize};
use varstat_core::Subject;
use varstat_stats::{quartiles, round_to, Buckets, Summary, QUARTILE_LABELS};

use crate::classify::ComparisonKind;
use crate::pair::Pair;

/// Series stacking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stacking {
    /// Each category's series are rendered as shares of 100%.
    Percent,
}

/// Summary of one quartile in a numeric-vs-numeric chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuartilePoint {
    /// Mean of the target values, `0.0` for an empty quartile.
    pub y: f64,
    /// Sample standard deviation.
    pub stddev: Option<f64>,
    /// Median.
    pub median: Option<f64>,
    /// Minimum.
    pub min: Option<f64>,
    /// Maximum.
    pub max: Option<f64>,
    /// Number of target values.
    pub n: usize,
}

impl QuartilePoint {
    fn from_values(values: &[f64]) -> Self {
        let summary = Summary::from_values(values.iter().copied().map(Some));
        let one = |value: Option<f64>| value.map(|value| round_to(value, 1));
        Self {
            y: one(summary.mean).unwrap_or(0.0),
            stddev: one(summary.standard_deviation),
            median: one(summary.median),
            min: one(summary.min),
            max: one(summary.max),
            n: summary.n,
        }
    }
}

/// One data point of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Point {
    /// Subject count.
    Count(usize),
    /// Mean value.
    Mean(f64),
    /// Quartile summary.
    Quartile(QuartilePoint),
}

/// A named sequence of points, one per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Series label.
    pub name: String,
    /// Points aligned with the chart categories.
    pub data: Vec<Point>,
}

/// Chart-ready summary of one field pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Chart title.
    pub title: String,
    /// Chart subtitle.
    pub subtitle: String,
    /// Category labels along the x axis.
    pub categories: Vec<String>,
    /// Units of the plotted values.
    pub units: String,
    /// Data series.
    pub series: Vec<Series>,
    /// Stacking mode, `null` when unstacked.
    pub stacking: Option<Stacking>,
    /// Label of the x axis, if any.
    pub x_axis_title: Option<String>,
}

/// Builds the chart for a classified pair; `None` when the pair is suppressed.
pub fn build_chart(kind: ComparisonKind, pair: &Pair<'_, '_>) -> Option<Chart> {
    if pair.is_suppressed(kind) {
        return None;
    }
    let target = pair.target.field;
    let (categories, series) = match kind {
        ComparisonKind::Histogram => histogram(pair),
        ComparisonKind::NumericVsChoices => numeric_vs_choices(pair),
        ComparisonKind::ChoicesVsChoices => choices_vs_choices(pair),
        ComparisonKind::NumericVsNumeric => numeric_vs_numeric(pair),
        ComparisonKind::ChoicesVsNumeric => choices_vs_numeric(pair),
    };
    let (title, units, x_axis_title) = match kind {
        ComparisonKind::Histogram => (
            target.display_name.clone(),
            "Subjects".to_string(),
            Some(target.units.clone()),
        ),
        _ => (
            format!(
                "{} by {}",
                target.display_name, pair.comparison.field.display_name
            ),
            if kind.is_stacked() {
                "percent".to_string()
            } else {
                target.units.clone()
            },
            None,
        ),
    };
    Some(Chart {
        title,
        subtitle: format!("By {}", pair.stratification.field.display_name),
        categories,
        units,
        series,
        stacking: kind.is_stacked().then_some(Stacking::Percent),
        x_axis_title,
    })
}

fn quartile_categories() -> Vec<String> {
    QUARTILE_LABELS.iter().map(|label| label.to_string()).collect()
}

fn histogram(pair: &Pair<'_, '_>) -> (Vec<String>, Vec<Series>) {
    let target = pair.target;
    let present: Vec<&Subject> = pair
        .subjects
        .iter()
        .copied()
        .filter(|subject| target.is_present(subject))
        .collect();

    if target.field.field_type.is_choices() {
        let options = target.filtered_options(present.iter().copied());
        let categories = options.iter().map(|o| o.display_name.clone()).collect();
        let series = pair
            .comparison
            .field
            .options
            .iter()
            .filter_map(|stratum| {
                let members: Vec<&Subject> = present
                    .iter()
                    .copied()
                    .filter(|subject| pair.comparison.has_option(subject, stratum))
                    .collect();
                if members.is_empty() {
                    return None;
                }
                let data = options
                    .iter()
                    .map(|option| {
                        Point::Count(
                            members
                                .iter()
                                .filter(|subject| target.has_option(subject, option))
                                .count(),
                        )
                    })
                    .collect();
                Some(Series {
                    name: stratum.display_name.clone(),
                    data,
                })
            })
            .collect();
        return (categories, series);
    }

    let buckets = Buckets::from_values(present.iter().filter_map(|s| target.number(s)));
    let series = pair
        .comparison
        .field
        .options
        .iter()
        .filter_map(|stratum| {
            let values: Vec<f64> = present
                .iter()
                .filter(|subject| pair.comparison.has_option(subject, stratum))
                .filter_map(|subject| target.number(subject))
                .collect();
            if values.is_empty() {
                return None;
            }
            let data = buckets.counts(values).into_iter().map(Point::Count).collect();
            Some(Series {
                name: stratum.display_name.clone(),
                data,
            })
        })
        .collect();
    (buckets.display_names(), series)
}

fn numeric_vs_choices(pair: &Pair<'_, '_>) -> (Vec<String>, Vec<Series>) {
    let both = pair.both_present();
    let options = pair.comparison.filtered_options(both.iter().copied());
    let mut categories = Vec::new();
    let mut data: Vec<Vec<Point>> = vec![Vec::new(); options.len()];

    for stratum in &pair.stratification.field.options {
        let members = pair.in_stratum(&both, &stratum.value);
        if members.is_empty() {
            continue;
        }
        categories.push(stratum.display_name.clone());
        for (column, option) in data.iter_mut().zip(&options) {
            let values: Vec<f64> = members
                .iter()
                .filter(|subject| pair.comparison.has_option(subject, option))
                .filter_map(|subject| pair.target.number(subject))
                .collect();
            let mean = varstat_stats::mean(&values)
                .map(|mean| round_to(mean, 2))
                .unwrap_or(0.0);
            column.push(Point::Mean(mean));
        }
    }

    let series = options
        .iter()
        .zip(data)
        .map(|(option, data)| Series {
            name: option.display_name.clone(),
            data,
        })
        .collect();
    (categories, series)
}

fn choices_vs_choices(pair: &Pair<'_, '_>) -> (Vec<String>, Vec<Series>) {
    let both = pair.both_present();
    let columns = pair.comparison.filtered_options(both.iter().copied());
    let categories = columns.iter().map(|o| o.display_name.clone()).collect();
    let series = pair
        .target
        .filtered_options(both.iter().copied())
        .into_iter()
        .map(|option| {
            let data = columns
                .iter()
                .map(|column| {
                    Point::Count(
                        both.iter()
                            .filter(|subject| {
                                pair.target.has_option(subject, option)
                                    && pair.comparison.has_option(subject, column)
                            })
                            .count(),
                    )
                })
                .collect();
            Series {
                name: option.display_name.clone(),
                data,
            }
        })
        .collect();
    (categories, series)
}

fn numeric_vs_numeric(pair: &Pair<'_, '_>) -> (Vec<String>, Vec<Series>) {
    let both = pair.both_present();
    let series = pair
        .stratification
        .field
        .options
        .iter()
        .filter_map(|stratum| {
            let mut members = pair.in_stratum(&both, &stratum.value);
            if members.is_empty() {
                return None;
            }
            pair.comparison.sort_by_number(&mut members);
            let data = quartiles(&members)
                .iter()
                .map(|quartile| {
                    let values: Vec<f64> = quartile
                        .iter()
                        .filter_map(|subject| pair.target.number(subject))
                        .collect();
                    Point::Quartile(QuartilePoint::from_values(&values))
                })
                .collect();
            Some(Series {
                name: stratum.display_name.clone(),
                data,
            })
        })
        .collect();
    (quartile_categories(), series)
}

fn choices_vs_numeric(pair: &Pair<'_, '_>) -> (Vec<String>, Vec<Series>) {
    let mut both = pair.both_present();
    pair.comparison.sort_by_number(&mut both);
    let groups = quartiles(&both);
    let series = pair
        .target
        .filtered_options(both.iter().copied())
        .into_iter()
        .map(|option| {
            let data = groups
                .iter()
                .map(|group| {
                    Point::Count(
                        group
                            .iter()
                            .filter(|subject| pair.target.has_option(subject, option))
                            .count(),
                    )
                })
                .collect();
            Series {
                name: option.display_name.clone(),
                data,
            }
        })
        .collect();
    (quartile_categories(), series)
}
