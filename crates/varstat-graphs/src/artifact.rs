//! Per-field output document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use varstat_core::Subject;

use crate::axis::Axis;
use crate::chart::{build_chart, Chart};
use crate::classify::classify;
use crate::pair::Pair;
use crate::table::{build_table, Table};

/// Table entry of a document: one table, or one table per stratum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableEntry {
    /// Table covering every stratum.
    Single(Table),
    /// Tables for each stratum with data, in stratification option order.
    Stratified(Vec<Table>),
}

/// A comparison bound to the subject records.
#[derive(Debug, Clone)]
pub struct Slot<'a> {
    /// Key in the document maps.
    pub slug: String,
    /// Comparison field.
    pub comparison: Axis<'a>,
    /// True for the plain distribution.
    pub histogram: bool,
}

/// The charts and tables generated for one field, keyed by comparison slug.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDocument {
    /// Charts in comparison order.
    pub charts: IndexMap<String, Chart>,
    /// Tables in comparison order.
    pub tables: IndexMap<String, TableEntry>,
}

impl FieldDocument {
    /// Builds every chart and table of `target` over the given slots.
    pub fn build(
        target: Axis<'_>,
        stratification: Axis<'_>,
        slots: &[Slot<'_>],
        subjects: &[Subject],
    ) -> Self {
        let mut document = Self::default();
        for slot in slots {
            let filtered: Vec<&Subject> = subjects
                .iter()
                .filter(|subject| slot.comparison.is_present(subject))
                .collect();
            let pair = Pair {
                target,
                comparison: slot.comparison,
                stratification,
                subjects: &filtered,
            };
            if slot.histogram {
                document.add_histogram(&slot.slug, &pair);
            } else {
                document.add_comparison(&slot.slug, &pair);
            }
        }
        document
    }

    fn add_histogram(&mut self, slug: &str, pair: &Pair<'_, '_>) {
        if pair.subjects.is_empty() {
            return;
        }
        let Some(kind) = classify(pair.target.field.field_type, None) else {
            return;
        };
        if let Some(chart) = build_chart(kind, pair) {
            self.charts.insert(slug.to_string(), chart);
        }
        if let Some(table) = build_table(pair, None) {
            self.tables.insert(slug.to_string(), TableEntry::Single(table));
        }
    }

    fn add_comparison(&mut self, slug: &str, pair: &Pair<'_, '_>) {
        if !pair.subjects.iter().any(|s| pair.target.is_present(s)) {
            return;
        }
        let Some(kind) = classify(
            pair.target.field.field_type,
            Some(pair.comparison.field.field_type),
        ) else {
            return;
        };
        if let Some(chart) = build_chart(kind, pair) {
            self.charts.insert(slug.to_string(), chart);
        }

        let tables: Vec<Table> = pair
            .stratification
            .field
            .options
            .iter()
            .filter_map(|stratum| {
                let members = pair.in_stratum(pair.subjects, &stratum.value);
                if !members.iter().any(|s| pair.target.is_present(s)) {
                    return None;
                }
                let stratum_pair = Pair {
                    subjects: &members,
                    ..*pair
                };
                build_table(&stratum_pair, Some(stratum.display_name.clone()))
            })
            .collect();
        if !tables.is_empty() {
            self.tables
                .insert(slug.to_string(), TableEntry::Stratified(tables));
        }
    }

    /// Returns true when no chart or table was produced.
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty() && self.tables.is_empty()
    }
}
