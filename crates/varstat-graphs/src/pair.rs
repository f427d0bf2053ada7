use varstat_core::Subject;

use crate::axis::Axis;
use crate::classify::ComparisonKind;

/// Inputs shared by the chart and table builders for one field pair.
#[derive(Debug, Clone, Copy)]
pub struct Pair<'a, 's> {
    /// Field being summarised.
    pub target: Axis<'a>,
    /// Field the target is compared against. For histograms this is the
    /// field whose options become the series.
    pub comparison: Axis<'a>,
    /// Field splitting subjects into strata.
    pub stratification: Axis<'a>,
    /// Subjects considered for this pair.
    pub subjects: &'s [&'s Subject],
}

impl<'a, 's> Pair<'a, 's> {
    /// Subjects carrying both a target and a comparison value.
    pub fn both_present(&self) -> Vec<&'s Subject> {
        self.subjects
            .iter()
            .copied()
            .filter(|subject| self.target.is_present(subject) && self.comparison.is_present(subject))
            .collect()
    }

    /// Returns true when the subjects or domains leave nothing to summarise.
    ///
    /// That is the case when no subject carries a target value, or when either
    /// field is categorical with an empty domain.
    pub fn lacks_data(&self) -> bool {
        if !self.subjects.iter().any(|subject| self.target.is_present(subject)) {
            return true;
        }
        let empty_domain = |axis: &Axis<'_>| {
            axis.field.field_type.is_choices() && axis.field.options.is_empty()
        };
        empty_domain(&self.target) || empty_domain(&self.comparison)
    }

    /// Returns true when no chart entry should be produced for the kind.
    pub fn is_suppressed(&self, kind: ComparisonKind) -> bool {
        self.lacks_data() || (kind != ComparisonKind::Histogram && self.both_present().is_empty())
    }

    /// Subjects whose stratum is the given raw code.
    pub fn in_stratum(&self, subjects: &[&'s Subject], code: &str) -> Vec<&'s Subject> {
        subjects
            .iter()
            .copied()
            .filter(|subject| {
                self.stratification
                    .value(subject)
                    .map(|value| value.matches_code(code))
                    .unwrap_or(false)
            })
            .collect()
    }
}
