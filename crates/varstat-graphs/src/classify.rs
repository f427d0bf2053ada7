use serde::{Deserialize, Serialize};
use varstat_core::FieldType;

/// Statistical comparison applied to a (target, comparison) field pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    /// Plain distribution of the target, one series per stratum.
    Histogram,
    /// Mean of a numeric target per comparison option and stratum.
    NumericVsChoices,
    /// Counts of target options per comparison option.
    ChoicesVsChoices,
    /// Numeric target summarised per quartile of a numeric comparison.
    NumericVsNumeric,
    /// Counts of target options per quartile of a numeric comparison.
    ChoicesVsNumeric,
}

impl ComparisonKind {
    /// Returns true for kinds whose series are rendered as stacked percentages.
    pub fn is_stacked(self) -> bool {
        matches!(
            self,
            ComparisonKind::ChoicesVsChoices | ComparisonKind::ChoicesVsNumeric
        )
    }
}

/// Selects the comparison kind for a target type and an optional comparison type.
///
/// Without a comparison the kind is a histogram. Numeric and integer types
/// are interchangeable. Any pair involving an unsupported type yields `None`,
/// which callers treat as "no output for this pair".
pub fn classify(target: FieldType, comparison: Option<FieldType>) -> Option<ComparisonKind> {
    use FieldType::{Choices, Integer, Numeric};

    match (target, comparison) {
        (Numeric | Integer | Choices, None) => Some(ComparisonKind::Histogram),
        (Numeric | Integer, Some(Choices)) => Some(ComparisonKind::NumericVsChoices),
        (Choices, Some(Choices)) => Some(ComparisonKind::ChoicesVsChoices),
        (Numeric | Integer, Some(Numeric | Integer)) => Some(ComparisonKind::NumericVsNumeric),
        (Choices, Some(Numeric | Integer)) => Some(ComparisonKind::ChoicesVsNumeric),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_is_numeric() {
        assert_eq!(
            classify(FieldType::Integer, Some(FieldType::Numeric)),
            Some(ComparisonKind::NumericVsNumeric)
        );
        assert_eq!(
            classify(FieldType::Choices, Some(FieldType::Integer)),
            Some(ComparisonKind::ChoicesVsNumeric)
        );
    }

    #[test]
    fn unsupported_types_are_skipped() {
        assert_eq!(classify(FieldType::Other, None), None);
        assert_eq!(classify(FieldType::Other, Some(FieldType::Choices)), None);
        assert_eq!(classify(FieldType::Numeric, Some(FieldType::Other)), None);
    }
}
