use serde::{Deserialize, Serialize};

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance `Σ(x − mean)² / (n − 1)`; `None` below two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum: f64 = values.iter().map(|x| (x - m) * (x - m)).sum();
    Some(sum / (values.len() - 1) as f64)
}

/// Square root of the sample variance; `None` below two values.
pub fn standard_deviation(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Middle value, or the average of the two central values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let len = sorted.len();
    if len % 2 == 1 {
        Some(sorted[len / 2])
    } else {
        Some((sorted[len / 2 - 1] + sorted[len / 2]) / 2.0)
    }
}

/// Descriptive statistics of a sequence with possibly absent entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Count of present values.
    pub n: usize,
    /// Mean of the present values.
    pub mean: Option<f64>,
    /// Sample standard deviation of the present values.
    pub standard_deviation: Option<f64>,
    /// Median of the present values.
    pub median: Option<f64>,
    /// Smallest present value.
    pub min: Option<f64>,
    /// Largest present value.
    pub max: Option<f64>,
    /// Count of absent entries.
    pub unknown: usize,
}

impl Summary {
    /// Reduces a sequence; absent entries only ever contribute to `unknown`.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut present = Vec::new();
        let mut unknown = 0;
        for value in values {
            match value {
                Some(value) => present.push(value),
                None => unknown += 1,
            }
        }
        Self {
            n: present.len(),
            mean: mean(&present),
            standard_deviation: standard_deviation(&present),
            median: median(&present),
            min: present.iter().copied().reduce(f64::min),
            max: present.iter().copied().reduce(f64::max),
            unknown,
        }
    }

    /// Value of one statistic, as a number.
    pub fn get(&self, statistic: Statistic) -> Option<f64> {
        match statistic {
            Statistic::N => Some(self.n as f64),
            Statistic::Mean => self.mean,
            Statistic::StdDev => self.standard_deviation,
            Statistic::Median => self.median,
            Statistic::Min => self.min,
            Statistic::Max => self.max,
            Statistic::Unknown => Some(self.unknown as f64),
        }
    }
}

/// Rows reported by numeric tables, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statistic {
    /// Present count.
    N,
    /// Mean.
    Mean,
    /// Sample standard deviation.
    StdDev,
    /// Median.
    Median,
    /// Minimum.
    Min,
    /// Maximum.
    Max,
    /// Absent count.
    Unknown,
}

impl Statistic {
    /// Every statistic in table row order.
    pub const ALL: [Statistic; 7] = [
        Statistic::N,
        Statistic::Mean,
        Statistic::StdDev,
        Statistic::Median,
        Statistic::Min,
        Statistic::Max,
        Statistic::Unknown,
    ];

    /// Row label.
    pub fn label(self) -> &'static str {
        match self {
            Statistic::N => "N",
            Statistic::Mean => "Mean",
            Statistic::StdDev => "StdDev",
            Statistic::Median => "Median",
            Statistic::Min => "Min",
            Statistic::Max => "Max",
            Statistic::Unknown => "Unknown",
        }
    }

    /// Counts are formatted as integers, everything else as decimals.
    pub fn is_count(self) -> bool {
        matches!(self, Statistic::N | Statistic::Unknown)
    }

    /// Template wrapped around the formatted decimal, `{}` marking the number.
    pub fn template(self) -> Option<&'static str> {
        match self {
            Statistic::StdDev => Some("± {}"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medians_of_odd_and_even_lengths() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn standard_deviation_needs_two_values() {
        assert_eq!(standard_deviation(&[5.0]), None);
        let sd = standard_deviation(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - 2.138089935299395).abs() < 1e-12);
    }

    #[test]
    fn summary_counts_absent_entries_as_unknown() {
        let summary = Summary::from_values([Some(1.0), None, Some(3.0), None]);
        assert_eq!(summary.n, 2);
        assert_eq!(summary.unknown, 2);
        assert_eq!(summary.mean, Some(2.0));
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.max, Some(3.0));
        assert_eq!(summary.get(Statistic::Unknown), Some(2.0));
    }

    #[test]
    fn all_absent_has_no_mean() {
        let summary = Summary::from_values([None, None]);
        assert_eq!(summary.n, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.median, None);
        assert_eq!(summary.standard_deviation, None);
    }
}
