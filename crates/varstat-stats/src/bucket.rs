use serde::{Deserialize, Serialize};

use crate::format::{round_to, MAX_PRECISION};

/// Number of display bins a continuous field is split into.
pub const MAX_BUCKETS: usize = 12;

/// Contiguous numeric sub-range `[start, stop)` with a rounded display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Inclusive lower boundary.
    pub start: f64,
    /// Exclusive upper boundary.
    pub stop: f64,
    /// Label shown as the chart category.
    pub display_name: String,
    /// Decimal places the boundaries were rounded to.
    pub precision: usize,
}

impl Bucket {
    fn new(start: f64, stop: f64, precision: usize) -> Self {
        Self {
            start,
            stop,
            display_name: format!(
                "{} to {}",
                format_fixed(start, precision),
                format_fixed(stop, precision)
            ),
            precision,
        }
    }

    /// Half-open containment test.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.start && value < self.stop
    }
}

/// Buckets computed from one field's observed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Buckets {
    buckets: Vec<Bucket>,
}

impl Buckets {
    /// Splits the observed range into [`MAX_BUCKETS`] equal-width buckets.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self::with_count(values, MAX_BUCKETS)
    }

    /// Splits the observed range into `count` equal-width buckets.
    ///
    /// Non-finite inputs are ignored. An empty input yields no buckets and a
    /// degenerate range (every value equal) yields a single bucket.
    pub fn with_count<I>(values: I, count: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = match observed_range(values) {
            Some(range) if count > 0 => range,
            _ => return Self::default(),
        };
        let width = (max - min) / count as f64;
        if width == 0.0 {
            let precision = shortest_precision(min);
            let value = round_to(min, precision);
            return Self {
                buckets: vec![Bucket::new(value, value, precision)],
            };
        }
        let precision = precision_for_width(width);
        let mut edges: Vec<f64> = (0..count)
            .map(|idx| round_to(min + idx as f64 * width, precision))
            .collect();
        edges.push(round_to(max, precision));
        let buckets = edges
            .windows(2)
            .map(|pair| Bucket::new(pair[0], pair[1], precision))
            .collect();
        Self { buckets }
    }

    /// Index of the bucket a value falls in.
    ///
    /// The first bucket whose half-open range contains the value wins; values
    /// at or below the first start map to the first bucket and anything else
    /// left over (including the observed maximum) maps to the last.
    pub fn assign(&self, value: f64) -> Option<usize> {
        let first = self.buckets.first()?;
        if let Some(idx) = self.buckets.iter().position(|b| b.contains(value)) {
            return Some(idx);
        }
        if value <= first.start {
            Some(0)
        } else {
            Some(self.buckets.len() - 1)
        }
    }

    /// Per-bucket counts for the given values.
    pub fn counts<I>(&self, values: I) -> Vec<usize>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut counts = vec![0usize; self.buckets.len()];
        for value in values {
            if let Some(idx) = self.assign(value) {
                counts[idx] += 1;
            }
        }
        counts
    }

    /// Bucket labels in order.
    pub fn display_names(&self) -> Vec<String> {
        self.buckets.iter().map(|b| b.display_name.clone()).collect()
    }

    /// Buckets in order.
    pub fn as_slice(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true when no values were observed.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

fn observed_range<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}

/// Smallest number of decimals that keeps a bucket width distinguishable.
fn precision_for_width(width: f64) -> usize {
    if width >= 1.0 {
        return 0;
    }
    (-width.log10()).ceil().clamp(0.0, MAX_PRECISION as f64) as usize
}

fn shortest_precision(value: f64) -> usize {
    (0..6)
        .find(|&precision| (round_to(value, precision) - value).abs() < 1e-9)
        .unwrap_or(6)
}

fn format_fixed(value: f64, precision: usize) -> String {
    // adding 0.0 folds -0.0 into 0.0
    format!("{:.*}", precision, value + 0.0)
}
