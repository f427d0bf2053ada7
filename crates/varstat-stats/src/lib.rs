#![deny(missing_docs)]
#![doc = "Pure statistical reductions used to build varstat charts and tables."]

/// Adaptive equal-width bucketing of continuous values.
pub mod bucket;
/// Number formatting for table cells.
pub mod format;
/// Quartile partitions of sorted sequences.
pub mod quartile;
/// Descriptive statistics over sequences with absent entries.
pub mod summary;

pub use bucket::{Bucket, Buckets, MAX_BUCKETS};
pub use format::{format_count, format_decimal, number_with_delimiter, round_to, MAX_PRECISION};
pub use quartile::{quartile_sizes, quartiles, QUARTILE_LABELS};
pub use summary::{mean, median, sample_variance, standard_deviation, Statistic, Summary};
