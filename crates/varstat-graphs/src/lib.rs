#![deny(missing_docs)]
#![doc = "Chart and table generation for varstat, with a resumable progress ledger."]

/// Per-field output documents.
pub mod artifact;
/// Fields bound to subject accessors.
pub mod axis;
/// Chart structures and builder.
pub mod chart;
/// Comparison kind selection.
pub mod classify;
/// Project configuration.
pub mod config;
/// Content digests.
pub mod hash;
/// Generation and delivery progress.
pub mod ledger;
/// Builder inputs for one field pair.
pub mod pair;
/// Run orchestration and resume logic.
pub mod pipeline;
/// Run outcomes.
pub mod report;
/// JSON/YAML helpers and atomic writes.
pub mod serde;
/// Table structures and builder.
pub mod table;

pub use artifact::{FieldDocument, Slot, TableEntry};
pub use axis::Axis;
pub use chart::{build_chart, Chart, Point, QuartilePoint, Series, Stacking};
pub use classify::{classify, ComparisonKind};
pub use config::{slug, ChartSpec, Comparison, Comparisons, ProjectConfig, Webserver};
pub use ledger::{Ledger, LedgerEntry, LEDGER_FILE};
pub use pair::Pair;
pub use pipeline::{Delivery, Pipeline, RunOpts};
pub use report::{FieldOutcome, FieldReport, RunReport, SkipReason};
pub use table::{build_table, Cell, Table};
