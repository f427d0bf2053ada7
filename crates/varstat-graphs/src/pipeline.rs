use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};
use varstat_core::errors::{ErrorInfo, VarstatError};
use varstat_core::{Destination, Field, FieldCatalog, SubjectTable, Uploader};

use crate::artifact::{FieldDocument, Slot};
use crate::axis::Axis;
use crate::config::{Comparisons, ProjectConfig};
use crate::hash::sha256_hex;
use crate::ledger::{Ledger, LEDGER_FILE};
use crate::report::{FieldOutcome, FieldReport, RunReport, SkipReason};
use crate::serde::{to_pretty_json_bytes, write_atomic};

fn io_error(code: &str, path: &Path, err: impl ToString) -> VarstatError {
    VarstatError::Persist(ErrorInfo::new(code, err.to_string()).with_path(path))
}

/// Options governing a generation run.
#[derive(Debug, Clone)]
pub struct RunOpts {
    /// Discard the ledger and regenerate everything.
    pub clean: bool,
    /// Field ids to restrict the run to; empty means every field.
    pub only: Vec<String>,
    /// Number of fields computed in parallel.
    pub concurrency: usize,
    /// Version the ledger is tagged with.
    pub version: String,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self {
            clean: false,
            only: Vec::new(),
            concurrency: 1,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl RunOpts {
    fn selects(&self, field_id: &str) -> bool {
        self.only.is_empty()
            || self
                .only
                .iter()
                .any(|id| id.eq_ignore_ascii_case(field_id))
    }
}

/// Destination and uploader used by a delivery run.
#[derive(Clone, Copy)]
pub struct Delivery<'u> {
    /// Where documents go.
    pub destination: &'u Destination,
    /// Hands documents to the destination.
    pub uploader: &'u dyn Uploader,
}

enum Step<'a> {
    Done(FieldOutcome),
    Compute(Axis<'a>),
}

/// Generates one document per eligible field and keeps the ledger current.
pub struct Pipeline<'a, C: FieldCatalog + ?Sized> {
    catalog: &'a C,
    subjects: &'a SubjectTable,
    comparisons: Comparisons<'a>,
    stratification: Axis<'a>,
    out_dir: PathBuf,
}

impl<'a, C: FieldCatalog + ?Sized> Pipeline<'a, C> {
    /// Resolves the configuration; any unresolvable field aborts here.
    ///
    /// Fails with `config.visit_unbound` when the subject records expose no
    /// column for the stratification field.
    pub fn new(
        catalog: &'a C,
        subjects: &'a SubjectTable,
        config: &ProjectConfig,
        out_dir: impl Into<PathBuf>,
    ) -> Result<Self, VarstatError> {
        let comparisons = config.resolve(catalog)?;
        let visit = comparisons.stratification;
        let stratification = Axis::new(visit, subjects).ok_or_else(|| {
            VarstatError::Config(
                ErrorInfo::new("config.visit_unbound", "subjects carry no visit column")
                    .with_field(&visit.id)
                    .with_hint("export the visit field alongside the subject data"),
            )
        })?;
        Ok(Self {
            catalog,
            subjects,
            comparisons,
            stratification,
            out_dir: out_dir.into(),
        })
    }

    /// Location of the ledger file.
    pub fn ledger_path(&self) -> PathBuf {
        self.out_dir.join(LEDGER_FILE)
    }

    /// Location of a field's document.
    pub fn artifact_path(&self, field_id: &str) -> PathBuf {
        self.out_dir.join(format!("{field_id}.json"))
    }

    /// Runs generation, and delivery when a destination is given.
    ///
    /// Per-field write and delivery failures are recorded in the report and
    /// do not stop the run. The ledger is persisted before returning, also
    /// when a later step fails.
    pub fn run(
        &self,
        opts: &RunOpts,
        delivery: Option<Delivery<'_>>,
    ) -> Result<RunReport, VarstatError> {
        fs::create_dir_all(&self.out_dir)
            .map_err(|err| io_error("graphs_dir", &self.out_dir, err))?;
        let ledger_path = self.ledger_path();
        let mut ledger = Ledger::load(&ledger_path, &opts.version, opts.clean);

        let steps = self.plan(opts, delivery, &mut ledger);
        let pending = steps
            .iter()
            .filter(|(_, step)| matches!(step, Step::Compute(_)))
            .count();
        let mode = if delivery.is_some() { "deliver" } else { "generate" };
        info!(fields = steps.len(), pending, mode, "run started");

        let computed = match self.compute(&steps, opts.concurrency) {
            Ok(computed) => computed,
            Err(err) => {
                ledger.persist(&ledger_path)?;
                return Err(err);
            }
        };

        let mut computed = computed.into_iter();
        let mut fields = Vec::with_capacity(steps.len());
        for (field, step) in steps {
            let outcome = match step {
                Step::Done(outcome) => outcome,
                Step::Compute(_) => match computed.next() {
                    Some(Ok((path, sha256))) => {
                        ledger.mark_generated(&field.id);
                        info!(field = %field.id, path = %path.display(), "generated");
                        match delivery {
                            Some(delivery) => deliver(&mut ledger, field, &path, sha256, delivery),
                            None => FieldOutcome::Generated { path, sha256 },
                        }
                    }
                    Some(Err(err)) => {
                        let err = err.with_field(&field.id);
                        warn!(error = %err, "could not write document");
                        FieldOutcome::Failed {
                            error: err.to_string(),
                        }
                    }
                    None => FieldOutcome::Failed {
                        error: "document was not computed".to_string(),
                    },
                },
            };
            fields.push(FieldReport {
                field: field.id.clone(),
                outcome,
            });
        }

        ledger.persist(&ledger_path)?;
        Ok(RunReport {
            version: opts.version.clone(),
            fields,
        })
    }

    fn plan(
        &self,
        opts: &RunOpts,
        delivery: Option<Delivery<'_>>,
        ledger: &mut Ledger,
    ) -> Vec<(&'a Field, Step<'a>)> {
        self.catalog
            .fields()
            .iter()
            .map(|field| {
                let step = match self.eligibility(field, opts) {
                    Err(reason) => {
                        debug!(field = %field.id, ?reason, "skipped");
                        Step::Done(FieldOutcome::Skipped { reason })
                    }
                    Ok(axis) => {
                        ledger.entry_for(&field.id);
                        let done = match delivery {
                            Some(delivery) => {
                                ledger.is_uploaded(&field.id, &delivery.destination.name)
                            }
                            None => ledger.is_generated(&field.id),
                        };
                        if done {
                            debug!(field = %field.id, "already done");
                            Step::Done(FieldOutcome::AlreadyDone)
                        } else {
                            Step::Compute(axis)
                        }
                    }
                };
                (field, step)
            })
            .collect()
    }

    fn eligibility(&self, field: &'a Field, opts: &RunOpts) -> Result<Axis<'a>, SkipReason> {
        if !field.is_valid() {
            return Err(SkipReason::InvalidDefinition);
        }
        if !opts.selects(&field.id) {
            return Err(SkipReason::NotSelected);
        }
        if !field.field_type.is_chartable() {
            return Err(SkipReason::UnsupportedType);
        }
        Axis::new(field, self.subjects).ok_or(SkipReason::NoSubjectColumn)
    }

    /// Binds the comparison fields to the subject records.
    fn bind(&self) -> Vec<Slot<'a>> {
        self.comparisons
            .entries
            .iter()
            .filter_map(|entry| match Axis::new(entry.field, self.subjects) {
                Some(comparison) => Some(Slot {
                    slug: entry.slug.clone(),
                    comparison,
                    histogram: entry.histogram,
                }),
                None => {
                    warn!(field = %entry.field.id, "subjects carry no comparison column");
                    None
                }
            })
            .collect()
    }

    fn compute(
        &self,
        steps: &[(&'a Field, Step<'a>)],
        concurrency: usize,
    ) -> Result<Vec<Result<(PathBuf, String), VarstatError>>, VarstatError> {
        let jobs: Vec<(usize, Axis<'a>, PathBuf)> = steps
            .iter()
            .filter_map(|(field, step)| match step {
                Step::Compute(axis) => Some((*axis, self.artifact_path(&field.id))),
                Step::Done(_) => None,
            })
            .enumerate()
            .map(|(index, (axis, path))| (index, axis, path))
            .collect();
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let slots = self.bind();
        let stratification = self.stratification;
        let subjects = self.subjects.subjects();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(concurrency.max(1))
            .build()
            .map_err(|err| io_error("thread_pool", &self.out_dir, err))?;

        let mut results: Vec<(usize, Result<(PathBuf, String), VarstatError>)> =
            pool.install(|| {
                jobs.par_iter()
                    .map(|(index, target, path)| {
                        let document =
                            FieldDocument::build(*target, stratification, &slots, subjects);
                        (*index, write_document(path, &document))
                    })
                    .collect()
            });
        results.sort_by_key(|(index, _)| *index);
        Ok(results.into_iter().map(|(_, result)| result).collect())
    }
}

fn write_document(path: &Path, document: &FieldDocument) -> Result<(PathBuf, String), VarstatError> {
    let bytes = to_pretty_json_bytes(document)?;
    write_atomic(path, &bytes)?;
    Ok((path.to_path_buf(), sha256_hex(&bytes)))
}

fn deliver(
    ledger: &mut Ledger,
    field: &Field,
    path: &Path,
    sha256: String,
    delivery: Delivery<'_>,
) -> FieldOutcome {
    let destination = &delivery.destination.name;
    match delivery.uploader.deliver(path, delivery.destination) {
        Ok(()) => {
            ledger.mark_uploaded(&field.id, destination);
            info!(field = %field.id, destination = %destination, "delivered");
            FieldOutcome::Delivered {
                destination: destination.clone(),
                sha256,
            }
        }
        Err(err) => {
            let err = err.with_field(&field.id).with_destination(destination);
            warn!(error = %err, "upload failed");
            FieldOutcome::DeliveryFailed {
                destination: destination.clone(),
                error: err.to_string(),
            }
        }
    }
}

