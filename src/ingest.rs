use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::client::{IngestSink, Submission, CONCEPT_PATH, TRAINER_PATH, TRAINING_SET_PATH};
use crate::error::{ImportError, Result};
use crate::parser::{decode_concept, decode_training_example, NewsmlDecoder};
use crate::progress::{format_duration, BatchProgress};
use crate::source;

/// What to do when the service rejects a record or cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log and move on to the next record.
    #[default]
    Ignore,
    /// Stop the run at the first failure.
    Abort,
}

impl FailurePolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Ignore
        }
    }

    /// Ok(true) when accepted, Ok(false) when the failure was tolerated.
    fn settle(self, endpoint: &str, outcome: Result<Submission>) -> Result<bool> {
        let err = match outcome {
            Ok(s) if s.is_success() => return Ok(true),
            Ok(s) => ImportError::Rejected {
                endpoint: endpoint.to_string(),
                status: s.status,
            },
            Err(e) => e,
        };
        match self {
            FailurePolicy::Abort => Err(err),
            FailurePolicy::Ignore => {
                warn!(endpoint, error = %err, "submission failed");
                Ok(false)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub total: usize,
    pub submitted: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl IngestStats {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    fn record(&mut self, accepted: bool) {
        self.submitted += 1;
        if !accepted {
            self.failed += 1;
        }
    }
}

pub fn import_concepts<S: IngestSink>(
    lines: &[String],
    sink: &mut S,
    batch: usize,
    policy: FailurePolicy,
) -> Result<IngestStats> {
    let mut stats = IngestStats::new(lines.len());
    let mut progress = BatchProgress::new("concepts", batch, lines.len());
    for line in lines {
        let concept = decode_concept(line)?;
        let accepted = policy.settle(CONCEPT_PATH, sink.register_concept(&concept))?;
        stats.record(accepted);
        progress.tick();
    }
    Ok(stats)
}

pub fn import_examples<S: IngestSink>(
    lines: &[String],
    sink: &mut S,
    batch: usize,
    policy: FailurePolicy,
) -> Result<IngestStats> {
    let mut stats = IngestStats::new(lines.len());
    let mut progress = BatchProgress::new("examples", batch, lines.len());
    for line in lines {
        let example = decode_training_example(line)?;
        let accepted = policy.settle(TRAINING_SET_PATH, sink.register_example(&example))?;
        stats.record(accepted);
        progress.tick();
    }
    Ok(stats)
}

/// Submit every labeled document in `paths`, already bounded by the
/// discovery cap. Documents without subject codes are skipped.
pub fn import_newsml<S: IngestSink>(
    paths: &[PathBuf],
    decoder: &NewsmlDecoder,
    sink: &mut S,
    batch: usize,
    policy: FailurePolicy,
) -> Result<IngestStats> {
    let mut stats = IngestStats::new(paths.len());
    let mut progress = BatchProgress::new("documents", batch, paths.len());

    for path in paths {
        let content = source::read_document(path)?;
        let document = decoder.decode(&content).map_err(|e| ImportError::Xml {
            path: path.clone(),
            source: e,
        })?;
        if !document.is_labeled() {
            debug!(path = %path.display(), "no subject codes, skipping");
            stats.skipped += 1;
            continue;
        }
        let example = document.into_example();
        let accepted = policy.settle(TRAINING_SET_PATH, sink.register_example(&example))?;
        stats.record(accepted);
        progress.tick();
    }
    Ok(stats)
}

pub fn trigger_training<S: IngestSink>(sink: &mut S, policy: FailurePolicy) -> Result<bool> {
    policy.settle(TRAINER_PATH, sink.trigger_training())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxonomyReport {
    pub concepts: IngestStats,
    pub examples: IngestStats,
    pub trained: bool,
}

/// Load the taxonomy, then the training set, then ask the service to train
/// once both are in.
pub fn run_taxonomy_import<S: IngestSink>(
    topics: &Path,
    examples: &Path,
    sink: &mut S,
    batch: usize,
    policy: FailurePolicy,
) -> Result<TaxonomyReport> {
    let t = Instant::now();
    let lines = source::read_lines(topics)?;
    info!(path = %topics.display(), lines = lines.len(), "loaded taxonomy");
    println!("Importing {} concepts from {}", lines.len(), topics.display());
    let concepts = import_concepts(&lines, sink, batch, policy)?;
    print_phase("concepts", &concepts, t);

    let t = Instant::now();
    let lines = source::read_lines_maybe_compressed(examples)?;
    info!(path = %examples.display(), lines = lines.len(), "loaded training set");
    println!("Importing {} examples from {}", lines.len(), examples.display());
    let examples = import_examples(&lines, sink, batch, policy)?;
    print_phase("examples", &examples, t);

    let t = Instant::now();
    println!("Triggering training");
    let trained = trigger_training(sink, policy)?;
    println!(
        "Training {} in {}",
        if trained { "triggered" } else { "request failed" },
        format_duration(t.elapsed())
    );

    Ok(TaxonomyReport {
        concepts,
        examples,
        trained,
    })
}

pub fn print_phase(label: &str, stats: &IngestStats, started: Instant) {
    println!(
        "Imported {} {} ({} failed, {} skipped) out of {} in {}",
        stats.submitted - stats.failed,
        label,
        stats.failed,
        stats.skipped,
        stats.total,
        format_duration(started.elapsed())
    );
}
