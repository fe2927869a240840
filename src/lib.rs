//! Bulk importers feeding a remote topic classification service: a DBpedia
//! taxonomy plus training set from TSV dumps, and labeled news from a NewsML
//! corpus.

pub mod client;
pub mod error;
pub mod ingest;
pub mod parser;
pub mod progress;
pub mod query;
pub mod settings;
pub mod source;

pub use client::{IngestSink, Submission, TopicModelClient};
pub use error::{ImportError, Result};
pub use ingest::{FailurePolicy, IngestStats};
pub use settings::Settings;

/// Install the stderr log subscriber shared by both binaries.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
