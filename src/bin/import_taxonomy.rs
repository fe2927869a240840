use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use topic_importer::ingest::run_taxonomy_import;
use topic_importer::progress::format_duration;
use topic_importer::settings::ENV_HELP;
use topic_importer::{init_tracing, FailurePolicy, Settings, TopicModelClient};

#[derive(Parser)]
#[command(
    name = "import_taxonomy",
    after_help = ENV_HELP,
    about = "Load a DBpedia taxonomy and training set into a topic model service, then train it"
)]
struct Cli {
    /// TSV of `concept \t broader concepts \t primary topic`
    topics_filename: PathBuf,
    /// TSV of `example id \t categories \t text` (may be .bz2)
    examples_filename: PathBuf,
    /// Base URL of the topic model service
    topic_model_url: String,
    /// Abort on the first failed submission
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;
    info!(settings = ?settings, "starting taxonomy import");

    let policy = FailurePolicy::from_strict(cli.strict || settings.http.strict);
    let mut client = TopicModelClient::new(
        &cli.topic_model_url,
        Duration::from_secs(settings.http.timeout_secs),
    )?;

    let report = run_taxonomy_import(
        &cli.topics_filename,
        &cli.examples_filename,
        &mut client,
        settings.progress.tsv_batch,
        policy,
    )?;

    info!(
        concepts = report.concepts.submitted,
        examples = report.examples.submitted,
        trained = report.trained,
        "taxonomy import finished"
    );
    println!("\nDone in {}", format_duration(t0.elapsed()));
    Ok(())
}
