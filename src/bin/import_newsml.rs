use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use topic_importer::ingest::{import_newsml, print_phase};
use topic_importer::parser::NewsmlDecoder;
use topic_importer::progress::format_duration;
use topic_importer::settings::ENV_HELP;
use topic_importer::source::discover_newsml;
use topic_importer::{init_tracing, FailurePolicy, Settings, TopicModelClient};

#[derive(Parser)]
#[command(
    name = "import_newsml",
    after_help = ENV_HELP,
    about = "Send IPTC-labeled NewsML documents to a topic model service as training examples"
)]
struct Cli {
    /// Root of the NewsML corpus
    topfolder: PathBuf,
    /// Load at most this many documents from the corpus
    max_count: usize,
    /// Base URL of the topic model service
    server_url: String,
    /// Abort on the first failed submission
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;
    info!(settings = ?settings, "starting newsml import");

    let policy = FailurePolicy::from_strict(cli.strict || settings.http.strict);
    let decoder = NewsmlDecoder::new(&settings.newsml)?;
    let mut client = TopicModelClient::new(
        &cli.server_url,
        Duration::from_secs(settings.http.timeout_secs),
    )?;

    let paths = discover_newsml(&cli.topfolder, &settings.newsml, cli.max_count)
        .with_context(|| format!("Failed to scan {}", cli.topfolder.display()))?;
    println!(
        "Loaded {} documents under {} (cap {})",
        paths.len(),
        cli.topfolder.display(),
        cli.max_count
    );

    let t = Instant::now();
    let stats = import_newsml(
        &paths,
        &decoder,
        &mut client,
        settings.progress.newsml_batch,
        policy,
    )?;
    print_phase("documents", &stats, t);

    println!("\nDone in {}", format_duration(t0.elapsed()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn help_lists_environment_overrides() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("TOPIC_IMPORT_HTTP__STRICT"));
        assert!(help.contains("TOPIC_IMPORT_NEWSML__SUBJECT_TAGS"));
    }
}
