use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use docseek_core::config::{BackendKind, Config};
use docseek_core::SearchRequest;
use docseek_rank::DocumentSearch;

#[derive(Parser, Debug)]
#[command(name = "docseek", version, about = "Rank the documents in a folder by relevance to a query")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the paths of the best-matching documents, most relevant first
    Search {
        /// Folder to search
        root: PathBuf,
        /// Free-text query
        query: String,
        /// Soft bound on chunk length in characters
        #[arg(long)]
        chunk_length: Option<usize>,
        /// Number of documents to return
        #[arg(long)]
        top_k: Option<usize>,
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,
        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg { Lance, Memory }

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self { match arg { BackendArg::Lance => BackendKind::Lance, BackendArg::Memory => BackendKind::Memory } }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docseek=info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn progress_bar() -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents ({percent}%)")?.progress_chars("#>-"));
    Ok(pb)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut settings = Config::load().and_then(|c| c.settings()).context("loading configuration")?;

    match cli.command {
        Commands::Search { root, query, chunk_length, top_k, backend, quiet } => {
            if let Some(b) = backend { settings.index.backend = b.into(); }
            let request = SearchRequest::new(
                root,
                query,
                chunk_length.unwrap_or(settings.search.chunk_length),
                top_k.unwrap_or(settings.search.top_k),
            )?;
            let mut engine = DocumentSearch::from_settings(&settings).await?;
            if !quiet { engine = engine.with_progress(progress_bar()?); }
            let found = engine.search(&request).await?;
            info!(results = found.len(), root = %request.root_path().display(), "search finished");
            for path in found {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}
