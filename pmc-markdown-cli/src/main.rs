use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(
    name = "pmc-markdown",
    about = "Convert PubMed articles to Markdown",
    long_about = "Resolves PMIDs to PMC ids, fetches the PMC article pages and converts them to archival Markdown"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// API key for NCBI services (increases rate limit)
    #[arg(long, env = "NCBI_API_KEY", global = true)]
    api_key: Option<String>,

    /// Email for NCBI requests (recommended)
    #[arg(long, env = "NCBI_EMAIL", global = true)]
    email: Option<String>,

    /// Tool name for NCBI requests
    #[arg(long, env = "NCBI_TOOL", default_value = "pmc-markdown", global = true)]
    tool: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PMIDs to Markdown, caching pages and skipping finished articles
    Convert(commands::convert::Convert),
    /// Convert a single PMID and print the Markdown
    Single(commands::single::Single),
    /// Resolve PMIDs to PMCIDs
    Resolve(commands::resolve::Resolve),
    /// Convert local HTML files to Markdown
    Html(commands::html::Html),
    /// Build the record map of converted articles and report missing fields
    Records(commands::records::Records),
    /// Print the tables and figures of an HTML page as JSON
    Media(commands::media::Media),
    /// Rewrite crawled Markdown into the academic layout
    Reformat(commands::reformat::Reformat),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with indicatif layer for progress bars
    let filter = if cli.verbose { "debug" } else { "info" };

    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let api_key = cli.api_key.as_deref();
    let email = cli.email.as_deref();
    let tool = &cli.tool;

    match &cli.command {
        Commands::Convert(cmd) => cmd.execute_with_config(api_key, email, tool).await,
        Commands::Single(cmd) => cmd.execute_with_config(api_key, email, tool).await,
        Commands::Resolve(cmd) => cmd.execute_with_config(api_key, email, tool).await,
        Commands::Html(cmd) => cmd.execute_with_config(api_key, email, tool),
        Commands::Records(cmd) => cmd.execute(),
        Commands::Media(cmd) => cmd.execute(),
        Commands::Reformat(cmd) => cmd.execute(),
    }
}
