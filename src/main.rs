//! serp-gateway CLI - search API server and one-off queries.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use serp_gateway::{
    config::ServerConfig,
    engines::DuckDuckGo,
    server::{self, AppState},
    AggregateResponse, EngineKind, EngineSelector, Provider, Query, ResultRecord,
};

/// Search API over a meta-search backend and scraped engine result pages
#[derive(Parser)]
#[command(name = "serp-gateway")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve(ServeArgs),

    /// Run one search and print the results
    Search(SearchArgs),

    /// List available search engines
    Engines,
}

#[derive(Args)]
struct ServeArgs {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind
    #[arg(short, long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Upstream request timeout in seconds
    #[arg(short, long, env = "SEARCH_TIMEOUT", default_value = "10")]
    timeout: u64,
}

impl ServeArgs {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Args)]
struct SearchArgs {
    /// Search query
    query: String,

    /// Engine to use: google, bing, baidu, all, or ddg for the meta-search backend
    #[arg(short, long, default_value = "all")]
    engine: String,

    /// Maximum number of results per engine
    #[arg(short = 'n', long, default_value = "10")]
    num: i64,

    /// Upstream request timeout in seconds
    #[arg(short, long, default_value = "10")]
    timeout: u64,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Compact single-line output
    Compact,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Some(Commands::Serve(args)) => run_server(args.into_config()).await,
        Some(Commands::Search(args)) => run_search(args).await,
        Some(Commands::Engines) => list_engines(),
        None => {
            let ServeCli { args } = ServeCli::parse_from(["serp-gateway"]);
            run_server(args.into_config()).await
        }
    }
}

/// Parses `ServeArgs` on its own so env defaults apply without a subcommand.
#[derive(Parser)]
struct ServeCli {
    #[command(flatten)]
    args: ServeArgs,
}

async fn run_server(config: ServerConfig) -> Result<()> {
    config.validate()?;
    let state = AppState::from_config(&config)?;
    server::serve(&config, state).await?;
    Ok(())
}

fn list_engines() -> Result<()> {
    println!("Available search engines:\n");
    println!("  Scraped (GET /search, /google, /bing, /baidu):");
    for kind in EngineKind::ALL {
        let note = match kind {
            EngineKind::Baidu => "百度, paged via offset",
            EngineKind::Bing => "follows next-page links",
            EngineKind::Google => "single request",
        };
        println!("    {:<8} - {} ({})", kind, kind.label(), note);
    }
    println!();
    println!("  Meta-search (GET /api/search):");
    println!("    ddg      - DuckDuckGo HTML backend");
    println!();
    println!("Usage: serp-gateway search \"query\" -e bing -n 5");
    Ok(())
}

async fn run_search(args: SearchArgs) -> Result<()> {
    let config = ServerConfig {
        timeout_secs: args.timeout,
        ..Default::default()
    };
    config.validate()?;

    if args.engine.eq_ignore_ascii_case("ddg") {
        let query = Query::new(&args.query, args.num)?;
        let provider = DuckDuckGo::provider(config.timeout())?;
        let results = provider.perform_search(&query.text, query.limit).await?;
        let mut response = AggregateResponse::new(query.text);
        response.add_engine("ddg", results);
        return print_response(&response, args.format);
    }

    let engines: EngineSelector = args.engine.parse()?;
    let state = AppState::from_config(&config)?;
    let response = state
        .aggregator()
        .search_with(&args.query, args.num, engines)
        .await?;

    print_response(&response, args.format)
}

fn print_response(response: &AggregateResponse, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("\nSearch results for \"{}\":", response.query);
            for engine in &response.engines_used {
                let Some(results) = response.engine(engine) else {
                    continue;
                };
                println!("\n[{}] {} results\n", engine, results.count);
                for result in &results.results {
                    print_text(result);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(response)?);
        }
        OutputFormat::Compact => {
            for engine in &response.engines_used {
                if let Some(results) = response.engine(engine) {
                    for result in &results.results {
                        println!("{}\t{}\t{}", engine, result.title, result.url);
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_text(result: &ResultRecord) {
    println!("{}. {}", result.rank, result.title);
    println!("   URL: {}", result.url);
    if !result.description.is_empty() {
        let snippet: String = result.description.chars().take(150).collect();
        if snippet.len() < result.description.len() {
            println!("   {}...", snippet);
        } else {
            println!("   {}", snippet);
        }
    }
    println!();
}
