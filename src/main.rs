use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use wordsearch::config::WordSearchConfig;
use wordsearch::index::show_stats;
use wordsearch::output::{print_files, print_summary};
use wordsearch::search::{IndexedSearcher, ScanSearcher, Searcher};
use wordsearch::server::{SearchClient, SearchServer};
use wordsearch::utils::progress;

#[derive(Parser)]
#[command(name = "wordsearch")]
#[command(about = "Find the files that contain a word")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a directory and serve searches over TCP
    Serve {
        /// Directory to serve
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Listen address
        #[arg(short, long)]
        addr: Option<String>,

        /// Scan workers (0 = one per CPU core)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Answer index misses without rescanning
        #[arg(long)]
        trust_index_misses: bool,
    },
    /// Search a directory directly, without a server
    Search {
        word: String,

        /// Directory to search
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Scan workers (0 = one per CPU core)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Skip the index and scan every file
        #[arg(long)]
        scan_only: bool,

        #[arg(long, value_enum, default_value_t = ColorWhen::Auto)]
        color: ColorWhen,
    },
    /// Ask a running server for a word
    Query {
        word: String,

        /// Server address
        #[arg(short, long)]
        addr: Option<String>,

        #[arg(long, value_enum, default_value_t = ColorWhen::Auto)]
        color: ColorWhen,
    },
    /// Show a running server's status
    Status {
        #[arg(short, long)]
        addr: Option<String>,
    },
    /// Stop a running server
    Stop {
        #[arg(short, long)]
        addr: Option<String>,
    },
    /// Build the index and print its statistics
    Stats {
        #[arg(short, long)]
        root: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorWhen {
    Auto,
    Never,
}

impl ColorWhen {
    fn enabled(self) -> bool {
        self == ColorWhen::Auto
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = WordSearchConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve {
            root,
            addr,
            workers,
            trust_index_misses,
        } => {
            init_logging("info");
            apply_overrides(&mut config, root, workers);
            if let Some(addr) = addr {
                config.server.addr = addr;
            }
            config.trust_index_misses |= trust_index_misses;
            serve(&config)?;
        }
        Commands::Search {
            word,
            root,
            workers,
            scan_only,
            color,
        } => {
            init_logging("warn");
            apply_overrides(&mut config, root, workers);
            search(&config, &word, scan_only, color.enabled())?;
        }
        Commands::Query { word, addr, color } => {
            init_logging("warn");
            let addr = addr.unwrap_or(config.server.addr);
            let mut client = connect(&addr)?;
            let resp = client.search(&word)?;
            print_files(&resp.files, color.enabled())?;
            print_summary(
                resp.files.len(),
                resp.source,
                resp.duration_ms,
                resp.cached,
                color.enabled(),
            )?;
        }
        Commands::Status { addr } => {
            let addr = addr.unwrap_or(config.server.addr);
            let status = connect(&addr)?.status()?;
            println!("wordsearch server status ({addr}):");
            println!("  Uptime: {}s", status.uptime_secs);
            println!("  Queries served: {}", status.queries_served);
            println!("  Cache hit rate: {:.1}%", status.cache_hit_rate * 100.0);
            match status.index {
                Some(index) => {
                    println!("  Indexed files: {}", index.files);
                    println!("  Distinct words: {}", index.words);
                }
                None => println!("  Index: not built"),
            }
        }
        Commands::Stop { addr } => {
            let addr = addr.unwrap_or(config.server.addr);
            connect(&addr)?.shutdown()?;
            println!("Server stopped");
        }
        Commands::Stats { root } => {
            init_logging("warn");
            apply_overrides(&mut config, root, None);
            let searcher = build_indexed(&config)?;
            if let Some(index) = searcher.index() {
                show_stats(index);
            }
        }
    }

    Ok(())
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_overrides(config: &mut WordSearchConfig, root: Option<PathBuf>, workers: Option<usize>) {
    if let Some(root) = root {
        config.root = root;
    }
    if let Some(workers) = workers {
        config.workers = workers;
    }
}

fn connect(addr: &str) -> Result<SearchClient> {
    SearchClient::connect(addr).with_context(|| format!("Failed to connect to server at {addr}"))
}

/// Build the index with a spinner; any unreadable file is fatal
fn build_indexed(config: &WordSearchConfig) -> Result<IndexedSearcher> {
    let mut searcher = IndexedSearcher::from_config(config)?;

    let spinner = progress::spinner("Indexing...");
    let stats = searcher.build_index().context("Failed to index")?;
    spinner.finish_with_message(format!(
        "Indexed {} files ({} words) in {:.0} ms",
        stats.files, stats.words, stats.duration_ms
    ));

    Ok(searcher)
}

fn serve(config: &WordSearchConfig) -> Result<()> {
    tracing::info!(root = %config.root.display(), workers = config.effective_workers(), "starting");

    let mut searcher = IndexedSearcher::from_config(config)?;
    let stats = searcher.build_index().context("Failed to index")?;

    let server = SearchServer::bind(&config.server, Box::new(searcher), Some(stats))?;
    server.run()
}

fn search(config: &WordSearchConfig, word: &str, scan_only: bool, color: bool) -> Result<()> {
    let (hits, elapsed) = if scan_only {
        let searcher = ScanSearcher::from_config(config)?;
        let start = Instant::now();
        (searcher.search(word)?, start.elapsed())
    } else {
        let searcher = build_indexed(config)?;
        let start = Instant::now();
        (searcher.search(word)?, start.elapsed())
    };

    print_files(&hits.files, color)?;
    print_summary(
        hits.files.len(),
        hits.source,
        elapsed.as_secs_f64() * 1000.0,
        false,
        color,
    )?;
    Ok(())
}
