use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Movie, MovieCatalog};
use retrieval::{classify, Intent, Query, QueryRequest, RetrievalResult};
use server::{attach_services, QueryDispatcher, ServiceConfig};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;

/// Queries the benchmark draws from, one or more per intent
const BENCHMARK_QUERIES: &[&str] = &[
    "keanu reeves",
    "the matrix",
    "action thriller",
    "recommend something like inception",
    "suggest a comedy",
    "more like this one",
    "hello",
    "tell me a story",
    "who directed alien",
];

/// ReelAssist - Movie Assistant
#[derive(Parser)]
#[command(name = "reel-assist")]
#[command(about = "Route movie questions to search, recommendations or chat", long_about = None)]
struct Cli {
    /// Movie catalog export (JSON array or JSON lines)
    #[arg(short, long, env = "REEL_CATALOG")]
    catalog: Option<PathBuf>,

    /// JSON config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recommendation service address
    #[arg(long, env = "REEL_RECOMMENDER_ADDR")]
    recommender_addr: Option<String>,

    /// Conversational service address
    #[arg(long, env = "REEL_CONVERSATION_ADDR")]
    conversation_addr: Option<String>,

    /// Per-call timeout for the model services, in milliseconds
    #[arg(long, env = "REEL_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Default result cap for keyword search
    #[arg(long, env = "REEL_LIMIT")]
    default_limit: Option<usize>,

    /// Run without the model services
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a query and dispatch it
    Query {
        /// Query text
        text: String,

        /// Override the keyword search cap for this query
        #[arg(long)]
        limit: Option<usize>,

        /// Print the JSON result instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Dispatch an inbound JSON request ("-" reads stdin)
    Request {
        /// File holding `{"query_text": ..., "history": [...], "recent_movie_ids": [...]}`
        path: PathBuf,
    },

    /// Print the intent of a query without dispatching it
    Classify {
        /// Query text
        text: String,
    },

    /// Run only the keyword strategy
    Search {
        /// Query text
        text: String,

        /// Maximum number of movies
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// List catalog movies by genre and/or release year
    Browse {
        /// Genre name (case-insensitive)
        #[arg(long)]
        genre: Option<String>,

        /// Release year
        #[arg(long)]
        year: Option<u16>,

        /// Maximum number of movies
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Run benchmark to test dispatch latency
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = service_config(&cli)?;
    debug!("Service config: {:?}", config);

    // Only the dispatching commands need the catalog and the services
    match cli.command {
        Commands::Classify { text } => handle_classify(&text),
        Commands::Browse { genre, year, limit } => {
            let catalog = load_catalog(&config)?;
            handle_browse(&catalog, genre.as_deref(), year, limit);
        }
        Commands::Query { text, limit, json } => {
            let dispatcher = connect(&config)?;
            handle_query(&dispatcher, &text, limit, json).await?
        }
        Commands::Request { path } => {
            let dispatcher = connect(&config)?;
            handle_request(&dispatcher, &path).await?
        }
        Commands::Search { text, limit } => {
            let dispatcher = connect(&config)?;
            handle_search(&dispatcher, &text, limit).await
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => {
            let dispatcher = connect(&config)?;
            handle_benchmark(dispatcher, requests, concurrent).await?
        }
    }

    Ok(())
}

fn load_catalog(config: &ServiceConfig) -> Result<Arc<MovieCatalog>> {
    println!("Loading catalog from {}...", config.catalog_path.display());
    let start = Instant::now();
    let catalog = MovieCatalog::load_from_file(&config.catalog_path)
        .context("Failed to load movie catalog")?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );
    Ok(Arc::new(catalog))
}

/// Load the catalog and wire the configured model services
fn connect(config: &ServiceConfig) -> Result<QueryDispatcher> {
    let catalog = load_catalog(config)?;
    Ok(attach_services(catalog, config))
}

/// Config file (or defaults) with flags and environment layered on top
fn service_config(cli: &Cli) -> Result<ServiceConfig> {
    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_json_file(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(catalog) = &cli.catalog {
        config.catalog_path = catalog.clone();
    }
    if let Some(addr) = &cli.recommender_addr {
        config.recommender_addr = Some(addr.clone());
    }
    if let Some(addr) = &cli.conversation_addr {
        config.conversation_addr = Some(addr.clone());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(limit) = cli.default_limit {
        config.dispatch.default_limit = limit;
    }
    if cli.offline {
        config.recommender_addr = None;
        config.conversation_addr = None;
    }

    Ok(config)
}

/// Handle the 'classify' command
fn handle_classify(text: &str) {
    let intent = classify(text);
    println!("{} {}", "Intent:".bold().blue(), intent_label(intent));
}

/// Handle the 'query' command
async fn handle_query(
    dispatcher: &QueryDispatcher,
    text: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let result = match limit {
        // A per-query cap only affects the keyword branch
        Some(limit) if classify(text) == Intent::Qa => {
            RetrievalResult::movies(Intent::Qa, dispatcher.search(text, limit).await)
        }
        _ => dispatcher.handle(&Query::new(text)).await,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

/// Handle the 'request' command
async fn handle_request(dispatcher: &QueryDispatcher, path: &Path) -> Result<()> {
    let mut body = String::new();
    if path.as_os_str() == "-" {
        std::io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read request from stdin")?;
    } else {
        body = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request {}", path.display()))?;
    }

    let request: QueryRequest = serde_json::from_str(&body).context("Malformed request")?;
    let (query, context) = request.into_parts();
    let result = dispatcher.handle_with_context(&query, &context).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Handle the 'browse' command
fn handle_browse(catalog: &MovieCatalog, genre: Option<&str>, year: Option<u16>, limit: usize) {
    let movies = catalog.browse(genre, year);

    let mut heading = String::from("Catalog");
    if let Some(genre) = genre {
        heading.push_str(&format!(" / {}", genre));
    }
    if let Some(year) = year {
        heading.push_str(&format!(" / {}", year));
    }
    println!("{} ({} movies)", heading.bold().blue(), movies.len());

    let shown: Vec<Movie> = movies.into_iter().take(limit).cloned().collect();
    print_movies(&shown);
}

/// Handle the 'search' command
async fn handle_search(dispatcher: &QueryDispatcher, text: &str, limit: usize) {
    let movies = dispatcher.search(text, limit).await;

    println!("{}", format!("Search results for '{}':", text).bold().blue());
    if movies.is_empty() {
        println!("  (no matches)");
    }
    print_movies(&movies);
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    dispatcher: QueryDispatcher,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        return Err(anyhow!("--requests must be at least 1"));
    }

    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    let mut handles = Vec::with_capacity(requests);
    for _ in 0..requests {
        let text = BENCHMARK_QUERIES[rand::random::<u32>() as usize % BENCHMARK_QUERIES.len()];
        let dispatcher = dispatcher.clone();
        let permits = permits.clone();
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            let result = dispatcher.handle(&Query::new(text)).await;
            Ok::<_, anyhow::Error>((result.intent(), start.elapsed()))
        }));
    }

    let mut timings = Vec::with_capacity(requests);
    let mut per_intent = [0usize; 3];
    for handle in handles {
        let (intent, elapsed) = handle.await??;
        per_intent[intent_slot(intent)] += 1;
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", requests, concurrent.max(1));
    println!(
        "Intents: qa {}, recommend {}, conversational {}",
        per_intent[0], per_intent[1], per_intent[2]
    );
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn intent_slot(intent: Intent) -> usize {
    match intent {
        Intent::Qa => 0,
        Intent::Recommend => 1,
        Intent::Conversational => 2,
    }
}

fn intent_label(intent: Intent) -> colored::ColoredString {
    match intent {
        Intent::Qa => intent.as_str().green(),
        Intent::Recommend => intent.as_str().yellow(),
        Intent::Conversational => intent.as_str().cyan(),
    }
}

fn print_result(result: &RetrievalResult) {
    println!("{} {}", "Intent:".bold().blue(), intent_label(result.intent()));

    match result.response() {
        Some(reply) => println!("{}", reply),
        None if result.results().is_empty() => println!("  (no movies)"),
        None => print_movies(result.results()),
    }
}

fn print_movies(movies: &[Movie]) {
    for (i, movie) in movies.iter().enumerate() {
        let year = movie
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "????".to_string());
        println!(
            "{}. {} ({}) [{}]",
            (i + 1).to_string().green(),
            movie.title,
            year,
            movie.genres.join(", ")
        );
        if !movie.cast.is_empty() {
            println!("   with {}", movie.cast.join(", "));
        }
    }
}
