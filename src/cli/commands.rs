//! Command implementations for the nearword CLI.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::bench::{generate_words, measure_throughput};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::server::serve;
use crate::storage::MemoryStorage;
use crate::store::Store;

/// Execute a CLI command.
pub fn execute_command(args: NearwordArgs) -> Result<()> {
    let config = load_config(&args)?;

    match &args.command {
        Command::Serve(serve_args) => run_server(serve_args, config),
        Command::Query(words_args) => query_words(words_args, config, &args),
        Command::Insert(words_args) => insert_words(words_args, config, &args),
        Command::Nearest(nearest_args) => lookup_nearest(nearest_args, config, &args),
        Command::Stats => show_stats(config, &args),
        Command::Bench(bench_args) => run_benchmark(bench_args, config, &args),
    }
}

/// Build the store configuration: config file first, then command line overrides.
pub fn load_config(args: &NearwordArgs) -> Result<StoreConfig> {
    let mut config = match &args.config {
        Some(path) => {
            debug!("loading configuration from {}", path.display());
            StoreConfig::from_json_file(path)?
        }
        None => StoreConfig::default(),
    };

    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = log_file.clone();
    }

    config.validate()?;
    Ok(config)
}

fn run_server(serve_args: &ServeArgs, config: StoreConfig) -> Result<()> {
    let store = Arc::new(Store::open(config)?);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(store, serve_args.bind))
}

fn query_words(words_args: &WordsArgs, config: StoreConfig, cli_args: &NearwordArgs) -> Result<()> {
    let store = Store::open(config)?;
    let start = Instant::now();

    let mut matches = Vec::with_capacity(words_args.words.len());
    for word in &words_args.words {
        let result = store.handle(word)?;
        matches.push(WordMatch {
            word: word.clone(),
            value: result.closest_by_value,
            lexical: result.closest_lexically,
        });
    }
    let duration_ms = start.elapsed().as_millis() as u64;
    store.close()?;

    output_result(
        "Matches",
        &QueryResults {
            matches,
            duration_ms,
        },
        cli_args,
    )
}

fn insert_words(
    words_args: &WordsArgs,
    config: StoreConfig,
    cli_args: &NearwordArgs,
) -> Result<()> {
    let store = Store::open(config)?;
    let start = Instant::now();

    for word in &words_args.words {
        store.insert(word)?;
    }
    let duration_ms = start.elapsed().as_millis() as u64;
    store.close()?;
    info!("stored {} words", words_args.words.len());

    output_result(
        "Words stored",
        &InsertResult {
            inserted: words_args.words.len(),
            duration_ms,
        },
        cli_args,
    )
}

fn lookup_nearest(
    nearest_args: &NearestArgs,
    config: StoreConfig,
    cli_args: &NearwordArgs,
) -> Result<()> {
    let store = Store::open(config)?;

    let result = if let Some(value) = nearest_args.value {
        NearestResult {
            index: "value".to_string(),
            key: serde_json::json!(value),
            word: store.query_by_value(value),
        }
    } else {
        // clap requires exactly one of --value / --lexical.
        let lexical = nearest_args.lexical.unwrap_or_default();
        NearestResult {
            index: "lexical".to_string(),
            key: serde_json::json!(lexical),
            word: store.query_by_lexical(lexical),
        }
    };
    store.close()?;

    output_result("Nearest stored word", &result, cli_args)
}

fn show_stats(config: StoreConfig, cli_args: &NearwordArgs) -> Result<()> {
    let log_path = config.data_dir.join(&config.log_file);
    let store = Store::open(config)?;
    let stats = store.stats();
    let log_size_bytes = store.log_size()?;
    store.close()?;

    output_result(
        "Store statistics",
        &StatsResult {
            log_path: log_path.display().to_string(),
            log_size: format_bytes(log_size_bytes),
            value_keys: stats.value_keys,
            lexical_keys: stats.lexical_keys,
            records_replayed: stats.replayed,
        },
        cli_args,
    )
}

fn run_benchmark(bench_args: &BenchArgs, config: StoreConfig, cli_args: &NearwordArgs) -> Result<()> {
    let mut rng = match bench_args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let words = generate_words(bench_args.count, &mut rng);

    let store = if bench_args.memory {
        Store::with_storage(Arc::new(MemoryStorage::new()), config)?
    } else {
        Store::open(config)?
    };

    info!("matching {} random words", words.len());
    let report = measure_throughput(&store, &words)?;
    store.close()?;

    output_result("Benchmark results", &report, cli_args)
}
