//! RAG Evaluation CLI

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rag_eval::{
    config::Config,
    dataset::{load_dataset, Dataset},
    reporting::{print_console_report, summary_path, write_results_csv, RunSummary},
    responders::{HttpResponder, RecordedResponses, ResponseSource},
    runner::{Collector, CollectorConfig, ConsoleProgress, ResponseMap},
};
use rageval::{EvaluationManager, Language, ScorerKind};

#[derive(Parser)]
#[command(name = "rag-eval")]
#[command(about = "Scores answers of a RAG system against ground-truth answers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the target system for every row and score its answers
    Run {
        /// CSV dataset with `query` and `ground_truth` columns
        #[arg(short, long)]
        input: PathBuf,

        /// Results CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Target endpoint (overrides the configuration)
        #[arg(long)]
        url: Option<String>,

        /// Stemming language, e.g. spanish or es
        #[arg(short, long)]
        language: Option<String>,

        /// Comma-separated metric list (default: configured set)
        #[arg(short, long)]
        scorers: Option<String>,

        /// Number of parallel requests
        #[arg(long)]
        parallel: Option<usize>,

        /// Where to save collected responses (default: next to the output)
        #[arg(long)]
        responses_out: Option<PathBuf>,

        /// Only evaluate the first N rows of the dataset
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Score previously recorded responses without querying the target
    Score {
        /// CSV dataset with `query` and `ground_truth` columns
        #[arg(short, long)]
        input: PathBuf,

        /// JSON object mapping each query to its response
        #[arg(short, long)]
        responses: PathBuf,

        /// Results CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Stemming language, e.g. spanish or es
        #[arg(short, long)]
        language: Option<String>,

        /// Comma-separated metric list (default: configured set)
        #[arg(short, long)]
        scorers: Option<String>,

        /// Only evaluate the first N rows of the dataset
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Score a single reference/candidate pair
    Compare {
        /// Ground-truth text
        #[arg(short, long)]
        reference: String,

        /// Text to evaluate
        #[arg(short = 'c', long)]
        candidate: String,

        /// Stemming language, e.g. spanish or es
        #[arg(short, long)]
        language: Option<String>,

        /// Comma-separated metric list (default: configured set)
        #[arg(short, long)]
        scorers: Option<String>,
    },

    /// List available metrics
    ListScorers,

    /// Generate sample configuration
    InitConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config/rag-eval.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("rag_eval=debug,rageval=debug,info")
    } else {
        EnvFilter::new("rag_eval=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default()?,
    };

    match cli.command {
        Commands::Run {
            input,
            output,
            url,
            language,
            scorers,
            parallel,
            responses_out,
            limit,
        } => {
            let mut config = apply_overrides(config, language.as_deref(), scorers.as_deref())?;
            if let Some(url) = url {
                config.target.url = url;
            }
            if let Some(parallel) = parallel {
                config.collection.parallel_requests = parallel;
            }
            run_evaluation(config, input, output, responses_out, limit).await?;
        }

        Commands::Score {
            input,
            responses,
            output,
            language,
            scorers,
            limit,
        } => {
            let config = apply_overrides(config, language.as_deref(), scorers.as_deref())?;
            score_recorded(config, input, responses, output, limit).await?;
        }

        Commands::Compare {
            reference,
            candidate,
            language,
            scorers,
        } => {
            let config = apply_overrides(config, language.as_deref(), scorers.as_deref())?;
            compare_pair(&config, &reference, &candidate)?;
        }

        Commands::ListScorers => {
            list_scorers();
        }

        Commands::InitConfig { output } => {
            init_config(output)?;
        }
    }

    Ok(())
}

fn apply_overrides(
    mut config: Config,
    language: Option<&str>,
    scorers: Option<&str>,
) -> Result<Config, Box<dyn std::error::Error>> {
    if let Some(language) = language {
        config.evaluation.language = language.parse::<Language>()?;
    }
    if let Some(scorers) = scorers {
        config.evaluation.scorers = ScorerKind::parse_list(scorers)?;
    }
    Ok(config)
}

async fn run_evaluation(
    config: Config,
    input: PathBuf,
    output: PathBuf,
    responses_out: Option<PathBuf>,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let run_id = Utc::now().format("%Y%m%d-%H%M%S").to_string();

    // Scorer configuration errors must surface before any request is sent
    let manager = config.evaluation.build_manager()?;
    let dataset = load_limited(&input, limit)?;
    let responder = HttpResponder::from_config(&config.target)?;

    println!("=== RAG Evaluation ===");
    println!("Run ID:   {}", run_id);
    println!("Target:   {}", responder.url());
    println!("Dataset:  {} ({} rows)", input.display(), dataset.len());
    println!("Language: {}", config.evaluation.language);
    println!("Metrics:  {}", manager.score_names().join(", "));
    println!();

    if !responder.health_check().await.unwrap_or(false) {
        tracing::warn!("Target {} did not pass the health check", responder.url());
    }

    let collector = Collector::new(Arc::new(responder), config.collection.clone().into())
        .with_progress(Arc::new(ConsoleProgress));

    println!("Collecting responses...");
    let responses = collector.collect(&dataset.queries()).await;

    if config.output.save_responses || responses_out.is_some() {
        let path = responses_out.unwrap_or_else(|| responses_path(&output));
        RecordedResponses::save(&responses, &path)?;
        println!("Responses saved to: {}", path.display());
    }

    finish_run(&config, &manager, &dataset, &responses, &run_id, &output)
}

async fn score_recorded(
    config: Config,
    input: PathBuf,
    responses_path: PathBuf,
    output: PathBuf,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let run_id = Utc::now().format("%Y%m%d-%H%M%S").to_string();

    let manager = config.evaluation.build_manager()?;
    let dataset = load_limited(&input, limit)?;
    let recorded = RecordedResponses::from_file(&responses_path)?;

    println!("=== RAG Evaluation (recorded) ===");
    println!("Run ID:    {}", run_id);
    println!("Dataset:   {} ({} rows)", input.display(), dataset.len());
    println!("Responses: {} ({} entries)", responses_path.display(), recorded.len());
    println!("Metrics:   {}", manager.score_names().join(", "));
    println!();

    let collector_config = CollectorConfig {
        parallel_requests: dataset.len().max(1),
        retry_count: 0,
        ..CollectorConfig::default()
    };
    let responses = Collector::new(Arc::new(recorded), collector_config)
        .collect(&dataset.queries())
        .await;

    finish_run(&config, &manager, &dataset, &responses, &run_id, &output)
}

fn finish_run(
    config: &Config,
    manager: &EvaluationManager,
    dataset: &Dataset,
    responses: &ResponseMap,
    run_id: &str,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Scoring responses...");
    let scored = manager.process_batch(&dataset.rows, responses);
    let score_names = manager.score_names();

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_results_csv(output, dataset, &scored, &score_names)?;

    let summary = RunSummary::from_rows(run_id, &scored, &score_names, output.display().to_string());
    if config.output.write_summary {
        let path = summary_path(output);
        summary.write_to_file(&path)?;
        println!("Summary saved to: {}", path.display());
    }

    print_console_report(&summary);
    Ok(())
}

fn compare_pair(
    config: &Config,
    reference: &str,
    candidate: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let manager = config.evaluation.build_manager()?;
    let scores = manager.score_pair(reference, candidate);

    println!("Language: {}", config.evaluation.language);
    println!("{:-<40}", "");
    for (name, score) in &scores {
        println!("  {:<22} {:.4}", name, score);
    }
    let average = scores.values().sum::<f64>() / scores.len() as f64;
    println!("{:-<40}", "");
    println!("  {:<22} {:.4}", "average_score", average);
    Ok(())
}

fn list_scorers() {
    let all = ScorerKind::all();
    println!("Available Scorers ({}):", all.len());
    println!("{:-<60}", "");

    for kind in all {
        let marker = if kind.is_default() { "*" } else { " " };
        println!("{} {:<20} | {}", marker, kind.score_name(), kind.description());
    }

    println!();
    println!("* part of the default set");
}

fn init_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();

    // Ensure parent directory exists
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    config.save_toml(&output)?;
    println!("Configuration written to: {}", output.display());
    Ok(())
}

fn load_limited(input: &Path, limit: Option<usize>) -> Result<Dataset, Box<dyn std::error::Error>> {
    let mut dataset = load_dataset(input)?;
    if let Some(limit) = limit {
        if limit < dataset.len() {
            tracing::info!("Limiting evaluation to the first {} of {} rows", limit, dataset.len());
            dataset.truncate(limit);
        }
    }
    Ok(dataset)
}

/// `results.csv` becomes `results.responses.json`
fn responses_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string());
    output.with_file_name(format!("{}.responses.json", stem))
}
