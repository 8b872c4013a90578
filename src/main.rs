use anyhow::{Context, Result};
use clap::Parser;
use simrec::config::OutputFormat;
use simrec::{init_tracing, io, BatchEvaluator, Config, EvaluationReport};
use std::path::PathBuf;
use tracing::info;

/// Predict held-out ratings from item-item similarity and report how well
/// they correlate with the actual ratings.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Catalog CSV (item id, title)
    #[arg(short, long)]
    movies: Option<PathBuf>,

    /// Training ratings CSV (user id, item id, rating)
    #[arg(short, long)]
    training: Option<PathBuf>,

    /// Test ratings CSV (user id, item id, rating)
    #[arg(short = 'x', long)]
    test: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn metric_text(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_string(), |v| v.to_string())
}

fn print_text(report: &EvaluationReport) {
    println!("Rating predictions: ");
    for record in &report.predictions {
        let (user_id, title, predicted, actual) = record.as_tuple();
        println!("({}, {:?}, {}, {})", user_id, title, predicted, actual);
    }
    println!("Correlation: {}", metric_text(report.correlation));
    println!("MAE: {}", metric_text(report.mean_absolute_error));
    println!("RMSE: {}", metric_text(report.root_mean_squared_error));
}

fn main() -> Result<()> {
    let args = Args::parse();

    std::env::set_var("RUST_LOG", &args.log_level);
    init_tracing();

    let mut config = if std::path::Path::new(&args.config).exists() {
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, using default configuration");
        Config::default()
    };

    if let Some(path) = args.movies {
        config.data.movies_path = Some(path);
    }
    if let Some(path) = args.training {
        config.data.training_path = Some(path);
    }
    if let Some(path) = args.test {
        config.data.test_path = Some(path);
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }

    info!("Rating scale: {:?}", config.scale);

    let movies = config.data.movies_path.as_ref().context("No catalog file given (--movies)")?;
    let training = config.data.training_path.as_ref().context("No training file given (--training)")?;
    let test = config.data.test_path.as_ref().context("No test file given (--test)")?;

    let mut store = io::load_store(movies, training, &config.scale)?;
    let test_observations = io::read_observations(test, &config.scale)?;

    let report = BatchEvaluator::new(&mut store, &config.scale).evaluate(&test_observations)?;

    match config.output.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
