//! RKNN Command Line Interface
//!
//! A command-line interface for classifying and evaluating CSV data with a
//! k-nearest-neighbor classifier.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info};
use rknn::api::quick;
use rknn::classifier::{KnnClassifier, K_PARAMETER};
use rknn::core::{Classifier, FeatureVector, KnnError, Result};
use rknn::options::{validate, GlobalParameterConstraint, OneMustBeSet, OnlyOneIsAllowedToBeSet};
use rknn::persistence::{ClassifierSettings, SettingsFile};
use rknn::{CsvDataset, InMemoryDatabase, Metric, ParameterSet, KNN};
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "rknn")]
#[command(about = "A Rust implementation of k-nearest-neighbor classification")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "RKNN Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify instances against labeled training data
    Classify(ClassifyArgs),
    /// Evaluate accuracy on labeled test data
    Evaluate(EvaluateArgs),
    /// Describe the algorithm and its configuration
    Describe(DescribeArgs),
    /// Validate classifier settings and save them to a file
    Settings(SettingsArgs),
    /// Quick operations
    Quick(QuickArgs),
}

/// Classifier configuration shared by several commands
#[derive(Args, Clone)]
struct ConfigArgs {
    /// Number of neighbors (>0)
    #[arg(short, long, allow_hyphen_values = true)]
    k: Option<String>,

    /// Distance function
    #[arg(long)]
    metric: Option<CliMetric>,

    /// Degree of the polynomial kernel
    #[arg(long, default_value = "2")]
    degree: u32,

    /// Bias of the polynomial kernel
    #[arg(long, default_value = "1.0", allow_hyphen_values = true)]
    bias: f64,

    /// Width of the RBF kernel
    #[arg(long, default_value = "1.0")]
    gamma: f64,

    /// Fail on neighbor labels outside the known class labels
    #[arg(long)]
    strict: bool,

    /// Settings file written by the `settings` command
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliMetric {
    /// Distance induced by the linear kernel (Euclidean)
    #[value(name = "linear")]
    Linear,
    /// Distance induced by a polynomial kernel
    #[value(name = "polynomial")]
    Polynomial,
    /// Distance induced by an RBF kernel
    #[value(name = "rbf")]
    Rbf,
    /// Plain Euclidean distance
    #[value(name = "euclidean")]
    Euclidean,
}

#[derive(Args)]
struct ClassifyArgs {
    /// Labeled training data (CSV, label in last column)
    #[arg(long)]
    train: PathBuf,

    /// Instances to classify (CSV with a last label column, required but ignored)
    #[arg(long)]
    test: Option<PathBuf>,

    /// Single instance to classify, comma separated
    #[arg(long, allow_hyphen_values = true)]
    instance: Option<String>,

    /// Output predictions file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Labeled training data
    #[arg(long)]
    train: PathBuf,

    /// Labeled test data
    #[arg(long)]
    test: PathBuf,

    /// Show per-class metrics
    #[arg(long)]
    detailed: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args)]
struct DescribeArgs {
    /// Settings file to show
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Args)]
struct SettingsArgs {
    /// Output settings file
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args)]
struct QuickArgs {
    #[command(subcommand)]
    operation: QuickOperation,
}

#[derive(Subcommand)]
enum QuickOperation {
    /// Hold-out validation on a single dataset
    Cv {
        /// Data file
        data: PathBuf,
        /// Training ratio (0.0-1.0)
        #[arg(short, long, default_value = "0.8")]
        ratio: f64,
        /// Number of neighbors
        #[arg(short, long, default_value = "1")]
        k: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Classify(args) => classify_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Describe(args) => describe_command(args),
        Commands::Settings(args) => settings_command(args),
        Commands::Quick(args) => quick_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        let mut cause = e.source();
        while let Some(inner) = cause {
            error!("  caused by: {inner}");
            cause = inner.source();
        }
        process::exit(1);
    }
}

/// Settings from the optional file, overridden by explicit flags
fn resolve_settings(config: &ConfigArgs) -> Result<ClassifierSettings> {
    let mut settings = match &config.settings {
        Some(path) => {
            info!("Loading settings from: {path:?}");
            SettingsFile::load_from_file(path)?.settings
        }
        None => ClassifierSettings::default(),
    };

    if let Some(metric) = config.metric {
        settings.metric = match metric {
            CliMetric::Linear => Metric::Linear,
            CliMetric::Polynomial => Metric::Polynomial {
                degree: config.degree,
                bias: config.bias,
            },
            CliMetric::Rbf => Metric::Rbf {
                gamma: config.gamma,
            },
            CliMetric::Euclidean => Metric::Euclidean,
        };
    }
    if config.strict {
        settings.strict_labels = true;
    }

    // k goes through the textual parameter path so bad values are reported
    // with the parameter description
    let mut classifier: KnnClassifier<InMemoryDatabase> = KnnClassifier::from_settings(&settings)?;
    if let Some(k) = &config.k {
        classifier.set_parameters(&ParameterSet::from_pairs([(K_PARAMETER, k.as_str())]))?;
    }
    Ok(classifier.settings())
}

fn load_training_database(path: &Path) -> Result<Arc<InMemoryDatabase>> {
    info!("Loading training data from: {path:?}");
    let dataset = CsvDataset::from_file(path)?;
    info!(
        "Loaded {} instances with {} dimensions",
        dataset.len(),
        dataset.dim()
    );
    Ok(Arc::new(InMemoryDatabase::from_dataset(&dataset)?))
}

fn parse_instance(raw: &str) -> Result<FeatureVector> {
    raw.split(',')
        .map(|field| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|_| KnnError::ParseError(format!("Invalid feature value: {field}")))
        })
        .collect::<Result<Vec<f64>>>()
        .map(FeatureVector::new)
}

fn classify_command(args: ClassifyArgs) -> Result<()> {
    let mut params = ParameterSet::new();
    params.declare("test", "instances to classify");
    params.declare("instance", "single instance to classify");
    if let Some(path) = &args.test {
        params.set("test", path.to_string_lossy());
    }
    if let Some(instance) = &args.instance {
        params.set("instance", instance.as_str());
    }
    let constraints: Vec<Box<dyn GlobalParameterConstraint>> = vec![
        Box::new(OneMustBeSet::new(["test", "instance"])),
        Box::new(OnlyOneIsAllowedToBeSet::new(["test", "instance"])),
    ];
    validate(&params, &constraints)?;

    let settings = resolve_settings(&args.config)?;
    info!(
        "Parameters: k={}, metric={}, strict={}",
        settings.k, settings.metric, settings.strict_labels
    );

    let queries: Vec<FeatureVector> = match (&args.test, &args.instance) {
        (Some(path), _) => CsvDataset::from_file(path)?
            .into_instances()
            .into_iter()
            .map(|i| i.features)
            .collect(),
        (None, Some(raw)) => vec![parse_instance(raw)?],
        (None, None) => Vec::new(),
    };

    let database = load_training_database(&args.train)?;
    let labels = database.distinct_labels();
    let mut classifier: KnnClassifier<InMemoryDatabase> = KnnClassifier::from_settings(&settings)?;
    classifier.build_classifier(database, &labels)?;

    info!("Classifying {} instances", queries.len());
    let mut lines = Vec::with_capacity(queries.len());
    for (i, query) in queries.iter().enumerate() {
        let distribution = classifier.class_distribution(query)?;
        let predicted = distribution
            .most_probable()
            .map(|l| l.to_string())
            .unwrap_or_default();
        lines.push(format!("{i} {predicted} {distribution}"));
    }

    if let Some(output_path) = args.output {
        let file = File::create(&output_path).map_err(KnnError::IoError)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "# Predictions for {} instances", lines.len())
            .map_err(KnnError::IoError)?;
        writeln!(writer, "# Format: sample_index predicted_label distribution")
            .map_err(KnnError::IoError)?;
        for line in &lines {
            writeln!(writer, "{line}").map_err(KnnError::IoError)?;
        }

        info!("Predictions saved to: {output_path:?}");
    } else {
        println!("# Predictions for {} instances", lines.len());
        println!("# Format: sample_index predicted_label distribution");
        for line in &lines {
            println!("{line}");
        }
    }

    Ok(())
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    let settings = resolve_settings(&args.config)?;
    info!("Fitting on: {:?}", args.train);

    let model = KNN::from_settings(&settings).fit_from_csv(&args.train)?;
    let test = CsvDataset::from_file(&args.test)?;
    let metrics = model.evaluate_detailed(test.instances())?;

    println!("=== kNN Evaluation ===");
    println!("k: {}", settings.k);
    println!("Metric: {}", settings.metric);
    println!("Training instances: {}", model.info().n_instances);
    println!("Test instances: {}", metrics.total());
    println!("\nTest Results:");
    println!("  Accuracy: {:.2}%", metrics.accuracy() * 100.0);

    if args.detailed {
        println!("\nPer-class Metrics:");
        for label in metrics.labels() {
            println!(
                "  {label}: precision {:.4}, recall {:.4}, F1 {:.4}",
                metrics.precision(label),
                metrics.recall(label),
                metrics.f1_score(label)
            );
        }
        println!("  Macro F1: {:.4}", metrics.macro_f1());
    }

    Ok(())
}

fn describe_command(args: DescribeArgs) -> Result<()> {
    let classifier: KnnClassifier<InMemoryDatabase> = match &args.settings {
        Some(path) => KnnClassifier::from_settings(&SettingsFile::load_from_file(path)?.settings)?,
        None => KnnClassifier::new(),
    };

    println!("{}", classifier.description());
    println!("Model: {}", classifier.model());
    println!("\nParameters:");
    for param in classifier.parameters().iter() {
        println!(
            "  -{} {}\n      {}",
            param.name(),
            param.value().unwrap_or_default(),
            param.description()
        );
    }
    println!("  metric: {}", classifier.metric());
    println!("  strict labels: {}", classifier.is_strict());

    Ok(())
}

fn settings_command(args: SettingsArgs) -> Result<()> {
    let settings = resolve_settings(&args.config)?;
    let file = SettingsFile::new(settings)?;
    file.save_to_file(&args.output)?;
    info!("Settings saved to: {:?}", args.output);
    file.print_summary();
    Ok(())
}

fn quick_command(args: QuickArgs) -> Result<()> {
    match args.operation {
        QuickOperation::Cv { data, ratio, k } => {
            info!("Hold-out validation on {data:?} with ratio {ratio}");

            let dataset = CsvDataset::from_file(&data)?;
            let accuracy = quick::simple_validation(&dataset, ratio, k)?;

            println!("=== Hold-out Validation Results ===");
            println!("Data file: {data:?}");
            println!("Train/test ratio: {ratio:.1}/{:.1}", 1.0 - ratio);
            println!("k: {k}");
            println!("Accuracy: {:.2}%", accuracy * 100.0);

            Ok(())
        }
    }
}
