use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use gnb_cli::config::{load_run_config, RunConfig};
use gnb_cli::run::{evaluate, predict_file, write_predictions};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("GNB_LOG", "error,gnb=info,gnb_cli=info"))
        .init();

    let delimiter_arg = Arg::new("delimiter")
        .long("delimiter")
        .help("Field delimiter of the input files. Overrides the configuration file.")
        .value_parser(clap::value_parser!(char));
    let headers_arg = Arg::new("has_headers")
        .long("headers")
        .help("Treat the first row of every input file as a header.")
        .action(ArgAction::SetTrue);
    let smoothing_arg = Arg::new("var_smoothing")
        .long("var-smoothing")
        .help(
            "Fraction of the largest attribute variance added to every class variance. \
             0 disables smoothing and reports zero-variance attributes as errors.",
        )
        .value_parser(clap::value_parser!(f64));
    let config_arg = Arg::new("config")
        .short('c')
        .long("config")
        .help("Path to a JSON run configuration file")
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath);

    let matches = Command::new("gnb")
        .version(clap::crate_version!())
        .about("Gaussian Naive Bayes classification of delimited numeric data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("evaluate")
                .about("Fit on a labeled file and report accuracy on held-out rows")
                .arg(
                    Arg::new("train")
                        .help("Labeled training data (label in the last column by default)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("test")
                        .short('t')
                        .long("test")
                        .help("Labeled test data. When omitted, a seeded split of the training data is used.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("test_fraction")
                        .long("test-fraction")
                        .help("Fraction of training rows held out when no test file is given.")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for the hold-out shuffle.")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("confusion")
                        .long("confusion")
                        .help("Also print the confusion matrix.")
                        .action(ArgAction::SetTrue),
                )
                .arg(config_arg.clone())
                .arg(delimiter_arg.clone())
                .arg(headers_arg.clone())
                .arg(smoothing_arg.clone()),
        )
        .subcommand(
            Command::new("predict")
                .about("Fit on a labeled file and predict the class of every row of another file")
                .arg(
                    Arg::new("train")
                        .help("Labeled training data")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("input")
                        .help("Unlabeled rows to classify")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path to write predictions (CSV). Defaults to stdout.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(config_arg)
                .arg(delimiter_arg)
                .arg(headers_arg)
                .arg(smoothing_arg),
        )
        .get_matches();

    let outcome = match matches.subcommand() {
        Some(("evaluate", sub_m)) => handle_evaluate(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    };

    if let Err(e) = outcome {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Load the optional config file and apply the flags shared by all subcommands.
fn resolve_config(matches: &ArgMatches) -> Result<RunConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            log::info!("Using config: {:?}", path);
            load_run_config(path)?
        }
        None => {
            let config = RunConfig::default();
            let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
            log::info!("No config provided; using defaults:\n{}", default_json);
            config
        }
    };

    if let Some(&delimiter) = matches.get_one::<char>("delimiter") {
        config.delimiter = delimiter;
    }
    if matches.get_flag("has_headers") {
        config.has_headers = true;
    }
    if let Some(&var_smoothing) = matches.get_one::<f64>("var_smoothing") {
        config.model.var_smoothing = var_smoothing;
    }
    Ok(config)
}

fn handle_evaluate(matches: &ArgMatches) -> Result<()> {
    let train_path: &PathBuf = matches.get_one("train").context("missing training file")?;
    let test_path: Option<&PathBuf> = matches.get_one("test");

    let mut config = resolve_config(matches)?;
    if let Some(&fraction) = matches.get_one::<f64>("test_fraction") {
        config.test_fraction = fraction;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = seed;
    }

    log::info!("Evaluating on training data: {:?}", train_path);
    let report = evaluate(train_path, test_path.map(PathBuf::as_path), &config)?;
    log::info!(
        "Trained on {} rows, scored {} rows",
        report.n_train,
        report.n_test
    );

    println!("Accuracy: {:.2}%", report.accuracy_percent());
    if matches.get_flag("confusion") {
        println!("{}", report.confusion_table());
    }
    Ok(())
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let train_path: &PathBuf = matches.get_one("train").context("missing training file")?;
    let input_path: &PathBuf = matches.get_one("input").context("missing input file")?;
    let output_path: Option<&PathBuf> = matches.get_one("output_file");

    let config = resolve_config(matches)?;
    let labels = predict_file(train_path, input_path, &config)?;

    match output_path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_predictions(file, &labels)?;
            log::info!("Wrote {} predictions to {:?}", labels.len(), path);
        }
        None => write_predictions(std::io::stdout().lock(), &labels)?,
    }
    Ok(())
}
