use clap::Parser;
use skyfis::analysis::{self, MetricsSummary, CLASSIFICATION_THRESHOLD};
use skyfis::chromosome::Chromosome;
use skyfis::cli::{Cli, CommandLine};
use skyfis::data;
use skyfis::error::Error;
use skyfis::features;
use skyfis::ga::{FitnessEvaluator, GaEngine};
use skyfis::preprocess::{self, Preprocessor, PreprocessConfig};

const TOP_ERRORS: usize = 20;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let (params, train_split) = cli.resolve()?;
    if params.threads > 1 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(params.threads)
            .build_global()
            .ok();
    }
    let command_line = CommandLine::new(cli.output.clone())?;

    println!("loading ADS-B data from {}", cli.csv_path.display());
    let (states, skipped) = data::load_states(&cli.csv_path)?;
    println!("loaded {} states ({} malformed rows skipped)", states.len(), skipped);

    let features = features::extract(&states);
    let preprocessor = Preprocessor::new(PreprocessConfig::default());
    let samples = preprocessor.prepare(&features);
    if samples.is_empty() {
        return Err(Error::EmptyBatch);
    }
    print!("{}", preprocess::summarize(&samples));

    let (train, val) = preprocess::split(samples, train_split);
    let (train_inputs, train_targets) = preprocess::into_batches(&train);
    // with nothing held out, validate on the training split
    let (val_inputs, val_targets) = if val.is_empty() {
        (train_inputs.clone(), train_targets.clone())
    } else {
        preprocess::into_batches(&val)
    };
    println!("train {} / validation {}", train_inputs.len(), val_inputs.len());

    let baseline = Chromosome::new();
    let baseline_train = analysis::validate(
        &baseline,
        &train_inputs,
        &train_targets,
        CLASSIFICATION_THRESHOLD,
    )?;
    let baseline_val = analysis::validate(
        &baseline,
        &val_inputs,
        &val_targets,
        CLASSIFICATION_THRESHOLD,
    )?;
    println!("baseline (expert defaults), validation split:");
    print!("{baseline_val}");

    let evaluator = FitnessEvaluator::new(train_inputs.clone(), train_targets.clone())?;
    let mut engine = GaEngine::new(params);
    engine.run(&evaluator, &command_line)?;

    let optimized = engine.best_chromosome().clone();
    let optimized_train = analysis::validate(
        &optimized,
        &train_inputs,
        &train_targets,
        CLASSIFICATION_THRESHOLD,
    )?;
    let optimized_val = analysis::validate(
        &optimized,
        &val_inputs,
        &val_targets,
        CLASSIFICATION_THRESHOLD,
    )?;
    println!("optimized, validation split:");
    print!("{optimized_val}");

    let summary = MetricsSummary {
        baseline_train,
        baseline_val,
        optimized_train,
        optimized_val,
    };
    print!("{summary}");

    let predicted = analysis::predict(&optimized, &val_inputs)?;
    let records = analysis::prediction_records(&val_inputs, &val_targets, &predicted);
    command_line.write_predictions(&records)?;
    command_line.write_error_report(&analysis::top_errors(&records, TOP_ERRORS))?;
    command_line.write_metrics_summary(&summary)?;
    Ok(())
}
