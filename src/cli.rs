//! Command line surface and the terminal implementation of the output
//! interface.

use crate::analysis::{MetricsSummary, PredictionRecord};
use crate::config::{Config, GaParameters};
use crate::error::Error;
use crate::interface::{Interface, Message};
use chrono::Local;
use clap::Parser;
use std::fs::{create_dir_all, write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skyfis")]
#[command(author, version, about = "GA-tuned fuzzy anomaly scoring for ADS-B tracks")]
pub struct Cli {
    /// ADS-B track CSV to train and validate on
    pub csv_path: PathBuf,

    /// Run configuration, YAML; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of GA generations
    #[arg(long, value_name = "N")]
    pub generations: Option<usize>,

    /// Population size
    #[arg(long, value_name = "N")]
    pub population: Option<usize>,

    /// Fraction of samples used for training, the rest validate
    #[arg(long, value_name = "R")]
    pub train_split: Option<f64>,

    /// Where to write the predictions CSV; sibling artifacts land next
    /// to it
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Threads for fitness evaluation; 1 is the sequential reference
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Top-level RNG seed
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
}

impl Cli {
    /// Merge the optional config file with the flags; flags win.
    pub fn resolve(&self) -> Result<(GaParameters, f64), Error> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        let mut params = GaParameters::resolve(&config.optimization.unwrap_or_default());
        if let Some(population) = self.population {
            params.population_size = population;
        }
        if let Some(generations) = self.generations {
            params.generations = generations;
        }
        if let Some(threads) = self.threads {
            params.threads = threads;
        }
        if let Some(seed) = self.seed {
            params.seed = seed;
        }
        let train_split = self
            .train_split
            .or(config.train_split)
            .unwrap_or(0.8)
            .clamp(0.0, 1.0);
        Ok((params, train_split))
    }
}

/// Terminal frontend: progress on stdout, artifacts in the directory of
/// the predictions file.
pub struct CommandLine {
    predictions_path: PathBuf,
    output_dir: PathBuf,
}

impl CommandLine {
    pub fn new(output: Option<PathBuf>) -> Result<Self, Error> {
        let predictions_path = output.unwrap_or_else(|| {
            let time = Local::now().format("%m-%d+%H_%M_%S").to_string();
            PathBuf::from(format!("output-{time}")).join("predictions.csv")
        });
        let output_dir = predictions_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        create_dir_all(&output_dir)?;
        Ok(Self {
            predictions_path,
            output_dir,
        })
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn write_predictions(&self, records: &[PredictionRecord]) -> Result<(), Error> {
        let mut writer = csv::WriterBuilder::new().from_path(&self.predictions_path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        println!("predictions saved to {}", self.predictions_path.display());
        Ok(())
    }

    pub fn write_error_report(&self, worst: &[PredictionRecord]) -> Result<(), Error> {
        let path = self.output_dir.join("error_analysis.txt");
        let mut report = String::from("rank  index  expected  predicted  abs_error\n");
        for (rank, record) in worst.iter().enumerate() {
            report.push_str(&format!(
                "{:>4}  {:>5}  {:>8.4}  {:>9.4}  {:>9.4}\n",
                rank + 1,
                record.index,
                record.expected,
                record.predicted,
                record.abs_error
            ));
        }
        write(&path, report)?;
        println!("error report saved to {}", path.display());
        Ok(())
    }

    pub fn write_metrics_summary(&self, summary: &MetricsSummary) -> Result<(), Error> {
        let path = self.output_dir.join("metrics_summary.yaml");
        write(&path, serde_yaml::to_string(summary)?)?;
        println!("metrics summary saved to {}", path.display());
        Ok(())
    }
}

impl Interface for CommandLine {
    fn post(&self, message: Message) {
        match message {
            Message::Parameters {
                population_size,
                generations,
                crossover_rate,
                mutation_rate,
                tournament_size,
            } => {
                println!(
                    "optimizing: population {population_size}, {generations} generations, \
                     p_c {crossover_rate}, p_m {mutation_rate}, tournament {tournament_size}"
                );
            }
            Message::Elapsed { micros } => {
                println!("one fitness evaluation takes {micros} µs");
            }
            Message::Progress {
                generation,
                best_fitness,
            } => {
                println!("generation {generation}: best fitness {best_fitness:.6}");
            }
            Message::BetterSolution {
                generation,
                fitness,
                shapes,
                save,
            } => {
                println!("generation {generation}: new best fitness {fitness:.6}");
                if save {
                    let path = self.output_dir.join("tuned_shapes.yaml");
                    if let Err(error) = write(&path, shapes) {
                        eprintln!("could not save tuned shapes: {error}");
                    } else {
                        println!("tuned shapes saved to {}", path.display());
                    }
                }
            }
        }
    }
}
