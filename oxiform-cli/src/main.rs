//! OxiForm CLI - The Oxidized Transform Toolkit
//!
//! Runs the AIC and predictor transforms over files, chunk by chunk.

mod commands;
mod utils;

use clap::{Args, Parser, Subcommand};
use commands::{Direction, cmd_run, cmd_stats};
use oxiform_transform::{PredictorKind, TransformConfig, TransformKind};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "oxiform")]
#[command(
    author,
    version,
    about = "The Oxidized Transform Toolkit - reversible byte transforms"
)]
#[command(long_about = "
OxiForm applies reversible byte transforms that prepare data for an
entropy coder. Output carries no framing: decode with the same transform,
predictor and chunk size that were used to encode.

Transforms: aic, predictor, aic+predictor
Predictors: order0, order1

--parallel is accepted for aic only, where it yields the same bytes as a
sequential run.

Examples:
  oxiform forward input.bin ranks.bin
  oxiform inverse ranks.bin restored.bin
  oxiform forward -t predictor -p order1 data.txt data.pt
  oxiform forward -c transform.json data.txt data.out
  oxiform stats --json data.txt
")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a transform
    #[command(alias = "f")]
    Forward {
        /// Input file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        #[command(flatten)]
        options: TransformArgs,
    },

    /// Undo a transform
    #[command(alias = "i")]
    Inverse {
        /// Input file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        #[command(flatten)]
        options: TransformArgs,
    },

    /// Show zero-bit statistics of predictive whitening
    Stats {
        /// Input file
        input: PathBuf,

        #[command(flatten)]
        options: StatsArgs,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

/// Options shared by every transform command.
#[derive(Args, Debug, Default)]
struct TransformArgs {
    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Transform (aic, predictor, aic+predictor)
    #[arg(short, long)]
    transform: Option<TransformKind>,

    /// Predictor model (order0, order1)
    #[arg(short, long)]
    predictor: Option<PredictorKind>,

    /// Bytes per transform call
    #[arg(short = 's', long)]
    chunk_size: Option<usize>,

    /// Process chunks in parallel, each with a fresh transform (aic only)
    #[arg(long)]
    parallel: bool,

    /// Show progress bar
    #[arg(short = 'P', long)]
    progress: bool,
}

/// Options for the stats command, which always runs the predictor transform.
#[derive(Args, Debug)]
struct StatsArgs {
    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Predictor model (order0, order1)
    #[arg(short, long)]
    predictor: Option<PredictorKind>,

    /// Bytes per transform call
    #[arg(short = 's', long)]
    chunk_size: Option<usize>,
}

impl TransformArgs {
    /// Merge the configuration file (if any) with command-line overrides.
    fn resolve(&self) -> Result<TransformConfig, Box<dyn std::error::Error>> {
        let mut config =
            resolve_config(self.config.as_deref(), self.predictor, self.chunk_size)?;
        if let Some(kind) = self.transform {
            config.kind = kind;
        }
        Ok(config)
    }
}

impl StatsArgs {
    fn resolve(&self) -> Result<TransformConfig, Box<dyn std::error::Error>> {
        resolve_config(self.config.as_deref(), self.predictor, self.chunk_size)
    }
}

fn resolve_config(
    path: Option<&Path>,
    predictor: Option<PredictorKind>,
    chunk_size: Option<usize>,
) -> Result<TransformConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => TransformConfig::default(),
    };

    if let Some(predictor) = predictor {
        config.predictor = predictor;
    }
    if let Some(chunk_size) = chunk_size {
        config.chunk_size = chunk_size;
    }

    config.validate()?;
    Ok(config)
}

fn load_config(path: &Path) -> Result<TransformConfig, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let config = serde_json::from_str(&text)?;
    tracing::debug!(path = %path.display(), ?config, "loaded configuration");
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Forward {
            input,
            output,
            options,
        } => options.resolve().and_then(|config| {
            cmd_run(
                &input,
                &output,
                &config,
                Direction::Forward,
                options.parallel,
                options.progress,
            )
        }),
        Commands::Inverse {
            input,
            output,
            options,
        } => options.resolve().and_then(|config| {
            cmd_run(
                &input,
                &output,
                &config,
                Direction::Inverse,
                options.parallel,
                options.progress,
            )
        }),
        Commands::Stats {
            input,
            options,
            json,
        } => options
            .resolve()
            .and_then(|config| cmd_stats(&input, &config, json)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_forward_flags() {
        let cli = Cli::try_parse_from([
            "oxiform",
            "forward",
            "-t",
            "aic+predictor",
            "-p",
            "order1",
            "-s",
            "4096",
            "in.bin",
            "out.bin",
        ])
        .unwrap();

        match cli.command {
            Commands::Forward {
                input,
                output,
                options,
            } => {
                assert_eq!(input, PathBuf::from("in.bin"));
                assert_eq!(output, PathBuf::from("out.bin"));
                let config = options.resolve().unwrap();
                assert_eq!(config.kind, TransformKind::AicPredictor);
                assert_eq!(config.predictor, PredictorKind::Order1);
                assert_eq!(config.chunk_size, 4096);
            }
            _ => panic!("expected forward"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_transform() {
        assert!(Cli::try_parse_from(["oxiform", "forward", "-t", "bwt", "a", "b"]).is_err());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let args = TransformArgs {
            chunk_size: Some(0),
            ..TransformArgs::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_config_file_with_override() {
        let path = std::env::temp_dir().join("oxiform_cli_config_test.json");
        fs::write(&path, r#"{"kind":"predictor","chunk_size":2048}"#).unwrap();

        let args = TransformArgs {
            config: Some(path.clone()),
            predictor: Some(PredictorKind::Order1),
            ..TransformArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.kind, TransformKind::Predictor);
        assert_eq!(config.chunk_size, 2048);
        assert_eq!(config.predictor, PredictorKind::Order1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_stats_accepts_only_predictor_options() {
        let cli =
            Cli::try_parse_from(["oxiform", "stats", "-p", "order1", "-s", "64", "x"]).unwrap();
        match cli.command {
            Commands::Stats { options, .. } => {
                let config = options.resolve().unwrap();
                assert_eq!(config.predictor, PredictorKind::Order1);
                assert_eq!(config.chunk_size, 64);
            }
            _ => panic!("expected stats"),
        }

        assert!(Cli::try_parse_from(["oxiform", "stats", "-t", "aic", "x"]).is_err());
        assert!(Cli::try_parse_from(["oxiform", "stats", "--parallel", "x"]).is_err());
        assert!(Cli::try_parse_from(["oxiform", "stats", "--progress", "x"]).is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["oxiform", "stats", "-vv", "--json", "x"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
