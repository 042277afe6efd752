use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use etude_domain::ExportFormat;
use etude_preprocess::{check_dataset, CancelFlag, PreprocessConfig, Preprocessor};

/// Well-known relative path read directly by the training stack.
const DEFAULT_SAVE_DIR: &str = "pig_single_finger";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Prepare the PIG piano fingering dataset for training"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert the extracted PIG archive into normalized fingering files
    Preprocess {
        /// Path to the extracted PianoFingeringDataset archive
        #[arg(long)]
        dataset_dir: PathBuf,
        /// Where normalized files are written
        #[arg(long, default_value = DEFAULT_SAVE_DIR)]
        save_dir: PathBuf,
        /// Convert every annotated fingering instead of the first per piece
        #[arg(long)]
        all_versions: bool,
        /// Output format for normalized files
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Report whether the normalized dataset is ready for training
    Check {
        #[arg(long, default_value = DEFAULT_SAVE_DIR)]
        save_dir: PathBuf,
        /// Require at least this many pieces
        #[arg(long)]
        expected: Option<usize>,
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Json,
    Csv,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => ExportFormat::Json,
            OutputFormat::Csv => ExportFormat::Csv,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Preprocess {
            dataset_dir,
            save_dir,
            all_versions,
            format,
        } => {
            let config = PreprocessConfig {
                dataset_dir,
                save_dir: save_dir.clone(),
                all_versions,
                format: format.into(),
            };
            info!(dataset_dir = %config.dataset_dir.display(), "starting preprocess");
            let preprocessor = Preprocessor::new(config);
            let summary = preprocessor
                .run(&CancelFlag::new())
                .context("preprocess failed")?;

            for skip in &summary.skipped {
                eprintln!("skipped {}: {}", skip.source, skip.reason);
            }
            println!(
                "Wrote {} pieces to {} ({} skipped, {} rows excluded)",
                summary.processed(),
                save_dir.display(),
                summary.skipped.len(),
                summary.row_warnings
            );
            if summary.written.is_empty() {
                eprintln!("no pieces were converted");
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Command::Check {
            save_dir,
            expected,
            format,
        } => {
            let report = check_dataset(&save_dir, format.into(), expected);
            if report.ready {
                println!(
                    "PIG dataset is ready: {} pieces in {}",
                    report.piece_count,
                    report.save_dir.display()
                );
                Ok(ExitCode::SUCCESS)
            } else {
                println!(
                    "PIG dataset is not ready: run `pig-prep preprocess --dataset-dir <path>` first"
                );
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
