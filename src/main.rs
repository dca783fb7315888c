mod error;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::error::AppError;
use crate::input::inference::Verbosity;
use crate::input::replay::ReplayBackend;
use crate::model::confusion::UnknownLabelPolicy;
use crate::pipeline::stage1_prepare::run_stage1;
use crate::pipeline::stage3_evaluate::{Stage3Input, run_stage3};
use crate::pipeline::stage4_persist::{read_collection, write_collection};
use crate::report::{AggregateError, aggregate};
use crate::report::text::render_total_report;

#[derive(Debug, Parser)]
#[command(
    name = "mlreco-valqc",
    version,
    about = "Checkpoint validation for lartpc_mlreco3d semantic segmentation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, PartialEq)]
enum Command {
    /// Run a checkpoint over a validation file and save per-event confusion matrices.
    Evaluate {
        /// Path to the cfg file used to load the network
        cfg_path: PathBuf,
        /// Path to the checkpoint saved from the network
        checkpoint_path: PathBuf,
        /// Path to the validation data to analyze the network with
        data_path: PathBuf,
        /// Name of the file to save the output in (`.gz` compresses)
        output_filename: PathBuf,
        /// Log per-entry inference detail
        #[arg(short, long)]
        verbose: bool,
        /// Fail on labels outside the class bins instead of skipping them
        #[arg(long)]
        strict_labels: bool,
    },
    /// Print the total confusion matrix over every event in an evaluate output.
    Total {
        /// Path to the file written by `evaluate`
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let verbose = matches!(cli.command, Command::Evaluate { verbose: true, .. });
    logging::init(verbose);
    if let Err(err) = run(cli.command) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Evaluate {
            cfg_path,
            checkpoint_path,
            data_path,
            output_filename,
            verbose,
            strict_labels,
        } => {
            let labels = if strict_labels {
                UnknownLabelPolicy::Reject
            } else {
                UnknownLabelPolicy::Ignore
            };
            run_evaluate(
                &cfg_path,
                &checkpoint_path,
                &data_path,
                &output_filename,
                Verbosity::from_flag(verbose),
                labels,
            )?;
            println!("Done - file saved to {}", output_filename.display());
        }
        Command::Total { path } => {
            print!("{}", run_total(&path)?);
        }
    }
    Ok(())
}

fn run_evaluate(
    cfg_path: &Path,
    checkpoint: &Path,
    data_path: &Path,
    output: &Path,
    verbosity: Verbosity,
    labels: UnknownLabelPolicy,
) -> Result<(), AppError> {
    let mut ctx = run_stage1(cfg_path, checkpoint, data_path)?;
    ctx.layout.unknown_labels = labels;
    tracing::debug!(
        config = %ctx.config.path.display(),
        unknown_labels = ?labels,
        "config prepared"
    );
    let mut backend = ReplayBackend::open(&ctx.data_path)?;
    tracing::debug!(path = %backend.path().display(), "inference backend ready");

    let collection = run_stage3(
        &mut backend,
        &Stage3Input {
            layout: &ctx.layout,
            file: ctx.file_label(),
            checkpoint: ctx.checkpoint_label(),
            verbosity,
        },
    )?;
    write_collection(output, &collection)?;
    Ok(())
}

fn run_total(path: &Path) -> Result<String, AppError> {
    let collection = read_collection(path)?;
    if collection.events.is_empty() {
        return Err(AggregateError::Empty {
            dropped: collection.dropped.len(),
        }
        .into());
    }
    let summary = aggregate(&collection.events)?;
    if let Some(accuracy) = summary.total.accuracy() {
        tracing::info!(accuracy, events = summary.n_events, "overall voxel accuracy");
    }
    tracing::info!(
        cosmic_voxels = summary.cosmics.total(),
        non_cosmic_voxels = summary.non_cosmics.total(),
        "voxel split"
    );
    Ok(render_total_report(
        &path.display().to_string(),
        &summary,
        collection.dropped.len(),
    ))
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
