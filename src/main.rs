use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use arrow::util::pretty::pretty_format_batches;
use clap::{Args, Parser, Subcommand};

use vitara::{export, read_dataset, DisplayConfig, IntensityMatrix, TrialDescriptor};

#[derive(Parser)]
#[command(name = "vitara", version, about = "Pump-probe spectrogram ingestion")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load datasets and report their shape and physical axis extents
    Inspect(InspectArgs),
    /// Write one dataset and its axes to a parquet file
    Export(ExportArgs),
}

#[derive(Args)]
struct InspectArgs {
    /// JSON trial file; every folder it lists is loaded
    #[arg(long, conflicts_with = "folder", required_unless_present = "folder")]
    trial: Option<PathBuf>,

    /// A single dataset folder, inspected without calibration
    #[arg(long)]
    folder: Option<PathBuf>,

    /// Field separator: a single character, or `tab`
    #[arg(long, default_value = "tab", value_parser = parse_separator)]
    separator: u8,

    /// Print the first N pixel rows as a table
    #[arg(long, default_value_t = 0)]
    preview: usize,
}

#[derive(Args)]
struct ExportArgs {
    /// JSON trial file
    #[arg(long)]
    trial: PathBuf,

    /// Output parquet path
    #[arg(long)]
    out: PathBuf,

    /// Dataset folder to export; defaults to the trial's first folder
    #[arg(long)]
    folder: Option<PathBuf>,

    /// YAML display configuration embedded as export metadata
    #[arg(long)]
    config: Option<PathBuf>,

    /// Field separator: a single character, or `tab`
    #[arg(long, default_value = "tab", value_parser = parse_separator)]
    separator: u8,
}

fn parse_separator(s: &str) -> std::result::Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("separator must be a single ASCII character, got '{s}'")),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Inspect(args) => inspect(args),
        Command::Export(args) => export_dataset(args),
    };

    if let Err(e) = outcome {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

fn inspect(args: InspectArgs) -> Result<()> {
    if let Some(folder) = &args.folder {
        let matrix = load(folder, args.separator)?;
        report(folder, &matrix, None, args.preview)?;
        return Ok(());
    }

    let Some(trial_path) = &args.trial else {
        bail!("either --trial or --folder is required");
    };
    let trial = load_trial(trial_path)?;
    for folder in trial.folder_names() {
        let matrix = load(folder, args.separator)?;
        report(folder, &matrix, Some(&trial), args.preview)?;
    }
    Ok(())
}

fn report(
    folder: &Path,
    matrix: &IntensityMatrix,
    trial: Option<&TrialDescriptor>,
    preview: usize,
) -> Result<()> {
    let (pixels, positions) = matrix.shape();
    log::info!(
        "{}: {pixels} pixels x {positions} positions, labels {:?}",
        folder.display(),
        matrix.labels()
    );

    if let Some(trial) = trial {
        let times = trial.time_axis(positions)?;
        let vertical = trial.vertical_axis(pixels)?;
        if let (Some(first), Some(last)) = (times.first(), times.last()) {
            log::info!("  delay: {first:.1} fs to {last:.1} fs");
        }
        if let (Some(first), Some(last)) = (vertical.first(), vertical.last()) {
            log::info!("  {}: {first:.2} to {last:.2}", trial.vertical_label());
        }
    }

    if preview > 0 {
        let batch = export::to_record_batch(matrix, trial, None)?;
        let head = batch.slice(0, preview.min(batch.num_rows()));
        println!("{}", pretty_format_batches(&[head])?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

fn export_dataset(args: ExportArgs) -> Result<()> {
    let trial = load_trial(&args.trial)?;
    let folder = match &args.folder {
        Some(folder) => folder.clone(),
        None => trial
            .folder_names()
            .first()
            .cloned()
            .context("trial lists no folders")?,
    };

    let display = args
        .config
        .as_deref()
        .map(|path| {
            DisplayConfig::from_path(path)
                .with_context(|| format!("loading display config {}", path.display()))
        })
        .transpose()?;

    let matrix = load(&folder, args.separator)?;
    export::write_parquet(&args.out, &matrix, Some(&trial), display.as_ref())
        .with_context(|| format!("writing {}", args.out.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// shared helpers
// ---------------------------------------------------------------------------

fn load_trial(path: &Path) -> Result<TrialDescriptor> {
    let trial = TrialDescriptor::from_json_path(path)
        .with_context(|| format!("reading trial {}", path.display()))?;
    log::debug!("Trial: {}", serde_json::to_string(&trial)?);
    Ok(trial)
}

fn load(folder: &Path, separator: u8) -> Result<IntensityMatrix> {
    read_dataset(folder, separator)
        .with_context(|| format!("loading dataset {}", folder.display()))
}
