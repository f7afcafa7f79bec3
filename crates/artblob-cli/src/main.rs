use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use artblob_core::{OverBudgetPolicy, Pipeline, PipelineConfig, ProfileKind};
use clap::{Parser, Subcommand};
use log::{info, warn};

mod output;

/// Names of the stored blobs, matching the database columns.
const THUMBNAIL_FILE: &str = "thumb.jpg";
const FULL_IMAGE_FILE: &str = "image.jpg";

#[derive(Parser)]
#[command(name = "artblob")]
#[command(about = "Derive size-bounded JPEG blobs from uploaded artwork images")]
#[command(version)]
struct Cli {
    /// Pipeline config (TOML); defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ProcessArgs {
    /// Uploaded image (JPEG, PNG or GIF)
    input: PathBuf,

    /// Directory receiving thumb.jpg and image.jpg
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Fail instead of keeping an artifact that missed its byte budget
    #[arg(long)]
    reject_over_budget: bool,

    /// Render the two profiles concurrently
    #[arg(long)]
    parallel: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Produce the thumbnail and display image for an upload
    Process(ProcessArgs),
    /// Hash a password read from stdin
    HashPassword,
    /// Check a password read from stdin against a stored hash (exit 1 on mismatch)
    VerifyPassword {
        /// Stored `$argon2id$...` string
        encoded: String,
    },
    /// Print the effective configuration as TOML
    PrintConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Process(args) => run_process(config, &args)?,
        Command::HashPassword => {
            let plaintext = read_stdin_line()?;
            println!("{}", artblob_auth::hash_password(&plaintext)?);
        }
        Command::VerifyPassword { encoded } => {
            let plaintext = read_stdin_line()?;
            if !artblob_auth::verify_password(&plaintext, &encoded)? {
                eprintln!("password does not match");
                std::process::exit(1);
            }
            println!("ok");
        }
        Command::PrintConfig => print!("{}", toml::to_string_pretty(&config)?),
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, artblob_core::ConfigError> {
    match path {
        Some(path) => {
            info!("loading config from {}", path.display());
            PipelineConfig::load(path)
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn run_process(
    mut config: PipelineConfig,
    args: &ProcessArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.reject_over_budget {
        config.over_budget = OverBudgetPolicy::Reject;
    }
    if args.parallel {
        config.parallel = true;
    }

    let pipeline = Pipeline::new(config)?;
    let file = File::open(&args.input)?;
    let processed = pipeline.process(file)?;

    std::fs::create_dir_all(&args.out_dir)?;
    for (kind, name) in [
        (ProfileKind::Thumbnail, THUMBNAIL_FILE),
        (ProfileKind::FullImage, FULL_IMAGE_FILE),
    ] {
        let path = args.out_dir.join(name);
        std::fs::write(&path, &processed.artifact(kind).bytes)?;
        info!("wrote {} to {}", kind, path.display());
    }

    if !processed.all_within_budget() {
        warn!("stored best-effort artifacts that exceed their byte budget");
    }
    println!("{}", output::summary(&processed));
    println!("content-type: {}", artblob_core::OUTPUT_CONTENT_TYPE);
    Ok(())
}

fn read_stdin_line() -> std::io::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(output::trim_line_ending(&line).to_string())
}
