use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

mod schemas;

const DEFAULT_OUT: &str = "modules/members/src/generated/structs.rs";

/// Generate the versioned Stamhoofd schema types
#[derive(Parser)]
#[command(name = "struct-gen")]
#[command(about = "Generate the versioned Stamhoofd schema types")]
#[command(version = "0.1.0")]
struct Cli {
    /// File to write (relative to the workspace root)
    #[arg(short, long, default_value = DEFAULT_OUT)]
    out: PathBuf,

    /// Compare the file with fresh output instead of writing it
    #[arg(long)]
    check: bool,
}

fn main() -> Result<ExitCode> {
    runtime::init_default_logging();
    let cli = Cli::parse();
    let structs = schemas::all().context("Invalid schema definition")?;

    if cli.check {
        let expected = struct_builder::render(&structs)?;
        let current = fs::read_to_string(&cli.out)
            .with_context(|| format!("Failed to read {}", cli.out.display()))?;
        if current != expected {
            tracing::error!(path = %cli.out.display(), "generated structs are out of date");
            eprintln!("{} is out of date, run struct-gen", cli.out.display());
            return Ok(ExitCode::FAILURE);
        }
        tracing::info!(path = %cli.out.display(), "generated structs are up to date");
        return Ok(ExitCode::SUCCESS);
    }

    struct_builder::save(&structs, &cli.out)?;
    Ok(ExitCode::SUCCESS)
}
