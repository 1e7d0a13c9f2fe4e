//! Checks a deployment manifest for internal contradictions
//!
//! Exits with status 1 when any violation is found.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use bdi_api::config::Settings;
use bdi_api::deployment::{check, DeploymentTopology};

#[derive(Debug, Parser)]
#[command(name = "topology-check", about = "Validate the BDI API deployment topology")]
struct Args {
    /// Path of the TOML topology manifest
    #[arg(default_value = "deploy/topology.toml")]
    manifest: PathBuf,

    /// Overlay the listening port and database URL from BDI_* variables
    #[arg(long)]
    with_env: bool,
}

fn run(args: &Args) -> anyhow::Result<usize> {
    let mut topology = DeploymentTopology::load(&args.manifest)
        .with_context(|| format!("failed to load {}", args.manifest.display()))?;
    if args.with_env {
        let settings = Settings::from_env()?;
        topology = topology.with_settings(&settings)?;
    }

    let violations = check(&topology);
    for violation in &violations {
        println!("violation: {}", violation);
    }
    Ok(violations.len())
}

fn main() -> ExitCode {
    bdi_api::init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(0) => {
            println!("{}: consistent", args.manifest.display());
            ExitCode::SUCCESS
        }
        Ok(count) => {
            eprintln!("{}: {} violation(s)", args.manifest.display(), count);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
