//! package-update - dependency update pull requests for npm projects
//!
//! Installs the current dependencies, runs the update command, and proposes
//! the result as a pull request whose body compares installed versions.

use clap::Parser;
use log::LevelFilter;
use package_update::cli::CliArgs;
use package_update::orchestrator::{Orchestrator, RunOutcome};
use package_update::progress::Progress;
use std::io::IsTerminal;
use std::process::ExitCode;

fn initialize_logger(filter: LevelFilter) -> anyhow::Result<()> {
    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("package_update")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    args.validate()?;
    let filter = args.level_filter()?;
    initialize_logger(filter)?;

    let color = std::io::stdout().is_terminal();
    // spinners would interleave with verbose log lines
    let progress = Progress::new(filter <= LevelFilter::Info && std::io::stderr().is_terminal());

    let orchestrator = Orchestrator::new(args, color, progress)?;
    let outcome = orchestrator.run().await?;

    match &outcome {
        RunOutcome::DryRun { .. } => println!("{}", outcome),
        _ => eprintln!("{}", outcome),
    }

    Ok(())
}
