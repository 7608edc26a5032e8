mod cli;
mod platform;
mod tools;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use documorph_logging::{morph_error, morph_info};
use log::LevelFilter;

use cli::Args;
use platform::logging::{self, LogDestination};
use platform::{run_app, AppConfig};

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(LogDestination::from_option(args.log_file.clone()), level);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            morph_error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<bool> {
    let form = args
        .tool
        .build_form(&args.files, &args.fields)
        .with_context(|| format!("cannot prepare {}", args.tool.name()))?;
    if let Some(dir) = &args.download_dir {
        documorph_engine::ensure_output_dir(dir)
            .with_context(|| format!("cannot use download directory {}", dir.display()))?;
    }

    morph_info!("{} -> {}", args.tool.name(), args.server);
    let outcome = run_app(AppConfig {
        server: args.server,
        form,
        download_dir: args.download_dir,
        quiet: args.quiet,
    })?;
    Ok(outcome.success())
}
