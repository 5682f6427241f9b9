use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use iris_summary::config::{Cli, OutputFormat};
use iris_summary::data::filter::drop_missing;
use iris_summary::data::loader::load_source;
use iris_summary::error::LoadError;
use iris_summary::report::Report;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            match e.downcast_ref::<LoadError>() {
                Some(LoadError::SourceNotFound { .. }) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut dataset = load_source(&cli.source, &cli.load_options())?;
    if cli.drop_missing {
        dataset = drop_missing(&dataset);
        info!("{} records left after dropping missing", dataset.len());
    }

    let report = Report::build(&dataset, &cli.report_settings()).context("summarizing dataset")?;
    match cli.format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("serializing report")?;
            println!("{json}");
        }
    }
    Ok(())
}
