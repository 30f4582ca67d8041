use std::process::ExitCode;

use anyhow::{Context, bail};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use arxml::catalog;
use arxml::check::check_files;
use arxml::cli::Cli;
use arxml::config::ConfigManager;
use arxml::file_discovery::FileDiscovery;
use arxml::output::Output;
use arxml::reader::Reader;
use arxml::writer::Writer;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(&cli);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Returns whether every checked file passed
fn run(cli: &Cli) -> anyhow::Result<bool> {
    if let Err(message) = cli.validate() {
        bail!(message);
    }
    let config = ConfigManager::load_config(cli).context("failed to load configuration")?;
    debug!(?config, "effective configuration");

    let files = FileDiscovery::new()
        .with_extensions(config.files.extensions.clone())
        .with_include_patterns(config.files.include_patterns.clone())
        .with_exclude_patterns(config.files.exclude_patterns.clone())
        .discover_files(&cli.path)
        .with_context(|| format!("failed to scan {}", cli.path.display()))?;
    info!(count = files.len(), "discovered ARXML files");

    let registry = catalog::install().context("failed to install the element catalog")?;
    let reader = Reader::with_config(registry, config.reader.clone())
        .package_map(config.workspace.package_map.clone());
    let writer = Writer::with_config(registry, config.writer.clone());
    let writer = cli.roundtrip.then_some(&writer);

    let results = check_files(&files, &reader, writer, cli.fail_fast);

    let output = Output::new(config.output.format.clone().into(), config.output.verbosity());
    println!("{}", output.format_results(&results).trim_end());

    Ok(!results.has_failures())
}
