use anyhow::{Context, Result};
use benchbed::{
    collect_system_info, write_bundle, Cli, Config, Orchestrator, ReportAssembler, ReportError,
    ReportFormat, Reporter, ResultSet, RunDirectory, SvgChartRenderer, SystemInfo,
    TerminalReporter,
};
use benchbed_core::report::render_markdown;
use benchbed_core::ChartFiles;
use clap::Parser;
use log::{debug, error, info};
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Load config and apply CLI overrides
    let mut config = Config::load_from(cli.config.as_deref())?;
    cli.apply_to_config(&mut config);
    config.validate().context("Invalid configuration")?;
    debug!("Configuration: {:?}", config);

    let info = collect_system_info();

    // 1. Run the selected tests
    let orchestrator = Orchestrator::from_config(&config)?;
    info!("Tests: {}", orchestrator.test_names().join(", "));
    let results = orchestrator.run().context("Failed to run benchmarks")?;

    // 2. Summarize on the terminal
    TerminalReporter::new().report(&results)?;

    // 3. Write the report files
    match write_reports(&config, &results, &info) {
        Ok((dir, written)) => {
            info!(
                "Wrote {} file(s) to {}",
                written.len(),
                dir.path().display()
            );
            Ok(())
        }
        Err(err) => {
            error!("Could not write results: {}", err);
            println!("{}", render_markdown(&results, &info, &ChartFiles::new()));
            Err(err).context("Failed to write reports")
        }
    }
}

fn write_reports(
    config: &Config,
    results: &ResultSet,
    info: &SystemInfo,
) -> Result<(RunDirectory, Vec<PathBuf>), ReportError> {
    let dir = RunDirectory::create(&config.output.base_dir)?;

    let mut assembler = ReportAssembler::new(config.output.formats.iter().copied());
    if assembler.wants(ReportFormat::Chart) {
        assembler = assembler.with_renderer(Box::new(SvgChartRenderer::new(dir.graphs_dir())));
    }

    let bundle = assembler.assemble(results, info)?;
    let written = write_bundle(&bundle, &dir)?;
    Ok((dir, written))
}
