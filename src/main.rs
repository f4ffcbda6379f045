mod applier;
mod catalog;
mod cli;
mod error_log;
mod logger;
mod metadata;

use crate::{
    applier::TagApplier,
    cli::{Cli, RunConfig},
    error_log::ErrorLogManager,
    logger::Logger,
};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = RunConfig::from_cli(&cli);
    let logger = Logger::new(config.output.clone());

    let records = catalog::sample_records();
    for path in catalog::duplicate_paths(records) {
        logger.duplicate_path(path);
    }

    let mut applier = TagApplier::new(&config.base_dir, config.options, logger.clone());
    if let Some(dir) = &config.error_log {
        applier = applier.with_error_log(ErrorLogManager::new(dir));
    }

    let summary = applier.run(records);
    logger.run_complete(&summary);

    if let Some(error_log) = applier.error_log() {
        if summary.failed > 0 && !config.options.dry_run {
            logger.info(&format!(
                "{} failure(s) logged to {}",
                summary.failed,
                error_log.today_log_path().display()
            ));
        }
    }

    // Per-file failures are reported above; the run itself still succeeds.
    Ok(())
}
