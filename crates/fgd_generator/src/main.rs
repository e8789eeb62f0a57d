//! FGD generator entry point

use anyhow::{Context, Result};
use tracing::info;

use fgd_generator::*;

fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    logging::init(&config).context("Failed to initialize logging")?;
    logging::log_config(&config);

    let report = generate(&config, &mut FsWriter).context("Generation failed")?;

    let failed = report.failures().count();
    if failed > 0 {
        anyhow::bail!("{} of {} FGD files could not be written", failed, report.passes.len());
    }

    info!(files = report.passes.len(), "Finished");
    Ok(())
}
