mod app;
mod charts;
mod color;
mod data;
mod report;
mod state;
mod stats;

use anyhow::{Context, Result};
use app::AnalysisPipeline;

fn main() -> Result<()> {
    env_logger::init();

    let output_dir = std::env::current_dir().context("resolving working directory")?;
    let mut pipeline = AnalysisPipeline::new(output_dir);
    let artifacts = pipeline.run()?;

    for artifact in &artifacts {
        log::debug!("{:?} chart at {}", artifact.kind, artifact.path.display());
    }
    log::info!("done: {} charts written", artifacts.len());
    Ok(())
}
