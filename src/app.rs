use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::charts::{self, ChartArtifact};
use crate::data::loader::{load_from_str, load_iris};
use crate::data::model::{IrisFrame, PETAL_LENGTH, SEPAL_LENGTH};
use crate::report;
use crate::state::PipelineState;
use crate::stats;

// ---------------------------------------------------------------------------
// Analysis pipeline: load → inspect → summarize → visualize → report
// ---------------------------------------------------------------------------

pub struct AnalysisPipeline<W: Write> {
    pub state: PipelineState,
    /// Dataset text to parse instead of the bundled one.
    source: Option<String>,
    output_dir: PathBuf,
    out: W,
}

impl AnalysisPipeline<io::Stdout> {
    /// Pipeline over the bundled dataset, printing to stdout.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_writer(output_dir, io::stdout())
    }
}

impl<W: Write> AnalysisPipeline<W> {
    pub fn with_writer(output_dir: impl Into<PathBuf>, out: W) -> Self {
        AnalysisPipeline {
            state: PipelineState::default(),
            source: None,
            output_dir: output_dir.into(),
            out,
        }
    }

    /// Parse `source` instead of the bundled dataset.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    /// Run every stage once, in order.
    pub fn run(&mut self) -> Result<Vec<ChartArtifact>> {
        self.load()?;
        self.inspect()?;
        self.summarize()?;
        let artifacts = self.visualize()?;
        self.report()?;
        Ok(artifacts)
    }

    /// Load the dataset. A parse failure is printed and recorded, not
    /// returned; only a failing writer is an error here.
    pub fn load(&mut self) -> Result<()> {
        info!("loading dataset");
        let loaded = match &self.source {
            Some(text) => load_from_str(text),
            None => load_iris(),
        };
        match loaded {
            Ok(frame) => {
                debug!("loaded {} rows", frame.len());
                self.state.set_dataset(frame);
            }
            Err(e) => {
                warn!("dataset load failed: {e}");
                writeln!(self.out, "Error loading dataset: {e}")?;
                self.state.set_load_error(e.to_string());
            }
        }
        Ok(())
    }

    /// Preview, schema and null counts.
    pub fn inspect(&mut self) -> Result<()> {
        info!("inspecting dataset");
        let frame = self.state.dataset()?;
        let preview = report::preview(frame).context("formatting row preview")?;

        writeln!(self.out, "First 5 rows of the dataset:")?;
        writeln!(self.out, "{preview}")?;
        writeln!(self.out, "\nDataset info:")?;
        writeln!(self.out, "{}", report::info(frame))?;
        writeln!(self.out, "\nMissing values check:")?;
        writeln!(self.out, "{}", report::null_counts(frame))?;
        Ok(())
    }

    /// Descriptive statistics and per-species means.
    pub fn summarize(&mut self) -> Result<()> {
        info!("computing summary statistics");
        let frame = self.state.dataset()?;
        let summaries = stats::describe(frame).context("computing descriptive statistics")?;
        let grouped = stats::grouped_means(frame).context("computing species means")?;

        writeln!(self.out, "\nBasic Statistics:")?;
        writeln!(self.out, "{}", report::describe_table(&summaries))?;
        writeln!(self.out, "\nMean values by species:")?;
        writeln!(self.out, "{}", report::grouped_table(&grouped))?;
        writeln!(self.out, "\n{}", report::FINDING)?;
        Ok(())
    }

    /// Render the four charts into the output directory.
    pub fn visualize(&mut self) -> Result<Vec<ChartArtifact>> {
        info!("rendering charts into {}", self.output_dir.display());
        let frame = self.state.dataset()?;
        let artifacts = charts::render_all(frame, &self.output_dir).context("rendering charts")?;
        Ok(artifacts)
    }

    /// Authored observations, each checked against the data.
    pub fn report(&mut self) -> Result<()> {
        if let Ok(frame) = self.state.dataset() {
            check_claims(frame)?;
        }

        writeln!(self.out, "\nObservations:")?;
        for line in report::OBSERVATIONS {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

fn check_claims(frame: &IrisFrame) -> Result<()> {
    let grouped = stats::grouped_means(frame)?;
    let r = stats::pearson(&frame.values(SEPAL_LENGTH)?, &frame.values(PETAL_LENGTH)?);
    if let Some(r) = r {
        debug!("sepal/petal length correlation r = {r:.4}");
    }
    for problem in report::unsupported_claims(&grouped, r) {
        warn!("observation not supported by data: {problem}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NotLoaded;

    fn printed(pipeline: AnalysisPipeline<Vec<u8>>) -> String {
        String::from_utf8(pipeline.into_writer()).unwrap()
    }

    #[test]
    fn full_run_prints_sections_in_order_and_writes_charts() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = AnalysisPipeline::with_writer(dir.path(), Vec::new());
        let artifacts = pipeline.run().unwrap();
        assert_eq!(artifacts.len(), 4);

        let text = printed(pipeline);
        let sections = [
            "First 5 rows of the dataset:",
            "Dataset info:",
            "Missing values check:",
            "Basic Statistics:",
            "Mean values by species:",
            "Interesting Finding:",
            "Observations:",
        ];
        let mut last = 0;
        for section in sections {
            let at = text[last..]
                .find(section)
                .unwrap_or_else(|| panic!("{section} missing or out of order"));
            last += at;
        }
        assert!(text.ends_with(&format!("{}\n", report::OBSERVATIONS[2])));

        for name in ["line_chart.png", "bar_chart.png", "histogram.png", "scatter_plot.png"] {
            let path = dir.path().join(name);
            assert!(std::fs::metadata(&path).unwrap().len() > 0, "{name}");
        }
    }

    #[test]
    fn statistical_output_is_identical_across_runs() {
        let run = || {
            let dir = tempfile::tempdir().unwrap();
            let mut pipeline = AnalysisPipeline::with_writer(dir.path(), Vec::new());
            pipeline.load().unwrap();
            pipeline.inspect().unwrap();
            pipeline.summarize().unwrap();
            printed(pipeline)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn corrupt_source_is_reported_at_load_and_fails_later() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline =
            AnalysisPipeline::with_writer(dir.path(), Vec::new()).with_source("150,4,setosa\n1.0,x\n");

        pipeline.load().unwrap();
        assert!(pipeline.state.dataset.is_none());

        let err = pipeline.inspect().unwrap_err();
        assert!(err.downcast_ref::<NotLoaded>().is_some(), "{err:#}");
        assert!(pipeline.summarize().is_err());
        assert!(pipeline.visualize().is_err());

        let text = printed(pipeline);
        assert!(text.starts_with("Error loading dataset: "), "{text}");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn run_stops_at_first_stage_needing_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = AnalysisPipeline::with_writer(dir.path(), Vec::new()).with_source("");
        let err = pipeline.run().unwrap_err();
        assert!(err.to_string().contains("dataset not loaded"), "{err:#}");
        assert!(err.to_string().contains("empty"), "{err:#}");
    }
}
