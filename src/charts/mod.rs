//! Static chart rendering.
//!
//! Every chart follows the same lifecycle: open a bitmap drawing area of a
//! fixed size, draw, present (flush the PNG to disk), drop the area, then read
//! the file back to report what was written. Only one drawing area is alive at
//! a time.

mod bar;
mod histogram;
mod line;
mod scatter;

use std::fmt::Display;
use std::path::{Path, PathBuf};

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use crate::data::model::{FrameError, IrisFrame};

/// Errors that can occur during chart generation.
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("Failed to inspect written chart: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Written chart is not a readable image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = core::result::Result<T, PlotError>;

fn config_err(e: impl Display) -> PlotError {
    PlotError::ChartConfig(e.to_string())
}

fn draw_err(e: impl Display) -> PlotError {
    PlotError::Drawing(e.to_string())
}

// ---------------------------------------------------------------------------
// Figure geometry
// ---------------------------------------------------------------------------

const DPI: u32 = 100;
const FONT: &str = "sans-serif";

/// Figure size in inches, rendered at a fixed 100 px per inch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Figure {
    pub width_in: u32,
    pub height_in: u32,
}

impl Figure {
    pub const fn new(width_in: u32, height_in: u32) -> Self {
        Figure {
            width_in,
            height_in,
        }
    }

    pub fn pixels(self) -> (u32, u32) {
        (self.width_in * DPI, self.height_in * DPI)
    }
}

// ---------------------------------------------------------------------------
// Chart catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Histogram,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Histogram,
        ChartKind::Scatter,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::Line => "line_chart.png",
            ChartKind::Bar => "bar_chart.png",
            ChartKind::Histogram => "histogram.png",
            ChartKind::Scatter => "scatter_plot.png",
        }
    }

    pub fn figure(self) -> Figure {
        match self {
            ChartKind::Line => Figure::new(8, 5),
            ChartKind::Bar | ChartKind::Histogram => Figure::new(6, 4),
            ChartKind::Scatter => Figure::new(6, 5),
        }
    }
}

/// A chart written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifact {
    pub kind: ChartKind,
    pub path: PathBuf,
    pub dimensions: (u32, u32),
    pub bytes: u64,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Render one chart into `output_dir` and report the written file.
pub fn render(kind: ChartKind, frame: &IrisFrame, output_dir: &Path) -> Result<ChartArtifact> {
    let path = output_dir.join(kind.file_name());
    let figure = kind.figure();
    match kind {
        ChartKind::Line => line::render(frame, &path, figure)?,
        ChartKind::Bar => bar::render(frame, &path, figure)?,
        ChartKind::Histogram => histogram::render(frame, &path, figure)?,
        ChartKind::Scatter => scatter::render(frame, &path, figure)?,
    }
    display(kind, &path)
}

/// Render all four charts in order.
pub fn render_all(frame: &IrisFrame, output_dir: &Path) -> Result<Vec<ChartArtifact>> {
    ChartKind::ALL
        .into_iter()
        .map(|kind| render(kind, frame, output_dir))
        .collect()
}

/// Re-open a written chart and log what it contains.
fn display(kind: ChartKind, path: &Path) -> Result<ChartArtifact> {
    let dimensions = image::image_dimensions(path)?;
    let bytes = std::fs::metadata(path)?.len();
    info!(
        "saved {} ({}x{} px, {} bytes)",
        path.display(),
        dimensions.0,
        dimensions.1,
        bytes
    );
    Ok(ChartArtifact {
        kind,
        path: path.to_path_buf(),
        dimensions,
        bytes,
    })
}

// ---------------------------------------------------------------------------
// Shared drawing helpers
// ---------------------------------------------------------------------------

/// Open a white canvas for `figure` at `path`, run `draw` on it, and flush it.
/// The drawing area is dropped before this returns.
fn with_canvas<F>(path: &Path, figure: Figure, draw: F) -> Result<()>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
{
    let root = BitMapBackend::new(path, figure.pixels()).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    draw(&root)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

/// `(min, max)` of `values`, widened by 5% on each side so that points do not
/// sit on the frame. `None` for empty input.
fn padded_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.5 };
    Some((lo - pad, hi + pad))
}
