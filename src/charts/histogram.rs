use std::path::Path;

use log::debug;
use plotters::prelude::*;

use super::{config_err, draw_err, with_canvas, Figure, PlotError, Result, FONT};
use crate::data::model::{IrisFrame, SEPAL_WIDTH};

pub const HISTOGRAM_BINS: usize = 15;

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

/// Equal-width bins over `[min, max]`. Every bin is half-open except the
/// last, which also holds `max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Bins {
    pub fn compute(values: &[f64], n_bins: usize) -> Option<Self> {
        if n_bins == 0 {
            return None;
        }
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let lo = finite.iter().copied().reduce(f64::min)?;
        let hi = finite.iter().copied().reduce(f64::max)?;
        // A single distinct value still gets a unit-wide span.
        let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };

        let width = (hi - lo) / n_bins as f64;
        let edges: Vec<f64> = (0..=n_bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0usize; n_bins];
        for v in finite {
            let idx = (((v - lo) / width) as usize).min(n_bins - 1);
            counts[idx] += 1;
        }
        Some(Bins { edges, counts })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Distribution of sepal width in fifteen bins.
pub(super) fn render(frame: &IrisFrame, path: &Path, figure: Figure) -> Result<()> {
    let values = frame.values(SEPAL_WIDTH)?;
    let bins = Bins::compute(&values, HISTOGRAM_BINS)
        .ok_or_else(|| PlotError::InvalidData("sepal width has no finite values".to_string()))?;

    debug!("binned {} sepal widths: {:?}", bins.total(), bins.counts);

    let x_range = bins.edges[0]..bins.edges[bins.edges.len() - 1];
    let y_max = bins.counts.iter().copied().max().unwrap_or(0) as f64 * 1.1;

    with_canvas(path, figure, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Distribution of Sepal Width", (FONT, 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, 0f64..y_max.max(1.0))
            .map_err(config_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Sepal Width (cm)")
            .y_desc("Frequency")
            .label_style((FONT, 12))
            .draw()
            .map_err(draw_err)?;

        let bars = bins.edges.windows(2).zip(&bins.counts);
        chart
            .draw_series(bars.clone().map(|(edge, &count)| {
                Rectangle::new([(edge[0], 0.0), (edge[1], count as f64)], SKY_BLUE.filled())
            }))
            .map_err(draw_err)?;
        chart
            .draw_series(bars.map(|(edge, &count)| {
                Rectangle::new([(edge[0], 0.0), (edge[1], count as f64)], BLACK)
            }))
            .map_err(draw_err)?;

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_iris;

    #[test]
    fn max_value_lands_in_last_bin() {
        let bins = Bins::compute(&[0.0, 1.0, 2.0, 3.0], 3).unwrap();
        assert_eq!(bins.counts, vec![1, 1, 2]);
        assert_eq!(bins.edges, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn constant_input_gets_a_span() {
        let bins = Bins::compute(&[2.0, 2.0], 4).unwrap();
        assert_eq!(bins.total(), 2);
        assert!(bins.edges[0] < 2.0 && bins.edges[4] > 2.0);
    }

    #[test]
    fn empty_input_has_no_bins() {
        assert!(Bins::compute(&[], 15).is_none());
        assert!(Bins::compute(&[1.0], 0).is_none());
    }

    #[test]
    fn sepal_width_fills_fifteen_bins() {
        let frame = load_iris().unwrap();
        let bins = Bins::compute(&frame.values(SEPAL_WIDTH).unwrap(), HISTOGRAM_BINS).unwrap();
        assert_eq!(bins.counts.len(), 15);
        assert_eq!(bins.edges.len(), 16);
        assert_eq!(bins.total(), 150);
        assert!((bins.edges[0] - 2.0).abs() < 1e-12);
        assert!((bins.edges[15] - 4.4).abs() < 1e-12);
    }
}
