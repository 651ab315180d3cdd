use std::path::Path;

use plotters::prelude::*;

use super::{config_err, draw_err, with_canvas, Figure, PlotError, Result, FONT};
use crate::color::ColorMap;
use crate::data::group::{group_indices, select};
use crate::data::model::{IrisFrame, Species, PETAL_LENGTH};
use crate::stats::mean;

/// Mean petal length for every species present, alphabetically.
pub(super) fn petal_length_means(frame: &IrisFrame) -> Result<Vec<(Species, f64)>> {
    let groups = group_indices(frame)?;
    groups
        .iter()
        .map(|(species, indices)| Ok((*species, mean(&select(frame, PETAL_LENGTH, indices)?))))
        .collect()
}

/// One bar per species: mean petal length.
pub(super) fn render(frame: &IrisFrame, path: &Path, figure: Figure) -> Result<()> {
    let bars = petal_length_means(frame)?;
    if bars.is_empty() {
        return Err(PlotError::InvalidData("no species groups".to_string()));
    }
    let names: Vec<&'static str> = bars.iter().map(|(s, _)| s.name()).collect();
    let y_max = bars.iter().map(|(_, m)| *m).fold(0.0, f64::max) * 1.1;
    let colors = ColorMap::for_species();
    let last = bars.len() as i32 - 1;

    with_canvas(path, figure, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Average Petal Length per Species", (FONT, 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0..last).into_segmented(), 0f64..y_max.max(1.0))
            .map_err(config_err)?;

        let label = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => names
                .get(*i as usize)
                .map(|n| n.to_string())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Species")
            .y_desc("Petal Length (cm)")
            .x_label_formatter(&label)
            .label_style((FONT, 12))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .margin(20)
                    .style_func(|v, _| {
                        let species = match v {
                            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                                bars.get(*i as usize).map(|(s, _)| *s)
                            }
                            SegmentValue::Last => None,
                        };
                        species
                            .map(|s| colors.color_for(s))
                            .unwrap_or(RGBColor(128, 128, 128))
                            .filled()
                    })
                    .data(bars.iter().enumerate().map(|(i, (_, m))| (i as i32, *m))),
            )
            .map_err(draw_err)?;

        Ok(())
    })
}
