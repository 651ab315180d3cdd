use std::path::Path;

use plotters::prelude::*;

use super::{config_err, draw_err, padded_range, with_canvas, Figure, PlotError, Result, FONT};
use crate::color::ColorMap;
use crate::data::group::{group_indices, select};
use crate::data::model::{IrisFrame, PETAL_LENGTH, SEPAL_LENGTH};

const POINT_SIZE: i32 = 3;

/// Sepal length against petal length, one coloured series per species.
pub(super) fn render(frame: &IrisFrame, path: &Path, figure: Figure) -> Result<()> {
    let groups = group_indices(frame)?;
    let mut series = Vec::with_capacity(groups.len());
    for (species, indices) in &groups {
        let xs = select(frame, SEPAL_LENGTH, indices)?;
        let ys = select(frame, PETAL_LENGTH, indices)?;
        series.push((*species, xs.into_iter().zip(ys).collect::<Vec<(f64, f64)>>()));
    }

    let all_points = || series.iter().flat_map(|(_, pts)| pts.iter().copied());
    let (x_min, x_max) = padded_range(all_points().map(|(x, _)| x))
        .ok_or_else(|| PlotError::InvalidData("no points to plot".to_string()))?;
    let (y_min, y_max) = padded_range(all_points().map(|(_, y)| y))
        .ok_or_else(|| PlotError::InvalidData("no points to plot".to_string()))?;
    let colors = ColorMap::for_species();

    with_canvas(path, figure, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Sepal Length vs Petal Length", (FONT, 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(config_err)?;

        chart
            .configure_mesh()
            .x_desc("Sepal Length (cm)")
            .y_desc("Petal Length (cm)")
            .label_style((FONT, 12))
            .draw()
            .map_err(draw_err)?;

        // Label-only entry: acts as the legend title.
        chart
            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())
            .map_err(draw_err)?
            .label("Species");

        for (species, points) in &series {
            let color = colors.color_for(*species);
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&p| Circle::new(p, POINT_SIZE, color.filled())),
                )
                .map_err(draw_err)?
                .label(species.name())
                .legend(move |(x, y)| Circle::new((x + 10, y), POINT_SIZE + 1, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 12))
            .draw()
            .map_err(draw_err)?;

        Ok(())
    })
}
