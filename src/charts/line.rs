use std::path::Path;

use plotters::prelude::*;

use super::{config_err, draw_err, padded_range, with_canvas, Figure, PlotError, Result, FONT};
use crate::data::model::{IrisFrame, SEPAL_LENGTH};

/// Sepal length against row index, as a single line with a legend.
pub(super) fn render(frame: &IrisFrame, path: &Path, figure: Figure) -> Result<()> {
    let values = frame.values(SEPAL_LENGTH)?;
    if values.is_empty() {
        return Err(PlotError::InvalidData("no sepal length values".to_string()));
    }
    let x_max = (values.len() - 1).max(1) as f64;
    let (y_min, y_max) = padded_range(values.iter().copied())
        .ok_or_else(|| PlotError::InvalidData("sepal length has no finite values".to_string()))?;

    with_canvas(path, figure, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Line Chart of Sepal Length Over Index", (FONT, 22))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..x_max, y_min..y_max)
            .map_err(config_err)?;

        chart
            .configure_mesh()
            .x_desc("Index")
            .y_desc("Sepal Length (cm)")
            .label_style((FONT, 12))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(LineSeries::new(
                values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                &BLUE,
            ))
            .map_err(draw_err)?
            .label("Sepal Length")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

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
