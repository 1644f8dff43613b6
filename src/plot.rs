use plotters::prelude::*;

use crate::{linspace, subintervals, BatchFunction, DarbouxError};

const CURVE_SAMPLES: usize = 1000;

/// The plotted range of `ys`, padded by 10% and always containing 0 where the rectangles
/// are anchored. Non-finite values are ignored.
fn vertical_range(ys: &[f64]) -> (f64, f64) {
    let (mut y_min, mut y_max) = ys
        .iter()
        .filter(|y| y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &y| {
            (lo.min(y), hi.max(y))
        });
    if y_min > y_max {
        y_min = 0.;
        y_max = 1.;
    }
    let y_padding = 0.1 * (y_max - y_min);
    ((y_min - y_padding).min(0.), (y_max + y_padding).max(0.))
}

/// Render `f`, the lower and upper rectangles and the partition lines to an SVG file.
///
/// Poles of `f` are left out of the vertical range and rectangles reaching them are cut off
/// at the border of the chart.
pub fn plot_sums<F: BatchFunction + ?Sized>(
    f: &F,
    points: &[f64],
    title: &str,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if points.len() < 2 {
        return Err(DarbouxError::PartitionTooShort(points.len()).into());
    }

    let x_min = points[0];
    let x_max = points[points.len() - 1];
    let x_padding = 0.05 * (x_max - x_min);

    let xs = linspace(x_min - x_padding, x_max + x_padding, CURVE_SAMPLES);
    let mut ys = Vec::with_capacity(CURVE_SAMPLES);
    f.evaluate(&xs, &mut ys);

    let (y_lo, y_hi) = vertical_range(&ys);
    let clamp = |y: f64| {
        if y.is_nan() {
            0f32
        } else {
            y.max(y_lo).min(y_hi) as f32
        }
    };

    let root = SVGBackend::new(filename, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.margin(10, 10, 10, 10);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20).into_font())
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_ranged(
            (x_min - x_padding) as f32..(x_max + x_padding) as f32,
            y_lo as f32..y_hi as f32,
        )?;

    chart
        .configure_mesh()
        .line_style_1(&WHITE.mix(0.3))
        .x_labels(10)
        .y_labels(10)
        .draw()?;

    let bounds = subintervals(points, f);

    chart.draw_series(bounds.iter().map(|s| {
        Rectangle::new(
            [(s.left as f32, 0f32), (s.right as f32, clamp(s.max))],
            RED.mix(0.5).filled(),
        )
    }))?;

    chart.draw_series(bounds.iter().map(|s| {
        Rectangle::new(
            [(s.left as f32, 0f32), (s.right as f32, clamp(s.min))],
            CYAN.mix(0.6).filled(),
        )
    }))?;

    chart.draw_series(LineSeries::new(
        xs.iter()
            .zip(&ys)
            .filter(|(_, y)| y.is_finite())
            .map(|(x, y)| (*x as f32, clamp(*y))),
        &BLUE,
    ))?;

    for p in points {
        let line = (0..2).map(|i| (*p as f32, (if i == 0 { y_lo } else { y_hi }) as f32));
        chart.draw_series(LineSeries::new(line, &BLACK.mix(0.4)))?;
    }

    Ok(())
}
