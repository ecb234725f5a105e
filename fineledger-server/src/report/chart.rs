//! Outstanding-per-member bar chart
//!
//! Draws a vertical bar chart into an RGB buffer with plotters, then
//! encodes it as PNG. Regenerated on every request; nothing is cached.

use std::io::Cursor;

use plotters::prelude::*;

use crate::error::{ServerError, ServerResult};
use crate::models::NameTotal;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const CAPTION: &str = "Outstanding fines per member";

/// Render the per-member totals as a PNG bar chart.
///
/// Bars may extend below zero for overpaid members. An empty slice yields
/// a blank chart carrying only the caption.
pub fn render_totals_chart(totals: &[NameTotal]) -> ServerResult<Vec<u8>> {
    let mut buffer = vec![0u8; (WIDTH * HEIGHT * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        if totals.is_empty() {
            root.draw(&Text::new(CAPTION, (40, 40), ("sans-serif", 24)))
                .map_err(draw_error)?;
        } else {
            draw_bars(&root, totals)?;
        }

        root.present().map_err(draw_error)?;
    }

    encode_png(buffer)
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    totals: &[NameTotal],
) -> ServerResult<()>
where
    DB::ErrorType: 'static,
{
    let y_lo = totals.iter().map(|t| t.outstanding).min().unwrap_or(0).min(0);
    let y_hi = totals.iter().map(|t| t.outstanding).max().unwrap_or(0).max(1);
    let pad = ((y_hi - y_lo) / 10).max(1);

    let mut chart = ChartBuilder::on(root)
        .caption(CAPTION, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(80)
        .y_label_area_size(90)
        .build_cartesian_2d(
            0f64..totals.len() as f64,
            (y_lo - pad) as f64..(y_hi + pad) as f64,
        )
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(totals.len())
        .x_label_formatter(&|x| {
            totals
                .get(x.floor() as usize)
                .map(|t| t.name.clone())
                .unwrap_or_default()
        })
        .x_label_style(
            ("sans-serif", 14)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_desc("Outstanding")
        .draw()
        .map_err(draw_error)?;

    chart
        .draw_series(totals.iter().enumerate().map(|(i, t)| {
            Rectangle::new(
                [
                    (i as f64 + 0.15, 0.0),
                    (i as f64 + 0.85, t.outstanding as f64),
                ],
                BLUE.filled(),
            )
        }))
        .map_err(draw_error)?;

    Ok(())
}

fn encode_png(buffer: Vec<u8>) -> ServerResult<Vec<u8>> {
    let image = image::RgbImage::from_raw(WIDTH, HEIGHT, buffer)
        .ok_or_else(|| ServerError::Report("chart buffer size mismatch".into()))?;

    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| ServerError::Report(e.to_string()))?;

    Ok(png)
}

fn draw_error(e: impl std::fmt::Display) -> ServerError {
    ServerError::Report(e.to_string())
}
