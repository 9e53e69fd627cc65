#![cfg(feature = "web")]
use crate::forecast::ForecastPoint;
use crate::record::SalesRecord;
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;

/// Configuration options for chart generation
#[derive(Clone, Debug)]
pub struct GraphOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            title: "Sales Forecast".to_string(),
            x_label: "Month".to_string(),
            y_label: "Sales ($)".to_string(),
            width: 800,
            height: 480,
        }
    }
}

/// Encode a raw RGB buffer as PNG
fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let image = RgbImage::from_raw(width, height, buffer).ok_or("Chart buffer has the wrong size")?;
    let mut png = Vec::new();
    DynamicImage::ImageRgb8(image).write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
    Ok(png)
}

/// Upper bound for the Y axis with some headroom; never zero
fn y_ceiling<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    let max = values.cloned().fold(0.0_f64, f64::max);
    if max <= 0.0 { 1.0 } else { max * 1.1 }
}

/// Creates a line chart of the monthly forecast
///
/// Draws the predicted series in blue and the marketing-adjusted series in
/// orange, with month labels on the X axis.
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
pub fn forecast_chart(
    points: &[ForecastPoint],
    options: &GraphOptions,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let (width, height) = (options.width, options.height);
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let max_x = (points.len().max(2) - 1) as f64;
        let max_y = y_ceiling(points.iter().flat_map(|p| [&p.predicted, &p.marketing]));

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..max_x, 0.0..max_y)?;

        chart
            .configure_mesh()
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .x_labels(points.len().clamp(2, 12))
            .x_label_formatter(&|x: &f64| {
                points
                    .get(x.round() as usize)
                    .map(|p| p.label.clone())
                    .unwrap_or_default()
            })
            .draw()?;

        let orange = RGBColor(255, 159, 64);

        chart
            .draw_series(LineSeries::new(
                points.iter().enumerate().map(|(i, p)| (i as f64, p.predicted)),
                &BLUE,
            ))?
            .label("Predicted Sales")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

        chart
            .draw_series(LineSeries::new(
                points.iter().enumerate().map(|(i, p)| (i as f64, p.marketing)),
                &orange,
            ))?
            .label("Sales Based On Market Investments")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &orange));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
    }

    encode_png(buffer, width, height)
}

/// Creates a bar chart comparing previous, predicted and marketing sales
///
/// Used by the improvement guide.
pub fn comparison_chart(
    record: &SalesRecord,
    options: &GraphOptions,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let bars = [
        ("Previous Sales", record.baseline_sales, BLUE),
        ("Predicted Sales", record.predicted_sales, RGBColor(128, 0, 128)),
        ("With Marketing", record.marketing_sales, RGBColor(255, 165, 0)),
    ];

    let (width, height) = (options.width, options.height);
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let max_y = y_ceiling(bars.iter().map(|(_, v, _)| v));

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5..2.5, 0.0..max_y)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc(&options.y_label)
            .x_labels(3)
            .x_label_formatter(&|x: &f64| {
                bars.get(x.round() as usize)
                    .map(|(name, _, _)| name.to_string())
                    .unwrap_or_default()
            })
            .draw()?;

        chart.draw_series(bars.iter().enumerate().map(|(i, (_, value, color))| {
            let x = i as f64;
            Rectangle::new([(x - 0.35, 0.0), (x + 0.35, *value)], color.filled())
        }))?;

        root.present()?;
    }

    encode_png(buffer, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_is_never_zero() {
        assert_eq!(y_ceiling([0.0, 0.0].iter()), 1.0);
        assert_eq!(y_ceiling([0.0_f64; 0].iter()), 1.0);
        assert!((y_ceiling([10.0, 50.0].iter()) - 55.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_mismatched_buffers() {
        assert!(encode_png(vec![0u8; 10], 4, 4).is_err());
    }

    #[test]
    fn encodes_png_signature() {
        let png = encode_png(vec![255u8; 4 * 4 * 3], 4, 4).unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn renders_forecast_chart() {
        let points = vec![
            ForecastPoint {
                label: "Nov 2026".to_string(),
                predicted: 100.0,
                marketing: 120.0,
            },
            ForecastPoint {
                label: "Dec 2026".to_string(),
                predicted: 110.0,
                marketing: 130.0,
            },
        ];
        let png = forecast_chart(&points, &GraphOptions::default()).unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn renders_comparison_chart() {
        use crate::forecast::{Midpoint, build_record};
        use crate::record::SalesForm;
        use chrono::NaiveDate;

        let record = build_record(
            SalesForm {
                product: Some("Kite".to_string()),
                previous_sales: Some("1000".to_string()),
                marketing_budget: Some("50".to_string()),
                month: Some("3".to_string()),
                ..Default::default()
            }
            .validate()
            .unwrap(),
            NaiveDate::from_ymd_opt(2026, 11, 15).unwrap(),
            &mut Midpoint,
        );
        let options = GraphOptions {
            width: 400,
            height: 300,
            ..GraphOptions::default()
        };
        let png = comparison_chart(&record, &options).unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
