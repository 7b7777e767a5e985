#![cfg(not(tarpaulin_include))]

use plotters::prelude::*;
use rand::Rng;
use std::error::Error;
use std::io::Read;

/// Number of points in the demo chart, matching the tutorial's 10-row
/// random frame.
pub const SERIES_LEN: usize = 10;

/// Styling options for the demo chart
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Width of the image in pixels
    pub width: u32,

    /// Height of the image in pixels
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Random numbers".to_string(),
            width: 800,
            height: 400,
        }
    }
}

/// Generate two series of random values in [-3, 3)
///
/// The hello page redraws this on every request; no seed, no persistence.
pub fn sample_series(points: usize) -> Vec<(f64, f64)> {
    let mut rng = rand::thread_rng();
    (0..points)
        .map(|_| (rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0)))
        .collect()
}

/// Render the two series as a PNG line chart
///
/// Both series are drawn over their index, first series blue, second red.
///
/// # Arguments
/// * `series` - Point pairs, one `(x, y)` value pair per index
/// * `options` - Chart styling options
///
/// # Returns
/// * `Result<Vec<u8>, Box<dyn Error>>` - PNG image data or an error
pub fn render_line_chart(
    series: &[(f64, f64)],
    options: &ChartOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    // Plotters draws to a file-backed bitmap; render into a temp file and
    // read the bytes back
    let file = tempfile::Builder::new().suffix(".png").tempfile()?;
    let path = file.path().to_path_buf();

    {
        let root =
            BitMapBackend::new(&path, (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let min_y = series
            .iter()
            .fold(f64::INFINITY, |m, &(a, b)| m.min(a).min(b));
        let max_y = series
            .iter()
            .fold(f64::NEG_INFINITY, |m, &(a, b)| m.max(a).max(b));

        // Fall back to a unit range when there is nothing to scale against
        let (min_y, max_y) = if series.is_empty() {
            (-1.0, 1.0)
        } else {
            (min_y - 0.5, max_y + 0.5)
        };

        let max_x = series.len().saturating_sub(1).max(1) as f64;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(0.0..max_x, min_y..max_y)?;

        chart.configure_mesh().draw()?;

        chart.draw_series(LineSeries::new(
            series.iter().enumerate().map(|(i, &(x, _))| (i as f64, x)),
            &BLUE,
        ))?;

        chart.draw_series(LineSeries::new(
            series.iter().enumerate().map(|(i, &(_, y))| (i as f64, y)),
            &RED,
        ))?;

        root.present()?;
    }

    let mut buffer = Vec::new();
    let mut reopened = std::fs::File::open(&path)?;
    reopened.read_to_end(&mut buffer)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_series_has_requested_length_and_range() {
        let series = sample_series(SERIES_LEN);
        assert_eq!(series.len(), SERIES_LEN);
        for (x, y) in series {
            assert!((-3.0..3.0).contains(&x));
            assert!((-3.0..3.0).contains(&y));
        }
    }

    #[test]
    fn rendered_chart_is_a_png() {
        let series = sample_series(SERIES_LEN);
        let png = render_line_chart(&series, &ChartOptions::default()).unwrap();

        // PNG signature
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn empty_series_still_renders() {
        let png = render_line_chart(&[], &ChartOptions::default()).unwrap();
        assert!(!png.is_empty());
    }
}
