//! Dependency-free SVG charts.
//!
//! Line charts plot repetition number against duration; the comparison
//! chart draws one bar per test with its 95% confidence interval as an
//! error bar.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use benchbed_core::{ChartFiles, ChartRenderer, ChartSet, ComparisonSeries, LineSeries, ReportError};
use log::debug;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 60.0;
const Y_TICKS: usize = 5;

const PLOT_WIDTH: f64 = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
const PLOT_HEIGHT: f64 = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

/// Writes charts as SVG files into one directory.
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    dir: PathBuf,
}

impl SvgChartRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn write(&self, file_name: &str, svg: &str) -> Result<(), ReportError> {
        let path = self.dir.join(file_name);
        fs::write(&path, svg).map_err(|source| ReportError::Write {
            path: path.clone(),
            source,
        })?;
        debug!("Wrote chart {}", path.display());
        Ok(())
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, charts: &ChartSet) -> Result<ChartFiles, ReportError> {
        let mut files = ChartFiles::new();
        for line in &charts.lines {
            self.write(&line.file_name, &line_chart(line))?;
            files.insert_line(line.outcome_index, line.file_name.clone());
        }
        if let Some(comparison) = &charts.comparison {
            self.write(&comparison.file_name, &bar_chart(comparison))?;
            files.set_comparison(comparison.file_name.clone());
        }
        Ok(files)
    }
}

/// Escape text for use in SVG content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Upper bound of the y axis: `max` padded by 10%, never zero.
fn y_limit(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn y_pos(value: f64, limit: f64) -> f64 {
    MARGIN_TOP + PLOT_HEIGHT - (value / limit) * PLOT_HEIGHT
}

fn open(svg: &mut String, title: &str, x_label: &str, y_label: &str) {
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
        WIDTH / 2.0,
        escape(title)
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
        MARGIN_LEFT + PLOT_WIDTH / 2.0,
        HEIGHT - 12.0,
        escape(x_label)
    );
    let _ = writeln!(
        svg,
        r#"<text x="18" y="{y}" text-anchor="middle" transform="rotate(-90 18 {y})">{}</text>"#,
        escape(y_label),
        y = MARGIN_TOP + PLOT_HEIGHT / 2.0
    );
}

fn axes(svg: &mut String, limit: f64) {
    let bottom = MARGIN_TOP + PLOT_HEIGHT;
    for tick in 0..=Y_TICKS {
        let value = limit * tick as f64 / Y_TICKS as f64;
        let y = y_pos(value, limit);
        let _ = writeln!(
            svg,
            r##"<line x1="{x1}" y1="{y:.2}" x2="{x2}" y2="{y:.2}" stroke="#e0e0e0"/>"##,
            x1 = MARGIN_LEFT,
            x2 = MARGIN_LEFT + PLOT_WIDTH,
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{:.2}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
            MARGIN_LEFT - 6.0,
            y,
            format_seconds(value)
        );
    }
    let _ = writeln!(
        svg,
        r#"<line x1="{l}" y1="{t}" x2="{l}" y2="{b}" stroke="black"/>"#,
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = bottom
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{l}" y1="{b}" x2="{r}" y2="{b}" stroke="black"/>"#,
        l = MARGIN_LEFT,
        r = MARGIN_LEFT + PLOT_WIDTH,
        b = bottom
    );
}

fn format_seconds(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value >= 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.2e}", value)
    }
}

/// Render a per-test line chart.
pub fn line_chart(series: &LineSeries) -> String {
    let limit = y_limit(series.points.iter().map(|&(_, y)| y).fold(0.0, f64::max));
    let count = series.points.len().max(1);
    let step = if count > 1 {
        PLOT_WIDTH / (count - 1) as f64
    } else {
        0.0
    };
    let x_pos = |i: usize| {
        if count > 1 {
            MARGIN_LEFT + (i - 1) as f64 * step
        } else {
            MARGIN_LEFT + PLOT_WIDTH / 2.0
        }
    };

    let mut svg = String::new();
    open(
        &mut svg,
        &format!("{} Timing per Iteration", series.name),
        "Run Iteration",
        "Time (s)",
    );
    axes(&mut svg, limit);

    let points: Vec<String> = series
        .points
        .iter()
        .map(|&(i, y)| format!("{:.2},{:.2}", x_pos(i), y_pos(y, limit)))
        .collect();
    let _ = writeln!(
        svg,
        r##"<polyline fill="none" stroke="#1f77b4" stroke-width="2" points="{}"/>"##,
        points.join(" ")
    );
    for &(i, y) in &series.points {
        let x = x_pos(i);
        let _ = writeln!(
            svg,
            r##"<circle cx="{:.2}" cy="{:.2}" r="3" fill="#1f77b4"/>"##,
            x,
            y_pos(y, limit)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{}" text-anchor="middle">{}</text>"#,
            x,
            MARGIN_TOP + PLOT_HEIGHT + 16.0,
            i
        );
    }
    svg.push_str("</svg>\n");
    svg
}

/// Render the comparison bar chart of means with CI error bars.
pub fn bar_chart(series: &ComparisonSeries) -> String {
    let tops = series
        .means
        .iter()
        .zip(&series.half_widths)
        .map(|(m, h)| m + h);
    let limit = y_limit(tops.fold(0.0, f64::max));
    let slot = PLOT_WIDTH / series.names.len().max(1) as f64;
    let bar_width = slot * 0.6;

    let mut svg = String::new();
    open(
        &mut svg,
        "Average Test Times with 95% Confidence Intervals",
        "Test",
        "Mean Time (s)",
    );
    axes(&mut svg, limit);

    for (i, name) in series.names.iter().enumerate() {
        let mean = series.means[i];
        let half = series.half_widths[i];
        let center = MARGIN_LEFT + slot * (i as f64 + 0.5);
        let top = y_pos(mean, limit);
        let bottom = MARGIN_TOP + PLOT_HEIGHT;

        let _ = writeln!(
            svg,
            r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="#1f77b4"/>"##,
            center - bar_width / 2.0,
            top,
            bar_width,
            bottom - top
        );
        if half > 0.0 {
            let hi = y_pos(mean + half, limit);
            let lo = y_pos((mean - half).max(0.0), limit);
            let _ = writeln!(
                svg,
                r#"<path d="M{c:.2},{hi:.2} V{lo:.2} M{l:.2},{hi:.2} H{r:.2} M{l:.2},{lo:.2} H{r:.2}" stroke="black" fill="none"/>"#,
                c = center,
                l = center - 5.0,
                r = center + 5.0,
            );
        }
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{}" text-anchor="middle">{}</text>"#,
            center,
            bottom + 16.0,
            escape(name)
        );
    }
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: Vec<(usize, f64)>) -> LineSeries {
        LineSeries {
            outcome_index: 0,
            name: "Disk <Read> & Write".to_string(),
            file_name: "disk_line.svg".to_string(),
            points,
        }
    }

    fn comparison() -> ComparisonSeries {
        ComparisonSeries {
            file_name: "comparison_bar_chart.svg".to_string(),
            names: vec!["CPU Test".to_string(), "Disk Write Test".to_string()],
            means: vec![0.5, 1.25],
            half_widths: vec![0.02, 0.0],
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&apos;");
    }

    #[test]
    fn test_line_chart_has_one_marker_per_point() {
        let svg = line(vec![(1, 0.1), (2, 0.12), (3, 0.09)]);
        let svg = line_chart(&svg);

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains("Disk &lt;Read&gt; &amp; Write Timing per Iteration"));
    }

    #[test]
    fn test_line_chart_single_point() {
        let svg = line_chart(&line(vec![(1, 0.0)]));
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_bar_chart_error_bars_only_when_nonzero() {
        let svg = bar_chart(&comparison());

        assert_eq!(svg.matches("<rect x=").count(), 2);
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains("CPU Test"));
    }

    #[test]
    fn test_render_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = SvgChartRenderer::new(dir.path());
        let charts = ChartSet {
            lines: vec![line(vec![(1, 0.1), (2, 0.2)])],
            comparison: Some(comparison()),
        };

        let files = renderer.render(&charts).unwrap();

        assert_eq!(files.line_for(0), Some("disk_line.svg"));
        assert_eq!(files.comparison(), Some("comparison_bar_chart.svg"));
        assert!(dir.path().join("disk_line.svg").is_file());
        assert!(dir.path().join("comparison_bar_chart.svg").is_file());
    }

    #[test]
    fn test_render_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = SvgChartRenderer::new(dir.path().join("missing"));
        let charts = ChartSet {
            lines: vec![line(vec![(1, 0.1)])],
            comparison: None,
        };

        assert!(matches!(
            renderer.render(&charts),
            Err(ReportError::Write { .. })
        ));
    }
}
