use std::collections::BTreeSet;

use log::{info, warn};

use super::chart::{ChartFiles, ChartRenderer, ChartSet};
use super::{render_csv, render_json, render_markdown, render_text, ReportError, ReportFormat};
use crate::results::{ResultSet, SystemInfo};

/// Rendered artifacts for one result set. Owned by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportBundle {
    pub text: Option<String>,
    pub csv: Option<String>,
    pub json: Option<String>,
    pub markdown: Option<String>,
    /// Series computed for the chart format, whether or not they were rendered.
    pub charts: Option<ChartSet>,
    /// Chart files the renderer reported as produced.
    pub chart_files: ChartFiles,
}

/// Turns a result set into the requested report formats.
pub struct ReportAssembler {
    formats: BTreeSet<ReportFormat>,
    renderer: Option<Box<dyn ChartRenderer>>,
}

impl ReportAssembler {
    /// Create an assembler for the given formats, without a chart renderer.
    pub fn new(formats: impl IntoIterator<Item = ReportFormat>) -> Self {
        Self {
            formats: formats.into_iter().collect(),
            renderer: None,
        }
    }

    /// Use `renderer` to draw charts when [`ReportFormat::Chart`] is requested.
    pub fn with_renderer(mut self, renderer: Box<dyn ChartRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn wants(&self, format: ReportFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Render every requested format.
    ///
    /// A renderer that reports [`ReportError::Chart`] (it cannot draw) is
    /// logged and the report continues without images. Any other renderer
    /// error, such as a chart file that cannot be written, is returned.
    pub fn assemble(
        &self,
        results: &ResultSet,
        info: &SystemInfo,
    ) -> Result<ReportBundle, ReportError> {
        let mut bundle = ReportBundle::default();

        if self.wants(ReportFormat::Chart) {
            let charts = ChartSet::from_results(results);
            bundle.chart_files = match &self.renderer {
                Some(renderer) if !charts.is_empty() => match renderer.render(&charts) {
                    Ok(files) => files,
                    Err(ReportError::Chart(reason)) => {
                        warn!("Skipping charts: {}", reason);
                        ChartFiles::new()
                    }
                    Err(err) => return Err(err),
                },
                Some(_) => ChartFiles::new(),
                None => {
                    info!("No chart renderer configured, skipping chart generation");
                    ChartFiles::new()
                }
            };
            bundle.charts = Some(charts);
        }

        if self.wants(ReportFormat::Text) {
            bundle.text = Some(render_text(results, info));
        }
        if self.wants(ReportFormat::Csv) {
            bundle.csv = Some(render_csv(results)?);
        }
        if self.wants(ReportFormat::Json) {
            bundle.json = Some(render_json(results, info)?);
        }
        if self.wants(ReportFormat::Markdown) {
            bundle.markdown = Some(render_markdown(results, info, &bundle.chart_files));
        }

        Ok(bundle)
    }
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new(ReportFormat::ALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::{mixed_results, system_info};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Pretends to render every series and records what it was asked for.
    struct RecordingRenderer {
        calls: Rc<RefCell<Vec<ChartSet>>>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(&self, charts: &ChartSet) -> Result<ChartFiles, ReportError> {
            self.calls.borrow_mut().push(charts.clone());
            let mut files = ChartFiles::new();
            for line in &charts.lines {
                files.insert_line(line.outcome_index, line.file_name.clone());
            }
            if let Some(comparison) = &charts.comparison {
                files.set_comparison(comparison.file_name.clone());
            }
            Ok(files)
        }
    }

    struct FailingRenderer;

    impl ChartRenderer for FailingRenderer {
        fn render(&self, _charts: &ChartSet) -> Result<ChartFiles, ReportError> {
            Err(ReportError::Chart("backend unavailable".to_string()))
        }
    }

    /// Fails the way a renderer does when its output directory is gone.
    struct UnwritableRenderer;

    impl ChartRenderer for UnwritableRenderer {
        fn render(&self, _charts: &ChartSet) -> Result<ChartFiles, ReportError> {
            Err(ReportError::Write {
                path: "graphs/cpu_test_line.svg".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
            })
        }
    }

    #[test]
    fn test_only_requested_formats() {
        let assembler = ReportAssembler::new([ReportFormat::Csv, ReportFormat::Json]);
        let bundle = assembler.assemble(&mixed_results(), &system_info()).unwrap();

        assert!(bundle.csv.is_some());
        assert!(bundle.json.is_some());
        assert!(bundle.text.is_none());
        assert!(bundle.markdown.is_none());
        assert!(bundle.charts.is_none());
    }

    #[test]
    fn test_all_formats_with_renderer() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let assembler = ReportAssembler::default().with_renderer(Box::new(RecordingRenderer {
            calls: Rc::clone(&calls),
        }));

        let bundle = assembler.assemble(&mixed_results(), &system_info()).unwrap();

        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(bundle.chart_files.file_names().count(), 3);
        let markdown = bundle.markdown.unwrap();
        assert!(markdown.contains("![CPU Test Line Graph](graphs/cpu_test_line.svg)"));
        assert!(markdown.contains("## Comparison of Test Means"));
        assert!(bundle.text.is_some());
    }

    #[test]
    fn test_chart_series_without_renderer() {
        let bundle = ReportAssembler::default()
            .assemble(&mixed_results(), &system_info())
            .unwrap();

        assert_eq!(bundle.charts.unwrap().lines.len(), 2);
        assert!(bundle.chart_files.is_empty());
        assert!(!bundle.markdown.unwrap().contains("!["));
    }

    #[test]
    fn test_unavailable_renderer_degrades() {
        let assembler = ReportAssembler::default().with_renderer(Box::new(FailingRenderer));
        let bundle = assembler.assemble(&mixed_results(), &system_info()).unwrap();

        assert!(bundle.chart_files.is_empty());
        assert!(bundle.markdown.is_some());
    }

    #[test]
    fn test_chart_write_failure_is_returned() {
        let assembler = ReportAssembler::default().with_renderer(Box::new(UnwritableRenderer));

        match assembler.assemble(&mixed_results(), &system_info()) {
            Err(ReportError::Write { path, .. }) => {
                assert_eq!(path, std::path::PathBuf::from("graphs/cpu_test_line.svg"))
            }
            other => panic!("expected write error, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_and_objects_match_outcomes() {
        let results = mixed_results();
        let bundle = ReportAssembler::default()
            .assemble(&results, &system_info())
            .unwrap();

        let csv_rows = bundle.csv.unwrap().lines().count() - 1;
        let json: serde_json::Value = serde_json::from_str(&bundle.json.unwrap()).unwrap();
        assert_eq!(csv_rows, results.len());
        assert_eq!(json["tests"].as_array().unwrap().len(), results.len());
    }
}
