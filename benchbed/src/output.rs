//! Run directories and report files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use benchbed_core::{ReportBundle, ReportError, GRAPHS_DIR};
use chrono::Local;
use log::info;

pub const CSV_FILE: &str = "results.csv";
pub const JSON_FILE: &str = "results.json";
pub const TEXT_FILE: &str = "results.txt";
pub const MARKDOWN_FILE: &str = "write-up.md";

/// A timestamped directory holding the artifacts of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectory {
    root: PathBuf,
}

impl RunDirectory {
    /// Create `<base>/run_YYYYMMDD_HHMMSS/graphs/`, creating `base` as needed.
    pub fn create(base: &Path) -> Result<Self, ReportError> {
        let name = format!("run_{}", Local::now().format("%Y%m%d_%H%M%S"));
        Self::create_named(base, &name)
    }

    /// Create `<base>/<name>/graphs/`.
    pub fn create_named(base: &Path, name: &str) -> Result<Self, ReportError> {
        let root = base.join(name);
        let graphs = root.join(GRAPHS_DIR);
        fs::create_dir_all(&graphs).map_err(|source| ReportError::Write {
            path: graphs.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn graphs_dir(&self) -> PathBuf {
        self.root.join(GRAPHS_DIR)
    }
}

fn write_file(path: PathBuf, content: &str) -> Result<PathBuf, ReportError> {
    fs::write(&path, content).map_err(|source| ReportError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Write every rendered artifact of `bundle` into `dir`.
///
/// Returns the paths written, chart files included. Stops at the first file
/// that cannot be written.
pub fn write_bundle(bundle: &ReportBundle, dir: &RunDirectory) -> Result<Vec<PathBuf>, ReportError> {
    let mut written = Vec::new();
    let artifacts = [
        (CSV_FILE, &bundle.csv),
        (JSON_FILE, &bundle.json),
        (TEXT_FILE, &bundle.text),
        (MARKDOWN_FILE, &bundle.markdown),
    ];

    for (file_name, content) in artifacts {
        if let Some(content) = content {
            let path = write_file(dir.path().join(file_name), content)?;
            info!("Wrote {}", path.display());
            written.push(path);
        }
    }

    let graphs = dir.graphs_dir();
    written.extend(bundle.chart_files.file_names().map(|name| graphs.join(name)));

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_named_makes_graphs_dir() {
        let base = tempfile::tempdir().unwrap();
        let dir = RunDirectory::create_named(&base.path().join("output"), "run_1").unwrap();

        assert_eq!(dir.path(), base.path().join("output").join("run_1"));
        assert!(dir.graphs_dir().is_dir());
    }

    #[test]
    fn test_create_uses_timestamped_name() {
        let base = tempfile::tempdir().unwrap();
        let dir = RunDirectory::create(base.path()).unwrap();

        let name = dir.path().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("run_"));
        assert_eq!(name.len(), "run_YYYYMMDD_HHMMSS".len());
    }

    #[test]
    fn test_write_bundle_writes_present_artifacts() {
        let base = tempfile::tempdir().unwrap();
        let dir = RunDirectory::create_named(base.path(), "run").unwrap();
        let bundle = ReportBundle {
            csv: Some("a,b\n".to_string()),
            markdown: Some("# Report\n".to_string()),
            ..ReportBundle::default()
        };

        let written = write_bundle(&bundle, &dir).unwrap();

        assert_eq!(
            written,
            vec![dir.path().join(CSV_FILE), dir.path().join(MARKDOWN_FILE)]
        );
        assert_eq!(fs::read_to_string(dir.path().join(CSV_FILE)).unwrap(), "a,b\n");
        assert!(!dir.path().join(JSON_FILE).exists());
    }

    #[test]
    fn test_write_bundle_reports_path_on_failure() {
        let base = tempfile::tempdir().unwrap();
        let dir = RunDirectory::create_named(base.path(), "run").unwrap();
        fs::remove_dir_all(dir.path()).unwrap();
        let bundle = ReportBundle {
            text: Some("x".to_string()),
            ..ReportBundle::default()
        };

        match write_bundle(&bundle, &dir) {
            Err(ReportError::Write { path, .. }) => {
                assert_eq!(path, dir.path().join(TEXT_FILE))
            }
            other => panic!("expected write error, got {:?}", other),
        }
    }
}
