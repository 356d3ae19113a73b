//! Configuration loading for benchbed.
//!
//! Supports loading configuration from TOML files, with sensible defaults
//! for all settings.

use anyhow::{bail, Context, Result};
use benchbed_core::{CriticalValueMode, ReportFormat};
use benchbed_workloads::{CpuWorkload, MemoryWorkload};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A group of tests that can be selected for a run.
///
/// The declaration order is the order groups run in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    /// Floating point multiplication loop.
    Cpu,
    /// Random read/write over a large buffer.
    Memory,
    /// Disk write, read and copy.
    Disk,
}

impl TestKind {
    pub const ALL: [TestKind; 3] = [TestKind::Cpu, TestKind::Memory, TestKind::Disk];
}

/// Top-level configuration for benchbed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which tests to run and how often.
    pub run: RunConfig,
    /// Sizes and locations used by the workloads.
    pub workloads: WorkloadConfig,
    /// Settings for the statistical summary.
    pub statistics: StatisticsConfig,
    /// Where and in which formats reports are written.
    pub output: OutputConfig,
}

/// Configuration of the repetition protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Test groups to run.
    pub tests: Vec<TestKind>,
    /// Number of measured repetitions per test.
    pub repeat: u32,
    /// Workload invocations per measured repetition.
    pub number: u32,
    /// Untimed invocations before measuring.
    pub warmup: u32,
    /// Seed for the workloads' random number generators.
    pub seed: Option<u64>,
}

/// Configuration of the built-in workloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Multiplications per CPU test invocation.
    pub cpu_iterations: u64,
    /// Size in bytes of the memory test buffer.
    pub memory_bytes: u64,
    /// Random read/write operations per memory test invocation.
    pub memory_operations: u64,
    /// Size in bytes of the disk test file.
    pub disk_size: u64,
    /// Directory the disk tests create their scratch files in.
    pub scratch_dir: PathBuf,
}

/// Configuration of the statistical summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Source of the Student-t critical value.
    pub critical_value: CriticalValueMode,
}

/// Configuration of report output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives one `run_YYYYMMDD_HHMMSS` directory per run.
    pub base_dir: PathBuf,
    /// Report formats to write.
    pub formats: Vec<ReportFormat>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tests: TestKind::ALL.to_vec(),
            repeat: 5,
            number: 1,
            warmup: 1,
            seed: None,
        }
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            cpu_iterations: CpuWorkload::DEFAULT_ITERATIONS,
            memory_bytes: MemoryWorkload::DEFAULT_SIZE_BYTES,
            memory_operations: MemoryWorkload::DEFAULT_OPERATIONS,
            disk_size: 5 * 1024 * 1024 * 1024, // 5 GiB
            scratch_dir: PathBuf::from("."),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("output"),
            formats: ReportFormat::ALL.to_vec(),
        }
    }
}

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".benchbed.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from the default file (`.benchbed.toml`) or use defaults.
    ///
    /// If the file doesn't exist, default configuration is returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load_or_default() -> Result<Config> {
        let path = Path::new(DEFAULT_CONFIG_FILE);

        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from the specified path, or try the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the specified file cannot be read or parsed.
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Self::load(p),
            None => Self::load_or_default(),
        }
    }

    /// Check the values the run cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.run.repeat == 0 {
            bail!("run.repeat must be at least 1");
        }
        if self.run.number == 0 {
            bail!("run.number must be at least 1");
        }
        if self.run.tests.is_empty() {
            bail!("run.tests must select at least one of: cpu, memory, disk");
        }
        if self.runs(TestKind::Memory) && self.workloads.memory_bytes == 0 {
            bail!("workloads.memory_bytes must be greater than zero");
        }
        if self.runs(TestKind::Disk) && self.workloads.disk_size == 0 {
            bail!("workloads.disk_size must be greater than zero");
        }
        Ok(())
    }

    /// Whether the test group `kind` is selected.
    pub fn runs(&self, kind: TestKind) -> bool {
        self.run.tests.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.run.tests, TestKind::ALL.to_vec());
        assert_eq!(config.run.repeat, 5);
        assert_eq!(config.run.number, 1);
        assert_eq!(config.run.warmup, 1);
        assert_eq!(config.run.seed, None);
        assert_eq!(config.workloads.cpu_iterations, 10_000_000);
        assert_eq!(config.workloads.memory_bytes, 2_147_483_648);
        assert_eq!(config.workloads.memory_operations, 100_000);
        assert_eq!(config.workloads.disk_size, 5_368_709_120);
        assert_eq!(config.workloads.scratch_dir, PathBuf::from("."));
        assert_eq!(config.statistics.critical_value, CriticalValueMode::Exact);
        assert_eq!(config.output.base_dir, PathBuf::from("output"));
        assert_eq!(config.output.formats.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_config() {
        let toml_content = r#"
[run]
tests = ["cpu", "disk"]
repeat = 10

[workloads]
disk_size = 1048576
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();

        // Overridden values
        assert_eq!(config.run.tests, vec![TestKind::Cpu, TestKind::Disk]);
        assert_eq!(config.run.repeat, 10);
        assert_eq!(config.workloads.disk_size, 1_048_576);

        // Default values
        assert_eq!(config.run.number, 1);
        assert_eq!(config.workloads.cpu_iterations, 10_000_000);
        assert_eq!(config.output.base_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_load_full_config() {
        let toml_content = r#"
[run]
tests = ["memory"]
repeat = 3
number = 2
warmup = 0
seed = 42

[workloads]
cpu_iterations = 1000
memory_bytes = 4096
memory_operations = 10
disk_size = 2048
scratch_dir = "/tmp/bench"

[statistics]
critical_value = "approximate"

[output]
base_dir = "reports"
formats = ["csv", "markdown"]
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.run.tests, vec![TestKind::Memory]);
        assert_eq!(config.run.repeat, 3);
        assert_eq!(config.run.number, 2);
        assert_eq!(config.run.warmup, 0);
        assert_eq!(config.run.seed, Some(42));
        assert_eq!(config.workloads.cpu_iterations, 1000);
        assert_eq!(config.workloads.memory_bytes, 4096);
        assert_eq!(config.workloads.memory_operations, 10);
        assert_eq!(config.workloads.disk_size, 2048);
        assert_eq!(config.workloads.scratch_dir, PathBuf::from("/tmp/bench"));
        assert_eq!(
            config.statistics.critical_value,
            CriticalValueMode::Approximate
        );
        assert_eq!(config.output.base_dir, PathBuf::from("reports"));
        assert_eq!(
            config.output.formats,
            vec![ReportFormat::Csv, ReportFormat::Markdown]
        );
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"this is not valid toml {{{{").unwrap();

        let result = Config::load(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_unknown_test_kind() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[run]\ntests = [\"gpu\"]\n").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[run]\nrepeat = 7\n").unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.run.repeat, 7);
    }

    #[test]
    fn test_validate_rejects_zero_repeat_and_number() {
        let mut config = Config::default();
        config.run.repeat = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.run.number = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_sizes_only_for_selected_tests() {
        let mut config = Config::default();
        config.workloads.disk_size = 0;
        assert!(config.validate().is_err());

        config.run.tests = vec![TestKind::Cpu];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_test_selection() {
        let mut config = Config::default();
        config.run.tests.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.run.seed = Some(9);
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.run.tests, parsed.run.tests);
        assert_eq!(config.run.seed, parsed.run.seed);
        assert_eq!(config.workloads.disk_size, parsed.workloads.disk_size);
        assert_eq!(config.output.formats, parsed.output.formats);
    }
}
