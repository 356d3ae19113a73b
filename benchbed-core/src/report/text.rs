use std::fmt::Write;

use crate::results::{BenchmarkOutcome, ResultSet, SystemInfo};

/// Plain-text report: system information, then one block per outcome.
///
/// Numbers are printed with six decimals so the output is byte-stable.
pub fn render_text(results: &ResultSet, info: &SystemInfo) -> String {
    let mut out = String::new();

    out.push_str("System Information\n");
    for (key, value) in info.iter() {
        let _ = writeln!(out, "  {}: {}", key, value);
    }

    out.push_str("\nTest Results\n");
    for outcome in results {
        let _ = writeln!(out, "{}", outcome.name());
        match outcome {
            BenchmarkOutcome::Success {
                sample, statistics, ..
            } => {
                let s = statistics;
                let _ = writeln!(out, "  Samples:           {}", sample.len());
                let _ = writeln!(out, "  Mean:              {:.6} s", s.mean);
                let _ = writeln!(out, "  Median:            {:.6} s", s.median);
                let _ = writeln!(out, "  Std Dev:           {:.6} s", s.std_dev);
                let _ = writeln!(out, "  25th Percentile:   {:.6} s", s.percentile_25);
                let _ = writeln!(out, "  75th Percentile:   {:.6} s", s.percentile_75);
                let _ = writeln!(out, "  Min:               {:.6} s", s.min);
                let _ = writeln!(out, "  Max:               {:.6} s", s.max);
                let _ = writeln!(
                    out,
                    "  95% CI:            ({:.6}, {:.6}) s [{}]",
                    s.ci_lower, s.ci_upper, s.critical_value_mode
                );
            }
            BenchmarkOutcome::Failure { error, .. } => {
                let _ = writeln!(out, "  Error: {}", error);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::{mixed_results, system_info};

    #[test]
    fn test_text_layout() {
        let text = render_text(&mixed_results(), &system_info());

        assert!(text.starts_with("System Information\n  timestamp: 2024-05-01T12:00:00+00:00\n"));
        assert!(text.contains("  cpu_count: 8\n"));
        assert!(text.contains("\nTest Results\nCPU Test\n  Samples:           5\n"));
        assert!(text.contains("  Mean:              0.500000 s\n"));
        assert!(text.contains("Memory Test\n  Error: Memory allocation failed: not enough memory\n"));
        assert!(text.contains("[exact]"));
    }

    #[test]
    fn test_text_is_deterministic() {
        let results = mixed_results();
        let info = system_info();
        assert_eq!(render_text(&results, &info), render_text(&results, &info));
    }

    #[test]
    fn test_text_with_no_results() {
        let text = render_text(&ResultSet::new(), &SystemInfo::new());
        assert_eq!(text, "System Information\n\nTest Results\n");
    }
}
