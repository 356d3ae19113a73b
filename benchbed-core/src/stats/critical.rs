use statrs::distribution::{ContinuousCDF, StudentsT};

/// Confidence level of every interval produced by the reducer.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Upper 97.5% quantile of the standard normal distribution.
const Z_975: f64 = 1.959_963_984_540_054;

/// Two-sided 95% Student-t critical values for 1..=30 degrees of freedom.
const T_975: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179, 2.160,
    2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, 2.080, 2.074, 2.069, 2.064, 2.060, 2.056,
    2.052, 2.048, 2.045, 2.042,
];

/// Critical value t(0.975, df) from the Student-t inverse CDF.
///
/// Returns `None` if the distribution cannot be constructed for `df` or the
/// quantile is not finite.
pub fn exact_t_critical(df: f64) -> Option<f64> {
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    let t = dist.inverse_cdf(1.0 - (1.0 - CONFIDENCE_LEVEL) / 2.0);
    t.is_finite().then_some(t)
}

/// Approximate critical value t(0.975, df) without evaluating the distribution.
///
/// Uses the usual three-decimal table for df <= 30 (2.776 for df = 4) and the
/// Cornish-Fisher expansion of the t quantile around the normal quantile for
/// larger df. `df` of 0 is treated as 1.
pub fn approximate_t_critical(df: usize) -> f64 {
    let df = df.max(1);
    if df <= T_975.len() {
        return T_975[df - 1];
    }

    let z = Z_975;
    let nu = df as f64;
    let g1 = (z.powi(3) + z) / 4.0;
    let g2 = (5.0 * z.powi(5) + 16.0 * z.powi(3) + 3.0 * z) / 96.0;
    let g3 = (3.0 * z.powi(7) + 19.0 * z.powi(5) + 17.0 * z.powi(3) - 15.0 * z) / 384.0;

    z + g1 / nu + g2 / nu.powi(2) + g3 / nu.powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matches_known_quantiles() {
        assert!((exact_t_critical(4.0).unwrap() - 2.7764).abs() < 1e-3);
        assert!((exact_t_critical(1.0).unwrap() - 12.7062).abs() < 1e-3);
        assert!((exact_t_critical(100.0).unwrap() - 1.9840).abs() < 1e-3);
    }

    #[test]
    fn test_exact_rejects_invalid_df() {
        assert!(exact_t_critical(0.0).is_none());
        assert!(exact_t_critical(-3.0).is_none());
    }

    #[test]
    fn test_approximate_table_values() {
        assert_eq!(approximate_t_critical(4), 2.776);
        assert_eq!(approximate_t_critical(1), 12.706);
        assert_eq!(approximate_t_critical(30), 2.042);
        assert_eq!(approximate_t_critical(0), 12.706);
    }

    #[test]
    fn test_approximate_expansion_tracks_exact() {
        for df in [31_usize, 40, 60, 120, 1000] {
            let exact = exact_t_critical(df as f64).unwrap();
            let approx = approximate_t_critical(df);
            assert!(
                (exact - approx).abs() < 1e-3,
                "df={df}: exact={exact}, approx={approx}"
            );
        }
    }

    #[test]
    fn test_approximate_is_decreasing() {
        let values: Vec<f64> = (1..200).map(approximate_t_critical).collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert!(values.iter().all(|&t| t > Z_975));
    }
}
