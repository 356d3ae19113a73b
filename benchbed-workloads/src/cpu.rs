use std::hint::black_box;

use benchbed_core::{Workload, WorkloadResult};
use rand::rngs::StdRng;
use rand::Rng;

use crate::workload_rng;

/// Multiplies a running product by random numbers in `[0, 1)`.
pub struct CpuWorkload {
    iterations: u64,
    rng: StdRng,
}

impl CpuWorkload {
    /// Default number of multiplications per invocation.
    pub const DEFAULT_ITERATIONS: u64 = 10_000_000;

    pub fn new(iterations: u64, seed: Option<u64>) -> Self {
        Self {
            iterations,
            rng: workload_rng(seed),
        }
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

impl Workload for CpuWorkload {
    fn execute(&mut self, _parameter: Option<u64>) -> WorkloadResult {
        let mut product = 1.0_f64;
        for _ in 0..self.iterations {
            let num: f64 = self.rng.random();
            // Once the product underflows to zero keep multiplying by one.
            product *= if product != 0.0 { num } else { 1.0 };
        }
        black_box(product);
        Ok(None)
    }
}
