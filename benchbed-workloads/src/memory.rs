use std::hint::black_box;

use benchbed_core::{Workload, WorkloadError, WorkloadResult};
use rand::rngs::StdRng;
use rand::Rng;

use crate::workload_rng;

/// Allocates a zeroed buffer and performs random read-modify-write operations.
///
/// The buffer is allocated on every invocation so allocation cost is part of
/// the measurement. An allocation the system cannot satisfy is reported as
/// [`WorkloadError::Allocation`] instead of aborting the process.
pub struct MemoryWorkload {
    size_bytes: u64,
    operations: u64,
    rng: StdRng,
}

impl MemoryWorkload {
    /// 2 GiB.
    pub const DEFAULT_SIZE_BYTES: u64 = 2 * 1024 * 1024 * 1024;
    pub const DEFAULT_OPERATIONS: u64 = 100_000;

    pub fn new(size_bytes: u64, operations: u64, seed: Option<u64>) -> Self {
        Self {
            size_bytes,
            operations,
            rng: workload_rng(seed),
        }
    }

    fn allocate(&self) -> Result<Vec<u8>, WorkloadError> {
        let size = usize::try_from(self.size_bytes).map_err(|_| {
            WorkloadError::Allocation(format!(
                "{} bytes exceeds the address space of this platform",
                self.size_bytes
            ))
        })?;

        let mut buffer = Vec::new();
        buffer.try_reserve_exact(size).map_err(|e| {
            WorkloadError::Allocation(format!(
                "not enough memory available for the test ({} bytes): {}",
                size, e
            ))
        })?;
        buffer.resize(size, 0_u8);
        Ok(buffer)
    }
}

impl Workload for MemoryWorkload {
    fn execute(&mut self, _parameter: Option<u64>) -> WorkloadResult {
        if self.size_bytes == 0 {
            return Err(WorkloadError::MissingInput(
                "memory test size must be greater than zero".to_string(),
            ));
        }

        let mut buffer = self.allocate()?;
        let len = buffer.len();
        for _ in 0..self.operations {
            let idx = self.rng.random_range(0..len);
            buffer[idx] = buffer[idx].wrapping_add(1) % 255;
        }
        black_box(&buffer);
        Ok(None)
    }
}
