//! Synthetic workloads for benchbed.
//!
//! Each workload implements [`benchbed_core::Workload`]: a CPU-bound
//! multiplication loop, a random read/write pass over a large buffer, and
//! disk write/read/copy passes over a scratch file. Workloads that use
//! randomness take an explicit seed so runs can be reproduced.

mod cpu;
mod disk;
mod memory;
mod scratch;

pub use cpu::CpuWorkload;
pub use disk::{DiskCopy, DiskRead, DiskSuite, DiskWrite, DISK_COPY_FILE, DISK_TEST_FILE};
pub use memory::MemoryWorkload;
pub use scratch::ScratchFile;

use benchbed_core::Workload;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Random number generator for a workload: seeded when `seed` is given,
/// from the operating system otherwise.
pub(crate) fn workload_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// A workload registered under a display name.
pub struct RegisteredWorkload {
    pub name: String,
    pub workload: Box<dyn Workload>,
    /// Passed unchanged to every invocation.
    pub parameter: Option<u64>,
}

/// Ordered registry of workloads.
///
/// Workloads run in registration order. Names are not required to be
/// unique; a duplicate simply runs again under the same label.
pub struct WorkloadRegistry {
    workloads: Vec<RegisteredWorkload>,
}

impl WorkloadRegistry {
    /// Create a new empty workload registry.
    pub fn new() -> Self {
        Self {
            workloads: Vec::new(),
        }
    }

    /// Register a workload with the given name.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut registry = WorkloadRegistry::new();
    /// registry.register("Sleep Test", |_: Option<u64>| -> WorkloadResult {
    ///     std::thread::sleep(std::time::Duration::from_millis(10));
    ///     Ok(None)
    /// }, None);
    /// ```
    pub fn register<W>(&mut self, name: impl Into<String>, workload: W, parameter: Option<u64>)
    where
        W: Workload + 'static,
    {
        self.workloads.push(RegisteredWorkload {
            name: name.into(),
            workload: Box::new(workload),
            parameter,
        });
    }

    /// List all registered workload names in run order.
    pub fn list(&self) -> Vec<String> {
        self.workloads.iter().map(|w| w.name.clone()).collect()
    }

    /// Get the number of registered workloads.
    pub fn len(&self) -> usize {
        self.workloads.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.workloads.is_empty()
    }

    /// Mutable access to the workloads, in run order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, RegisteredWorkload> {
        self.workloads.iter_mut()
    }
}

impl Default for WorkloadRegistry {
    fn default() -> Self {
        Self::new()
    }
}
