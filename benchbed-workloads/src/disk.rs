//! Disk write, read and copy workloads over a shared scratch file.
//!
//! The three workloads share one [`ScratchFile`] so the read and copy passes
//! reuse the file the write pass produced. Whichever workload finds the file
//! missing recreates it first, untimed. The file is removed when the last
//! workload holding it is dropped.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use benchbed_core::{Workload, WorkloadError, WorkloadResult};
use log::debug;
use rand::rngs::StdRng;

use crate::scratch::{ScratchFile, CHUNK_SIZE};
use crate::workload_rng;

/// Name of the scratch file written by the disk workloads.
pub const DISK_TEST_FILE: &str = "disk_test_file.bin";
/// Name of the copy destination, removed after every copy.
pub const DISK_COPY_FILE: &str = "disk_test_file_copy.bin";

fn required_size(parameter: Option<u64>) -> Result<u64, WorkloadError> {
    parameter.ok_or_else(|| {
        WorkloadError::MissingInput("disk tests require a size in bytes".to_string())
    })
}

/// Writes `size` random bytes to the scratch file and syncs it.
pub struct DiskWrite {
    file: Rc<ScratchFile>,
    rng: StdRng,
}

impl DiskWrite {
    pub fn new(file: Rc<ScratchFile>, seed: Option<u64>) -> Self {
        Self {
            file,
            rng: workload_rng(seed),
        }
    }
}

impl Workload for DiskWrite {
    fn execute(&mut self, parameter: Option<u64>) -> WorkloadResult {
        let size = required_size(parameter)?;
        let elapsed = self.file.fill(size, &mut self.rng)?;
        Ok(Some(elapsed))
    }
}

/// Reads the scratch file sequentially in 1 MiB chunks.
pub struct DiskRead {
    file: Rc<ScratchFile>,
    rng: StdRng,
}

impl DiskRead {
    pub fn new(file: Rc<ScratchFile>, seed: Option<u64>) -> Self {
        Self {
            file,
            rng: workload_rng(seed),
        }
    }
}

fn read_all(path: &Path) -> io::Result<u64> {
    let mut file = File::open(path)?;
    let mut buffer = vec![0_u8; CHUNK_SIZE];
    let mut total = 0;
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        total += n as u64;
    }
    Ok(total)
}

impl Workload for DiskRead {
    fn execute(&mut self, parameter: Option<u64>) -> WorkloadResult {
        let size = required_size(parameter)?;
        self.file.ensure(size, &mut self.rng)?;

        let start = Instant::now();
        let bytes = read_all(self.file.path())?;
        let elapsed = start.elapsed();
        debug!("Read {} bytes in {:?}", bytes, elapsed);
        Ok(Some(elapsed))
    }
}

/// Copies the scratch file to a sibling file, then deletes the copy.
///
/// Only the copy itself is timed. The destination is removed after every
/// invocation, including failed ones.
pub struct DiskCopy {
    file: Rc<ScratchFile>,
    rng: StdRng,
}

impl DiskCopy {
    pub fn new(file: Rc<ScratchFile>, seed: Option<u64>) -> Self {
        Self {
            file,
            rng: workload_rng(seed),
        }
    }

    fn destination(&self) -> ScratchFile {
        let dir = self.file.path().parent().unwrap_or_else(|| Path::new("."));
        ScratchFile::new(dir.join(DISK_COPY_FILE))
    }
}

impl Workload for DiskCopy {
    fn execute(&mut self, parameter: Option<u64>) -> WorkloadResult {
        let size = required_size(parameter)?;
        self.file.ensure(size, &mut self.rng)?;

        let destination = self.destination();
        let start = Instant::now();
        fs::copy(self.file.path(), destination.path())?;
        let elapsed = start.elapsed();
        Ok(Some(elapsed))
    }
}

/// The three disk workloads sharing one scratch file.
pub struct DiskSuite {
    pub write: DiskWrite,
    pub read: DiskRead,
    pub copy: DiskCopy,
}

impl DiskSuite {
    /// Build the suite around `<dir>/disk_test_file.bin`.
    ///
    /// Each workload gets its own generator derived from `seed` so the
    /// sequence seen by one does not depend on how often the others ran.
    pub fn new(dir: impl AsRef<Path>, seed: Option<u64>) -> Self {
        let file = Rc::new(ScratchFile::new(dir.as_ref().join(DISK_TEST_FILE)));
        let derive = |offset: u64| seed.map(|s| s.wrapping_add(offset));
        Self {
            write: DiskWrite::new(Rc::clone(&file), derive(0)),
            read: DiskRead::new(Rc::clone(&file), derive(1)),
            copy: DiskCopy::new(file, derive(2)),
        }
    }
}
