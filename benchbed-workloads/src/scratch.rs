use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::RngCore;

/// Size of the blocks used to fill and read scratch files.
pub(crate) const CHUNK_SIZE: usize = 1024 * 1024;

/// A scratch file owned by one run.
///
/// The file is removed when the guard is dropped, on success and failure
/// alike. A failed removal is logged and never propagated.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write `size` bytes of random data, replacing any previous content.
    ///
    /// Every chunk is freshly generated so no two blocks of the file repeat.
    /// Returns the time spent creating, writing and syncing the file;
    /// generating the random data is not counted.
    pub fn fill(&self, size: u64, rng: &mut StdRng) -> io::Result<Duration> {
        let mut block = vec![0_u8; CHUNK_SIZE];

        let start = Instant::now();
        let mut file = File::create(&self.path)?;
        let mut elapsed = start.elapsed();

        let mut remaining = size;
        while remaining > 0 {
            let len = remaining.min(CHUNK_SIZE as u64) as usize;
            rng.fill_bytes(&mut block[..len]);

            let start = Instant::now();
            file.write_all(&block[..len])?;
            elapsed += start.elapsed();
            remaining -= len as u64;
        }

        let start = Instant::now();
        file.sync_all()?;
        Ok(elapsed + start.elapsed())
    }

    /// Create the file with `size` random bytes unless it already exists.
    pub fn ensure(&self, size: u64, rng: &mut StdRng) -> io::Result<()> {
        if !self.exists() {
            debug!("Creating scratch file {}", self.path.display());
            self.fill(size, rng)?;
        }
        Ok(())
    }

    /// Remove the file. A file that does not exist is not an error.
    pub fn remove(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Err(e) = self.remove() {
            warn!(
                "Failed to remove scratch file {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
