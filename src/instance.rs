use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::{info, warn};

pub const PID_FILE_NAME: &str = "gh-menu.pid";

/// Outcome of trying to become the only running instance.
#[derive(Debug)]
pub enum LockOutcome {
    Acquired(InstanceLock),
    /// Another live process holds the PID file.
    AlreadyRunning(u32),
}

/// Holds the PID file; the file is removed when the lock is dropped.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    /// Claim the PID file at `path`.
    ///
    /// A file naming a process that is no longer alive, or that cannot be
    /// parsed, is stale and gets replaced.
    pub fn acquire(path: &Path) -> Result<LockOutcome> {
        let own_pid = std::process::id();

        if let Some(old_pid) = read_pid(path) {
            if old_pid != own_pid && process_alive(old_pid) {
                info!("Another instance is already running (PID: {}). Exiting.", old_pid);
                return Ok(LockOutcome::AlreadyRunning(old_pid));
            }
            info!("Removing stale PID file (PID: {})", old_pid);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let mut file = AtomicWriteFile::open(path)
            .with_context(|| format!("Failed to open PID file at {}", path.display()))?;
        write!(file, "{}", own_pid).context("Failed to write PID file")?;
        file.commit().context("Failed to save PID file")?;

        info!("Started with PID: {}", own_pid);
        Ok(LockOutcome::Acquired(InstanceLock {
            path: path.to_path_buf(),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to remove PID file");
            }
        }
    }
}

fn read_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn process_alive(pid: u32) -> bool {
    let pid = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    system.process(pid).is_some()
}
