//! Advisory single-instance lock: a PID file in the temp directory,
//! removed on drop. Best effort only; two processes racing on the
//! filesystem is a known gap, not designed around.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    /// Try to take the lock named `name`. `None` means another instance
    /// already holds it.
    pub fn acquire(name: &str) -> Result<Option<Self>> {
        let path = std::env::temp_dir().join(name);
        if path.exists() {
            return Ok(None);
        }
        fs::write(&path, std::process::id().to_string())?;
        Ok(Some(Self { path }))
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove lock file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_refused_until_dropped() {
        let name = format!("weekplan-lock-test-{}.lock", std::process::id());
        let lock = InstanceLock::acquire(&name).unwrap();
        assert!(lock.is_some());
        assert!(InstanceLock::acquire(&name).unwrap().is_none());
        drop(lock);
        assert!(InstanceLock::acquire(&name).unwrap().is_some());
    }
}
