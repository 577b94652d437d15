//! Thread discovery under `/proc`

use std::fs;
use std::io;
use std::path::Path;

/// Numeric entries of a procfs directory in ascending order
fn numeric_entries(dir: &Path) -> io::Result<Vec<u32>> {
    let mut ids: Vec<u32> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str()?.parse().ok())
        .collect();
    ids.sort_unstable();
    Ok(ids)
}

/// All `(thread id, owner pid)` pairs on the system
///
/// Processes are listed in ascending pid order and threads within a process
/// in ascending tid order, so a process's leader thread comes first. A
/// process that exits mid-scan is skipped.
pub fn snapshot_threads(proc_root: &Path) -> io::Result<Vec<(u32, u32)>> {
    let mut threads = Vec::new();
    for pid in numeric_entries(proc_root)? {
        let task_dir = proc_root.join(pid.to_string()).join("task");
        if let Ok(tids) = numeric_entries(&task_dir) {
            threads.extend(tids.into_iter().map(|tid| (tid, pid)));
        }
    }
    Ok(threads)
}

/// Owning process of a thread, from the `Tgid:` line of its status file
pub fn thread_group(proc_root: &Path, tid: u32) -> io::Result<u32> {
    let status = fs::read_to_string(proc_root.join(tid.to_string()).join("status"))?;
    status
        .lines()
        .find_map(|line| line.strip_prefix("Tgid:"))
        .and_then(|value| value.trim().parse().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "status has no Tgid"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn fake_proc() -> TempDir {
        let root = TempDir::new().unwrap();
        for (pid, tids) in [(300u32, vec![300u32, 305, 301]), (12, vec![12]), (7, vec![])] {
            let task = root.path().join(pid.to_string()).join("task");
            fs::create_dir_all(&task).unwrap();
            for tid in tids {
                fs::create_dir(task.join(tid.to_string())).unwrap();
            }
        }
        fs::create_dir(root.path().join("self")).unwrap();
        fs::write(root.path().join("uptime"), "1.0 1.0").unwrap();
        let status = "Name:\tcat\nTgid:\t300\nPid:\t300\n";
        fs::write(root.path().join("300").join("status"), status).unwrap();
        root
    }

    #[test]
    fn test_snapshot_order() {
        let root = fake_proc();
        let threads = snapshot_threads(root.path()).unwrap();
        assert_eq!(threads, vec![(12, 12), (300, 300), (301, 300), (305, 300)]);
    }

    #[test]
    fn test_thread_group() {
        let root = fake_proc();
        assert_eq!(thread_group(root.path(), 300).unwrap(), 300);
        let err = thread_group(root.path(), 999).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_missing_root() {
        assert!(snapshot_threads(Path::new("/nonexistent/proc")).is_err());
    }
}
