//! Discovery of run result files.
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect every file under `root` whose name is exactly
/// `file_name`.
///
/// A missing root yields an empty list. Entries that cannot be read are
/// skipped. Paths are returned sorted.
#[must_use]
pub fn find_results_files(root: &Path, file_name: &str) -> Vec<PathBuf> {
    if !root.exists() {
        log::debug!("results root {} does not exist", root.display());
        return Vec::new();
    }

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::debug!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
        .map(walkdir::DirEntry::into_path)
        .collect();

    found.sort();
    log::debug!("found {} {file_name} files under {}", found.len(), root.display());
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "ladderboard-scan-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_root_yields_empty_list() {
        let root = std::env::temp_dir().join("ladderboard-scan-does-not-exist");
        assert!(find_results_files(&root, "results.csv").is_empty());
    }

    #[test]
    fn empty_tree_yields_empty_list() {
        let root = scratch_dir("empty");
        assert!(find_results_files(&root, "results.csv").is_empty());
    }

    #[test]
    fn matches_exact_file_name_only() {
        let root = scratch_dir("exact");
        let run = root.join("data/agentA/main/2024-01-01-00-00-00/x");
        fs::create_dir_all(&run).unwrap();
        fs::write(run.join("results.csv"), "ladder,agent_id,success\n").unwrap();
        fs::write(run.join("results.csv.bak"), "").unwrap();
        fs::write(run.join("old_results.csv"), "").unwrap();

        let found = find_results_files(&root, "results.csv");
        assert_eq!(found, vec![run.join("results.csv")]);
    }

    #[test]
    fn results_are_sorted() {
        let root = scratch_dir("sorted");
        for name in ["b", "a", "c"] {
            let dir = root.join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("results.csv"), "").unwrap();
        }
        let found = find_results_files(&root, "results.csv");
        let names: Vec<_> = found
            .iter()
            .map(|p| p.parent().unwrap().file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
