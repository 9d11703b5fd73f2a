//! Tree size aggregation and human-readable sizes

use std::path::Path;

use walkdir::WalkDir;

/// Sum of regular file sizes under `root`
///
/// Directories and symlinks are not counted; unreadable entries are skipped.
pub fn dir_size(root: &Path) -> u64 {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}

/// Binary-prefixed size with one decimal place: `1023 B`, `1.5 KiB`, `1.0 MiB`
pub fn humanize(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.1} {}iB", bytes as f64 / div as f64, PREFIXES[exp])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize(0), "0 B");
        assert_eq!(humanize(1023), "1023 B");
        assert_eq!(humanize(1024), "1.0 KiB");
        assert_eq!(humanize(1536), "1.5 KiB");
        assert_eq!(humanize(1024 * 1024), "1.0 MiB");
        assert_eq!(humanize(5 * 1024 * 1024 * 1024), "5.0 GiB");
        assert_eq!(humanize(u64::MAX), "16.0 EiB");
    }

    #[test]
    fn test_dir_size_counts_files_only() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("a/one.bin"), vec![0u8; 100]).unwrap();
        fs::write(temp.path().join("a/b/two.bin"), vec![0u8; 23]).unwrap();

        assert_eq!(dir_size(temp.path()), 123);
    }

    #[cfg(unix)]
    #[test]
    fn test_dir_size_skips_symlinks() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("real"), vec![0u8; 10]).unwrap();
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("link")).unwrap();

        assert_eq!(dir_size(temp.path()), 10);
    }

    #[test]
    fn test_dir_size_of_missing_dir_is_zero() {
        let temp = TempDir::new().unwrap();
        assert_eq!(dir_size(&temp.path().join("nope")), 0);
    }
}
