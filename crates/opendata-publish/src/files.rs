use crate::error::{PublishError, Result};
use std::path::{Path, PathBuf};

/// CSV files directly inside `folder`, sorted by path.
pub fn list_tables(folder: &Path) -> Result<Vec<PathBuf>> {
    glob_csv(folder, "*.csv")
}

/// CSV files anywhere below `folder`, sorted by path.
pub fn list_tables_recursive(folder: &Path) -> Result<Vec<PathBuf>> {
    glob_csv(folder, "**/*.csv")
}

fn glob_csv(folder: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&folder.to_string_lossy());
    let mut paths = glob::glob(&format!("{}/{}", base, pattern))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    paths.retain(|p| p.is_file());
    paths.sort();
    Ok(paths)
}

/// File stem as an owned string (`index.csv` → `index`).
pub fn table_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub(crate) fn file_name(path: &Path) -> Result<&std::ffi::OsStr> {
    path.file_name().ok_or_else(|| PublishError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_list_tables() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "x\n").unwrap();
        fs::write(dir.path().join("a.csv"), "x\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "x\n").unwrap();
        fs::create_dir(dir.path().join("AD")).unwrap();
        fs::write(dir.path().join("AD").join("c.csv"), "x\n").unwrap();

        let top = list_tables(dir.path()).unwrap();
        assert_eq!(top, vec![dir.path().join("a.csv"), dir.path().join("b.csv")]);

        let all = list_tables_recursive(dir.path()).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.contains(&dir.path().join("AD").join("c.csv")));
    }

    #[test]
    fn test_table_name() {
        assert_eq!(table_name(Path::new("/data/index.csv")), "index");
    }
}
