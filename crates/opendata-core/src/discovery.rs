//! 記述子ファイルの発見
//!
//! カレントディレクトリから上位に向かって app.yaml を探します。

use crate::error::{DescriptorError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// プロジェクトルートを上書きする環境変数
pub const PROJECT_ROOT_ENV: &str = "OPENDATA_PROJECT_ROOT";

/// ルートディレクトリ内で探す候補（優先順）
const CANDIDATES: &[&str] = &["app.yaml", "app.yml", ".opendata/app.yaml"];

/// プロジェクトルートを検出
///
/// 以下の優先順位で検索:
/// 1. 環境変数 OPENDATA_PROJECT_ROOT
/// 2. カレントディレクトリから上に向かって app.yaml / app.yml / .opendata/app.yaml を探す
#[tracing::instrument]
pub fn find_descriptor_root() -> Result<PathBuf> {
    // 1. 環境変数
    if let Ok(root) = std::env::var(PROJECT_ROOT_ENV) {
        let path = PathBuf::from(&root);
        debug!(env_root = %root, "Checking OPENDATA_PROJECT_ROOT");
        if find_in_dir(&path).is_some() {
            info!(project_root = %path.display(), "Found project root from environment variable");
            return Ok(path);
        }
    }

    // 2. カレントディレクトリから上に向かって探す
    let start_dir = std::env::current_dir()?;
    let mut current = start_dir.clone();
    debug!(start_dir = %start_dir.display(), "Searching for project root");

    loop {
        if let Some(file) = find_in_dir(&current) {
            info!(project_root = %current.display(), file = %file.display(), "Found project root");
            return Ok(current);
        }

        // 親ディレクトリへ
        if !current.pop() {
            break;
        }
    }

    warn!(start_dir = %start_dir.display(), "Project root not found");
    Err(DescriptorError::DescriptorNotFound(start_dir))
}

/// ルートディレクトリから記述子ファイルを特定
#[tracing::instrument(skip(project_root), fields(project_root = %project_root.display()))]
pub fn discover_descriptor(project_root: &Path) -> Result<PathBuf> {
    find_in_dir(project_root)
        .ok_or_else(|| DescriptorError::DescriptorNotFound(project_root.to_path_buf()))
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
