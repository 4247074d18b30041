//! 統合ローダー
//!
//! ファイル発見、パース、検証を統合

use crate::discovery::{discover_descriptor, find_descriptor_root};
use crate::error::Result;
use crate::model::AppDescriptor;
use crate::parser::parse_descriptor_file;
use crate::validate::ValidationIssue;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// 読み込み結果
#[derive(Debug, Clone)]
pub struct LoadedDescriptor {
    /// 読み込んだファイル
    pub path: PathBuf,
    pub descriptor: AppDescriptor,
    /// 警告を含む全ての検証結果
    pub issues: Vec<ValidationIssue>,
}

impl LoadedDescriptor {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.is_error())
    }
}

/// カレントディレクトリから記述子をロード
#[instrument]
pub fn load_descriptor() -> Result<LoadedDescriptor> {
    let project_root = find_descriptor_root()?;
    load_descriptor_from_root(&project_root)
}

/// 指定されたルートディレクトリから記述子をロード
///
/// 検証で見つかった問題はエラーにせず結果に含めます。
/// デプロイを止めるかどうかは呼び出し側が決めます。
#[instrument(skip(project_root), fields(project_root = %project_root.display()))]
pub fn load_descriptor_from_root(project_root: &Path) -> Result<LoadedDescriptor> {
    let path = discover_descriptor(project_root)?;
    let descriptor = parse_descriptor_file(&path)?;
    let issues = descriptor.validate();

    for issue in &issues {
        warn!(key = %issue.key, severity = ?issue.severity, "{}", issue.message);
    }
    info!(
        runtime = %descriptor.runtime,
        env = %descriptor.env,
        instances = ?descriptor.instances(),
        variables = descriptor.env_variables.len(),
        "Descriptor loaded"
    );

    Ok(LoadedDescriptor {
        path,
        descriptor,
        issues,
    })
}
