//! YAMLパーサー
//!
//! app.yaml をパースして [`AppDescriptor`] を生成し、正規化された形で書き戻します。

use crate::error::{DescriptorError, Result};
use crate::model::AppDescriptor;
use std::fs;
use std::path::Path;
use tracing::debug;

/// YAMLファイルをパースして記述子を生成
pub fn parse_descriptor_file<P: AsRef<Path>>(path: P) -> Result<AppDescriptor> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| DescriptorError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(file = %path.display(), bytes = content.len(), "Parsing descriptor file");
    parse_descriptor_str(&content)
}

/// YAML文字列をパース
pub fn parse_descriptor_str(content: &str) -> Result<AppDescriptor> {
    // コメントだけのファイルも空として扱う
    let has_content = content
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with('#'));
    if !has_content {
        return Err(DescriptorError::InvalidConfig(
            "記述子が空です（runtime は必須です）".to_string(),
        ));
    }

    let descriptor: AppDescriptor = serde_yaml::from_str(content)?;
    Ok(descriptor)
}

impl AppDescriptor {
    /// 正規化されたYAMLとして出力
    ///
    /// キー順は runtime, env, entrypoint, manual_scaling, resources, env_variables。
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// JSONとして出力
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
