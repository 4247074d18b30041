use std::path::PathBuf;
use thiserror::Error;

use crate::validate::ValidationIssue;

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("YAMLパースエラー: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("ファイル読み込みエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO エラー: {path}\n理由: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("無効な設定: {0}")]
    InvalidConfig(String),

    #[error("デプロイ記述子の検証に失敗しました ({}件のエラー)", .0.len())]
    Validation(Vec<ValidationIssue>),

    #[error(
        "app.yaml が見つかりません\n探索開始位置: {0}\nヒント: app.yaml を含むディレクトリで実行してください"
    )]
    DescriptorNotFound(PathBuf),

    #[error("JSON変換エラー: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DescriptorError>;
