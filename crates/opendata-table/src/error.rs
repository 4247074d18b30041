use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Table {path} is not grouped by '{column}': value '{value}' appears in more than one run")]
    NotGrouped {
        path: PathBuf,
        column: String,
        value: String,
    },

    #[error("Invalid key for an output folder: '{0}'")]
    InvalidKey(String),

    #[error("Invalid {expected} value '{value}' in column '{column}' of {path}")]
    InvalidValue {
        path: PathBuf,
        column: String,
        value: String,
        expected: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TableError {
    pub(crate) fn csv(path: &std::path::Path) -> impl FnOnce(csv::Error) -> Self + '_ {
        move |source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn io(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| TableError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// ユーザー向けの分かりやすいエラーメッセージ
    pub fn user_message(&self) -> String {
        match self {
            TableError::MissingColumn { path, column } => {
                format!(
                    "列 '{}' がテーブルに存在しません: {}\n\
                     \n\
                     解決方法:\n\
                     1. テーブルのヘッダー行を確認してください\n\
                     2. publish.yaml の column_adapter で列名が変換されていないか確認してください",
                    column,
                    path.display()
                )
            }
            TableError::NotGrouped { path, column, .. } => {
                format!(
                    "テーブルが '{}' でソートされていません: {}\n\
                     \n\
                     分割の前に table_sort で並べ替えてください。",
                    column,
                    path.display()
                )
            }
            _ => format!("{}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
