use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Table(#[from] opendata_table::TableError),

    #[error(transparent)]
    Config(#[from] opendata_config::ConfigError),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Index table not found: {0}")]
    MissingIndex(PathBuf),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("File listing failed: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl PublishError {
    pub(crate) fn io(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| PublishError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// ユーザー向けの分かりやすいエラーメッセージ
    pub fn user_message(&self) -> String {
        match self {
            PublishError::Table(e) => e.user_message(),
            PublishError::MissingIndex(path) => {
                format!(
                    "index.csv が見つかりません: {}\n\
                     \n\
                     --tables-folder に処理済みテーブルのディレクトリを指定してください。",
                    path.display()
                )
            }
            _ => format!("{}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;
