//! opendata のデプロイ記述子
//!
//! App Engine フレキシブル環境向けの app.yaml を読み込み、
//! 検証し、正規化して書き戻すための型と関数を提供します。
//! 記述子はホスティングプラットフォームが消費するもので、
//! entrypoint のコマンド文字列はそのまま保持し解釈しません。

pub mod discovery;
pub mod error;
pub mod loader;
pub mod model;
pub mod parser;
pub mod validate;

pub use discovery::{PROJECT_ROOT_ENV, discover_descriptor, find_descriptor_root};
pub use error::{DescriptorError, Result};
pub use loader::{LoadedDescriptor, load_descriptor, load_descriptor_from_root};
pub use model::*;
pub use parser::{parse_descriptor_file, parse_descriptor_str};
pub use validate::{Severity, ValidationIssue};
