//! モデル定義
//!
//! App Engine フレキシブル環境のデプロイ記述子 (app.yaml) を表すモデルです。
//! 記述子はデプロイ時に一度だけ読み込まれる静的なドキュメントで、
//! 要素間の関係は単純なネストのみです。

mod descriptor;
mod resources;
mod runtime;

// Re-exports
pub use descriptor::*;
pub use resources::*;
pub use runtime::*;
