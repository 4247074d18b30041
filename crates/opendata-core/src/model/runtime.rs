//! ランタイムと環境ティア

use serde::{Deserialize, Serialize};
use std::fmt;

/// ホスティングプラットフォームに要求するランタイムクラス
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    #[default]
    Python,
    Python3,
    Nodejs,
    Java,
    Go,
    Ruby,
    Php,
    Dotnet,
    /// 独自の Dockerfile を使うランタイム
    Custom,
}

impl Runtime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Runtime::Python => "python",
            Runtime::Python3 => "python3",
            Runtime::Nodejs => "nodejs",
            Runtime::Java => "java",
            Runtime::Go => "go",
            Runtime::Ruby => "ruby",
            Runtime::Php => "php",
            Runtime::Dotnet => "dotnet",
            Runtime::Custom => "custom",
        }
    }

    /// 文字列からパース
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "python" => Some(Runtime::Python),
            "python3" => Some(Runtime::Python3),
            "nodejs" => Some(Runtime::Nodejs),
            "java" => Some(Runtime::Java),
            "go" => Some(Runtime::Go),
            "ruby" => Some(Runtime::Ruby),
            "php" => Some(Runtime::Php),
            "dotnet" => Some(Runtime::Dotnet),
            "custom" => Some(Runtime::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 環境ティア
///
/// `flex` はマネージドVM上でアプリケーションを動かすティア、
/// `standard` はサンドボックス化されたランタイムです。
/// 省略時はプラットフォームと同じく `standard` として扱います。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[serde(alias = "flexible")]
    Flex,
    #[default]
    Standard,
}

impl Environment {
    pub fn is_flexible(&self) -> bool {
        matches!(self, Environment::Flex)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Flex => "flex",
            Environment::Standard => "standard",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
