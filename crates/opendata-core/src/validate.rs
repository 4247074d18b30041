//! 記述子のローカル検証
//!
//! プラットフォーム側の最終的な検証とは別に、デプロイ前に検出できる
//! スキーマ違反を洗い出します。

use crate::error::{DescriptorError, Result};
use crate::model::{AppDescriptor, Environment};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// CPU数の上限
const MAX_CPU: u32 = 96;
/// CPUあたりのメモリ上限（GB）
const MAX_MEMORY_PER_CPU_GB: f64 = 6.5;
/// ディスクサイズの範囲（GB）
const MIN_DISK_GB: u32 = 10;
const MAX_DISK_GB: u32 = 10240;

/// プラットフォームが予約している環境変数名
const RESERVED_VARIABLES: &[&str] = &["PORT"];
const RESERVED_PREFIXES: &[&str] = &["GAE_", "GOOGLE_"];

static VARIABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("variable name pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// 検証で見つかった問題
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// ドット区切りのキーパス（例: `resources.cpu`）
    pub key: String,
    pub message: String,
}

impl ValidationIssue {
    fn error(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            key: key.into(),
            message: message.into(),
        }
    }

    fn warning(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{}] {}: {}", label, self.key, self.message)
    }
}

impl AppDescriptor {
    /// スキーマ違反を列挙
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.env.is_flexible() {
            let blank = self
                .entrypoint
                .as_deref()
                .map(|e| e.trim().is_empty())
                .unwrap_or(true);
            if blank {
                issues.push(ValidationIssue::error(
                    "entrypoint",
                    "flex 環境では entrypoint が必須です",
                ));
            }
        }

        if let Some(scaling) = &self.manual_scaling
            && scaling.instances == 0
        {
            issues.push(ValidationIssue::error(
                "manual_scaling.instances",
                "インスタンス数は1以上である必要があります",
            ));
        }

        if let Some(resources) = &self.resources {
            if let Some(cpu) = resources.cpu
                && !(cpu == 1 || (cpu % 2 == 0 && (2..=MAX_CPU).contains(&cpu)))
            {
                issues.push(ValidationIssue::error(
                    "resources.cpu",
                    format!(
                        "CPU数は1または2〜{}の偶数である必要があります (指定値: {})",
                        MAX_CPU, cpu
                    ),
                ));
            }

            if let Some(memory) = resources.memory_gb {
                if memory == 0 {
                    issues.push(ValidationIssue::error(
                        "resources.memory_gb",
                        "メモリは1GB以上である必要があります",
                    ));
                }
                let cpu = resources.cpu.unwrap_or(1).max(1);
                let limit = f64::from(cpu) * MAX_MEMORY_PER_CPU_GB;
                if f64::from(memory) > limit {
                    issues.push(ValidationIssue::error(
                        "resources.memory_gb",
                        format!(
                            "メモリはCPUあたり{}GBまでです ({}CPUで上限{}GB, 指定値: {}GB)",
                            MAX_MEMORY_PER_CPU_GB, cpu, limit, memory
                        ),
                    ));
                }
            }

            if let Some(disk) = resources.disk_size_gb
                && !(MIN_DISK_GB..=MAX_DISK_GB).contains(&disk)
            {
                issues.push(ValidationIssue::error(
                    "resources.disk_size_gb",
                    format!(
                        "ディスクサイズは{}〜{}GBの範囲である必要があります (指定値: {}GB)",
                        MIN_DISK_GB, MAX_DISK_GB, disk
                    ),
                ));
            }
        }

        if self.env == Environment::Standard {
            if self.resources.is_some() {
                issues.push(ValidationIssue::warning(
                    "resources",
                    "resources は flex 環境でのみ有効です",
                ));
            }
            if self.manual_scaling.is_some() {
                issues.push(ValidationIssue::warning(
                    "manual_scaling",
                    "manual_scaling は flex 環境向けの設定です",
                ));
            }
        }

        for name in self.env_variables.keys() {
            let key = format!("env_variables.{}", name);
            if !VARIABLE_NAME.is_match(name) {
                issues.push(ValidationIssue::error(
                    key,
                    format!("無効な環境変数名です: '{}'", name),
                ));
            } else if RESERVED_VARIABLES.contains(&name.as_str())
                || RESERVED_PREFIXES.iter().any(|p| name.starts_with(p))
            {
                issues.push(ValidationIssue::error(
                    key,
                    format!("'{}' はプラットフォームが予約している名前です", name),
                ));
            }
        }

        issues
    }

    /// エラーが1件でもあれば失敗
    pub fn ensure_valid(&self) -> Result<()> {
        let errors: Vec<ValidationIssue> =
            self.validate().into_iter().filter(|i| i.is_error()).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DescriptorError::Validation(errors))
        }
    }
}
