//! スケーリングとマシンリソース

use serde::{Deserialize, Serialize};

/// 手動スケーリング（オートスケールしない固定インスタンス数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManualScaling {
    /// 稼働させるインスタンス数
    pub instances: u32,
}

/// インスタンスあたりのリソース割り当て
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Resources {
    /// 仮想CPUコア数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u32>,
    /// メモリ（GB）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_gb: Option<u32>,
    /// エフェメラルディスク（GB）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<u32>,
}
