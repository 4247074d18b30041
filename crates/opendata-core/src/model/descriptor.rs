//! デプロイ記述子

use super::resources::{ManualScaling, Resources};
use super::runtime::{Environment, Runtime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// サービスアカウントを渡す環境変数名
pub const SERVICE_ACCOUNT_VARIABLE: &str = "GCS_SERVICE_ACCOUNT";

/// デプロイ記述子 (app.yaml)
///
/// YAML形式：
/// ```yaml
/// runtime: custom
/// env: flex
/// entrypoint: opendata publish --no-progress
/// manual_scaling:
///   instances: 1
/// resources:
///   cpu: 4
///   memory_gb: 16
///   disk_size_gb: 32
/// env_variables:
///   GCS_SERVICE_ACCOUNT: "..."
/// ```
///
/// 認識されるトップレベルキー以外はパース時に拒否されます。
/// フィールドの宣言順がそのまま出力時のキー順になります。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppDescriptor {
    pub runtime: Runtime,
    #[serde(default)]
    pub env: Environment,
    /// プロセススーパーバイザーに渡す起動コマンド（中身は解釈しない）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_scaling: Option<ManualScaling>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env_variables: BTreeMap<String, String>,
}

impl AppDescriptor {
    /// パブリッシャーをホストするための記述子テンプレート
    pub fn publisher_default() -> Self {
        let mut env_variables = BTreeMap::new();
        env_variables.insert(SERVICE_ACCOUNT_VARIABLE.to_string(), String::new());

        Self {
            runtime: Runtime::Custom,
            env: Environment::Flex,
            entrypoint: Some("opendata publish --no-progress".to_string()),
            manual_scaling: Some(ManualScaling { instances: 1 }),
            resources: Some(Resources {
                cpu: Some(4),
                memory_gb: Some(16),
                disk_size_gb: Some(32),
            }),
            env_variables,
        }
    }

    /// `GCS_SERVICE_ACCOUNT` の値
    pub fn service_account(&self) -> Option<&str> {
        self.env_variables
            .get(SERVICE_ACCOUNT_VARIABLE)
            .map(|s| s.as_str())
    }

    /// 固定インスタンス数
    pub fn instances(&self) -> Option<u32> {
        self.manual_scaling.map(|s| s.instances)
    }

    /// プロセス環境へ注入する (名前, 値) の一覧（名前順）
    pub fn environment_pairs(&self) -> Vec<(&str, &str)> {
        self.env_variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}
