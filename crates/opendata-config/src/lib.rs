pub mod error;

pub use error::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 設定ファイルのパスを直接指定する環境変数
pub const SETTINGS_PATH_ENV: &str = "OPENDATA_SETTINGS_PATH";

/// カレントディレクトリで探す設定ファイル名（優先順）
const CANDIDATES: &[&str] = &["publish.local.yaml", "publish.yaml"];

/// 日付グリッドの開始日
const DEFAULT_START_DATE: &str = "2020-01-01";

/// JSON変換のデフォルト並列数
const DEFAULT_JSON_WORKERS: usize = 2;

/// opendata の設定ディレクトリを取得
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("opendata");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// グローバル設定ファイルのパス (`<config_dir>/opendata/publish.yaml`)
pub fn global_settings_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("publish.yaml"))
}

/// パブリッシャー設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 OPENDATA_SETTINGS_PATH (直接パス指定)
/// 2. カレントディレクトリ: publish.local.yaml, publish.yaml
/// 3. ./.opendata/ ディレクトリ内: 同様の順序
/// 4. ~/.config/opendata/publish.yaml (グローバル設定)
///
/// 見つからない場合は `None`（デフォルト設定で動作する）。
pub fn find_settings_file() -> Result<Option<PathBuf>> {
    // 1. 環境変数で直接指定
    if let Ok(settings_path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(settings_path);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    let current_dir = std::env::current_dir()?;

    // 2. カレントディレクトリで検索
    for filename in CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // 3. ./.opendata/ ディレクトリで検索
    let hidden_dir = current_dir.join(".opendata");
    if hidden_dir.is_dir() {
        for filename in CANDIDATES {
            let path = hidden_dir.join(filename);
            if path.exists() {
                return Ok(Some(path));
            }
        }
    }

    // 4. グローバル設定ファイル
    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join("opendata").join("publish.yaml");
        if global.exists() {
            return Ok(Some(global));
        }
    }

    Ok(None)
}

/// JSON出力時の列の型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Str,
    Int,
    Float,
}

/// パブリッシャー設定 (publish.yaml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishSettings {
    /// 日付グリッドの開始日 (YYYY-MM-DD)
    pub start_date: String,
    /// 公開テーブルの列名変換。値が null の列は削除、未記載の列はそのまま
    pub column_adapter: BTreeMap<String, Option<String>>,
    /// JSON変換時の列の型。未記載の列は文字列
    pub schema: BTreeMap<String, ColumnType>,
    /// v2 のメインテーブルに結合しないテーブル名
    pub exclude_from_main_table: Vec<String>,
    pub json_workers: usize,
    /// 並列処理のワーカー数。未指定時はCPU数
    pub workers: Option<usize>,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            start_date: DEFAULT_START_DATE.to_string(),
            column_adapter: default_column_adapter(),
            schema: default_schema(),
            exclude_from_main_table: vec!["main".to_string()],
            json_workers: DEFAULT_JSON_WORKERS,
            workers: None,
        }
    }
}

impl PublishSettings {
    /// 設定ファイルを探してロード。なければデフォルト
    pub fn load() -> Result<Self> {
        match find_settings_file()? {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("No settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// 指定ファイルからロード
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.check()?;
        info!(file = %path.display(), "Loaded publish settings");
        Ok(settings)
    }

    fn check(&self) -> Result<()> {
        self.start_date()?;
        if self.json_workers == 0 {
            return Err(ConfigError::InvalidValue(
                "json_workers は1以上である必要があります".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(ConfigError::InvalidValue(
                "workers は1以上である必要があります".to_string(),
            ));
        }
        Ok(())
    }

    /// 編集用のYAMLとして出力
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn start_date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d").map_err(|e| {
            ConfigError::InvalidValue(format!("start_date '{}': {}", self.start_date, e))
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn column_type(&self, column: &str) -> ColumnType {
        self.schema.get(column).copied().unwrap_or_default()
    }
}

/// v2 の列名から v3 の列名への変換
fn default_column_adapter() -> BTreeMap<String, Option<String>> {
    [
        ("key", Some("location_key")),
        ("total_confirmed", Some("cumulative_confirmed")),
        ("total_deceased", Some("cumulative_deceased")),
        ("total_recovered", Some("cumulative_recovered")),
        ("total_tested", Some("cumulative_tested")),
        ("new_hospitalized", Some("new_hospitalized_patients")),
        ("total_hospitalized", Some("cumulative_hospitalized_patients")),
        ("current_hospitalized", Some("current_hospitalized_patients")),
        ("new_intensive_care", Some("new_intensive_care_patients")),
        ("total_intensive_care", Some("cumulative_intensive_care_patients")),
        ("current_intensive_care", Some("current_intensive_care_patients")),
        ("new_ventilator", Some("new_ventilator_patients")),
        ("total_ventilator", Some("cumulative_ventilator_patients")),
        ("current_ventilator", Some("current_ventilator_patients")),
        ("3166-1-alpha-2", Some("iso_3166_1_alpha_2")),
        ("3166-1-alpha-3", Some("iso_3166_1_alpha_3")),
        ("aggregation_level", Some("aggregation_level")),
        ("wikidata", Some("wikidata_id")),
        ("datacommons", Some("datacommons_id")),
        ("openstreetmap", None),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
    .collect()
}

fn default_schema() -> BTreeMap<String, ColumnType> {
    let ints = [
        "new_confirmed",
        "new_deceased",
        "new_recovered",
        "new_tested",
        "total_confirmed",
        "total_deceased",
        "total_recovered",
        "total_tested",
        "cumulative_confirmed",
        "cumulative_deceased",
        "cumulative_recovered",
        "cumulative_tested",
        "aggregation_level",
        "population",
        "population_male",
        "population_female",
    ];
    let floats = ["latitude", "longitude", "area_sq_km", "elevation_m"];

    ints.into_iter()
        .map(|c| (c.to_string(), ColumnType::Int))
        .chain(floats.into_iter().map(|c| (c.to_string(), ColumnType::Float)))
        .collect()
}
