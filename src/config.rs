//! 検索設定
//!
//! デバウンス間隔、除外対象、マーカーの見た目をまとめて扱う。
//! JSONファイルから読み込め、未指定の項目は既定値で補完される。

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PageSearchError, Result};
use crate::tree::MarkerStyle;

/// デバウンス間隔の上限（ミリ秒）
pub const MAX_DEBOUNCE_MS: u64 = 5_000;

/// ハイライト配色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightColors {
    /// 現在位置以外のマッチ
    pub other: MarkerStyle,
    /// 現在位置のマッチ
    pub current: MarkerStyle,
}

impl Default for HighlightColors {
    fn default() -> Self {
        Self {
            other: MarkerStyle::new("#fbbf44", "#000"),
            current: MarkerStyle::new("#2563eb", "#fff"),
        }
    }
}

/// 検索設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 入力確定までの待ち時間（ミリ秒）
    pub debounce_ms: u64,
    /// 中身を検索しない要素のタグ名（大文字小文字無視）
    pub excluded_tags: Vec<String>,
    /// この属性を持つ要素の部分木は検索しない
    pub exclusion_attribute: String,
    /// マーカー要素に付与するクラス名
    pub marker_class: String,
    /// 配色
    pub highlight: HighlightColors,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            excluded_tags: vec![
                "script".to_string(),
                "style".to_string(),
                "noscript".to_string(),
            ],
            exclusion_attribute: "data-page-search".to_string(),
            marker_class: "page-search-highlight".to_string(),
            highlight: HighlightColors::default(),
        }
    }
}

impl SearchConfig {
    /// デバウンス間隔
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// JSON文字列から読み込む
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// ファイルから読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content).map_err(|err| match err {
            PageSearchError::Serialization(_) => ConfigError::InvalidFile {
                path: path.display().to_string(),
            }
            .into(),
            other => other,
        })
    }

    /// 既定の場所から読み込む（ファイルが無ければ既定値）
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// 値の妥当性を検査
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::InvalidValue {
                key: "debounce_ms".to_string(),
                value: self.debounce_ms.to_string(),
            });
        }
        if self.exclusion_attribute.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "exclusion_attribute".to_string(),
            });
        }
        if self.marker_class.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "marker_class".to_string(),
            });
        }
        if let Some(tag) = self.excluded_tags.iter().find(|tag| tag.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "excluded_tags".to_string(),
                value: format!("{:?}", tag),
            });
        }
        Ok(())
    }
}

/// 既定の設定ファイルパス（`<config_dir>/page-search/config.json`）
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("page-search").join("config.json"))
}
