//! エラーハンドリングシステム
//!
//! ページ内検索で使用される統一されたエラー型を定義
//! 検索処理中に発生する回復可能な失敗はホストへ伝播させず、レポートとして集計する

use thiserror::Error;

use crate::tree::NodeId;

/// ライブラリ全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum PageSearchError {
    /// ツリー操作エラー
    #[error("Tree operation failed: {0}")]
    Tree(#[from] TreeError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 入出力エラー
    #[error("IO error: {0}")]
    Io(String),

    /// シリアライズ・デシリアライズエラー
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// コンテンツツリー操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node not found: {node}")]
    NodeNotFound { node: NodeId },

    #[error("Node is detached from the document: {node}")]
    Detached { node: NodeId },

    #[error("Node is not a text node: {node}")]
    NotText { node: NodeId },

    #[error("Node is not an element: {node}")]
    NotElement { node: NodeId },

    #[error("Node has no parent: {node}")]
    NoParent { node: NodeId },
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file: {path}")]
    InvalidFile { path: String },

    #[error("Missing required setting: {key}")]
    MissingRequired { key: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl From<std::io::Error> for PageSearchError {
    fn from(error: std::io::Error) -> Self {
        PageSearchError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for PageSearchError {
    fn from(error: serde_json::Error) -> Self {
        PageSearchError::Serialization(error.to_string())
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, PageSearchError>;

/// 各モジュール固有のResult型
pub mod tree {
    pub type Result<T> = std::result::Result<T, super::TreeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_error_converts_into_top_level_error() {
        let err: PageSearchError = TreeError::Detached { node: NodeId::new(3) }.into();
        assert!(matches!(err, PageSearchError::Tree(TreeError::Detached { .. })));
        assert!(err.to_string().contains("#3"));
    }

    #[test]
    fn io_error_keeps_message() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing config");
        let err: PageSearchError = io.into();
        assert_eq!(err.to_string(), "IO error: missing config");
    }
}
