//! page-search - ページ内インクリメンタル検索エンジン
//!
//! ホストが所有する描画ツリー上で検索語の出現を探し、マーカーで囲み、
//! 前後移動とスクロールを行い、閉じるときに元のテキストへ戻す。

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod tree;

// ロジック層
pub mod input;
pub mod search;

// 表示層
pub mod ui;

// 公開API
pub use config::SearchConfig;
pub use error::{PageSearchError, Result};
pub use search::PageSearch;
pub use tree::{ContentTree, DocumentTree, NodeId};
