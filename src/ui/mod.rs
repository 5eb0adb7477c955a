//! UIモジュール
//!
//! ratatuiベースの検索パネル描画

pub mod search_panel;

// 公開API
pub use search_panel::SearchPanelRenderer;
