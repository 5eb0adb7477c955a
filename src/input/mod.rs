//! 入力処理モジュール
//!
//! 検索パネルが開いている間のキー操作を検索コマンドへ対応付ける

pub mod keybinding;

// 公開API
pub use keybinding::{Key, KeyCode, KeyModifiers, KeyOutcome, SearchCommand, SearchKeyMap};
