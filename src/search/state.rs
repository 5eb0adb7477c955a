//! 検索セッションの状態管理

use super::navigator::Navigator;
use super::types::MatchHandle;

/// 検索パネルの開閉状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Closed,
    Open,
}

/// 1回の「ページ内検索」呼び出しに対応する内部状態
#[derive(Debug, Clone)]
pub struct SearchState {
    /// 開閉状態
    pub lifecycle: Lifecycle,
    /// 最後に入力された文字列（デバウンス前）
    pub input: String,
    /// 最後に検索を実行した文字列
    pub query: String,
    /// 文書順のマーカー
    pub handles: Vec<MatchHandle>,
    /// 現在位置
    pub navigator: Navigator,
    /// 復元に失敗してツリーに残っているマーカー
    ///
    /// 閉じても破棄せず、次の復元で再試行する。空になるまで新しい書き換えはしない。
    pub pending_revert: Vec<MatchHandle>,
}

impl SearchState {
    /// 新しい状態を作成
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Closed,
            input: String::new(),
            query: String::new(),
            handles: Vec::new(),
            navigator: Navigator::default(),
            pending_revert: Vec::new(),
        }
    }

    /// 状態をリセット（閉じた状態へ戻す）
    ///
    /// 戻し損ねたマーカーはツリーに残っているので保持する。
    pub fn reset(&mut self) {
        self.lifecycle = Lifecycle::Closed;
        self.input.clear();
        self.query.clear();
        self.handles.clear();
        self.navigator.reset(0);
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle == Lifecycle::Open
    }

    /// 戻し損ねたマーカーが残っているか
    pub fn has_unreleased_markers(&self) -> bool {
        !self.pending_revert.is_empty()
    }

    /// マーカーを捨て、現在位置を0へ戻す
    pub fn clear_matches(&mut self) {
        self.handles.clear();
        self.navigator.reset(0);
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}
