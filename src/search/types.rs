//! 検索関連の共通型

use crate::tree::NodeId;

/// インデクサが見つけた1件の出現位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    /// 出現を含むテキストノード
    pub node: NodeId,
    /// 開始位置（バイトオフセット）
    pub start: usize,
    /// 終了位置（バイトオフセット、排他的）
    pub end: usize,
    /// マッチした文字列（元の大文字小文字を保持）
    pub text: String,
}

impl TextMatch {
    /// マッチが空か判定
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// 書き換え済みマッチへのハンドル
///
/// 各ハンドルはツリー上のマーカー要素1つに対応する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchHandle {
    /// マーカー要素
    pub marker: NodeId,
    /// セッション内の連番（0-based）
    pub index: usize,
    /// マッチした文字列
    pub text: String,
}

impl MatchHandle {
    /// 1-based の現在位置と一致するか
    pub fn is_current(&self, current_index: usize) -> bool {
        current_index != 0 && self.index + 1 == current_index
    }
}

/// 書き換えパスの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// 文書順のハンドル
    pub handles: Vec<MatchHandle>,
    /// 書き換え前に切り離されていた、または内容が変わっていたノード数
    pub stale_nodes: usize,
}

/// 復元パスの結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevertReport {
    /// 元のテキストへ戻したマーカー数
    pub reverted: usize,
    /// 既に切り離されていたため読み飛ばしたマーカー数
    pub skipped_detached: usize,
    /// ツリー操作に失敗したマーカー数
    pub failed: usize,
}

impl RevertReport {
    /// 全マーカーを処理できたか
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// 検索パネルの表示ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// 入力待ち
    Idle,
    /// マッチなし
    NoMatches,
    /// マッチあり
    Matches,
}

/// ホスト描画用の検索UI状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchUiState {
    /// 入力中の検索語
    pub query: String,
    /// 現在のマッチ番号（1-based、なければ0）
    pub current_match: usize,
    /// 総マッチ数
    pub total_matches: usize,
    /// ステータス
    pub status: SearchStatus,
}

impl SearchUiState {
    /// 状態から組み立てる
    pub fn new(query: &str, current_match: usize, total_matches: usize) -> Self {
        let status = if total_matches > 0 {
            SearchStatus::Matches
        } else if !query.is_empty() {
            SearchStatus::NoMatches
        } else {
            SearchStatus::Idle
        };
        Self {
            query: query.to_string(),
            current_match,
            total_matches,
            status,
        }
    }

    /// ステータス行の文言
    pub fn message(&self) -> String {
        match self.status {
            SearchStatus::Matches => {
                format!("{} of {} matches", self.current_match, self.total_matches)
            }
            SearchStatus::NoMatches => "No matches found".to_string(),
            SearchStatus::Idle => "Type to search".to_string(),
        }
    }

    /// 前後移動ボタンを有効にすべきか
    pub fn can_navigate(&self) -> bool {
        self.total_matches > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_messages() {
        assert_eq!(SearchUiState::new("", 0, 0).message(), "Type to search");
        assert_eq!(SearchUiState::new("zzz", 0, 0).message(), "No matches found");
        assert_eq!(SearchUiState::new("fox", 2, 5).message(), "2 of 5 matches");
    }

    #[test]
    fn handle_current_is_one_based() {
        let handle = MatchHandle {
            marker: NodeId::new(7),
            index: 0,
            text: "Fox".to_string(),
        };
        assert!(handle.is_current(1));
        assert!(!handle.is_current(0));
        assert!(!handle.is_current(2));
    }
}
