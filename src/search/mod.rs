//! 検索モジュール
//!
//! ページ内インクリメンタル検索のセッション管理とハイライト処理を提供
//!
//! 1回の検索サイクルは必ず「復元 → 収集 → 書き換え → 移動」の順で最後まで実行される。
//! 入力はデバウンスされ、期限前の新しい入力は保留中のサイクルを取り消す。

pub mod debounce;
pub mod exclusion;
pub mod indexer;
pub mod matcher;
pub mod navigator;
pub mod reverter;
pub mod rewriter;
mod state;
pub mod types;

use std::time::Instant;

use crossterm::event::KeyEvent;

use crate::config::SearchConfig;
use crate::input::{KeyOutcome, SearchCommand, SearchKeyMap};
use crate::tree::{ContentTree, NodeId};
use debounce::Debouncer;
use exclusion::{DefaultExclusionPolicy, ExclusionPolicy};
use matcher::{LiteralMatcher, StringMatcher};
use rewriter::MarkerTemplate;
use state::{Lifecycle, SearchState};

pub use indexer::find_matches;
pub use navigator::{marker_styles, Navigator};
pub use reverter::revert;
pub use rewriter::apply_highlights;
pub use types::{
    MatchHandle, RevertReport, RewriteReport, SearchStatus, SearchUiState, TextMatch,
};

/// ページ内検索コントローラー
#[derive(Debug)]
pub struct PageSearch<M = LiteralMatcher, P = DefaultExclusionPolicy> {
    matcher: M,
    policy: P,
    config: SearchConfig,
    keymap: SearchKeyMap,
    state: SearchState,
    debouncer: Debouncer<String>,
    cycles_run: usize,
}

impl PageSearch<LiteralMatcher, DefaultExclusionPolicy> {
    /// 設定から既定のマッチャーと除外規則で作成
    pub fn new(config: SearchConfig) -> Self {
        let policy = DefaultExclusionPolicy::from_config(&config);
        Self::with_parts(config, LiteralMatcher::new(), policy)
    }
}

impl Default for PageSearch<LiteralMatcher, DefaultExclusionPolicy> {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl<M: StringMatcher, P: ExclusionPolicy> PageSearch<M, P> {
    /// マッチャーと除外規則を差し替えて作成
    pub fn with_parts(config: SearchConfig, matcher: M, policy: P) -> Self {
        let debouncer = Debouncer::new(config.debounce());
        Self {
            matcher,
            policy,
            config,
            keymap: SearchKeyMap::new(),
            state: SearchState::new(),
            debouncer,
            cycles_run: 0,
        }
    }

    /// 設定を取得
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// パネルが開いているか
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// パネルを開く（既に開いていれば何もしない）
    pub fn open(&mut self) {
        if self.state.is_open() {
            return;
        }
        self.debouncer.cancel();
        self.state.reset();
        self.state.lifecycle = Lifecycle::Open;
        log::debug!("page search opened");
    }

    /// パネルを閉じる
    ///
    /// 保留中の入力を取り消し、挿入したマーカーをすべて戻してから状態を消去する。
    /// 戻せなかったマーカーは次のセッションへ持ち越して再試行する。
    pub fn close<T: ContentTree>(&mut self, tree: &mut T) -> RevertReport {
        self.debouncer.cancel();
        let report = self.release_markers(tree);
        if self.state.has_unreleased_markers() {
            log::warn!(
                "{} markers could not be removed on close; retrying on next search",
                self.state.pending_revert.len()
            );
        }
        self.state.reset();
        log::debug!("page search closed ({} markers reverted)", report.reverted);
        report
    }

    /// 入力欄の値を受け取り、デバウンスタイマーを張り直す
    ///
    /// 閉じている間の入力は無視して偽を返す。
    pub fn set_query(&mut self, text: &str, now: Instant) -> bool {
        if !self.state.is_open() {
            return false;
        }
        self.state.input = text.to_string();
        self.debouncer.trigger(text.to_string(), now);
        true
    }

    /// デバウンス期限を過ぎていれば検索サイクルを実行する
    pub fn poll<T: ContentTree>(&mut self, tree: &mut T, root: NodeId, now: Instant) -> bool {
        if !self.state.is_open() {
            return false;
        }
        match self.debouncer.poll(now) {
            Some(query) => {
                self.run_cycle(tree, root, &query);
                true
            }
            None => false,
        }
    }

    /// 保留中の入力があれば期限を待たずに実行する
    pub fn flush<T: ContentTree>(&mut self, tree: &mut T, root: NodeId) -> bool {
        if !self.state.is_open() {
            return false;
        }
        match self.debouncer.flush() {
            Some(query) => {
                self.run_cycle(tree, root, &query);
                true
            }
            None => false,
        }
    }

    /// 保留を取り消して即座に検索する
    pub fn search_now<T: ContentTree>(&mut self, tree: &mut T, root: NodeId, query: &str) {
        if !self.state.is_open() {
            return;
        }
        self.debouncer.cancel();
        self.state.input = query.to_string();
        self.run_cycle(tree, root, query);
    }

    /// 次のマッチへ移動
    pub fn next<T: ContentTree>(&mut self, tree: &mut T) {
        if !self.state.is_open() {
            return;
        }
        if self.state.navigator.next().is_some() {
            self.present(tree);
        }
    }

    /// 前のマッチへ移動
    pub fn previous<T: ContentTree>(&mut self, tree: &mut T) {
        if !self.state.is_open() {
            return;
        }
        if self.state.navigator.previous().is_some() {
            self.present(tree);
        }
    }

    /// 指定のマッチ（1-based）へ移動
    pub fn go_to_match<T: ContentTree>(&mut self, tree: &mut T, index: usize) {
        if !self.state.is_open() {
            return;
        }
        if self.state.navigator.go_to(index).is_some() {
            self.present(tree);
        }
    }

    /// キー入力を処理する（閉じている間は反応しない）
    pub fn handle_key<T: ContentTree>(&mut self, tree: &mut T, event: KeyEvent) -> KeyOutcome {
        if !self.state.is_open() {
            return KeyOutcome::Ignored;
        }
        let outcome = self.keymap.process_event(event);
        if let KeyOutcome::Handled { command, .. } = outcome {
            self.execute(tree, command);
        }
        outcome
    }

    /// 検索コマンドを実行
    pub fn execute<T: ContentTree>(&mut self, tree: &mut T, command: SearchCommand) {
        match command {
            SearchCommand::Close => {
                self.close(tree);
            }
            SearchCommand::Next => self.next(tree),
            SearchCommand::Previous => self.previous(tree),
        }
    }

    /// 現在のマッチ番号（1-based、なければ0）
    pub fn current_index(&self) -> usize {
        self.state.navigator.current()
    }

    /// 総マッチ数
    pub fn total_matches(&self) -> usize {
        self.state.handles.len()
    }

    /// 文書順のマッチ
    pub fn matches(&self) -> &[MatchHandle] {
        &self.state.handles
    }

    /// 最後に検索を実行した文字列
    pub fn query(&self) -> &str {
        &self.state.query
    }

    /// 保留中の入力の期限（ホストがタイマーを張るために使う）
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// 戻し損ねたマーカーが残っていて書き換えを停止しているか
    pub fn is_corrupt(&self) -> bool {
        self.state.has_unreleased_markers()
    }

    /// これまでに実行した検索サイクル数
    pub fn cycles_run(&self) -> usize {
        self.cycles_run
    }

    /// ホスト描画用の状態（閉じていれば `None`）
    pub fn ui_state(&self) -> Option<SearchUiState> {
        if !self.state.is_open() {
            return None;
        }
        Some(SearchUiState::new(
            &self.state.input,
            self.current_index(),
            self.total_matches(),
        ))
    }

    fn run_cycle<T: ContentTree>(&mut self, tree: &mut T, root: NodeId, query: &str) {
        self.cycles_run += 1;

        self.release_markers(tree);
        self.state.clear_matches();
        self.state.query = query.to_string();
        if self.state.has_unreleased_markers() {
            log::error!(
                "{} markers could not be removed; highlighting disabled until they are released",
                self.state.pending_revert.len()
            );
            return;
        }

        let found = find_matches(&*tree, root, query, &self.matcher, &self.policy);
        let template = MarkerTemplate {
            class: &self.config.marker_class,
            style: &self.config.highlight.other,
        };
        let report = apply_highlights(tree, &found, template);
        if report.stale_nodes > 0 {
            log::debug!("{} text nodes changed during rewrite", report.stale_nodes);
        }
        log::debug!(
            "search cycle {}: {} matches for {:?}",
            self.cycles_run,
            report.handles.len(),
            query
        );

        self.state.handles = report.handles;
        self.state.navigator.reset(self.state.handles.len());
        if self.state.navigator.go_to(1).is_some() {
            self.present(tree);
        }
    }

    /// 現在のマーカーと前回戻し損ねたマーカーをまとめて元に戻す
    ///
    /// 失敗したマーカーはツリーに残ったままなので `pending_revert` に積み直す。
    fn release_markers<T: ContentTree>(&mut self, tree: &mut T) -> RevertReport {
        let mut owned = std::mem::take(&mut self.state.pending_revert);
        owned.append(&mut self.state.handles);
        self.state.navigator.reset(0);

        let report = revert(tree, &owned);
        owned.retain(|handle| tree.is_attached(handle.marker));
        self.state.pending_revert = owned;
        report
    }

    fn present<T: ContentTree>(&self, tree: &mut T) {
        let failures = navigator::present(
            tree,
            &self.state.handles,
            self.state.navigator.current(),
            &self.config.highlight,
        );
        if failures > 0 {
            log::debug!("{} markers could not be restyled", failures);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::DocumentTree;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn sample_tree() -> DocumentTree {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let p = tree.append_element(root, "p").unwrap();
        tree.append_text(p, "The quick Fox jumps over the lazy fox")
            .unwrap();
        tree
    }

    #[test]
    fn search_highlights_and_selects_first_match() {
        let mut tree = sample_tree();
        let root = tree.root();
        let mut search = PageSearch::default();
        search.open();
        search.search_now(&mut tree, root, "fox");

        assert_eq!(search.total_matches(), 2);
        assert_eq!(search.current_index(), 1);
        let first = search.matches()[0].marker;
        assert_eq!(
            tree.marker_style(first),
            Some(&search.config().highlight.current)
        );
        assert_eq!(tree.last_scroll().map(|(node, _)| node), Some(first));
    }

    #[test]
    fn keys_drive_navigation_and_close() {
        let mut tree = sample_tree();
        let root = tree.root();
        let before = tree.to_markup(root);
        let mut search = PageSearch::default();
        search.open();
        search.search_now(&mut tree, root, "fox");

        search.handle_key(&mut tree, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(search.current_index(), 2);
        search.handle_key(&mut tree, KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        assert_eq!(search.current_index(), 1);

        search.handle_key(&mut tree, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!search.is_open());
        assert_eq!(tree.to_markup(root), before);
        assert_eq!(search.total_matches(), 0);
    }

    #[test]
    fn closed_session_ignores_everything() {
        let mut tree = sample_tree();
        let root = tree.root();
        let mut search = PageSearch::default();

        assert!(!search.set_query("fox", Instant::now()));
        search.search_now(&mut tree, root, "fox");
        assert_eq!(search.total_matches(), 0);
        assert_eq!(
            search.handle_key(&mut tree, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            KeyOutcome::Ignored
        );
        assert!(search.ui_state().is_none());
    }
}
