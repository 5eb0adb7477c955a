//! コンテンツツリー抽象
//!
//! 検索エンジンが依存するツリー操作の最小集合を定義する。
//! ツリー本体はホスト（描画フレームワーク）が所有し、外部から随時変更されうる。
//! 検索側はテキストノードの読み取りと、自身が挿入したマーカーの書き換えだけを行う。

pub mod document;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::tree::Result;

pub use document::DocumentTree;

/// ツリー内ノードの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// マーカーの配色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerStyle {
    /// 背景色
    pub background: String,
    /// 文字色
    pub foreground: String,
}

impl MarkerStyle {
    pub fn new(background: impl Into<String>, foreground: impl Into<String>) -> Self {
        Self {
            background: background.into(),
            foreground: foreground.into(),
        }
    }
}

/// スクロールの動き
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// ビューポート内の配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

/// `scroll_into_view` のオプション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollOptions {
    /// マッチ移動時に使う設定（中央へスムーズスクロール）
    pub fn centered() -> Self {
        Self {
            behavior: ScrollBehavior::Smooth,
            block: ScrollBlock::Center,
        }
    }
}

/// 置換時に挿入する断片
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// 通常のテキストノード
    Text(String),
    /// ハイライトマーカー（テキスト1つを包む要素）
    Marker {
        /// セッション内の連番（0-based）
        index: usize,
        /// マッチした文字列（元の大文字小文字を保持）
        text: String,
        /// マーカー識別用クラス名
        class: String,
        /// 初期スタイル
        style: MarkerStyle,
    },
}

impl Fragment {
    /// 断片が表すテキスト
    pub fn text(&self) -> &str {
        match self {
            Fragment::Text(text) => text,
            Fragment::Marker { text, .. } => text,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Fragment::Marker { .. })
    }
}

/// 検索エンジンが必要とするツリー操作
///
/// 実装はHTML DOM、ネイティブGUIツリー、仮想シーングラフなど何でもよい。
/// 検索アルゴリズムはこのトレイトだけに依存する。
pub trait ContentTree {
    /// ノードが文書ルートから到達可能か
    fn is_attached(&self, node: NodeId) -> bool;

    /// 親ノード
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// 子ノード（文書順）
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// 要素のタグ名（テキストノードなら `None`）
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    /// 要素の属性値
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// テキストノードの内容（要素なら `None`）
    fn text(&self, node: NodeId) -> Option<&str>;

    /// `old` を断片列で置き換え、断片と同じ順序で新ノードIDを返す
    fn replace_node(&mut self, old: NodeId, fragments: Vec<Fragment>) -> Result<Vec<NodeId>>;

    /// 直下の隣接テキストノードを結合し、空のテキストノードを除去する
    fn merge_adjacent_text_nodes(&mut self, parent: NodeId) -> Result<()>;

    /// マーカーのスタイルを変更
    fn set_marker_style(&mut self, marker: NodeId, style: &MarkerStyle) -> Result<()>;

    /// ノードが見える位置までスクロール
    fn scroll_into_view(&mut self, node: NodeId, options: ScrollOptions) -> Result<()>;

    /// 前順深さ優先でテキストノードを列挙する
    ///
    /// `skip_element` が真を返した要素の部分木は丸ごと読み飛ばす。
    fn walk_text_nodes<F>(&self, root: NodeId, mut skip_element: F) -> Vec<NodeId>
    where
        F: FnMut(&Self, NodeId) -> bool,
        Self: Sized,
    {
        let mut found = Vec::new();
        if !self.is_attached(root) {
            return found;
        }

        // 右の兄弟から積むことで左から順に取り出す
        let mut stack: Vec<NodeId> = self.children(root).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if self.text(node).is_some() {
                found.push(node);
                continue;
            }
            if self.tag_name(node).is_some() && skip_element(self, node) {
                continue;
            }
            stack.extend(self.children(node).into_iter().rev());
        }
        found
    }

    /// 部分木のテキストを連結して返す
    fn text_content(&self, node: NodeId) -> String {
        if let Some(text) = self.text(node) {
            return text.to_string();
        }
        let mut out = String::new();
        for child in self.children(node) {
            out.push_str(&self.text_content(child));
        }
        out
    }
}
