//! アリーナ方式のインメモリ文書ツリー
//!
//! `ContentTree` の参照実装。デモ、テスト、ベンチマークのホストとして使う。
//! 置き換えられたノードはアリーナに残ったまま切り離され、IDは再利用しない。

use super::{ContentTree, Fragment, MarkerStyle, NodeId, ScrollOptions};
use crate::error::tree::Result;
use crate::error::TreeError;

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        style: Option<MarkerStyle>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// インメモリ文書ツリー
#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: Vec<Node>,
    root: NodeId,
    last_scroll: Option<(NodeId, ScrollOptions)>,
}

impl DocumentTree {
    /// `body` 要素をルートに持つ空の文書を作成
    pub fn new() -> Self {
        Self::with_root_tag("body")
    }

    /// 任意のタグをルートにして作成
    pub fn with_root_tag(tag: &str) -> Self {
        let root = Node {
            data: NodeData::Element {
                tag: tag.to_string(),
                attributes: Vec::new(),
                style: None,
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId::new(0),
            last_scroll: None,
        }
    }

    /// ルート要素
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// アリーナ内のノード総数（切り離し済みを含む）
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 子要素を末尾に追加
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId> {
        self.append(
            parent,
            NodeData::Element {
                tag: tag.to_string(),
                attributes: Vec::new(),
                style: None,
            },
        )
    }

    /// テキストノードを末尾に追加
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        self.append(parent, NodeData::Text(text.to_string()))
    }

    /// 属性を設定（既存なら上書き）
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        match &mut self.node_mut(node)?.data {
            NodeData::Element { attributes, .. } => {
                if let Some(slot) = attributes.iter_mut().find(|(key, _)| key == name) {
                    slot.1 = value.to_string();
                } else {
                    attributes.push((name.to_string(), value.to_string()));
                }
                Ok(())
            }
            NodeData::Text(_) => Err(TreeError::NotElement { node }),
        }
    }

    /// テキストノードの内容を書き換える（ホスト側の変更を模擬）
    pub fn set_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        match &mut self.node_mut(node)?.data {
            NodeData::Text(current) => {
                *current = text.to_string();
                Ok(())
            }
            NodeData::Element { .. } => Err(TreeError::NotText { node }),
        }
    }

    /// ノードを親から切り離す（ホスト側の再描画を模擬）
    pub fn detach(&mut self, node: NodeId) -> Result<()> {
        let parent = self
            .node(node)?
            .parent
            .ok_or(TreeError::NoParent { node })?;
        self.node_mut(parent)?.children.retain(|child| *child != node);
        self.node_mut(node)?.parent = None;
        Ok(())
    }

    /// 最後にスクロール要求されたノード
    pub fn last_scroll(&self) -> Option<(NodeId, ScrollOptions)> {
        self.last_scroll
    }

    /// マーカーに適用されているスタイル
    pub fn marker_style(&self, node: NodeId) -> Option<&MarkerStyle> {
        match &self.nodes.get(node.index())?.data {
            NodeData::Element { style, .. } => style.as_ref(),
            NodeData::Text(_) => None,
        }
    }

    /// 部分木をHTML風の文字列へ書き出す（スタイルは含めない）
    pub fn to_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        let Some(entry) = self.nodes.get(node.index()) else {
            return;
        };
        match &entry.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element {
                tag, attributes, ..
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, value));
                }
                out.push('>');
                for child in &entry.children {
                    self.write_markup(*child, out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }

    fn append(&mut self, parent: NodeId, data: NodeData) -> Result<NodeId> {
        if !matches!(self.node(parent)?.data, NodeData::Element { .. }) {
            return Err(TreeError::NotElement { node: parent });
        }
        let id = self.push_node(data, Some(parent));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    fn push_node(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent,
            children: Vec::new(),
        });
        id
    }

    fn build_fragment(&mut self, fragment: Fragment, parent: NodeId) -> NodeId {
        match fragment {
            Fragment::Text(text) => self.push_node(NodeData::Text(text), Some(parent)),
            Fragment::Marker {
                index,
                text,
                class,
                style,
            } => {
                let marker = self.push_node(
                    NodeData::Element {
                        tag: "span".to_string(),
                        attributes: vec![
                            ("class".to_string(), class),
                            ("data-match-index".to_string(), index.to_string()),
                        ],
                        style: Some(style),
                    },
                    Some(parent),
                );
                let inner = self.push_node(NodeData::Text(text), Some(marker));
                self.nodes[marker.index()].children.push(inner);
                marker
            }
        }
    }

    fn node(&self, node: NodeId) -> Result<&Node> {
        self.nodes
            .get(node.index())
            .ok_or(TreeError::NodeNotFound { node })
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(node.index())
            .ok_or(TreeError::NodeNotFound { node })
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTree for DocumentTree {
    fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes.get(current.index()).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index())?.parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.index())
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.index())?.data {
            NodeData::Element { tag, .. } => Some(tag.as_str()),
            NodeData::Text(_) => None,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(node.index())?.data {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            NodeData::Text(_) => None,
        }
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.index())?.data {
            NodeData::Text(text) => Some(text.as_str()),
            NodeData::Element { .. } => None,
        }
    }

    fn replace_node(&mut self, old: NodeId, fragments: Vec<Fragment>) -> Result<Vec<NodeId>> {
        let parent = self.node(old)?.parent.ok_or(TreeError::NoParent { node: old })?;
        let position = self
            .node(parent)?
            .children
            .iter()
            .position(|child| *child == old)
            .ok_or(TreeError::Detached { node: old })?;

        let created: Vec<NodeId> = fragments
            .into_iter()
            .map(|fragment| self.build_fragment(fragment, parent))
            .collect();

        self.node_mut(parent)?
            .children
            .splice(position..=position, created.iter().copied());
        self.node_mut(old)?.parent = None;
        Ok(created)
    }

    fn merge_adjacent_text_nodes(&mut self, parent: NodeId) -> Result<()> {
        if !matches!(self.node(parent)?.data, NodeData::Element { .. }) {
            return Err(TreeError::NotElement { node: parent });
        }

        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());
        let mut dropped: Vec<NodeId> = Vec::new();

        for child in children {
            let child_text = match &self.nodes[child.index()].data {
                NodeData::Text(text) => Some(text.clone()),
                NodeData::Element { .. } => None,
            };
            match child_text {
                Some(text) if text.is_empty() => dropped.push(child),
                Some(text) => {
                    let previous = kept.last().copied();
                    match previous.map(|prev| &mut self.nodes[prev.index()].data) {
                        Some(NodeData::Text(prev_text)) => {
                            prev_text.push_str(&text);
                            dropped.push(child);
                        }
                        _ => kept.push(child),
                    }
                }
                None => kept.push(child),
            }
        }

        for node in dropped {
            self.nodes[node.index()].parent = None;
        }
        self.node_mut(parent)?.children = kept;
        Ok(())
    }

    fn set_marker_style(&mut self, marker: NodeId, style: &MarkerStyle) -> Result<()> {
        match &mut self.node_mut(marker)?.data {
            NodeData::Element { style: slot, .. } => {
                *slot = Some(style.clone());
                Ok(())
            }
            NodeData::Text(_) => Err(TreeError::NotElement { node: marker }),
        }
    }

    fn scroll_into_view(&mut self, node: NodeId, options: ScrollOptions) -> Result<()> {
        if !self.is_attached(node) {
            return Err(TreeError::Detached { node });
        }
        self.last_scroll = Some((node, options));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(tree: &mut DocumentTree, text: &str) -> (NodeId, NodeId) {
        let root = tree.root();
        let p = tree.append_element(root, "p").unwrap();
        let t = tree.append_text(p, text).unwrap();
        (p, t)
    }

    #[test]
    fn replace_node_splices_fragments_in_place() {
        let mut tree = DocumentTree::new();
        let (p, t) = paragraph(&mut tree, "abc");
        let created = tree
            .replace_node(
                t,
                vec![
                    Fragment::Text("a".to_string()),
                    Fragment::Marker {
                        index: 0,
                        text: "b".to_string(),
                        class: "hit".to_string(),
                        style: MarkerStyle::new("#ff0", "#000"),
                    },
                    Fragment::Text("c".to_string()),
                ],
            )
            .unwrap();

        assert_eq!(created.len(), 3);
        assert_eq!(tree.children(p), created);
        assert!(!tree.is_attached(t));
        assert_eq!(
            tree.to_markup(p),
            "<p>a<span class=\"hit\" data-match-index=\"0\">b</span>c</p>"
        );
    }

    #[test]
    fn merge_joins_neighbours_and_drops_empty_text() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let p = tree.append_element(root, "p").unwrap();
        tree.append_text(p, "ab").unwrap();
        tree.append_text(p, "").unwrap();
        tree.append_text(p, "cd").unwrap();
        let em = tree.append_element(p, "em").unwrap();
        tree.append_text(em, "x").unwrap();
        tree.append_text(p, "ef").unwrap();

        tree.merge_adjacent_text_nodes(p).unwrap();

        let children = tree.children(p);
        assert_eq!(children.len(), 3);
        assert_eq!(tree.text(children[0]), Some("abcd"));
        assert_eq!(tree.text(children[2]), Some("ef"));
    }

    #[test]
    fn detached_subtree_is_not_attached() {
        let mut tree = DocumentTree::new();
        let (p, t) = paragraph(&mut tree, "hello");
        assert!(tree.is_attached(t));
        tree.detach(p).unwrap();
        assert!(!tree.is_attached(t));
        assert!(matches!(
            tree.scroll_into_view(t, ScrollOptions::centered()),
            Err(TreeError::Detached { .. })
        ));
    }

    #[test]
    fn walk_prunes_skipped_elements() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let (_, first) = paragraph(&mut tree, "one");
        let script = tree.append_element(root, "script").unwrap();
        tree.append_text(script, "var one;").unwrap();
        let (_, last) = paragraph(&mut tree, "two");

        let found = tree.walk_text_nodes(root, |t, node| t.tag_name(node) == Some("script"));
        assert_eq!(found, vec![first, last]);
    }

    #[test]
    fn set_attribute_rejects_text_nodes() {
        let mut tree = DocumentTree::new();
        let (_, t) = paragraph(&mut tree, "x");
        assert_eq!(
            tree.set_attribute(t, "id", "a"),
            Err(TreeError::NotElement { node: t })
        );
    }
}
