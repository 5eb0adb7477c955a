//! 検索対象外の部分木の判定

use crate::config::SearchConfig;
use crate::tree::{ContentTree, NodeId};

/// 要素の部分木を検索対象から外すかを決める規則
pub trait ExclusionPolicy {
    /// `element` 以下を読み飛ばすなら真
    fn excludes<T: ContentTree>(&self, tree: &T, element: NodeId) -> bool;

    /// `node` 自身または祖先のいずれかが除外対象か
    fn excludes_ancestry<T: ContentTree>(&self, tree: &T, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if tree.tag_name(id).is_some() && self.excludes(tree, id) {
                return true;
            }
            current = tree.parent(id);
        }
        false
    }
}

/// タグ名と目印属性による除外規則
///
/// スクリプトやスタイルなど表示されない要素と、
/// 検索パネル自身（目印属性付きの要素）を除外する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultExclusionPolicy {
    tags: Vec<String>,
    attribute: String,
}

impl DefaultExclusionPolicy {
    pub fn new<I, S>(tags: I, attribute: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|tag| tag.as_ref().to_ascii_lowercase())
                .collect(),
            attribute: attribute.into(),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(&config.excluded_tags, config.exclusion_attribute.clone())
    }

    /// 目印属性名
    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl Default for DefaultExclusionPolicy {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl ExclusionPolicy for DefaultExclusionPolicy {
    fn excludes<T: ContentTree>(&self, tree: &T, element: NodeId) -> bool {
        let Some(tag) = tree.tag_name(element) else {
            return false;
        };
        if self.tags.iter().any(|excluded| tag.eq_ignore_ascii_case(excluded)) {
            return true;
        }
        tree.attribute(element, &self.attribute).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::DocumentTree;

    #[test]
    fn excludes_tags_case_insensitively() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let style = tree.append_element(root, "STYLE").unwrap();
        let p = tree.append_element(root, "p").unwrap();

        let policy = DefaultExclusionPolicy::default();
        assert!(policy.excludes(&tree, style));
        assert!(!policy.excludes(&tree, p));
    }

    #[test]
    fn marked_panel_excludes_descendants() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let panel = tree.append_element(root, "div").unwrap();
        tree.set_attribute(panel, "data-page-search", "").unwrap();
        let inner = tree.append_element(panel, "label").unwrap();
        let text = tree.append_text(inner, "Find in page...").unwrap();

        let policy = DefaultExclusionPolicy::default();
        assert!(policy.excludes(&tree, panel));
        assert!(!policy.excludes(&tree, inner));
        assert!(policy.excludes_ancestry(&tree, text));
    }
}
