//! 文書内の出現位置の収集
//!
//! ツリーを読むだけで変更はしない。結果は文書順（前順深さ優先、左から右）に並ぶ。

use super::exclusion::ExclusionPolicy;
use super::matcher::StringMatcher;
use super::types::TextMatch;
use crate::tree::{ContentTree, NodeId};

/// `root` 以下から `query` の出現をすべて集める
///
/// 空の検索語、切り離された `root`、除外対象内の `root` はいずれも空の結果になる。
pub fn find_matches<T, M, P>(
    tree: &T,
    root: NodeId,
    query: &str,
    matcher: &M,
    policy: &P,
) -> Vec<TextMatch>
where
    T: ContentTree,
    M: StringMatcher,
    P: ExclusionPolicy,
{
    let Some(compiled) = matcher.compile(query) else {
        return Vec::new();
    };
    if !tree.is_attached(root) || policy.excludes_ancestry(tree, root) {
        log::debug!("search root {} is detached or excluded", root);
        return Vec::new();
    }

    let mut matches = Vec::new();
    for node in tree.walk_text_nodes(root, |t, element| policy.excludes(t, element)) {
        let Some(text) = tree.text(node) else {
            continue;
        };
        for range in compiled.find_in(text) {
            matches.push(TextMatch {
                node,
                start: range.start,
                end: range.end,
                text: text[range.start..range.end].to_string(),
            });
        }
    }
    matches
}
