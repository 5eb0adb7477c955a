//! マッチ箇所のマーカー化
//!
//! マッチを含むテキストノード1つを「テキスト / マーカー」の断片列で置き換える。
//! 断片の文字列を順に連結すると元のテキストと完全に一致する。

use super::types::{MatchHandle, RewriteReport, TextMatch};
use crate::tree::{ContentTree, Fragment, MarkerStyle, NodeId};

/// マーカー生成時の見た目
#[derive(Debug, Clone, Copy)]
pub struct MarkerTemplate<'a> {
    /// マーカー要素のクラス名
    pub class: &'a str,
    /// 初期スタイル
    pub style: &'a MarkerStyle,
}

/// インデクサの結果をもとにツリーへマーカーを挿入する
///
/// マッチはノードごとにまとまった文書順で渡すこと（`find_matches` の出力そのまま）。
/// 位置の計算はインデクサ側で済んでいるので、ここでは書き換えだけを行う。
/// 書き換え前に切り離された、または内容が変わったノードのマッチは黙って捨てる。
pub fn apply_highlights<T: ContentTree>(
    tree: &mut T,
    matches: &[TextMatch],
    template: MarkerTemplate<'_>,
) -> RewriteReport {
    let mut report = RewriteReport::default();

    for group in group_by_node(matches) {
        let node = group[0].node;
        let first_index = report.handles.len();
        let Some(fragments) = build_fragments(&*tree, node, group, first_index, template) else {
            log::debug!(
                "text node {} changed before rewrite, dropping {} matches",
                node,
                group.len()
            );
            report.stale_nodes += 1;
            continue;
        };

        let marker_texts: Vec<Option<(usize, String)>> = fragments
            .iter()
            .map(|fragment| match fragment {
                Fragment::Marker { index, text, .. } => Some((*index, text.clone())),
                Fragment::Text(_) => None,
            })
            .collect();

        match tree.replace_node(node, fragments) {
            Ok(created) => {
                for (id, marker) in created.into_iter().zip(marker_texts) {
                    if let Some((index, text)) = marker {
                        report.handles.push(MatchHandle {
                            marker: id,
                            index,
                            text,
                        });
                    }
                }
            }
            Err(err) => {
                log::debug!("failed to rewrite {}: {}", node, err);
                report.stale_nodes += 1;
            }
        }
    }

    report
}

/// 同じノードに属する連続したマッチをまとめる
fn group_by_node(matches: &[TextMatch]) -> Vec<&[TextMatch]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..=matches.len() {
        if i == matches.len() || matches[i].node != matches[start].node {
            groups.push(&matches[start..i]);
            start = i;
        }
    }
    groups
}

/// 現在のノード内容から断片列を組み立てる。内容がマッチと食い違えば `None`
fn build_fragments<T: ContentTree>(
    tree: &T,
    node: NodeId,
    group: &[TextMatch],
    first_index: usize,
    template: MarkerTemplate<'_>,
) -> Option<Vec<Fragment>> {
    if !tree.is_attached(node) {
        return None;
    }
    let text = tree.text(node)?;

    let mut fragments = Vec::with_capacity(group.len() * 2 + 1);
    let mut cursor = 0;
    for (offset, m) in group.iter().enumerate() {
        if m.start < cursor || m.is_empty() || text.get(m.start..m.end)? != m.text {
            return None;
        }
        if m.start > cursor {
            fragments.push(Fragment::Text(text[cursor..m.start].to_string()));
        }
        fragments.push(Fragment::Marker {
            index: first_index + offset,
            text: m.text.clone(),
            class: template.class.to_string(),
            style: template.style.clone(),
        });
        cursor = m.end;
    }
    if cursor < text.len() {
        fragments.push(Fragment::Text(text[cursor..].to_string()));
    }
    Some(fragments)
}
