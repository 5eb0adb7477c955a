//! マーカーの除去と元テキストの復元

use super::types::{MatchHandle, RevertReport};
use crate::tree::{ContentTree, Fragment, NodeId};

/// 挿入済みマーカーをすべて元のテキストへ戻す
///
/// 各マーカーを同じ文字列のテキストノードで置き換えてから、
/// 影響を受けた親ごとに隣接テキストを結合する。
/// 既に切り離されたマーカーは読み飛ばし、途中で失敗しても残りの処理は続ける。
/// 何度呼んでも結果は変わらない。
pub fn revert<T: ContentTree>(tree: &mut T, handles: &[MatchHandle]) -> RevertReport {
    let mut report = RevertReport::default();
    let mut parents: Vec<NodeId> = Vec::new();

    for handle in handles {
        if !tree.is_attached(handle.marker) {
            report.skipped_detached += 1;
            continue;
        }
        let Some(parent) = tree.parent(handle.marker) else {
            report.skipped_detached += 1;
            continue;
        };

        // ホストがマーカー内を書き換えていてもその内容を残す
        let text = tree.text_content(handle.marker);
        match tree.replace_node(handle.marker, vec![Fragment::Text(text)]) {
            Ok(_) => {
                report.reverted += 1;
                if !parents.contains(&parent) {
                    parents.push(parent);
                }
            }
            Err(err) => {
                log::warn!("failed to remove marker {}: {}", handle.marker, err);
                report.failed += 1;
            }
        }
    }

    for parent in parents {
        if !tree.is_attached(parent) {
            continue;
        }
        if let Err(err) = tree.merge_adjacent_text_nodes(parent) {
            log::warn!("failed to merge text under {}: {}", parent, err);
            report.failed += 1;
        }
    }

    report
}
