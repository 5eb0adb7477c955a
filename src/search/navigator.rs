//! マッチ間の移動
//!
//! 現在位置は 1-based（0 は「現在位置なし」）。前後移動は端で折り返す。
//! スタイルは `(マッチ数, 現在位置)` だけから決まるので、ツリー無しでも検証できる。

use super::types::MatchHandle;
use crate::config::HighlightColors;
use crate::tree::{ContentTree, MarkerStyle, ScrollOptions};

/// 各マーカーに当てるスタイルを求める
pub fn marker_styles(count: usize, current: usize, colors: &HighlightColors) -> Vec<&MarkerStyle> {
    (1..=count)
        .map(|position| {
            if position == current {
                &colors.current
            } else {
                &colors.other
            }
        })
        .collect()
}

/// マッチ一覧上のカーソル
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    count: usize,
}

impl Navigator {
    pub fn new(count: usize) -> Self {
        Self { current: 0, count }
    }

    /// マッチ数を差し替え、現在位置を0へ戻す
    pub fn reset(&mut self, count: usize) {
        self.count = count;
        self.current = 0;
    }

    /// 現在位置（1-based、なければ0）
    pub fn current(&self) -> usize {
        self.current
    }

    /// マッチ数
    pub fn count(&self) -> usize {
        self.count
    }

    /// 指定位置へ移動。範囲外なら何もしない
    pub fn go_to(&mut self, index: usize) -> Option<usize> {
        if self.count == 0 || index == 0 || index > self.count {
            return None;
        }
        self.current = index;
        Some(index)
    }

    /// 次のマッチへ（最後の次は最初）
    pub fn next(&mut self) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let next = if self.current >= self.count {
            1
        } else {
            self.current + 1
        };
        self.go_to(next)
    }

    /// 前のマッチへ（最初の前は最後）
    pub fn previous(&mut self) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let previous = if self.current <= 1 {
            self.count
        } else {
            self.current - 1
        };
        self.go_to(previous)
    }
}

/// 現在位置に合わせてマーカーを塗り直し、現在のマーカーを中央へスクロールする
///
/// 失敗したマーカー数を返す（切り離されたマーカーはホスト側の変更として無視する）。
pub fn present<T: ContentTree>(
    tree: &mut T,
    handles: &[MatchHandle],
    current: usize,
    colors: &HighlightColors,
) -> usize {
    let mut failures = 0;
    for (handle, style) in handles
        .iter()
        .zip(marker_styles(handles.len(), current, colors))
    {
        if let Err(err) = tree.set_marker_style(handle.marker, style) {
            log::debug!("could not restyle marker {}: {}", handle.marker, err);
            failures += 1;
        }
    }

    if let Some(handle) = current.checked_sub(1).and_then(|i| handles.get(i)) {
        if let Err(err) = tree.scroll_into_view(handle.marker, ScrollOptions::centered()) {
            log::debug!("could not scroll to marker {}: {}", handle.marker, err);
            failures += 1;
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_to_first() {
        let mut nav = Navigator::new(3);
        assert_eq!(nav.next(), Some(1));
        assert_eq!(nav.go_to(3), Some(3));
        assert_eq!(nav.next(), Some(1));
    }

    #[test]
    fn previous_wraps_to_last() {
        let mut nav = Navigator::new(4);
        nav.go_to(1);
        assert_eq!(nav.previous(), Some(4));
        assert_eq!(nav.previous(), Some(3));
    }

    #[test]
    fn previous_from_unset_goes_to_last() {
        let mut nav = Navigator::new(2);
        assert_eq!(nav.previous(), Some(2));
    }

    #[test]
    fn empty_navigator_never_moves() {
        let mut nav = Navigator::new(0);
        for _ in 0..5 {
            assert_eq!(nav.next(), None);
            assert_eq!(nav.previous(), None);
        }
        assert_eq!(nav.go_to(1), None);
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn out_of_range_go_to_is_ignored() {
        let mut nav = Navigator::new(2);
        nav.go_to(2);
        assert_eq!(nav.go_to(3), None);
        assert_eq!(nav.go_to(0), None);
        assert_eq!(nav.current(), 2);
    }

    #[test]
    fn exactly_one_marker_gets_current_style() {
        let colors = HighlightColors::default();
        let styles = marker_styles(4, 3, &colors);
        let current: Vec<usize> = styles
            .iter()
            .enumerate()
            .filter(|(_, style)| **style == &colors.current)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(current, vec![2]);

        let none = marker_styles(3, 0, &colors);
        assert!(none.iter().all(|style| *style == &colors.other));
    }
}
