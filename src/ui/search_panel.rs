//! 検索パネル描画
//!
//! 入力欄、「M of N matches」などのステータス、操作ヒントの3行を描画する

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::search::{SearchStatus, SearchUiState};

/// 入力欄が空のときのプレースホルダー
pub const PLACEHOLDER: &str = "Find in page...";
/// 操作ヒント
pub const HINT: &str = "Press Enter for next, Shift+Enter for previous";

const PROMPT: &str = "> ";

/// 検索パネル描画器
#[derive(Debug, Clone)]
pub struct SearchPanelRenderer {
    /// 境界線を表示するか
    show_border: bool,
}

impl SearchPanelRenderer {
    /// 新しい描画器を作成
    pub fn new() -> Self {
        Self { show_border: true }
    }

    /// 境界線表示を設定
    pub fn with_border(mut self, show: bool) -> Self {
        self.show_border = show;
        self
    }

    /// パネルを描画
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, ui: &SearchUiState) {
        let inner_width = if self.show_border {
            area.width.saturating_sub(2)
        } else {
            area.width
        };

        let mut paragraph = Paragraph::new(self.create_content(ui, inner_width as usize));
        if self.show_border {
            paragraph = paragraph.block(Block::default().borders(Borders::ALL));
        }
        frame.render_widget(paragraph, area);
    }

    /// 表示内容を作成
    pub fn create_content(&self, ui: &SearchUiState, width: usize) -> Vec<Line<'static>> {
        let input = if ui.query.is_empty() {
            Line::from(vec![
                Span::raw(PROMPT),
                Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
            ])
        } else {
            let available = width.saturating_sub(PROMPT.len());
            Line::from(vec![
                Span::raw(PROMPT),
                Span::raw(tail_fitting(&ui.query, available)),
            ])
        };

        vec![
            input,
            Line::from(Span::styled(ui.message(), self.status_style(ui.status))),
            Line::from(Span::styled(HINT, self.hint_style(ui))),
        ]
    }

    /// 移動できるマッチが無いときはヒントを淡く表示する
    fn hint_style(&self, ui: &SearchUiState) -> Style {
        if ui.can_navigate() {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    /// ステータスに応じたスタイルを取得
    fn status_style(&self, status: SearchStatus) -> Style {
        match status {
            SearchStatus::Matches => Style::default().fg(Color::Green),
            SearchStatus::NoMatches => Style::default().fg(Color::Red),
            SearchStatus::Idle => Style::default().fg(Color::Gray),
        }
    }
}

impl Default for SearchPanelRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// 表示幅に収まるよう末尾側を残して切り詰める（入力中の位置を見せるため）
fn tail_fitting(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut kept: Vec<char> = Vec::new();
    for ch in text.chars().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        kept.push(ch);
    }
    kept.into_iter().rev().collect()
}
