//! キーバインドシステム
//!
//! 検索パネル用のキー操作（Esc / Enter / Shift+Enter / Ctrl+G / Cmd+G）を管理

use crossterm::event::{
    KeyCode as CrosstermKeyCode, KeyEvent, KeyEventKind, KeyModifiers as CrosstermModifiers,
};
use std::collections::HashMap;

/// キー入力の内部表現
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    /// 修飾キー
    pub modifiers: KeyModifiers,
    /// 基本キー
    pub code: KeyCode,
}

/// 修飾キーの組み合わせ
///
/// `command` はプラットフォーム修飾キー（macOS の Cmd、Super、Meta）をまとめたもの。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub command: bool,
}

/// 基本キーコード
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Unknown,
}

impl Key {
    pub fn plain(code: KeyCode) -> Self {
        Self {
            modifiers: KeyModifiers::default(),
            code,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            modifiers: KeyModifiers {
                shift: true,
                ..KeyModifiers::default()
            },
            code,
        }
    }

    pub fn ctrl(code: KeyCode, shift: bool) -> Self {
        Self {
            modifiers: KeyModifiers {
                ctrl: true,
                shift,
                ..KeyModifiers::default()
            },
            code,
        }
    }

    pub fn command(code: KeyCode, shift: bool) -> Self {
        Self {
            modifiers: KeyModifiers {
                command: true,
                shift,
                ..KeyModifiers::default()
            },
            code,
        }
    }
}

/// crossterm統合
impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        let mut modifiers = KeyModifiers {
            ctrl: event.modifiers.contains(CrosstermModifiers::CONTROL),
            alt: event.modifiers.contains(CrosstermModifiers::ALT),
            shift: event.modifiers.contains(CrosstermModifiers::SHIFT),
            command: event.modifiers.contains(CrosstermModifiers::SUPER)
                || event.modifiers.contains(CrosstermModifiers::META),
        };

        let code = match event.code {
            // Shift付きの大文字は小文字 + shift に正規化する
            CrosstermKeyCode::Char(c) if c.is_uppercase() => {
                modifiers.shift = true;
                KeyCode::Char(c.to_lowercase().next().unwrap_or(c))
            }
            CrosstermKeyCode::Char(c) => KeyCode::Char(c),
            CrosstermKeyCode::Enter => KeyCode::Enter,
            CrosstermKeyCode::Esc => KeyCode::Esc,
            _ => KeyCode::Unknown,
        };

        Key { modifiers, code }
    }
}

/// 検索パネルへのコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCommand {
    /// パネルを閉じる
    Close,
    /// 次のマッチ
    Next,
    /// 前のマッチ
    Previous,
}

/// キー処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// 検索パネルは反応しない
    Ignored,
    /// コマンドを実行した
    Handled {
        command: SearchCommand,
        /// ホスト既定の動作（ブラウザの検索バーなど）を抑止すべきか
        prevent_default: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    command: SearchCommand,
    prevent_default: bool,
}

/// 検索パネル用キーマップ
#[derive(Debug, Clone)]
pub struct SearchKeyMap {
    bindings: HashMap<Key, Binding>,
}

impl SearchKeyMap {
    /// 既定のキーマップを作成
    pub fn new() -> Self {
        let mut bindings = HashMap::with_capacity(8);
        Self::register_default_bindings(&mut bindings);
        Self { bindings }
    }

    fn register_default_bindings(bindings: &mut HashMap<Key, Binding>) {
        let plain = |command| Binding {
            command,
            prevent_default: false,
        };
        let captured = |command| Binding {
            command,
            prevent_default: true,
        };

        bindings.insert(Key::plain(KeyCode::Esc), plain(SearchCommand::Close));
        bindings.insert(Key::plain(KeyCode::Enter), plain(SearchCommand::Next));
        bindings.insert(Key::shift(KeyCode::Enter), plain(SearchCommand::Previous));

        let g = KeyCode::Char('g');
        bindings.insert(Key::ctrl(g.clone(), false), captured(SearchCommand::Next));
        bindings.insert(Key::ctrl(g.clone(), true), captured(SearchCommand::Previous));
        bindings.insert(Key::command(g.clone(), false), captured(SearchCommand::Next));
        bindings.insert(Key::command(g, true), captured(SearchCommand::Previous));
    }

    /// キーに対応するコマンドを探す
    pub fn lookup(&self, key: &Key) -> KeyOutcome {
        match self.bindings.get(key) {
            Some(binding) => KeyOutcome::Handled {
                command: binding.command,
                prevent_default: binding.prevent_default,
            },
            None => KeyOutcome::Ignored,
        }
    }

    /// crosstermのイベントを処理（キーリリースは無視）
    pub fn process_event(&self, event: KeyEvent) -> KeyOutcome {
        if event.kind == KeyEventKind::Release {
            return KeyOutcome::Ignored;
        }
        self.lookup(&Key::from(event))
    }
}

impl Default for SearchKeyMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: CrosstermKeyCode, modifiers: CrosstermModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn command_of(outcome: KeyOutcome) -> Option<SearchCommand> {
        match outcome {
            KeyOutcome::Handled { command, .. } => Some(command),
            KeyOutcome::Ignored => None,
        }
    }

    #[test]
    fn escape_and_enter_bindings() {
        let keymap = SearchKeyMap::new();
        assert_eq!(
            command_of(keymap.process_event(press(CrosstermKeyCode::Esc, CrosstermModifiers::NONE))),
            Some(SearchCommand::Close)
        );
        assert_eq!(
            command_of(keymap.process_event(press(CrosstermKeyCode::Enter, CrosstermModifiers::NONE))),
            Some(SearchCommand::Next)
        );
        assert_eq!(
            command_of(keymap.process_event(press(CrosstermKeyCode::Enter, CrosstermModifiers::SHIFT))),
            Some(SearchCommand::Previous)
        );
    }

    #[test]
    fn ctrl_g_prevents_default() {
        let keymap = SearchKeyMap::new();
        let outcome = keymap.process_event(press(
            CrosstermKeyCode::Char('g'),
            CrosstermModifiers::CONTROL,
        ));
        assert_eq!(
            outcome,
            KeyOutcome::Handled {
                command: SearchCommand::Next,
                prevent_default: true
            }
        );
    }

    #[test]
    fn uppercase_g_counts_as_shift() {
        let keymap = SearchKeyMap::new();
        let outcome = keymap.process_event(press(
            CrosstermKeyCode::Char('G'),
            CrosstermModifiers::SUPER | CrosstermModifiers::SHIFT,
        ));
        assert_eq!(command_of(outcome), Some(SearchCommand::Previous));

        let outcome = keymap.process_event(press(
            CrosstermKeyCode::Char('G'),
            CrosstermModifiers::CONTROL,
        ));
        assert_eq!(command_of(outcome), Some(SearchCommand::Previous));
    }

    #[test]
    fn plain_letters_and_releases_are_ignored() {
        let keymap = SearchKeyMap::new();
        assert_eq!(
            keymap.process_event(press(CrosstermKeyCode::Char('g'), CrosstermModifiers::NONE)),
            KeyOutcome::Ignored
        );

        let release = KeyEvent {
            code: CrosstermKeyCode::Esc,
            modifiers: CrosstermModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(keymap.process_event(release), KeyOutcome::Ignored);
    }
}
