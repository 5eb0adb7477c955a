//! ロギングシステム
//!
//! `log` ファサードへ接続する開発者向けロガー
//! ライブラリ側は `log::debug!` などのマクロのみを使い、出力先はホストが選択する

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

use crate::error::{PageSearchError, Result};

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    /// `log` クレートのフィルタへ変換
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }

    fn from_record_level(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}

/// ロガー
///
/// * 既定では stderr へ出力
/// * ファイル出力を追加で指定可能（追記モード）
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    output_stderr: bool,
    output_file: Option<PathBuf>,
    file_lock: Mutex<()>,
}

impl Logger {
    /// デフォルト構築
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            output_stderr: true,
            output_file: None,
            file_lock: Mutex::new(()),
        }
    }

    /// 開発者向けロガー
    pub fn for_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    /// ログレベルを取得
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// ログレベルを変更
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// ファイル出力を設定
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// 標準エラー出力を無効化（stdoutへ切り替え）
    pub fn without_stderr(mut self) -> Self {
        self.output_stderr = false;
        self
    }

    /// グローバルロガーとして登録
    pub fn install(self) -> Result<()> {
        let filter = self.level.to_filter();
        log::set_boxed_logger(Box::new(self))
            .map_err(|err| PageSearchError::Io(format!("logger already installed: {}", err)))?;
        log::set_max_level(filter);
        Ok(())
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    fn format_line(level: LogLevel, target: &str, message: &str) -> String {
        format!("{} [{}]: {}", level.tag(), target, message)
    }

    fn write_line(&self, line: &str) {
        if self.output_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }

        if let Some(path) = &self.output_file {
            let _guard = self.file_lock.lock();
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", line);
            }
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.should_log(LogLevel::from_record_level(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = LogLevel::from_record_level(record.level());
        let line = Self::format_line(level, record.target(), &record.args().to_string());
        self.write_line(&line);
    }

    fn flush(&self) {}
}
