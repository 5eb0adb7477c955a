//! 入力のデバウンス
//!
//! 保留スロットは常に1つだけ。新しい入力は保留中の値を捨ててタイマーを張り直す。
//! 期限切れを `poll` で確認したときだけ値が取り出される。

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// 単一スロットのデバウンスタイマー
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// 待ち時間
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 値を保留し、期限を `now + delay` に張り直す
    ///
    /// 既存の保留を上書きした場合は真を返す。
    pub fn trigger(&mut self, value: T, now: Instant) -> bool {
        let replaced = self.pending.is_some();
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
        replaced
    }

    /// 保留を取り消す
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    /// 保留中の値があるか
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// 保留中の値の期限
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// 期限を過ぎていれば値を取り出す
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.cancel(),
            _ => None,
        }
    }

    /// 期限を待たずに値を取り出す
    pub fn flush(&mut self) -> Option<T> {
        self.cancel()
    }
}
