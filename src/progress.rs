//! Progress Reporting Module
//!
//! 変換の進捗を単一の観測者に通知するための型を定義するモジュール。
//! タイマー駆動の見かけ上の進捗ではなく、実際の処理に連動した
//! シグナルを送出します。

/// 進捗観測者
///
/// `[0, 100]` の整数パーセンテージを受け取るコールバックです。
/// 1回の変換試行の中で値は単調非減少であり、変換ロジックの完了時に
/// ちょうど1回だけ100が観測されます。
pub type ProgressObserver = Box<dyn FnMut(u8) + Send>;

/// 単調進捗レポーター
///
/// 観測者への通知を一元化し、次を保証します:
///
/// - 100を超える値は100にクランプされる
/// - 直前に通知した値以下の値は破棄される（単調性・重複排除）
/// - `finish()`で終端の100が必ず1回送出される
///
/// 観測者が未設定の場合、通知はすべて無視されます（ベストエフォート）。
pub(crate) struct ProgressReporter<'a> {
    /// 通知先（未設定可）
    observer: Option<&'a mut ProgressObserver>,

    /// 最後に通知した値
    last: Option<u8>,
}

impl<'a> ProgressReporter<'a> {
    /// 新しいレポーターを生成
    pub fn new(observer: Option<&'a mut ProgressObserver>) -> Self {
        Self {
            observer,
            last: None,
        }
    }

    /// パーセンテージを報告する
    ///
    /// クランプ・単調化・重複排除を通過した値のみが観測者に届きます。
    pub fn report(&mut self, percent: u8) {
        let percent = percent.min(100);

        if let Some(last) = self.last {
            if percent <= last {
                return;
            }
        }

        self.last = Some(percent);
        if let Some(observer) = self.observer.as_mut() {
            (observer)(percent);
        }
    }

    /// 終端シグナル（100）を保証する
    ///
    /// 既に100を通知済みであれば何もしません。
    pub fn finish(&mut self) {
        self.report(100);
    }
}
