//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    Text(String),

    /// 論理値
    Bool(bool),

    /// 日付・時刻（Excelシリアル値、1900年システム）
    DateTime(f64),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 値をXML出力用のテキスト表現に強制変換する
    ///
    /// # 変換規則
    ///
    /// - 数値: 自然な10進表記（`30.0` → `"30"`、`30.5` → `"30.5"`）
    /// - 文字列: そのまま
    /// - 論理値: `TRUE` / `FALSE`
    /// - 日付・時刻: ISO 8601（日付のみなら `%Y-%m-%d`、時刻付きなら
    ///   `%Y-%m-%dT%H:%M:%S`）
    /// - エラー値: エラー名
    /// - 空セル: 空文字列
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::DateTime(serial) => serial_to_iso8601(*serial),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

/// Excelシリアル日付値をISO 8601文字列に変換
///
/// 1900年システム（1899年12月30日起算）で変換します。エポックが
/// 12月31日ではなく30日なのは、Excelが1900年を閏年として扱う
/// 歴史的バグを吸収するためです。変換できないシリアル値は
/// 10進表記のままフォールバックします。
fn serial_to_iso8601(serial: f64) -> String {
    let epoch = match NaiveDate::from_ymd_opt(1899, 12, 30) {
        Some(d) => d,
        None => return serial.to_string(),
    };

    let mut days = serial.floor() as i64;
    let frac = serial - serial.floor();
    let mut secs = (frac * 86_400.0).round() as u32;

    // 端数の丸めで翌日に繰り上がるケース
    if secs >= 86_400 {
        days += 1;
        secs = 0;
    }

    let date = match epoch.checked_add_signed(Duration::days(days)) {
        Some(d) => d,
        None => return serial.to_string(),
    };

    if secs == 0 {
        return date.format("%Y-%m-%d").to_string();
    }

    match NaiveTime::from_num_seconds_from_midnight_opt(secs, 0) {
        Some(time) => NaiveDateTime::new(date, time)
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string(),
        None => serial.to_string(),
    }
}

/// 抽出された表形式データセット
///
/// 矩形の行列で、行0は慣例により列ヘッダー行です。アップロードされた
/// ファイルから読み取り専用で導出され、変換の完了またはセッションの
/// リセットで破棄されます。
#[derive(Debug, Clone)]
pub(crate) struct TabularDataset {
    /// 全行（行0 = ヘッダー行）。常に矩形（全行が同じ幅）
    rows: Vec<Vec<CellValue>>,

    /// 列数（全行で共通）
    width: usize,
}

impl TabularDataset {
    /// 行のリストからデータセットを構築する
    ///
    /// 幅は最長行に合わせ、短い行は末尾を`Empty`でパディングして
    /// 矩形を保証します（欠落セルは省略ではなく空文字列として扱う）。
    pub fn new(mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Self { rows, width }
    }

    /// ヘッダー行（行0）を取得
    pub fn header_row(&self) -> &[CellValue] {
        self.rows.first().map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// データ行（行1以降）を取得
    pub fn data_rows(&self) -> &[Vec<CellValue>] {
        if self.rows.len() > 1 {
            &self.rows[1..]
        } else {
            &[]
        }
    }

    /// 全行数（ヘッダー行を含む）
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 列数
    pub fn width(&self) -> usize {
        self.width
    }
}
