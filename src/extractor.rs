//! Tabular Extractor Module
//!
//! calamineを使用して、アップロードされたスプレッドシートの先頭シートを
//! 矩形のデータセットに読み込むモジュール。先頭シート以外は読みません。

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use tracing::debug;

use crate::error::XlsxToXmlError;
use crate::types::{CellValue, TabularDataset};

/// ファイルのバイト列から先頭シートを抽出する
///
/// # 引数
///
/// * `file_bytes` - アップロードされたスプレッドシートのバイト列
/// * `max_input_file_size` - 入力サイズの上限（バイト）
///
/// # 戻り値
///
/// * `Ok(TabularDataset)` - 行0をヘッダー行とする矩形データセット
/// * `Err(XlsxToXmlError::SecurityViolation)` - サイズ制限を超過した場合
/// * `Err(XlsxToXmlError::UnsupportedFormat)` - スプレッドシート
///   コンテナとして認識できない場合
/// * `Err(XlsxToXmlError::EmptySheet)` - ワークブックにシートがない、
///   または先頭シートに行がない場合
pub(crate) fn extract(
    file_bytes: &[u8],
    max_input_file_size: u64,
) -> Result<TabularDataset, XlsxToXmlError> {
    // 1. セキュリティチェック: 入力ファイルサイズの上限
    if file_bytes.len() as u64 > max_input_file_size {
        return Err(XlsxToXmlError::SecurityViolation(format!(
            "Input file size exceeds maximum: {} bytes (max: {} bytes)",
            file_bytes.len(),
            max_input_file_size
        )));
    }

    // 2. コンテナの認識（XLSX/XLS/XLSB/ODSの自動判別）
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(file_bytes))
        .map_err(|e| XlsxToXmlError::UnsupportedFormat(e.to_string()))?;

    // 3. ワークブック順で先頭のシートを選択
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(XlsxToXmlError::EmptySheet)?;

    let range = workbook.worksheet_range(&sheet_name)?;

    if range.is_empty() {
        return Err(XlsxToXmlError::EmptySheet);
    }

    // 4. セルデータの抽出（位置ベース、使用範囲の幅で矩形化）
    let mut rows = Vec::with_capacity(range.height());
    for row in range.rows() {
        rows.push(row.iter().map(convert_cell).collect());
    }

    let dataset = TabularDataset::new(rows);
    debug!(
        sheet = %sheet_name,
        rows = dataset.row_count(),
        cols = dataset.width(),
        "extracted first sheet"
    );

    Ok(dataset)
}

/// calamineのセルデータを内部表現に変換
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::Empty => CellValue::Empty,
        _ => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cell_values() {
        assert_eq!(convert_cell(&Data::Int(42)), CellValue::Number(42.0));
        assert_eq!(convert_cell(&Data::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(
            convert_cell(&Data::String("x".to_string())),
            CellValue::Text("x".to_string())
        );
        assert_eq!(convert_cell(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_extract_rejects_unrecognized_bytes() {
        let result = extract(b"this is not a spreadsheet", u64::MAX);
        assert!(matches!(
            result,
            Err(XlsxToXmlError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_extract_rejects_oversize_input() {
        let result = extract(&[0u8; 64], 16);
        assert!(matches!(
            result,
            Err(XlsxToXmlError::SecurityViolation(_))
        ));
    }

    // 実際のXLSXバイト列を使用するテストは統合テスト（tests/）で実装します。
}
