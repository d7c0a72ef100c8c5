//! XML Composer Module
//!
//! ヘッダーフィールドストアと抽出済みデータセットから最終的なXML文書を
//! 合成するモジュール。quick-xmlのイベントライターで書き出します。
//!
//! 入力は既に検証済みであることを前提とし、ここでは再拒否しません
//! （検証はオーケストレーターの責務）。値のエスケープのみ行います。

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use crate::error::XlsxToXmlError;
use crate::header::HeaderField;
use crate::progress::ProgressReporter;
use crate::tag::{column_tag, escape_xml_text};
use crate::types::{CellValue, TabularDataset};

/// XML合成器
///
/// 出力は同一入力に対してバイト単位で再現可能です:
/// ヘッダーフィールドはストアの挿入順、行は元のシート順、
/// 行内の列は元の列順で出力されます。
pub(crate) struct XmlComposer;

impl XmlComposer {
    /// ヘッダーフィールドとデータセットをXML文書として書き出す
    ///
    /// # 出力構造
    ///
    /// 1. XML宣言 `<?xml version="1.0" encoding="UTF-8"?>`
    /// 2. ルート要素 `ROOT`
    /// 3. `HEADER` 要素（フィールドごとに `<タグ名>値</タグ名>`、
    ///    ストアが空なら `<HEADER></HEADER>`）
    /// 4. `DATA` 要素（行0を除く各行が `ROW` 要素。列タグはヘッダー行
    ///    から1回だけ導出し、全行で再利用する）
    /// 5. `DATA` と `ROOT` を閉じる
    ///
    /// インデントは行わず、コンパクトな出力を生成します。
    ///
    /// # 引数
    ///
    /// * `fields` - ヘッダーフィールド（挿入順）
    /// * `dataset` - 抽出済みデータセット（行0 = ヘッダー行）
    /// * `output` - 出力先のライター
    /// * `progress` - 行単位の進捗通知先
    pub fn compose<W: Write>(
        fields: &[HeaderField],
        dataset: &TabularDataset,
        output: W,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<(), XlsxToXmlError> {
        let mut writer = Writer::new(output);

        // 1. XML宣言
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        // 2. ルート要素
        writer.write_event(Event::Start(BytesStart::new("ROOT")))?;

        // 3. HEADERブロック（ストアの挿入順）
        writer.write_event(Event::Start(BytesStart::new("HEADER")))?;
        for field in fields {
            write_text_element(&mut writer, &field.tag_name, &field.tag_value)?;
        }
        writer.write_event(Event::End(BytesEnd::new("HEADER")))?;

        // 4. DATAブロック
        // 列タグはヘッダー行から1回だけ計算し、全行で同じマッピングを使う
        let column_tags = derive_column_tags(dataset);
        let data_rows = dataset.data_rows();
        let total = data_rows.len();

        writer.write_event(Event::Start(BytesStart::new("DATA")))?;
        for (row_idx, row) in data_rows.iter().enumerate() {
            writer.write_event(Event::Start(BytesStart::new("ROW")))?;
            for (col_idx, tag) in column_tags.iter().enumerate() {
                let text = row
                    .get(col_idx)
                    .map(CellValue::as_text)
                    .unwrap_or_default();
                write_text_element(&mut writer, tag, &text)?;
            }
            writer.write_event(Event::End(BytesEnd::new("ROW")))?;

            progress.report((((row_idx + 1) * 100) / total) as u8);
        }
        writer.write_event(Event::End(BytesEnd::new("DATA")))?;

        // 5. 閉じタグ
        writer.write_event(Event::End(BytesEnd::new("ROOT")))?;

        Ok(())
    }

    /// XML文書を文字列として合成する
    pub fn compose_to_string(
        fields: &[HeaderField],
        dataset: &TabularDataset,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<String, XlsxToXmlError> {
        let mut buffer = Vec::new();
        Self::compose(fields, dataset, &mut buffer, progress)?;

        String::from_utf8(buffer).map_err(|e| {
            XlsxToXmlError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}

/// ヘッダー行から列ごとのタグ名を導出する
///
/// 空のヘッダーセルは `COLUMN{n}`（1始まり）にフォールバックします。
/// サニタイズ結果が先行する列のタグと衝突した場合も同様に列番号で
/// 曖昧さを解消します。
fn derive_column_tags(dataset: &TabularDataset) -> Vec<String> {
    let header = dataset.header_row();
    let mut tags: Vec<String> = Vec::with_capacity(dataset.width());

    for col_idx in 0..dataset.width() {
        let cell_text = header
            .get(col_idx)
            .map(CellValue::as_text)
            .unwrap_or_default();
        let mut tag = column_tag(&cell_text, col_idx);
        if tags.contains(&tag) {
            tag = format!("COLUMN{}", col_idx + 1);
        }
        tags.push(tag);
    }

    tags
}

/// `<tag>エスケープ済みテキスト</tag>` を書き出す
///
/// エスケープは`escape_xml_text`で正確に1回だけ適用し、
/// `BytesText::from_escaped`でライター側の再エスケープを回避します。
fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: &str,
) -> Result<(), XlsxToXmlError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(escape_xml_text(value))))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
