//! Tag Sanitizer/Validator Module
//!
//! XML要素名の検証・サニタイズとテキストエスケープを提供するモジュール。
//! すべて純粋関数として実装され、状態を持ちません。

use crate::error::XlsxToXmlError;

/// サニタイズ結果が空になった場合の固定フォールバックトークン
const FALLBACK_TAG: &str = "EMPTY_TAG";

/// タグ名がXML要素名として受理可能かを検証
///
/// 受理される文法は `[A-Za-z_][A-Za-z0-9_.\-]*` です。これはXML名前仕様の
/// 意図的に制限されたサブセットで、コロン（名前空間）とUnicode名前開始
/// 文字を除外しています。
///
/// # 引数
///
/// * `name` - 検証するタグ名（先頭・末尾の空白はトリムして判定）
///
/// # 戻り値
///
/// * `Ok(())` - 受理された場合
/// * `Err(XlsxToXmlError::EmptyName)` - トリム後に空の場合
/// * `Err(XlsxToXmlError::InvalidFormat)` - 文法に一致しない場合
///
/// # 使用例
///
/// ```rust
/// use xlsx2xml::{validate_tag_name, XlsxToXmlError};
///
/// assert!(validate_tag_name("CALLREPORT_ID").is_ok());
/// assert!(matches!(
///     validate_tag_name("1bad"),
///     Err(XlsxToXmlError::InvalidFormat { .. })
/// ));
/// ```
pub fn validate_tag_name(name: &str) -> Result<(), XlsxToXmlError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(XlsxToXmlError::EmptyName);
    }

    let mut chars = trimmed.chars();

    // 1. 先頭文字: 英字または '_'
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => {
            return Err(XlsxToXmlError::InvalidFormat {
                name: trimmed.to_string(),
            })
        }
    }

    // 2. 残りの文字: 英数字、'_'、'.'、'-'
    for c in chars {
        if !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')) {
            return Err(XlsxToXmlError::InvalidFormat {
                name: trimmed.to_string(),
            });
        }
    }

    Ok(())
}

/// 任意のテキストを受理可能なタグ名に強制変換する
///
/// 全域関数であり、どんな入力に対しても必ず文法に一致する非空の文字列を
/// 返します。ユーザーが宣言したタグ名には使用せず、スプレッドシートの
/// 列ヘッダー由来のタグ名にのみ使用します。
///
/// # アルゴリズム
///
/// 1. 空白の連続を単一の `_` に置換
/// 2. `[A-Za-z0-9_.\-]` 以外の文字を除去
/// 3. 何も残らなければ `EMPTY_TAG` を返す
/// 4. 先頭が英字でも `_` でもなければ `_` を前置
///
/// # 使用例
///
/// ```rust
/// use xlsx2xml::sanitize_tag_name;
///
/// assert_eq!(sanitize_tag_name("First Name"), "First_Name");
/// assert_eq!(sanitize_tag_name("2024年度"), "_2024");
/// assert_eq!(sanitize_tag_name("@#$%"), "EMPTY_TAG");
/// ```
pub fn sanitize_tag_name(raw: &str) -> String {
    // 1. 空白の連続を単一の '_' に置換
    let mut collapsed = String::with_capacity(raw.len());
    let mut in_whitespace = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                collapsed.push('_');
            }
            in_whitespace = true;
        } else {
            collapsed.push(c);
            in_whitespace = false;
        }
    }

    // 2. 受理文字クラス外の文字を除去
    let stripped: String = collapsed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    // 3. 何も残らなければ固定フォールバック
    // 4. 先頭が英字・'_' 以外なら '_' を前置
    match stripped.chars().next() {
        None => FALLBACK_TAG.to_string(),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => stripped,
        Some(_) => format!("_{}", stripped),
    }
}

/// 列ヘッダーセルから列タグ名を導出する
///
/// ヘッダーセルが空（トリム後）の場合は `COLUMN{n}`（nは1始まりの
/// 列番号）にフォールバックします。
///
/// # 引数
///
/// * `header_cell` - ヘッダー行のセル値（テキスト形式）
/// * `col_idx` - 列インデックス（0始まり）
pub(crate) fn column_tag(header_cell: &str, col_idx: usize) -> String {
    if header_cell.trim().is_empty() {
        format!("COLUMN{}", col_idx + 1)
    } else {
        sanitize_tag_name(header_cell)
    }
}

/// XMLテキスト内容の特殊文字をエスケープする
///
/// `&` `<` `>` `"` `'` の5文字をXML 1.0の定義済み実体参照に置換します。
/// 二重エスケープを避けるため、各値に対して正確に1回だけ適用して
/// ください。合成器はこの関数を唯一のエスケープ経路として使用します。
///
/// # 使用例
///
/// ```rust
/// use xlsx2xml::escape_xml_text;
///
/// assert_eq!(escape_xml_text("A & B <Ltd>"), "A &amp; B &lt;Ltd&gt;");
/// ```
pub fn escape_xml_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
