//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsx2xmlクレート全体で使用するエラー型
///
/// ヘッダーフィールドの検証、Excelファイルの抽出、XML合成、
/// 変換セッションのライフサイクル中に発生するすべてのエラーを
/// 統一的に扱うために使用されます。
///
/// # エラーの分類
///
/// - タグ名検証: `EmptyName`, `InvalidFormat`
/// - ヘッダーストア: `DuplicateTagName`
/// - 変換前再検証: `DuplicateHeaderFields`, `MissingFile`,
///   `MissingHeaderFields`, `IncompleteHeaderField`
/// - 抽出: `UnsupportedFormat`, `EmptySheet`, `SecurityViolation`
/// - 周辺: `Io`, `Parse`, `Config`
///
/// どのエラーもプロセスにとって致命的ではありません。検証エラーは
/// 呼び出し側に構造化された拒否として返され、セッションは入力を
/// 修正して再試行できる状態を維持します。
///
/// # 使用例
///
/// ```rust
/// use xlsx2xml::XlsxToXmlError;
///
/// let error = XlsxToXmlError::DuplicateTagName {
///     name: "INST_NAME".to_string(),
/// };
/// assert!(error.to_string().contains("INST_NAME"));
/// ```
#[derive(Error, Debug)]
pub enum XlsxToXmlError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// XMLイベントの書き出し中に発生したエラー（quick-xml由来）
    #[error("Failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// タグ名が空（トリム後）
    #[error("Tag name must not be empty")]
    EmptyName,

    /// タグ名がXML要素名の文法に一致しない
    ///
    /// 受理される文法は `[A-Za-z_][A-Za-z0-9_.\-]*` です。
    /// 名前空間の曖昧さを避けるため、コロンとUnicode名前開始文字は
    /// 意図的に除外しています。
    #[error("Invalid tag name '{name}': must start with a letter or underscore and contain only letters, digits, '_', '.', '-'")]
    InvalidFormat {
        /// 拒否されたタグ名
        name: String,
    },

    /// 同名のヘッダーフィールドが既にストアに存在する
    #[error("Duplicate tag name '{name}': header field names must be unique")]
    DuplicateTagName {
        /// 重複したタグ名
        name: String,
    },

    /// 変換前の再検証で重複タグ名が検出された
    ///
    /// ストアが追加時に一意性を保証していても、周辺UIが未確定の
    /// 編集を保持している可能性があるため、変換開始時に全体を
    /// 再チェックします。
    #[error("Duplicate header field names: {}", .names.join(", "))]
    DuplicateHeaderFields {
        /// 重複しているタグ名のリスト
        names: Vec<String>,
    },

    /// ファイルが未供給のまま変換が要求された
    #[error("No file supplied: upload a spreadsheet before converting")]
    MissingFile,

    /// ヘッダーフィールド必須ポリシー下でストアが空
    #[error("At least one header field is required before conversion")]
    MissingHeaderFields,

    /// 未コミットのヘッダーフィールド入力が残っている
    #[error("Incomplete header field: commit or discard the pending (name, value) input before converting")]
    IncompleteHeaderField,

    /// バイト列がスプレッドシートコンテナとして認識できない
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// 先頭シートに行が存在しない
    #[error("The first sheet contains no rows")]
    EmptySheet,

    /// 終端状態（Completed/Error）のセッションに対する変換要求
    ///
    /// 終端状態からの遷移は明示的なリセットのみです。
    #[error("Session is in a terminal state: call reset() before starting a new conversion")]
    TerminalState,

    /// 設定の検証に失敗したエラー
    ///
    /// `SessionBuilder::build()`時に設定を検証し、無効な設定が
    /// 検出された場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力ファイルサイズ制限などに違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    // Ioエラーのテスト
    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: XlsxToXmlError = io_err.into();

        match error {
            XlsxToXmlError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse_err = calamine::Error::Msg("Invalid file format");
        let error: XlsxToXmlError = parse_err.into();

        match error {
            XlsxToXmlError::Parse(_) => {}
            _ => panic!("Expected Parse error"),
        }
    }

    // エラー変換のテスト（?演算子の動作確認）
    #[test]
    fn test_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), XlsxToXmlError> {
            let _file = std::fs::File::open("nonexistent_file.xlsx")?;
            Ok(())
        }

        match io_operation() {
            Err(XlsxToXmlError::Io(_)) => {}
            _ => panic!("Expected Io error from ? operator"),
        }
    }

    // エラーメッセージのフォーマット確認
    #[test]
    fn test_validation_error_formats() {
        assert!(XlsxToXmlError::EmptyName
            .to_string()
            .contains("must not be empty"));

        let invalid = XlsxToXmlError::InvalidFormat {
            name: "1bad".to_string(),
        };
        assert!(invalid.to_string().contains("'1bad'"));

        let duplicate = XlsxToXmlError::DuplicateTagName {
            name: "INST_NAME".to_string(),
        };
        assert!(duplicate.to_string().contains("'INST_NAME'"));
    }

    #[test]
    fn test_duplicate_header_fields_lists_offenders() {
        let error = XlsxToXmlError::DuplicateHeaderFields {
            names: vec!["CALLREPORT_ID".to_string(), "INST_NAME".to_string()],
        };

        let message = error.to_string();
        assert!(message.contains("CALLREPORT_ID, INST_NAME"));
    }

    #[test]
    fn test_lifecycle_error_formats() {
        assert!(XlsxToXmlError::MissingFile.to_string().contains("No file"));
        assert!(XlsxToXmlError::MissingHeaderFields
            .to_string()
            .contains("At least one header field"));
        assert!(XlsxToXmlError::IncompleteHeaderField
            .to_string()
            .contains("Incomplete header field"));
        assert!(XlsxToXmlError::EmptySheet.to_string().contains("no rows"));

        let unsupported = XlsxToXmlError::UnsupportedFormat("not a zip".to_string());
        assert!(unsupported.to_string().starts_with("Unsupported file format"));

        let config = XlsxToXmlError::Config("max_input_file_size must be positive".to_string());
        assert!(config.to_string().starts_with("Configuration error"));

        let security = XlsxToXmlError::SecurityViolation("too large".to_string());
        assert!(security.to_string().starts_with("Security violation"));
    }
}
