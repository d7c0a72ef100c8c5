//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use serde::{Deserialize, Serialize};

/// 変換セッションのライフサイクル状態
///
/// 遷移は次のとおりです:
///
/// ```text
/// Idle → Validating → Converting → Completed
///              ↓            ↓
///            Error ←────────┘
/// ```
///
/// `Completed`/`Error`からの遷移は明示的な`reset()`による`Idle`への
/// 復帰のみです。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionState {
    /// 初期状態。ヘッダーフィールドとファイルの編集を受け付ける
    Idle,

    /// 変換開始要求を受け、前提条件を検査中
    Validating,

    /// 抽出と合成を実行中
    Converting,

    /// 変換成功。生成されたXMLを保持する
    Completed,

    /// 変換失敗。リセットまで終端
    Error,
}

/// ヘッダーフィールド必須ポリシー
///
/// 変換開始時にヘッダーフィールドストアが空であることを許すかどうかを
/// 指定します。周辺プロダクトの要件に応じて選択してください。
///
/// # 使用例
///
/// ```rust
/// use xlsx2xml::{HeaderPolicy, SessionBuilder};
///
/// # fn main() -> Result<(), xlsx2xml::XlsxToXmlError> {
/// let session = SessionBuilder::new()
///     .with_header_policy(HeaderPolicy::Required)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum HeaderPolicy {
    /// ヘッダーフィールドなしでも変換を許可する（デフォルト）
    #[default]
    Optional,

    /// 変換開始前に少なくとも1つのヘッダーフィールドを要求する
    Required,
}
