//! Builder Module
//!
//! Fluent Builder APIを提供し、`ConversionSession`インスタンスを
//! 段階的に構築する。

use crate::api::HeaderPolicy;
use crate::error::XlsxToXmlError;
use crate::session::ConversionSession;

/// 変換セッションの設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct SessionConfig {
    /// ヘッダーフィールド必須ポリシー
    pub header_policy: HeaderPolicy,

    /// 入力ファイルの最大サイズ（バイト）
    pub max_input_file_size: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            header_policy: HeaderPolicy::Optional,
            max_input_file_size: 2_147_483_648, // 2GB
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `ConversionSession`を段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみを
/// オーバーライドできます。セッションはプロセス全体のシングルトンでは
/// なく、要求ごとに新しく構築してください。
///
/// # 使用例
///
/// ```rust
/// use xlsx2xml::{HeaderPolicy, SessionBuilder};
///
/// # fn main() -> Result<(), xlsx2xml::XlsxToXmlError> {
/// let session = SessionBuilder::new()
///     .with_header_policy(HeaderPolicy::Required)
///     .with_max_input_file_size(64 * 1024 * 1024)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SessionBuilder {
    /// 内部設定（構築中）
    config: SessionConfig,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - ヘッダーポリシー: `Optional`（ヘッダーフィールドなしを許可）
    /// - 入力ファイルサイズ上限: 2GB
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
        }
    }

    /// ヘッダーフィールド必須ポリシーを指定する
    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.config.header_policy = policy;
        self
    }

    /// 入力ファイルの最大サイズ（バイト）を指定する
    ///
    /// 上限を超えるファイルは解析前に
    /// `XlsxToXmlError::SecurityViolation`で拒否されます。
    pub fn with_max_input_file_size(mut self, bytes: u64) -> Self {
        self.config.max_input_file_size = bytes;
        self
    }

    /// 設定を検証し、`ConversionSession`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(ConversionSession)` - 設定が有効な場合
    /// * `Err(XlsxToXmlError::Config)` - 設定が無効な場合
    pub fn build(self) -> Result<ConversionSession, XlsxToXmlError> {
        // 入力サイズ上限の検証
        if self.config.max_input_file_size == 0 {
            return Err(XlsxToXmlError::Config(
                "max_input_file_size must be positive".to_string(),
            ));
        }

        Ok(ConversionSession::new(self.config))
    }
}
