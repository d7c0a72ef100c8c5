//! Conversion Session Module
//!
//! 変換のライフサイクルを司るステートマシンを定義するモジュール。
//! 検証、抽出、合成、進捗通知、成功/失敗の報告を調停します。
//!
//! セッションはヘッダーフィールドストア・アップロード済みファイル・
//! 未コミットの編集入力を排他的に所有します。すべての操作は`&mut self`を
//! 取るため、並行変更は型システムによって直列化されます。

use tracing::{debug, info, warn};

use crate::api::{ConversionState, HeaderPolicy};
use crate::builder::SessionConfig;
use crate::composer::XmlComposer;
use crate::error::XlsxToXmlError;
use crate::extractor;
use crate::header::{find_duplicate_names, FieldId, HeaderField, HeaderFieldStore};
use crate::progress::{ProgressObserver, ProgressReporter};

/// 変換開始時に固定されるスナップショット
///
/// ファイルバイトはセッションから要求へ移動し、変換試行の終了とともに
/// 解放されます。1つの要求に対してちょうど1つの結果が生成されます。
struct ConversionRequest {
    /// 開始時点のヘッダーフィールド（挿入順のクローン）
    fields: Vec<HeaderField>,

    /// アップロードされたファイルのバイト列
    file_bytes: Vec<u8>,
}

/// 変換セッション
///
/// 状態 `{Idle, Validating, Converting, Completed, Error}` を持つ
/// ステートマシンです。初期状態は`Idle`。`Completed`/`Error`からの
/// 遷移は`reset()`による`Idle`への復帰のみです。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsx2xml::SessionBuilder;
///
/// # fn main() -> Result<(), xlsx2xml::XlsxToXmlError> {
/// let mut session = SessionBuilder::new().build()?;
/// session.add_header_field("CALLREPORT_ID", "DTR001")?;
/// session.supply_file(std::fs::read("report.xlsx")?);
/// let xml = session.start_conversion()?;
/// println!("{}", xml);
/// # Ok(())
/// # }
/// ```
pub struct ConversionSession {
    /// セッション設定
    config: SessionConfig,

    /// 現在の状態
    state: ConversionState,

    /// ヘッダーフィールドストア
    store: HeaderFieldStore,

    /// アップロードされたファイルのバイト列（未供給ならNone）
    file: Option<Vec<u8>>,

    /// 未コミットの (タグ名, タグ値) 入力
    draft: Option<(String, String)>,

    /// 進捗観測者（単一、ベストエフォート）
    observer: Option<ProgressObserver>,

    /// 直近の変換で生成されたXML
    xml: Option<String>,

    /// 直近の失敗理由（表示用メッセージ）
    error_message: Option<String>,
}

impl ConversionSession {
    /// 新しいセッションを生成（`SessionBuilder::build`から呼ばれる）
    pub(crate) fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: ConversionState::Idle,
            store: HeaderFieldStore::new(),
            file: None,
            draft: None,
            observer: None,
            xml: None,
            error_message: None,
        }
    }

    /// 現在の状態を取得
    pub fn state(&self) -> ConversionState {
        self.state
    }

    /// 検証済みヘッダーフィールドを追加する
    ///
    /// ストアレベルの検証エラー（`EmptyName`/`InvalidFormat`/
    /// `DuplicateTagName`）は構造化された拒否として返され、セッションの
    /// 状態は変化しません。入力を修正して再試行できます。
    pub fn add_header_field(
        &mut self,
        tag_name: &str,
        tag_value: &str,
    ) -> Result<FieldId, XlsxToXmlError> {
        let id = self.store.add(tag_name, tag_value)?;
        debug!(tag_name, "header field added");
        Ok(id)
    }

    /// 識別子で指定されたヘッダーフィールドを削除する
    ///
    /// 存在しない識別子は何もしません。
    pub fn remove_header_field(&mut self, id: FieldId) {
        self.store.remove(id);
    }

    /// ヘッダーフィールドの読み取り専用ビュー（挿入順）
    pub fn header_fields(&self) -> &[HeaderField] {
        self.store.fields()
    }

    /// 未コミットの (タグ名, タグ値) 入力を保持する
    ///
    /// 周辺UIの入力欄に相当します。ステージされたままの入力は
    /// 変換開始時に`IncompleteHeaderField`として拒否されます。
    pub fn stage_draft(&mut self, tag_name: &str, tag_value: &str) {
        self.draft = Some((tag_name.to_string(), tag_value.to_string()));
    }

    /// ステージ済みの入力を検証してストアに追加する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Some(FieldId))` - 追加に成功した場合
    /// * `Ok(None)` - ステージ済み入力がなかった場合
    /// * `Err(_)` - 検証に失敗した場合（入力はステージされたまま残る）
    pub fn commit_draft(&mut self) -> Result<Option<FieldId>, XlsxToXmlError> {
        let Some((name, value)) = self.draft.clone() else {
            return Ok(None);
        };

        let id = self.store.add(&name, &value)?;
        self.draft = None;
        Ok(Some(id))
    }

    /// ステージ済みの入力を破棄する
    pub fn discard_draft(&mut self) {
        self.draft = None;
    }

    /// 変換対象のファイルバイト列を供給する
    pub fn supply_file(&mut self, bytes: Vec<u8>) {
        debug!(size = bytes.len(), "file supplied");
        self.file = Some(bytes);
    }

    /// ファイルが供給済みかどうか
    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// 進捗観測者を設定する（既存の観測者は置き換えられる）
    pub fn set_progress_observer(&mut self, observer: ProgressObserver) {
        self.observer = Some(observer);
    }

    /// 直近の変換で生成されたXMLを取得
    pub fn xml(&self) -> Option<&str> {
        self.xml.as_deref()
    }

    /// 直近の失敗理由（表示用メッセージ）を取得
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// 変換を開始する
    ///
    /// # 処理フロー
    ///
    /// 1. `Idle → Validating`: 前提条件を順に検査（最初の失敗理由を報告）
    ///    - ファイル未供給 → `MissingFile`
    ///    - 必須ポリシー下でストアが空 → `MissingHeaderFields`
    ///    - 未コミット入力あり → `IncompleteHeaderField`
    ///    - タグ名の重複 → `DuplicateHeaderFields`
    /// 2. `Validating → Converting`: スナップショットを固定し、直ちに
    ///    0%を送出
    /// 3. 抽出 → 合成。進捗は行単位で単調に増加し、完了時にちょうど
    ///    1回100に達する
    /// 4. `Converting → Completed` または `Converting → Error`
    ///
    /// # 戻り値
    ///
    /// * `Ok(&str)` - 生成されたXML（セッションにも保持される）
    /// * `Err(XlsxToXmlError)` - 失敗理由。状態は`Error`になり、
    ///   `reset()`まで終端
    pub fn start_conversion(&mut self) -> Result<&str, XlsxToXmlError> {
        // 終端状態からの遷移は明示的なリセットのみ
        if matches!(
            self.state,
            ConversionState::Completed | ConversionState::Error
        ) {
            return Err(XlsxToXmlError::TerminalState);
        }

        self.state = ConversionState::Validating;

        match self.run_conversion() {
            Ok(xml) => {
                info!(bytes = xml.len(), "conversion completed");
                self.state = ConversionState::Completed;
                self.error_message = None;
                self.xml = Some(xml);
                Ok(self.xml.as_deref().unwrap_or_default())
            }
            Err(e) => {
                warn!(error = %e, "conversion failed");
                self.state = ConversionState::Error;
                self.error_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// 検証から合成までの本体（状態の確定は`start_conversion`が行う）
    fn run_conversion(&mut self) -> Result<String, XlsxToXmlError> {
        // 1. 前提条件の検査
        if self.file.is_none() {
            return Err(XlsxToXmlError::MissingFile);
        }

        if self.config.header_policy == HeaderPolicy::Required && self.store.is_empty() {
            return Err(XlsxToXmlError::MissingHeaderFields);
        }

        if self.draft.is_some() {
            return Err(XlsxToXmlError::IncompleteHeaderField);
        }

        // ストアが追加時に一意性を保証していても、周辺UIの未確定編集に
        // 備えて全体を再チェックする
        let duplicates = find_duplicate_names(self.store.fields());
        if !duplicates.is_empty() {
            return Err(XlsxToXmlError::DuplicateHeaderFields { names: duplicates });
        }

        // 2. スナップショットの固定
        // ファイルバイトは要求へ移動し、試行の終了とともに解放される
        let request = ConversionRequest {
            fields: self.store.fields().to_vec(),
            file_bytes: self.file.take().ok_or(XlsxToXmlError::MissingFile)?,
        };

        // 3. Converting: 直ちに0%を送出
        self.state = ConversionState::Converting;
        let mut progress = ProgressReporter::new(self.observer.as_mut());
        progress.report(0);

        // 4. 抽出 → 合成
        let dataset = extractor::extract(&request.file_bytes, self.config.max_input_file_size)?;
        let xml = XmlComposer::compose_to_string(&request.fields, &dataset, &mut progress)?;

        // 5. 終端の100%を保証
        progress.finish();

        Ok(xml)
    }

    /// セッションを初期状態に戻す
    ///
    /// ヘッダーフィールドストア、ファイル、未コミット入力、生成済みXML、
    /// エラー状態をすべて破棄して`Idle`に遷移します。進捗観測者は
    /// 保持されます。
    pub fn reset(&mut self) {
        self.store.clear();
        self.file = None;
        self.draft = None;
        self.xml = None;
        self.error_message = None;
        self.state = ConversionState::Idle;
        debug!("session reset");
    }
}
