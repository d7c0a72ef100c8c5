//! Header Field Store Module
//!
//! ユーザーが宣言した (タグ名, タグ値) ペアの順序付きコレクションを
//! 提供するモジュール。挿入順はXMLの出力順として意味を持ちます。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::XlsxToXmlError;
use crate::tag::validate_tag_name;

/// ヘッダーフィールドの不透明な一意識別子
///
/// 同一ストア内で再利用されません。削除の宛先指定にのみ使用します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldId(u64);

/// ユーザーが宣言したヘッダーフィールド
///
/// 生成後は不変です。編集は削除と再追加でモデル化されます。
/// 境界層（HTTPなど）がスナップショットを直列化できるよう、
/// serdeの導出を持ちます。
///
/// # 不変条件
///
/// - `tag_name` は文法 `[A-Za-z_][A-Za-z0-9_.\-]*` に一致する
/// - `tag_name` は所属コレクション内で一意（大文字小文字を区別）
/// - `tag_value` は空でもよい
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderField {
    /// ストア内で一意な識別子
    pub id: FieldId,

    /// XML要素名（検証済み、トリム済み）
    pub tag_name: String,

    /// 要素のテキスト内容
    pub tag_value: String,
}

/// 順序付きヘッダーフィールドストア
///
/// 1つのアクティブな変換セッションが排他的に所有します。
/// どの時点でも2つのフィールドが同じ`tag_name`を持つことはありません。
#[derive(Debug, Default)]
pub(crate) struct HeaderFieldStore {
    /// 挿入順のフィールドリスト
    fields: Vec<HeaderField>,

    /// 次に発行する識別子（ストア内単調増加）
    next_id: u64,
}

impl HeaderFieldStore {
    /// 空のストアを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 検証済みフィールドを末尾に追加する
    ///
    /// タグ名はトリムしてから検証・重複判定されます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(FieldId)` - 追加されたフィールドの識別子
    /// * `Err(XlsxToXmlError::EmptyName)` - トリム後に空の場合
    /// * `Err(XlsxToXmlError::InvalidFormat)` - 文法に一致しない場合
    /// * `Err(XlsxToXmlError::DuplicateTagName)` - 同名フィールドが既に存在する場合
    pub fn add(&mut self, tag_name: &str, tag_value: &str) -> Result<FieldId, XlsxToXmlError> {
        let trimmed = tag_name.trim();
        validate_tag_name(trimmed)?;

        if self.fields.iter().any(|f| f.tag_name == trimmed) {
            return Err(XlsxToXmlError::DuplicateTagName {
                name: trimmed.to_string(),
            });
        }

        let id = FieldId(self.next_id);
        self.next_id += 1;
        self.fields.push(HeaderField {
            id,
            tag_name: trimmed.to_string(),
            tag_value: tag_value.to_string(),
        });

        Ok(id)
    }

    /// 識別子で指定されたフィールドを削除する
    ///
    /// 存在しない識別子は何もしません（エラーにはなりません）。
    pub fn remove(&mut self, id: FieldId) {
        self.fields.retain(|f| f.id != id);
    }

    /// 挿入順の読み取り専用ビューを取得
    pub fn fields(&self) -> &[HeaderField] {
        &self.fields
    }

    /// フィールド数を取得
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// ストアが空かどうかを判定
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// すべてのフィールドを破棄する（セッションリセット用）
    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

/// 2回以上現れるタグ名を挿入順に1回ずつ報告する
///
/// ストアの`add`が追加時に一意性を保証していても、変換開始時には
/// 全体を再チェックします（ストアとオーケストレーターで共有される
/// 検証ロジック）。
pub(crate) fn find_duplicate_names(fields: &[HeaderField]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();
    let mut duplicates = Vec::new();

    for field in fields {
        let name = field.tag_name.as_str();
        if !seen.insert(name) && reported.insert(name) {
            duplicates.push(name.to_string());
        }
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut store = HeaderFieldStore::new();
        store.add("CALLREPORT_ID", "DTR001").unwrap();
        store.add("INST_NAME", "STERLING BANK").unwrap();

        let names: Vec<&str> = store.fields().iter().map(|f| f.tag_name.as_str()).collect();
        assert_eq!(names, vec!["CALLREPORT_ID", "INST_NAME"]);
    }

    #[test]
    fn test_add_trims_tag_name() {
        let mut store = HeaderFieldStore::new();
        store.add("  PERIOD  ", "2024Q1").unwrap();

        assert_eq!(store.fields()[0].tag_name, "PERIOD");
        assert_eq!(store.fields()[0].tag_value, "2024Q1");
    }

    #[test]
    fn test_add_duplicate_fails_and_size_unchanged() {
        let mut store = HeaderFieldStore::new();
        store.add("INST_NAME", "A").unwrap();

        let result = store.add("INST_NAME", "B");
        assert!(matches!(
            result,
            Err(XlsxToXmlError::DuplicateTagName { ref name }) if name == "INST_NAME"
        ));
        assert_eq!(store.len(), 1);
        // 既存の値は変更されない
        assert_eq!(store.fields()[0].tag_value, "A");
    }

    #[test]
    fn test_add_duplicate_detected_after_trim() {
        let mut store = HeaderFieldStore::new();
        store.add("INST_NAME", "A").unwrap();

        assert!(store.add("  INST_NAME ", "B").is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_is_case_sensitive() {
        let mut store = HeaderFieldStore::new();
        store.add("Name", "a").unwrap();
        // 大文字小文字が異なれば別名
        assert!(store.add("NAME", "b").is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_rejects_invalid_names() {
        let mut store = HeaderFieldStore::new();

        assert!(matches!(
            store.add("1bad", "x"),
            Err(XlsxToXmlError::InvalidFormat { .. })
        ));
        assert!(matches!(store.add("", "x"), Err(XlsxToXmlError::EmptyName)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_allows_empty_value() {
        let mut store = HeaderFieldStore::new();
        store.add("OPTIONAL_FIELD", "").unwrap();

        assert_eq!(store.fields()[0].tag_value, "");
    }

    #[test]
    fn test_remove_by_id() {
        let mut store = HeaderFieldStore::new();
        let id1 = store.add("A", "1").unwrap();
        let id2 = store.add("B", "2").unwrap();

        store.remove(id1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.fields()[0].id, id2);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut store = HeaderFieldStore::new();
        let id = store.add("A", "1").unwrap();
        store.remove(id);

        // 2回目の削除は何もしない
        store.remove(id);
        assert!(store.is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut store = HeaderFieldStore::new();
        let id1 = store.add("A", "1").unwrap();
        store.remove(id1);

        let id2 = store.add("A", "2").unwrap();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_clear() {
        let mut store = HeaderFieldStore::new();
        store.add("A", "1").unwrap();
        store.add("B", "2").unwrap();

        store.clear();
        assert!(store.is_empty());
    }

    // find_duplicate_names のテスト
    #[test]
    fn test_find_duplicate_names_none() {
        let mut store = HeaderFieldStore::new();
        store.add("A", "1").unwrap();
        store.add("B", "2").unwrap();

        assert!(find_duplicate_names(store.fields()).is_empty());
    }

    #[test]
    fn test_find_duplicate_names_reports_each_once() {
        // ストアは重複を許さないため、検証ヘルパーは合成したリストで試験する
        let fields = vec![
            HeaderField {
                id: FieldId(0),
                tag_name: "A".to_string(),
                tag_value: String::new(),
            },
            HeaderField {
                id: FieldId(1),
                tag_name: "A".to_string(),
                tag_value: String::new(),
            },
            HeaderField {
                id: FieldId(2),
                tag_name: "B".to_string(),
                tag_value: String::new(),
            },
            HeaderField {
                id: FieldId(3),
                tag_name: "A".to_string(),
                tag_value: String::new(),
            },
        ];

        assert_eq!(find_duplicate_names(&fields), vec!["A".to_string()]);
    }

    // serdeスナップショットのテスト（境界層との契約）
    #[test]
    fn test_header_field_serde_round_trip() {
        let mut store = HeaderFieldStore::new();
        store.add("CALLREPORT_ID", "DTR001").unwrap();

        let json = serde_json::to_string(store.fields()).unwrap();
        let decoded: Vec<HeaderField> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, store.fields());
    }
}
