use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};
use uuid::Uuid;

pub const DEFAULT_COLLECTION: &str = "My Words";
pub const DEFAULT_GROUP: &str = "Uncategorized";
pub const IMPORTED_GROUP: &str = "Imported";

/// One stored vocabulary entry. Serialized with the same keys the original
/// word files use (`dateAdded`), so an existing store file loads unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub kanji: String,
    #[serde(default)]
    pub furigana: String,
    pub meaning: String,
    #[serde(default)]
    pub example: String,
    #[serde(default = "default_group")]
    pub group: String,
    // Legacy records have no collection; the store backfills it on load.
    #[serde(default)]
    pub collection: String,
    #[serde(rename = "dateAdded")]
    pub date_added: DateTime<Utc>,
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

// Older files carry numeric ids (epoch millis plus a random fraction);
// they are accepted and carried along as their decimal string form.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("id must be a string or number, got {}", other))),
    }
}

/// Intermediate flat record produced by the flatteners and the direct shapes,
/// before validation and id/timestamp stamping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProtoRecord {
    pub kanji: String,
    pub furigana: String,
    pub meaning: String,
    pub example: String,
    pub group: String,
}

impl ProtoRecord {
    pub fn is_valid(&self) -> bool {
        !self.kanji.is_empty() && !self.meaning.is_empty()
    }

    pub fn stamp(self, collection: &str) -> WordRecord {
        WordRecord {
            id: Uuid::new_v4().to_string(),
            kanji: self.kanji,
            furigana: self.furigana,
            meaning: self.meaning,
            example: self.example,
            group: if self.group.is_empty() { IMPORTED_GROUP.to_string() } else { self.group },
            collection: collection.to_string(),
            date_added: Utc::now(),
        }
    }
}

/// The result of one import operation: validated, stamped records plus the
/// collection they belong to. Transient, never persisted as its own entity.
#[derive(Debug, Clone)]
pub struct ImportBatch {
    pub records: Vec<WordRecord>,
    pub collection_name: String,
}

impl ImportBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fields of a hand-added word before stamping. The add form requires kanji
/// and meaning; everything else is optional.
#[derive(Debug, Clone, Default)]
pub struct NewWord {
    pub kanji: String,
    pub furigana: String,
    pub meaning: String,
    pub example: String,
    pub group: Option<String>,
    pub collection: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_record_backfills_defaults() {
        let json = r#"{
            "id": 1716239022345.5,
            "kanji": "猫",
            "furigana": "ねこ",
            "meaning": "cat",
            "example": "",
            "group": "Week 1",
            "dateAdded": "2024-05-20T12:23:42.345Z"
        }"#;

        let record: WordRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "1716239022345.5");
        assert_eq!(record.kanji, "猫");
        assert_eq!(record.collection, "");
        assert_eq!(record.group, "Week 1");
    }

    #[test]
    fn missing_group_defaults_to_uncategorized() {
        let json = r#"{
            "id": "abc",
            "kanji": "犬",
            "meaning": "dog",
            "dateAdded": "2024-05-20T12:23:42Z"
        }"#;

        let record: WordRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.group, DEFAULT_GROUP);
        assert_eq!(record.furigana, "");
        assert_eq!(record.example, "");
    }

    #[test]
    fn stamped_record_gets_unique_ids() {
        let proto = ProtoRecord {
            kanji: "行く".to_string(),
            meaning: "go".to_string(),
            ..Default::default()
        };

        let a = proto.clone().stamp("Trip Words");
        let b = proto.stamp("Trip Words");
        assert_ne!(a.id, b.id);
        assert_eq!(a.collection, "Trip Words");
        assert_eq!(a.group, IMPORTED_GROUP);
    }

    #[test]
    fn round_trips_with_camel_case_date_key() {
        let record = ProtoRecord {
            kanji: "山".to_string(),
            meaning: "mountain".to_string(),
            ..Default::default()
        }
        .stamp(DEFAULT_COLLECTION);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"dateAdded\""));

        let parsed: WordRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
