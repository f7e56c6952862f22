use std::path::Path;

use serde_json::{
    Map,
    Value,
};
use tracing::{
    debug,
    info,
};

use super::{
    fields::{
        self,
        resolve,
    },
    flatten::flatten_category,
    schema::{
        detect,
        Schema,
    },
};
use crate::core::{
    ImportBatch,
    ProtoRecord,
};

/// Normalize a parsed JSON document into a validated, stamped batch.
/// Unrecognized shapes produce an empty batch rather than an error; a parse
/// failure is the caller's concern and never reaches this function.
pub fn normalize_json(value: &Value, source_name: &str) -> ImportBatch {
    let (protos, title) = match detect(value) {
        Schema::List(items) => (direct_records(items, None), None),
        Schema::Categorized { categories, title } => {
            let protos =
                categories.iter().flat_map(|category| flatten_category(category, title)).collect();
            (protos, title)
        }
        Schema::WordsField { words, title } => (direct_records(words, title), title),
        Schema::Unrecognized => {
            debug!(source = source_name, "unrecognized import schema");
            (Vec::new(), None)
        }
    };

    let collection_name = match title {
        Some(title) => title.to_string(),
        None => collection_from_source(source_name),
    };

    stamp_batch(protos, collection_name, source_name)
}

/// Normalize decoded spreadsheet rows. Rows are already flat, so this is the
/// list shape without detection: the same key tables resolve each field.
pub fn normalize_rows(rows: &[Map<String, Value>], source_name: &str) -> ImportBatch {
    let protos = rows.iter().map(|row| direct_record(row, None)).collect();
    stamp_batch(protos, collection_from_source(source_name), source_name)
}

fn direct_records(items: &[Value], title: Option<&str>) -> Vec<ProtoRecord> {
    items.iter().filter_map(Value::as_object).map(|item| direct_record(item, title)).collect()
}

fn direct_record(item: &Map<String, Value>, title: Option<&str>) -> ProtoRecord {
    let mut group = resolve(item, fields::GROUP_KEYS);
    if group.is_empty() {
        group = title.unwrap_or_default().to_string();
    }

    ProtoRecord {
        kanji: resolve(item, fields::KANJI_KEYS),
        furigana: resolve(item, fields::FURIGANA_KEYS),
        meaning: resolve(item, fields::MEANING_KEYS),
        example: resolve(item, fields::EXAMPLE_KEYS),
        group,
    }
}

// The single acceptance gate: records missing kanji or meaning are dropped
// one by one, never aborting the batch. Survivors keep their input order.
fn stamp_batch(protos: Vec<ProtoRecord>, collection_name: String, source_name: &str) -> ImportBatch {
    let candidates = protos.len();

    let records: Vec<_> = protos
        .into_iter()
        .filter(|proto| {
            if proto.is_valid() {
                true
            } else {
                debug!(kanji = %proto.kanji, meaning = %proto.meaning, "dropping invalid record");
                false
            }
        })
        .map(|proto| proto.stamp(&collection_name))
        .collect();

    info!(
        source = source_name,
        collection = %collection_name,
        candidates,
        imported = records.len(),
        "normalized import batch"
    );

    ImportBatch { records, collection_name }
}

/// Collection name fallback when the document carries no title: the source
/// file's base name with the extension stripped.
fn collection_from_source(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(source_name)
        .trim();

    if stem.is_empty() {
        crate::core::models::DEFAULT_COLLECTION.to_string()
    } else {
        stem.to_string()
    }
}
