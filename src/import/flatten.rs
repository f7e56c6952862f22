use serde_json::{
    Map,
    Value,
};
use tracing::warn;

use super::fields::{
    self,
    coerce,
    resolve,
    resolve_array,
};
use crate::core::ProtoRecord;

// Per-structure group fallbacks, used when a category carries no label of
// its own. Distinct per structure since they hold different kinds of content.
pub const VERBS_GROUP: &str = "Honorific Verbs";
pub const SITUATIONS_GROUP: &str = "Situational Phrases";
pub const PATTERNS_GROUP: &str = "Grammar Patterns";

/// Expand one category container into flat proto-records. A category may
/// contribute from several sub-structures at once; each sub-structure is
/// flattened independently and the results concatenated in a fixed order.
pub fn flatten_category(category: &Value, root_title: Option<&str>) -> Vec<ProtoRecord> {
    let Some(obj) = category.as_object() else {
        warn!("skipping non-object category entry");
        return Vec::new();
    };

    let label = resolve(obj, fields::CATEGORY_LABEL_KEYS);

    let mut records = flatten_words(obj, &label, root_title);
    records.extend(flatten_verbs(obj, &label));
    records.extend(flatten_situations(obj, &label));
    records.extend(flatten_patterns(obj, &label));
    records
}

/// `words`: one proto-record per element. Group falls back through the
/// element's own group key, the category label, the root title, and finally
/// the imported default applied at stamping time.
fn flatten_words(category: &Map<String, Value>, label: &str, root_title: Option<&str>) -> Vec<ProtoRecord> {
    let Some(words) = category.get("words").and_then(Value::as_array) else {
        return Vec::new();
    };

    words
        .iter()
        .filter_map(Value::as_object)
        .map(|item| {
            let mut group = resolve(item, fields::GROUP_KEYS);
            if group.is_empty() {
                group = label.to_string();
            }
            if group.is_empty() {
                group = root_title.unwrap_or_default().to_string();
            }

            ProtoRecord {
                kanji: resolve(item, fields::KANJI_KEYS),
                furigana: resolve(item, fields::FURIGANA_KEYS),
                meaning: resolve(item, fields::MEANING_KEYS),
                example: resolve(item, fields::EXAMPLE_KEYS),
                group,
            }
        })
        .collect()
}

/// `verbs`: each element yields up to two proto-records, one per honorific
/// register present (尊敬語/謙譲語). The display form is
/// `"<plain form> → <honorific form>"` and the meaning carries the register
/// as an annotation. An element with neither register yields nothing.
fn flatten_verbs(category: &Map<String, Value>, label: &str) -> Vec<ProtoRecord> {
    let Some(verbs) = category.get("verbs").and_then(Value::as_array) else {
        return Vec::new();
    };

    let group = if label.is_empty() { VERBS_GROUP } else { label };
    let registers: [(&str, &[&str]); 2] = [
        (fields::RESPECTFUL_FORM_KEY, fields::RESPECTFUL_READING_KEYS),
        (fields::HUMBLE_FORM_KEY, fields::HUMBLE_READING_KEYS),
    ];

    let mut records = Vec::new();
    for item in verbs.iter().filter_map(Value::as_object) {
        let plain = resolve(item, fields::PLAIN_FORM_KEYS);
        if plain.is_empty() {
            continue;
        }
        let base_meaning = resolve(item, fields::MEANING_KEYS);

        for (register, reading_keys) in registers {
            let honorific = resolve(item, &[register]);
            if honorific.is_empty() {
                continue;
            }

            let meaning = if base_meaning.is_empty() {
                String::new()
            } else {
                format!("{}（{}）", base_meaning, register)
            };

            records.push(ProtoRecord {
                kanji: format!("{} → {}", plain, honorific),
                furigana: resolve(item, reading_keys),
                meaning,
                example: resolve(item, fields::EXAMPLE_KEYS),
                group: group.to_string(),
            });
        }
    }
    records
}

/// `situations`: one proto-record per phrase, with the example synthesized
/// from the situation label so the card keeps its scene context.
fn flatten_situations(category: &Map<String, Value>, label: &str) -> Vec<ProtoRecord> {
    let Some(situations) = category.get("situations").and_then(Value::as_array) else {
        return Vec::new();
    };

    let group = if label.is_empty() { SITUATIONS_GROUP } else { label };

    let mut records = Vec::new();
    for situation in situations.iter().filter_map(Value::as_object) {
        let scene = resolve(situation, fields::SITUATION_LABEL_KEYS);
        let example = if scene.is_empty() { String::new() } else { format!("Scene: {}", scene) };

        let Some(phrases) = resolve_array(situation, fields::PHRASE_LIST_KEYS) else {
            continue;
        };

        for phrase in phrases {
            let record = match phrase {
                Value::Object(item) => ProtoRecord {
                    kanji: resolve(item, fields::PHRASE_TEXT_KEYS),
                    furigana: resolve(item, fields::FURIGANA_KEYS),
                    meaning: resolve(item, fields::MEANING_KEYS),
                    example: example.clone(),
                    group: group.to_string(),
                },
                // Bare-string phrases keep their text but have no meaning,
                // so they are dropped at the validation gate.
                other => ProtoRecord {
                    kanji: coerce(other),
                    example: example.clone(),
                    group: group.to_string(),
                    ..Default::default()
                },
            };
            records.push(record);
        }
    }
    records
}

/// `patterns`: each example string becomes its own proto-record sharing the
/// pattern form and explanation (one pattern × N examples → N records).
/// Without an explanation the example text itself serves as the meaning.
fn flatten_patterns(category: &Map<String, Value>, label: &str) -> Vec<ProtoRecord> {
    let Some(patterns) = category.get("patterns").and_then(Value::as_array) else {
        return Vec::new();
    };

    let group = if label.is_empty() { PATTERNS_GROUP } else { label };

    let mut records = Vec::new();
    for pattern in patterns.iter().filter_map(Value::as_object) {
        let form = resolve(pattern, fields::PATTERN_FORM_KEYS);
        let explanation = resolve(pattern, fields::PATTERN_MEANING_KEYS);
        let furigana = resolve(pattern, fields::FURIGANA_KEYS);

        let Some(examples) = resolve_array(pattern, fields::PATTERN_EXAMPLE_KEYS) else {
            continue;
        };

        for example in examples {
            let text = coerce(example);
            if text.is_empty() {
                continue;
            }

            let meaning = if explanation.is_empty() { text.clone() } else { explanation.clone() };

            records.push(ProtoRecord {
                kanji: form.clone(),
                furigana: furigana.clone(),
                meaning,
                example: text,
                group: group.to_string(),
            });
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn words_take_category_label_as_group() {
        let category = json!({
            "category": "動物",
            "words": [
                { "kanji": "猫", "furigana": "ねこ", "meaning": "cat" },
                { "kanji": "犬", "meaning": "dog", "group": "Pets" }
            ]
        });

        let records = flatten_category(&category, None);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].group, "動物");
        assert_eq!(records[1].group, "Pets");
    }

    #[test]
    fn words_fall_back_to_root_title() {
        let category = json!({ "words": [{ "kanji": "朝", "meaning": "morning" }] });

        let records = flatten_category(&category, Some("Daily Life"));
        assert_eq!(records[0].group, "Daily Life");

        let records = flatten_category(&category, None);
        assert_eq!(records[0].group, "");
    }

    #[test]
    fn verb_with_both_registers_yields_two_records() {
        let category = json!({
            "verbs": [{
                "普通形": "食べる",
                "尊敬語": "召し上がる",
                "謙譲語": "いただく",
                "meaning": "eat",
                "尊敬語読み": "めしあがる",
                "謙譲語読み": "いただく"
            }]
        });

        let records = flatten_category(&category, None);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].kanji, "食べる → 召し上がる");
        assert_eq!(records[0].meaning, "eat（尊敬語）");
        assert_eq!(records[0].furigana, "めしあがる");
        assert_eq!(records[0].group, VERBS_GROUP);

        assert_eq!(records[1].kanji, "食べる → いただく");
        assert_eq!(records[1].meaning, "eat（謙譲語）");
        assert_eq!(records[1].furigana, "いただく");
    }

    #[test]
    fn verb_with_neither_register_yields_nothing() {
        let category = json!({ "verbs": [{ "普通形": "歩く", "meaning": "walk" }] });
        assert!(flatten_category(&category, None).is_empty());
    }

    #[test]
    fn verb_without_plain_form_is_skipped() {
        let category = json!({
            "verbs": [{ "尊敬語": "いらっしゃる", "meaning": "go" }]
        });
        assert!(flatten_category(&category, None).is_empty());
    }

    #[test]
    fn situation_phrases_carry_scene_example() {
        let category = json!({
            "situations": [{
                "situation": "レストラン",
                "phrases": [
                    { "phrase": "お水をください", "meaning": "water please" },
                    { "phrase": "お会計をお願いします", "meaning": "check please" }
                ]
            }]
        });

        let records = flatten_category(&category, None);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kanji, "お水をください");
        assert_eq!(records[0].example, "Scene: レストラン");
        assert_eq!(records[0].group, SITUATIONS_GROUP);
        assert_eq!(records[1].example, "Scene: レストラン");
    }

    #[test]
    fn bare_string_phrases_keep_text_but_fail_validation() {
        let category = json!({
            "situations": [{ "situation": "駅", "phrases": ["切符をください"] }]
        });

        let records = flatten_category(&category, None);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kanji, "切符をください");
        assert_eq!(records[0].example, "Scene: 駅");
        assert!(records[0].meaning.is_empty());
        assert!(!records[0].is_valid());
    }

    #[test]
    fn pattern_examples_cross_product() {
        let category = json!({
            "patterns": [{
                "pattern": "〜ながら",
                "meaning": "while doing",
                "例": ["音楽を聞きながら勉強する", "歩きながら話す", "食べながらテレビを見る"]
            }]
        });

        let records = flatten_category(&category, None);
        assert_eq!(records.len(), 3);
        for record in &records {
            assert_eq!(record.kanji, "〜ながら");
            assert_eq!(record.meaning, "while doing");
            assert_eq!(record.group, PATTERNS_GROUP);
        }
        assert_eq!(records[0].example, "音楽を聞きながら勉強する");
        assert_eq!(records[1].example, "歩きながら話す");
    }

    #[test]
    fn pattern_without_explanation_uses_example_as_meaning() {
        let category = json!({
            "patterns": [{ "pattern": "〜ば〜ほど", "例": ["速ければ速いほど", "高ければ高いほど"] }]
        });

        let records = flatten_category(&category, None);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kanji, records[1].kanji);
        assert_eq!(records[0].furigana, records[1].furigana);
        assert_ne!(records[0].meaning, records[1].meaning);
    }

    #[test]
    fn mixed_category_accumulates_all_substructures() {
        let category = json!({
            "category": "総合",
            "words": [{ "kanji": "雨", "meaning": "rain" }],
            "verbs": [{ "普通形": "行く", "尊敬語": "いらっしゃる", "meaning": "go" }],
            "situations": [{ "situation": "駅", "phrases": [{ "phrase": "切符", "meaning": "ticket" }] }],
            "patterns": [{ "pattern": "〜たい", "meaning": "want to", "例": ["行きたい"] }]
        });

        let records = flatten_category(&category, None);
        assert_eq!(records.len(), 4);
        // Fixed concatenation order: words, verbs, situations, patterns.
        assert_eq!(records[0].kanji, "雨");
        assert_eq!(records[1].kanji, "行く → いらっしゃる");
        assert_eq!(records[2].kanji, "切符");
        assert_eq!(records[3].kanji, "〜たい");
        for record in &records {
            assert_eq!(record.group, "総合");
        }
    }

    #[test]
    fn non_object_category_is_skipped() {
        assert!(flatten_category(&json!("not an object"), None).is_empty());
        assert!(flatten_category(&json!(42), None).is_empty());
    }
}
