use serde_json::{
    Map,
    Value,
};

// The vocabulary file ecosystem has no canonical key naming: the same field
// shows up as an English key, a capitalized key, or a native-script key
// depending on the authoring tool. Each table is ordered by priority.
pub const KANJI_KEYS: &[&str] = &["kanji", "Kanji", "漢字", "word", "単語"];
pub const FURIGANA_KEYS: &[&str] = &["furigana", "Furigana", "ふりがな", "reading", "読み方"];
pub const MEANING_KEYS: &[&str] = &["meaning", "Meaning", "意味", "中文"];
pub const EXAMPLE_KEYS: &[&str] = &["example", "Example", "例文"];
pub const GROUP_KEYS: &[&str] = &["group", "Group", "グループ"];

pub const CATEGORY_LABEL_KEYS: &[&str] = &["category", "カテゴリー", "name"];
pub const PLAIN_FORM_KEYS: &[&str] = &["普通形", "辞書形", "kanji", "word"];
pub const RESPECTFUL_FORM_KEY: &str = "尊敬語";
pub const HUMBLE_FORM_KEY: &str = "謙譲語";
pub const RESPECTFUL_READING_KEYS: &[&str] = &["furigana", "reading", "尊敬語読み"];
pub const HUMBLE_READING_KEYS: &[&str] = &["furigana", "reading", "謙譲語読み"];
pub const SITUATION_LABEL_KEYS: &[&str] = &["situation", "場面", "title"];
pub const PHRASE_LIST_KEYS: &[&str] = &["phrases", "フレーズ"];
pub const PHRASE_TEXT_KEYS: &[&str] = &["phrase", "フレーズ", "kanji", "日本語"];
pub const PATTERN_FORM_KEYS: &[&str] = &["pattern", "文型"];
pub const PATTERN_MEANING_KEYS: &[&str] = &["meaning", "explanation", "意味", "説明", "中文"];
pub const PATTERN_EXAMPLE_KEYS: &[&str] = &["examples", "例", "例文"];

/// Try each candidate key in order and return the first value present that
/// coerces to a non-empty string, or an empty string if none match.
pub fn resolve(item: &Map<String, Value>, keys: &[&str]) -> String {
    for key in keys {
        if let Some(value) = item.get(*key) {
            let text = coerce(value);
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

/// First candidate key whose value is an array, if any. Used for the phrase
/// and example lists inside situation/pattern containers.
pub fn resolve_array<'a>(item: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter().find_map(|key| item.get(*key).and_then(Value::as_array))
}

// Strings pass through trimmed, numbers and booleans take their display
// form, everything else (null, arrays, objects) counts as absent.
pub fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
