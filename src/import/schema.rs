use serde_json::Value;

/// The recognized top-level shapes of an imported JSON document. Detection is
/// a single discriminator so a new shape is one variant plus one case arm.
#[derive(Debug, PartialEq)]
pub enum Schema<'a> {
    /// A bare array: each element is one proto-record directly.
    List(&'a Vec<Value>),
    /// `{ title?, categories: [...] }`: each category is a nested container
    /// that the flattener expands (words/verbs/situations/patterns).
    Categorized { categories: &'a Vec<Value>, title: Option<&'a str> },
    /// `{ title?, words: [...] }`: each element is one proto-record directly.
    WordsField { words: &'a Vec<Value>, title: Option<&'a str> },
    /// None of the above. The normalizer reports an empty import, not an error.
    Unrecognized,
}

/// Classify a parsed top-level value. First match wins, in this order:
/// list, categorized, words-field, unrecognized.
pub fn detect(value: &Value) -> Schema<'_> {
    if let Some(items) = value.as_array() {
        return Schema::List(items);
    }

    if let Some(obj) = value.as_object() {
        let title = obj.get("title").and_then(Value::as_str).filter(|t| !t.trim().is_empty());

        if let Some(categories) = obj.get("categories").and_then(Value::as_array) {
            return Schema::Categorized { categories, title };
        }

        if let Some(words) = obj.get("words").and_then(Value::as_array) {
            return Schema::WordsField { words, title };
        }
    }

    Schema::Unrecognized
}
