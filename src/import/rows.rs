use csv::ReaderBuilder;
use serde_json::{
    Map,
    Value,
};

use crate::core::TangochoError;

/// Decode CSV text into one flat key→value mapping per data row, keyed by the
/// header row. Blank cells are left out so the field resolver treats them as
/// absent rather than as empty-string matches.
pub fn read_rows(text: &str) -> Result<Vec<Map<String, Value>>, TangochoError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;

        let mut row = Map::new();
        for (index, field) in record.iter().enumerate() {
            let Some(key) = headers.get(index) else {
                continue;
            };
            if key.is_empty() || field.is_empty() {
                continue;
            }
            row.insert(key.to_string(), Value::String(field.to_string()));
        }
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_row_keys_the_cells() {
        let text = "kanji,furigana,meaning\n猫,ねこ,cat\n犬,いぬ,dog\n";
        let rows = read_rows(text).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("kanji"), Some(&Value::String("猫".to_string())));
        assert_eq!(rows[1].get("meaning"), Some(&Value::String("dog".to_string())));
    }

    #[test]
    fn native_script_headers_survive() {
        let text = "漢字,意味\n山,mountain\n";
        let rows = read_rows(text).unwrap();
        assert_eq!(rows[0].get("漢字"), Some(&Value::String("山".to_string())));
    }

    #[test]
    fn blank_cells_are_omitted() {
        let text = "kanji,furigana,meaning\n猫,,cat\n";
        let rows = read_rows(text).unwrap();
        assert!(!rows[0].contains_key("furigana"));
    }

    #[test]
    fn short_rows_are_tolerated() {
        let text = "kanji,furigana,meaning\n猫\n";
        let rows = read_rows(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 1);
    }

    #[test]
    fn header_only_input_yields_no_rows() {
        let rows = read_rows("kanji,meaning\n").unwrap();
        assert!(rows.is_empty());
    }
}
