use std::{
    collections::BTreeSet,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    core::{
        models::{
            DEFAULT_COLLECTION,
            DEFAULT_GROUP,
        },
        ImportBatch,
        NewWord,
        TangochoError,
        WordRecord,
    },
    import::{
        normalize_json,
        normalize_rows,
        rows::read_rows,
    },
    persistence,
};

const STORE_FILE: &str = "words.json";

/// How one file import ended. A parse failure is an `Err` from
/// [`WordStore::import_file`] instead; both leave the store untouched.
#[derive(Debug, PartialEq)]
pub enum ImportOutcome {
    Imported { count: usize, collection: String },
    NoValidWords,
}

/// Owns the canonical ordered word sequence and persists it on every
/// mutation. All additions, deletions and merges go through `&mut self`, so
/// there is exactly one writer at a time by construction.
#[derive(Debug)]
pub struct WordStore {
    words: Vec<WordRecord>,
    file_path: PathBuf,
}

impl WordStore {
    pub fn load() -> Result<Self, TangochoError> {
        Self::open(persistence::get_data_file_path(STORE_FILE))
    }

    /// Open a store backed by an explicit file path. Missing file means an
    /// empty store; nothing is written until the first mutation.
    pub fn open(file_path: PathBuf) -> Result<Self, TangochoError> {
        let mut words: Vec<WordRecord> = persistence::load_json(&file_path)?;

        // Legacy records predate collections and the add form wrote blank
        // groups; repair both once on load.
        for word in &mut words {
            if word.collection.is_empty() {
                word.collection = DEFAULT_COLLECTION.to_string();
            }
            if word.group.is_empty() {
                word.group = DEFAULT_GROUP.to_string();
            }
        }

        Ok(Self { words, file_path })
    }

    fn save(&self) -> Result<(), TangochoError> {
        persistence::save_json_atomic(&self.file_path, &self.words)
    }

    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Add a single hand-entered word. Unlike the import gate, a missing
    /// kanji or meaning is a hard error here so the form can surface it.
    pub fn add(&mut self, new_word: NewWord) -> Result<&WordRecord, TangochoError> {
        if new_word.kanji.trim().is_empty() {
            return Err(TangochoError::InvalidWord("kanji must not be empty".to_string()));
        }
        if new_word.meaning.trim().is_empty() {
            return Err(TangochoError::InvalidWord("meaning must not be empty".to_string()));
        }

        let record = WordRecord {
            id: Uuid::new_v4().to_string(),
            kanji: new_word.kanji.trim().to_string(),
            furigana: new_word.furigana.trim().to_string(),
            meaning: new_word.meaning.trim().to_string(),
            example: new_word.example.trim().to_string(),
            group: new_word.group.filter(|g| !g.is_empty()).unwrap_or_else(|| DEFAULT_GROUP.to_string()),
            collection: new_word
                .collection
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            date_added: Utc::now(),
        };

        self.words.insert(0, record);
        self.save()?;
        Ok(&self.words[0])
    }

    /// Remove the record with the given id. Reports whether anything was
    /// removed; a miss does not touch the store file.
    pub fn delete(&mut self, id: &str) -> Result<bool, TangochoError> {
        if let Some(pos) = self.words.iter().position(|word| word.id == id) {
            self.words.remove(pos);
            self.save()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Merge an import batch into the store: batch records are prepended so
    /// the newest words appear first, existing records keep their relative
    /// order and are never re-validated. Persists the merged sequence.
    pub fn merge_import(&mut self, batch: ImportBatch) -> Result<usize, TangochoError> {
        let count = batch.records.len();

        let mut merged = batch.records;
        merged.append(&mut self.words);
        self.words = merged;

        self.save()?;
        info!(count, collection = %batch.collection_name, "merged import batch");
        Ok(count)
    }

    /// One-call import driver: read the file, dispatch on its extension,
    /// normalize, and merge any non-empty batch. Parse failures surface as
    /// errors before the store is touched.
    pub fn import_file(&mut self, path: &Path) -> Result<ImportOutcome, TangochoError> {
        let source_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("import")
            .to_string();

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let text = fs::read_to_string(path)
            .map_err(|e| TangochoError::FailedToLoadFile(format!("{}: {}", path.display(), e)))?;

        let batch = match extension.as_str() {
            "json" => {
                let value: serde_json::Value = serde_json::from_str(&text)?;
                normalize_json(&value, &source_name)
            }
            "csv" => {
                let rows = read_rows(&text)?;
                normalize_rows(&rows, &source_name)
            }
            _ => return Err(TangochoError::UnsupportedFileType(source_name)),
        };

        if batch.is_empty() {
            return Ok(ImportOutcome::NoValidWords);
        }

        let collection = batch.collection_name.clone();
        let count = self.merge_import(batch)?;
        Ok(ImportOutcome::Imported { count, collection })
    }

    /// Sorted, deduplicated collection labels, for the collection selector.
    pub fn collection_names(&self) -> Vec<String> {
        let names: BTreeSet<_> = self.words.iter().map(|word| word.collection.clone()).collect();
        names.into_iter().collect()
    }

    /// Sorted, deduplicated group labels.
    pub fn group_names(&self) -> Vec<String> {
        let names: BTreeSet<_> = self
            .words
            .iter()
            .map(|word| {
                if word.group.is_empty() {
                    DEFAULT_GROUP.to_string()
                } else {
                    word.group.clone()
                }
            })
            .collect();
        names.into_iter().collect()
    }

    /// The card grid's filter: substring match on kanji and furigana,
    /// case-insensitive match on meaning, plus exact group/collection pins.
    pub fn filter(
        &self,
        search: &str,
        group: Option<&str>,
        collection: Option<&str>,
    ) -> Vec<&WordRecord> {
        let search_lower = search.to_lowercase();

        self.words
            .iter()
            .filter(|word| {
                search.is_empty()
                    || word.kanji.contains(search)
                    || word.furigana.contains(search)
                    || word.meaning.to_lowercase().contains(&search_lower)
            })
            .filter(|word| group.is_none_or(|g| word.group == g))
            .filter(|word| collection.is_none_or(|c| word.collection == c))
            .collect()
    }
}
