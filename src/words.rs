use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde_json::{Map, Value};
use thiserror::Error;

static DATA_DIR: Dir = include_dir!("data");

/// Words drawn for a session when no count is given.
pub const DEFAULT_SAMPLE_SIZE: usize = 250;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("no dictionary named `{0}` is bundled")]
    UnknownDictionary(String),
    #[error("dictionary `{name}` is not valid JSON: {source}")]
    Malformed {
        name: String,
        source: serde_json::Error,
    },
    #[error("dictionary `{name}` holds {available} words but {requested} were requested")]
    TooFewWords {
        name: String,
        available: usize,
        requested: usize,
    },
}

/// A word dictionary: a JSON object mapping each word to a metadata value
/// the test never reads. The bundled files map every word to `1`.
#[derive(Debug, Clone)]
pub struct Dictionary {
    name: String,
    entries: Map<String, Value>,
}

impl Dictionary {
    /// Load a dictionary bundled into the binary, by file stem
    /// (e.g. `words_2-6`).
    pub fn bundled(name: &str) -> Result<Self, DictionaryError> {
        let file = DATA_DIR
            .get_file(format!("{name}.json"))
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| DictionaryError::UnknownDictionary(name.to_string()))?;
        Self::from_json(name, file)
    }

    pub fn from_json(name: &str, json: &str) -> Result<Self, DictionaryError> {
        let entries: Map<String, Value> =
            serde_json::from_str(json).map_err(|source| DictionaryError::Malformed {
                name: name.to_string(),
                source,
            })?;
        Ok(Self {
            name: name.to_string(),
            entries,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Draw `size` distinct words uniformly, without replacement.
    pub fn sample(&self, size: usize) -> Result<WordList, DictionaryError> {
        if self.entries.len() < size {
            return Err(DictionaryError::TooFewWords {
                name: self.name.clone(),
                available: self.entries.len(),
                requested: size,
            });
        }
        let pool: Vec<String> = self.entries.keys().cloned().collect();
        let mut rng = rand::thread_rng();
        let words = pool.choose_multiple(&mut rng, size).cloned().collect();
        Ok(WordList::new(words))
    }
}

/// Keep only entries whose word length (in characters) falls in
/// `min..=max`. This is what produced the bundled dictionaries.
pub fn filter_by_length(entries: &Map<String, Value>, min: usize, max: usize) -> Map<String, Value> {
    entries
        .iter()
        .filter(|(word, _)| {
            let len = word.chars().count();
            len >= min && len <= max
        })
        .map(|(word, meta)| (word.clone(), meta.clone()))
        .collect()
}

/// Reading past the end of a word list. Recoverable: callers that keep a
/// monotonic cursor can wrap via [`OutOfRangeError::wrapped_index`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("word index {index} is out of range for a list of {len}")]
pub struct OutOfRangeError {
    pub index: usize,
    pub len: usize,
}

impl OutOfRangeError {
    pub fn wrapped_index(&self) -> Option<usize> {
        (self.len > 0).then(|| self.index % self.len)
    }
}

/// The words one session types through, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn word_at(&self, index: usize) -> Result<&str, OutOfRangeError> {
        self.words
            .get(index)
            .map(String::as_str)
            .ok_or(OutOfRangeError {
                index,
                len: self.words.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}
