//! Recursive character text splitter.
//!
//! Tries each separator in turn (paragraphs, lines, words, characters) and
//! merges the resulting pieces back into chunks of at most `chunk_size`
//! characters, carrying up to `chunk_overlap` characters between neighbours.

use super::{Document, DocumentError};
use std::collections::VecDeque;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

#[derive(Debug, Clone)]
pub struct RecursiveCharacterTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl Default for RecursiveCharacterTextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: default_separators(),
        }
    }
}

fn default_separators() -> Vec<String> {
    ["\n\n", "\n", " ", ""].iter().map(|s| s.to_string()).collect()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl RecursiveCharacterTextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, DocumentError> {
        if chunk_size == 0 {
            return Err(DocumentError::InvalidSplitter(
                "chunk size must be positive".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(DocumentError::InvalidSplitter(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: default_separators(),
        })
    }

    /// Split every document; chunks keep their source document's metadata.
    pub fn split_documents(&self, docs: &[Document]) -> Vec<Document> {
        docs.iter()
            .flat_map(|doc| {
                self.split_text(&doc.page_content)
                    .into_iter()
                    .map(|chunk| Document {
                        page_content: chunk,
                        metadata: doc.metadata.clone(),
                    })
            })
            .collect()
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        // Pick the first separator present in the text; "" always matches.
        let none: &[String] = &[];
        let (separator, remaining) = separators
            .iter()
            .enumerate()
            .find(|(_, s)| s.is_empty() || text.contains(s.as_str()))
            .map(|(i, s)| (s.as_str(), &separators[i + 1..]))
            .unwrap_or(("", none));

        let splits: Vec<&str> = if separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split(separator).filter(|s| !s.is_empty()).collect()
        };

        let mut chunks = Vec::new();
        let mut good_splits: Vec<&str> = Vec::new();

        for split in splits {
            if char_len(split) < self.chunk_size {
                good_splits.push(split);
                continue;
            }

            if !good_splits.is_empty() {
                chunks.extend(self.merge_splits(&good_splits, separator));
                good_splits.clear();
            }

            if remaining.is_empty() {
                chunks.push(split.to_string());
            } else {
                chunks.extend(self.split_recursive(split, remaining));
            }
        }

        if !good_splits.is_empty() {
            chunks.extend(self.merge_splits(&good_splits, separator));
        }

        chunks
    }

    fn merge_splits(&self, splits: &[&str], separator: &str) -> Vec<String> {
        let separator_len = char_len(separator);
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for split in splits {
            let len = char_len(split);
            let joined_len = |current: &VecDeque<&str>, total: usize| {
                total + len + if current.is_empty() { 0 } else { separator_len }
            };

            if joined_len(&current, total) > self.chunk_size {
                if let Some(doc) = join_trimmed(&current, separator) {
                    docs.push(doc);
                }

                while total > self.chunk_overlap
                    || (total > 0 && joined_len(&current, total) > self.chunk_size)
                {
                    let Some(first) = current.pop_front() else {
                        break;
                    };
                    total -= char_len(first) + if current.is_empty() { 0 } else { separator_len };
                }
            }

            total += len + if current.is_empty() { 0 } else { separator_len };
            current.push_back(split);
        }

        if let Some(doc) = join_trimmed(&current, separator) {
            docs.push(doc);
        }

        docs
    }
}

fn join_trimmed(parts: &VecDeque<&str>, separator: &str) -> Option<String> {
    let joined = parts.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_overlap_not_smaller_than_chunk_size() {
        assert!(RecursiveCharacterTextSplitter::new(100, 100).is_err());
        assert!(RecursiveCharacterTextSplitter::new(0, 0).is_err());
        assert!(RecursiveCharacterTextSplitter::new(100, 20).is_ok());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let splitter = RecursiveCharacterTextSplitter::default();
        assert_eq!(splitter.split_text("short text"), vec!["short text"]);
    }

    #[test]
    fn chunks_respect_the_size_limit() {
        let splitter = RecursiveCharacterTextSplitter::new(50, 10).unwrap();
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(20);

        let chunks = splitter.split_text(&text);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 50));
    }

    #[test]
    fn neighbouring_chunks_overlap() {
        let splitter = RecursiveCharacterTextSplitter::new(20, 8).unwrap();
        let chunks = splitter.split_text("one two three four five six seven eight nine ten");

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let last_word = pair[0].split(' ').last().unwrap();
            assert!(pair[1].starts_with(last_word), "{:?}", pair);
        }
    }

    #[test]
    fn paragraphs_are_preferred_split_points() {
        let splitter = RecursiveCharacterTextSplitter::new(30, 0).unwrap();
        let chunks = splitter.split_text("first paragraph here\n\nsecond paragraph here");
        assert_eq!(chunks, vec!["first paragraph here", "second paragraph here"]);
    }

    #[test]
    fn long_words_fall_back_to_characters() {
        let splitter = RecursiveCharacterTextSplitter::new(4, 1).unwrap();
        let chunks = splitter.split_text("abcdefghij");
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
        assert_eq!(chunks.first().map(String::as_str), Some("abcd"));
    }

    #[test]
    fn multibyte_text_is_measured_in_characters() {
        let splitter = RecursiveCharacterTextSplitter::new(5, 0).unwrap();
        let chunks = splitter.split_text("가나다라마바사아자차");
        assert_eq!(chunks, vec!["가나다라마", "바사아자차"]);
    }

    #[test]
    fn split_documents_keeps_metadata() {
        let splitter = RecursiveCharacterTextSplitter::new(10, 0).unwrap();
        let doc = Document::new("alpha beta gamma delta").with_metadata("source", json!("a.pdf"));

        let chunks = splitter.split_documents(&[doc]);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.metadata["source"] == "a.pdf"));
    }
}
