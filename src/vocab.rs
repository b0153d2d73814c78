//! Vocabulary tables
//!
//! Words are grouped by chapter and never mutated once loaded. The gameplay
//! core only needs three queries: filter by difficulty tier, find same-category
//! distractors, and pick at random.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Chapter used when a lookup misses and no other default is known
pub const DEFAULT_CHAPTER: &str = "chapter1";

/// A single flashcard: Vietnamese prompt, English answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyWord {
    pub id: String,
    /// Native-language prompt shown to the player
    pub vietnamese: String,
    /// Target-language answer carried by the answer boxes
    pub english: String,
    #[serde(default)]
    pub pronunciation: String,
    pub category: String,
    /// Difficulty tier, 1 = easiest
    pub difficulty: u8,
    #[serde(default)]
    pub chapter: String,
}

impl VocabularyWord {
    pub fn new(
        id: &str,
        vietnamese: &str,
        english: &str,
        pronunciation: &str,
        category: &str,
        difficulty: u8,
        chapter: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            vietnamese: vietnamese.to_string(),
            english: english.to_string(),
            pronunciation: pronunciation.to_string(),
            category: category.to_string(),
            difficulty,
            chapter: chapter.to_string(),
        }
    }
}

/// Words at or below `max_tier`
pub fn filter_by_max_difficulty(words: &[VocabularyWord], max_tier: u8) -> Vec<&VocabularyWord> {
    words.iter().filter(|w| w.difficulty <= max_tier).collect()
}

/// Words sharing `word`'s category, excluding `word` itself
pub fn same_category_excluding<'a>(
    words: &'a [VocabularyWord],
    word: &VocabularyWord,
) -> Vec<&'a VocabularyWord> {
    words
        .iter()
        .filter(|w| w.category == word.category && w.id != word.id)
        .collect()
}

/// Uniform pick from a candidate list
pub fn pick_random<'a, R: Rng + ?Sized>(
    candidates: &[&'a VocabularyWord],
    rng: &mut R,
) -> Option<&'a VocabularyWord> {
    candidates.choose(rng).copied()
}

/// Chapter id -> ordered word list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    chapters: BTreeMap<String, Vec<VocabularyWord>>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{ "<chapter>": [word, ...], ... }`
    ///
    /// Words missing a chapter tag inherit the key they were listed under.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut vocab: Vocabulary = serde_json::from_str(json)?;
        for (chapter, words) in vocab.chapters.iter_mut() {
            for word in words.iter_mut().filter(|w| w.chapter.is_empty()) {
                word.chapter = chapter.clone();
            }
        }
        log::info!(
            "Loaded vocabulary: {} chapters, {} words",
            vocab.chapters.len(),
            vocab.word_count()
        );
        Ok(vocab)
    }

    /// Add (or replace) a chapter
    pub fn insert_chapter(&mut self, chapter: &str, words: Vec<VocabularyWord>) {
        self.chapters.insert(chapter.to_string(), words);
    }

    pub fn chapter_ids(&self) -> impl Iterator<Item = &str> {
        self.chapters.keys().map(String::as_str)
    }

    pub fn word_count(&self) -> usize {
        self.chapters.values().map(Vec::len).sum()
    }

    /// Chapter used for unknown ids: `chapter1` if present, else the first key
    pub fn default_chapter(&self) -> Option<&str> {
        if self.chapters.contains_key(DEFAULT_CHAPTER) {
            Some(DEFAULT_CHAPTER)
        } else {
            self.chapters.keys().next().map(String::as_str)
        }
    }

    /// Words for a chapter, falling back to the default chapter for unknown ids
    pub fn words_for(&self, chapter: &str) -> &[VocabularyWord] {
        if let Some(words) = self.chapters.get(chapter) {
            return words;
        }
        let fallback = self.default_chapter();
        log::warn!(
            "Unknown chapter '{}', using '{}'",
            chapter,
            fallback.unwrap_or("<none>")
        );
        fallback
            .and_then(|id| self.chapters.get(id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Small built-in word set so the game runs without external tables
    pub fn builtin() -> Self {
        let mut vocab = Self::new();
        let table: &[(&str, &[(&str, &str, &str, &str, &str, u8)])] = &[
            (
                "chapter1",
                &[
                    ("c1-01", "xin chào", "hello", "sin chow", "greetings", 1),
                    ("c1-02", "tạm biệt", "goodbye", "tahm byet", "greetings", 1),
                    ("c1-03", "cảm ơn", "thank you", "gahm uhn", "greetings", 1),
                    ("c1-04", "xin lỗi", "sorry", "sin loy", "greetings", 2),
                    ("c1-05", "chúc ngủ ngon", "good night", "chook ngoo ngon", "greetings", 3),
                    ("c1-06", "một", "one", "moht", "numbers", 1),
                    ("c1-07", "hai", "two", "hai", "numbers", 1),
                    ("c1-08", "ba", "three", "bah", "numbers", 1),
                    ("c1-09", "mười", "ten", "muoy", "numbers", 2),
                    ("c1-10", "một trăm", "one hundred", "moht chahm", "numbers", 3),
                    ("c1-11", "mẹ", "mother", "meh", "family", 1),
                    ("c1-12", "bố", "father", "boh", "family", 1),
                    ("c1-13", "anh trai", "older brother", "ahn chai", "family", 2),
                    ("c1-14", "ông bà", "grandparents", "ohm bah", "family", 3),
                ],
            ),
            (
                "chapter2",
                &[
                    ("c2-01", "cơm", "rice", "gum", "food", 1),
                    ("c2-02", "phở", "noodle soup", "fuh", "food", 1),
                    ("c2-03", "bánh mì", "bread", "bahn mee", "food", 1),
                    ("c2-04", "cá", "fish", "gah", "food", 2),
                    ("c2-05", "rau", "vegetables", "zow", "food", 2),
                    ("c2-06", "nước mắm", "fish sauce", "nuoc mahm", "food", 3),
                    ("c2-07", "đỏ", "red", "doh", "colors", 1),
                    ("c2-08", "xanh", "blue", "sahn", "colors", 1),
                    ("c2-09", "vàng", "yellow", "vahng", "colors", 1),
                    ("c2-10", "đen", "black", "den", "colors", 2),
                    ("c2-11", "tím", "purple", "teem", "colors", 3),
                ],
            ),
            (
                "chapter3",
                &[
                    ("c3-01", "xe hơi", "car", "seh huh-ee", "transport", 1),
                    ("c3-02", "xe máy", "motorbike", "seh my", "transport", 1),
                    ("c3-03", "xe buýt", "bus", "seh bweet", "transport", 2),
                    ("c3-04", "máy bay", "airplane", "my bye", "transport", 2),
                    ("c3-05", "tàu hỏa", "train", "tow hwah", "transport", 3),
                    ("c3-06", "đường", "road", "duong", "places", 1),
                    ("c3-07", "chợ", "market", "chuh", "places", 1),
                    ("c3-08", "bệnh viện", "hospital", "ben vyen", "places", 2),
                    ("c3-09", "sân bay", "airport", "sun bye", "places", 3),
                ],
            ),
        ];

        for (chapter, rows) in table {
            let words = rows
                .iter()
                .map(|&(id, vi, en, pron, category, difficulty)| {
                    VocabularyWord::new(id, vi, en, pron, category, difficulty, chapter)
                })
                .collect();
            vocab.insert_chapter(chapter, words);
        }
        vocab
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_unknown_chapter_falls_back_to_default() {
        let vocab = Vocabulary::builtin();
        let words = vocab.words_for("no-such-chapter");
        assert!(!words.is_empty());
        assert!(words.iter().all(|w| w.chapter == DEFAULT_CHAPTER));
    }

    #[test]
    fn test_default_chapter_without_chapter1() {
        let mut vocab = Vocabulary::new();
        vocab.insert_chapter(
            "zeta",
            vec![VocabularyWord::new("z1", "một", "one", "", "numbers", 1, "zeta")],
        );
        vocab.insert_chapter(
            "alpha",
            vec![VocabularyWord::new("a1", "hai", "two", "", "numbers", 1, "alpha")],
        );
        assert_eq!(vocab.default_chapter(), Some("alpha"));
        assert_eq!(vocab.words_for("missing")[0].id, "a1");
    }

    #[test]
    fn test_empty_vocabulary_yields_empty_slice() {
        let vocab = Vocabulary::new();
        assert!(vocab.words_for("chapter1").is_empty());
    }

    #[test]
    fn test_filter_by_max_difficulty() {
        let vocab = Vocabulary::builtin();
        let words = vocab.words_for("chapter1");
        let easy = filter_by_max_difficulty(words, 1);
        assert!(!easy.is_empty());
        assert!(easy.iter().all(|w| w.difficulty == 1));
        assert_eq!(filter_by_max_difficulty(words, 3).len(), words.len());
    }

    #[test]
    fn test_same_category_excludes_self() {
        let vocab = Vocabulary::builtin();
        let words = vocab.words_for("chapter2");
        let rice = &words[0];
        let others = same_category_excluding(words, rice);
        assert!(!others.is_empty());
        assert!(others.iter().all(|w| w.category == "food" && w.id != rice.id));
    }

    #[test]
    fn test_pick_random_is_seeded() {
        let vocab = Vocabulary::builtin();
        let words = vocab.words_for("chapter3");
        let candidates: Vec<_> = words.iter().collect();
        let mut a = Pcg32::seed_from_u64(7);
        let mut b = Pcg32::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(
                pick_random(&candidates, &mut a).map(|w| &w.id),
                pick_random(&candidates, &mut b).map(|w| &w.id)
            );
        }
        assert!(pick_random(&[], &mut a).is_none());
    }

    #[test]
    fn test_from_json_fills_missing_chapter() {
        let json = r#"{
            "travel": [
                { "id": "t1", "vietnamese": "vé", "english": "ticket", "category": "travel", "difficulty": 1 },
                { "id": "t2", "vietnamese": "khách sạn", "english": "hotel", "category": "travel", "difficulty": 2, "chapter": "travel" }
            ]
        }"#;
        let vocab = Vocabulary::from_json(json).expect("valid json");
        let words = vocab.words_for("travel");
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|w| w.chapter == "travel"));
        assert_eq!(words[0].pronunciation, "");
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(Vocabulary::from_json("{ \"x\": [ { \"id\": 1 } ] }").is_err());
    }
}
