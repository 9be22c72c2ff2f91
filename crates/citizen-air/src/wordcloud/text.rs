//! Text normalization helpers for Thai idea submissions

use std::borrow::Cow;
use regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    // Anything outside the Thai block, ASCII alphanumerics and whitespace.
    static ref NON_WORD_REGEX: Regex = Regex::new(r"[^\x{0E00}-\x{0E7F}a-zA-Z0-9\s]").unwrap();
}

const THAI_BLOCK_START: char = '\u{0E00}';
const THAI_BLOCK_END: char = '\u{0E7F}';

/// Script-aware text operations used by the word-frequency pipeline
pub struct TextUtils;

impl TextUtils {
    /// Case-fold text. Thai has no case, so this only affects Latin runs.
    pub fn fold_case(text: &str) -> Cow<'_, str> {
        if text.chars().any(char::is_uppercase) {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        }
    }

    /// True for any code point in the Thai block, including tone marks and
    /// combining vowels.
    pub fn is_thai_char(c: char) -> bool {
        (THAI_BLOCK_START..=THAI_BLOCK_END).contains(&c)
    }

    /// True when at least one character belongs to the Thai block
    pub fn contains_thai(text: &str) -> bool {
        text.chars().any(Self::is_thai_char)
    }

    /// Replace punctuation and foreign-script characters with spaces
    pub fn strip_non_word_chars(text: &str) -> Cow<'_, str> {
        NON_WORD_REGEX.replace_all(text, " ")
    }

    /// Split text into candidate tokens after stripping punctuation
    pub fn candidate_tokens(text: &str) -> Vec<String> {
        Self::strip_non_word_chars(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Length in characters, not bytes. Thai is three bytes per code point in UTF-8.
    pub fn char_len(text: &str) -> usize {
        text.chars().count()
    }
}
