//! Thai stopword set for free-token filtering

use std::collections::HashSet;
use std::path::Path;
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use tracing::info;

lazy_static! {
    static ref THAI_STOP_WORDS: Vec<&'static str> = vec![
        "ที่", "และ", "ใน", "การ", "ของ", "จะ", "ให้", "มี", "เป็น", "ได้",
        "จาก", "กับ", "ไป", "มา", "ถึง", "ก็", "ไม่", "ใช้", "ทำ", "ดี",
        "เพื่อ", "หรือ", "แล้ว", "กัน", "ทุก", "เพิ่ม", "ลด", "นี้", "นั่น", "โดย",
        "เพราะ", "ถ้า", "แต่", "ซึ่ง", "ผู้", "คน", "ใคร", "อะไร", "ไหน", "เมื่อ",
        "ยัง", "แค่", "เพียง", "เรา", "ฉัน", "กิน", "ดู", "ฟัง", "อ่าน", "เขียน",
        "วิ่ง", "เดิน", "นั่ง", "ยืน", "นอน", "ตื่น", "เก็บ", "อยู่", "มาก", "น้อย",
        "บ้าง", "เท่านั้น", "เท่านี้", "อีก", "หรือ", "คือ", "แม้", "ขณะ", "เวลา", "หลัง",
        "ก่อน",
    ];
}

/// Immutable set of case-folded stopwords
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// Thai function words used by the dashboard
    pub fn thai_default() -> Self {
        Self::from_list(THAI_STOP_WORDS.iter().copied())
    }

    /// No filtering at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_list<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Load a JSON array of strings
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stopword file {}", path.display()))?;
        let words: Vec<String> = serde_json::from_str(&raw)
            .with_context(|| format!("Stopword file {} is not a JSON array of strings", path.display()))?;
        let set = Self::from_list(words);
        info!("Loaded {} stopwords from {}", set.len(), path.display());
        Ok(set)
    }

    /// `word` must already be case-folded
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
