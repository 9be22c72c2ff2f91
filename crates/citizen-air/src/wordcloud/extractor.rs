//! Word-frequency extraction for the district idea word cloud
//!
//! Each idea is scanned twice. The keyword pass credits curated canonical
//! terms whenever one of their variants appears anywhere in the text. The
//! free-token pass splits the text into Thai words and counts the ones that
//! are not stopwords and not already covered by a keyword variant. Counts are
//! ranked, truncated and rescaled into display weights.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::keywords::KeywordTable;
use super::stopwords::StopwordSet;
use super::text::TextUtils;
use crate::submissions::Submission;

/// Hard upper bound on word-cloud entries
pub const MAX_TERMS: usize = 20;
/// Display weight per occurrence
pub const WEIGHT_MULTIPLIER: u32 = 5;
/// Smallest display weight, so single mentions stay legible
pub const MIN_WEIGHT: u32 = 10;
/// Free tokens must be strictly longer than this many characters
pub const MIN_TOKEN_CHARS_EXCLUSIVE: usize = 2;
/// Free tokens must be strictly shorter than this many characters
pub const MAX_TOKEN_CHARS_EXCLUSIVE: usize = 15;

/// How often a canonical term is credited when several of its variants occur
/// in the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantCounting {
    /// +1 for every matching variant. "ไผ่" and "ต้นไผ่" in one idea give ไผ่ +2.
    #[default]
    PerVariant,
    /// At most +1 per canonical term per text.
    OncePerText,
}

impl FromStr for VariantCounting {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "per_variant" | "per-variant" => Ok(Self::PerVariant),
            "once_per_text" | "once-per-text" => Ok(Self::OncePerText),
            other => Err(anyhow::anyhow!(
                "Unknown variant counting policy '{}', expected per_variant or once_per_text",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorOptions {
    /// Clamped to `1..=MAX_TERMS`
    pub max_terms: usize,
    pub variant_counting: VariantCounting,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            max_terms: MAX_TERMS,
            variant_counting: VariantCounting::PerVariant,
        }
    }
}

/// Raw frequency of a term before rescaling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermCount {
    pub term: String,
    pub count: u32,
}

/// A word-cloud entry, serialized in the `{text, value}` shape the dashboard renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordWeight {
    #[serde(rename = "text")]
    pub term: String,
    #[serde(rename = "value")]
    pub weight: u32,
}

impl WordWeight {
    pub fn from_count(count: TermCount) -> Self {
        Self {
            weight: display_weight(count.count),
            term: count.term,
        }
    }
}

/// `max(count * 5, 10)`
pub fn display_weight(count: u32) -> u32 {
    count.saturating_mul(WEIGHT_MULTIPLIER).max(MIN_WEIGHT)
}

/// Insertion-ordered counter. First-seen order is the tie-break when ranking.
#[derive(Debug, Default)]
struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<TermCount>,
}

impl FrequencyTable {
    fn increment(&mut self, term: &str) {
        match self.index.get(term) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(term.to_string(), self.entries.len());
                self.entries.push(TermCount { term: term.to_string(), count: 1 });
            }
        }
    }

    /// Descending by count; `sort_by` is stable so ties keep insertion order.
    fn into_ranked(self) -> Vec<TermCount> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries
    }
}

/// Turns idea texts into ranked word-cloud weights.
///
/// Holds the keyword table and stopword set behind `Arc`, so a single
/// extractor can be cloned into request handlers and used concurrently.
#[derive(Debug, Clone)]
pub struct WordFrequencyExtractor {
    keywords: Arc<KeywordTable>,
    stopwords: Arc<StopwordSet>,
    options: ExtractorOptions,
}

impl Default for WordFrequencyExtractor {
    fn default() -> Self {
        Self::new(
            Arc::new(KeywordTable::thai_default()),
            Arc::new(StopwordSet::thai_default()),
        )
    }
}

impl WordFrequencyExtractor {
    pub fn new(keywords: Arc<KeywordTable>, stopwords: Arc<StopwordSet>) -> Self {
        Self {
            keywords,
            stopwords,
            options: ExtractorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractorOptions) -> Self {
        self.options = ExtractorOptions {
            max_terms: options.max_terms.clamp(1, MAX_TERMS),
            ..options
        };
        self
    }

    pub fn options(&self) -> ExtractorOptions {
        self.options
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    /// Ranked word-cloud entries, highest weight first
    pub fn extract<I, S>(&self, texts: I) -> Vec<WordWeight>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ranked = self.count_terms(texts);
        let total_terms = ranked.len();

        let weights: Vec<WordWeight> = ranked
            .into_iter()
            .take(self.options.max_terms)
            .map(WordWeight::from_count)
            .collect();

        debug!(
            "Extracted {} word-cloud terms ({} distinct before truncation)",
            weights.len(),
            total_terms
        );
        weights
    }

    pub fn extract_from_submissions(&self, submissions: &[Submission]) -> Vec<WordWeight> {
        self.extract(submissions.iter().map(|s| s.text.as_str()))
    }

    /// All counted terms, ranked but neither truncated nor rescaled
    pub fn count_terms<I, S>(&self, texts: I) -> Vec<TermCount>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = FrequencyTable::default();
        for text in texts {
            self.count_text(text.as_ref(), &mut table);
        }
        table.into_ranked()
    }

    fn count_text(&self, text: &str, table: &mut FrequencyTable) {
        if text.is_empty() {
            return;
        }

        let folded = TextUtils::fold_case(text);
        self.count_keyword_groups(&folded, table);

        for token in TextUtils::candidate_tokens(text) {
            let folded_token = TextUtils::fold_case(&token);
            if self.is_countable_token(&folded_token)
                && !self.keywords.overlaps_variant(&folded_token)
            {
                table.increment(&folded_token);
            }
        }
    }

    fn count_keyword_groups(&self, folded_text: &str, table: &mut FrequencyTable) {
        for (term, variants) in self.keywords.folded() {
            let hits = variants
                .iter()
                .filter(|v| folded_text.contains(v.as_str()))
                .count();
            let credits = match self.options.variant_counting {
                VariantCounting::PerVariant => hits,
                VariantCounting::OncePerText => hits.min(1),
            };
            for _ in 0..credits {
                table.increment(term);
            }
        }
    }

    fn is_countable_token(&self, folded_token: &str) -> bool {
        let len = TextUtils::char_len(folded_token);
        len > MIN_TOKEN_CHARS_EXCLUSIVE
            && len < MAX_TOKEN_CHARS_EXCLUSIVE
            && !self.stopwords.contains(folded_token)
            && TextUtils::contains_thai(folded_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordcloud::keywords::KeywordGroup;
    use proptest::prelude::*;

    fn group(term: &str, variants: &[&str]) -> KeywordGroup {
        KeywordGroup::new(term, variants.iter().map(|v| v.to_string()).collect())
    }

    fn extractor_with(groups: Vec<KeywordGroup>, stopwords: &[&str]) -> WordFrequencyExtractor {
        WordFrequencyExtractor::new(
            Arc::new(KeywordTable::new(groups)),
            Arc::new(StopwordSet::from_list(stopwords.iter().copied())),
        )
    }

    fn weight_of<'a>(weights: &'a [WordWeight], term: &str) -> Option<&'a WordWeight> {
        weights.iter().find(|w| w.term == term)
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let extractor = WordFrequencyExtractor::default();
        assert!(extractor.extract(Vec::<String>::new()).is_empty());
        assert!(extractor.extract([""]).is_empty());
    }

    #[test]
    fn test_planting_variant_matches_only_exact_substring() {
        let extractor = extractor_with(
            vec![group("ปลูก", &["ปลูกต้นไม้", "ปลูกไผ่", "ปลูกพืช"])],
            &[],
        );
        let texts = ["ปลูกต้นไผ่รอบบ้านดีมาก", "ปลูกไผ่เพิ่มออกซิเจน"];
        let counts = extractor.count_terms(texts);

        // "ปลูกต้นไผ่" is not "ปลูกไผ่", so only the second idea matches. Both
        // ideas are single runs longer than 14 characters and yield no free tokens.
        assert_eq!(counts, vec![TermCount { term: "ปลูก".into(), count: 1 }]);

        let weights = extractor.extract(texts);
        assert_eq!(weight_of(&weights, "ปลูก").unwrap().weight, 10);
    }

    #[test]
    fn test_ascii_and_numeric_tokens_are_dropped() {
        let extractor = WordFrequencyExtractor::default();
        assert!(extractor.extract(["ok", "123", "abc"]).is_empty());
    }

    #[test]
    fn test_top_twenty_keep_first_seen_order() {
        let extractor = extractor_with(vec![], &[]);
        let tokens: Vec<String> = (0..25).map(|i| format!("คำที่{:02}", i)).collect();
        let weights = extractor.extract(&tokens);

        assert_eq!(weights.len(), 20);
        for (i, w) in weights.iter().enumerate() {
            assert_eq!(w.term, tokens[i]);
            assert_eq!(w.weight, 10);
        }
    }

    #[test]
    fn test_per_variant_double_counts() {
        let extractor = WordFrequencyExtractor::default();
        // "ต้นไผ่" contains both "ไผ่" and "ต้นไผ่"
        let counts = extractor.count_terms(["ปลูกต้นไผ่"]);
        assert_eq!(counts.iter().find(|c| c.term == "ไผ่").unwrap().count, 2);
    }

    #[test]
    fn test_once_per_text_dedupes() {
        let extractor = WordFrequencyExtractor::default().with_options(ExtractorOptions {
            variant_counting: VariantCounting::OncePerText,
            ..ExtractorOptions::default()
        });
        let counts = extractor.count_terms(["ปลูกต้นไผ่", "ต้นไผ่"]);
        assert_eq!(counts.iter().find(|c| c.term == "ไผ่").unwrap().count, 2);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let extractor = WordFrequencyExtractor::default();
        let weights = extractor.extract(["ใช้ไส้กรอง hepa ทำ diy เอง"]);
        // HEPA: "hepa" + "ไส้กรอง"; DIY: "diy"
        assert_eq!(weight_of(&weights, "HEPA").unwrap().weight, 10);
        assert_eq!(weight_of(&weights, "DIY").unwrap().weight, 10);
        assert_eq!(weights[0].term, "HEPA");
    }

    #[test]
    fn test_stopwords_and_short_tokens_are_skipped() {
        let extractor = WordFrequencyExtractor::default();
        let weights = extractor.extract(["เพื่อ และ ที่ มาก ก็ ๆ"]);
        assert!(weights.is_empty());
    }

    #[test]
    fn test_long_tokens_are_skipped() {
        let extractor = extractor_with(vec![], &[]);
        // 15 characters
        let long = "กขคฆงจฉชซฌญฎฏฐฑ";
        assert_eq!(TextUtils::char_len(long), 15);
        assert!(extractor.extract([long]).is_empty());
        // 14 characters
        let fits = "กขคฆงจฉชซฌญฎฏฐ";
        assert_eq!(extractor.extract([fits]).len(), 1);
    }

    #[test]
    fn test_mixed_script_token_is_folded() {
        let extractor = extractor_with(vec![], &[]);
        let weights = extractor.extract(["PMฝุ่น", "pmฝุ่น"]);
        assert_eq!(weights, vec![WordWeight { term: "pmฝุ่น".into(), weight: 10 }]);
    }

    #[test]
    fn test_ranking_by_count() {
        let extractor = extractor_with(vec![], &[]);
        let weights = extractor.extract(["หมอกควัน", "ออกซิเจน ออกซิเจน", "ออกซิเจน"]);
        assert_eq!(weights[0], WordWeight { term: "ออกซิเจน".into(), weight: 15 });
        assert_eq!(weights[1], WordWeight { term: "หมอกควัน".into(), weight: 10 });
    }

    #[test]
    fn test_empty_configuration_degrades_gracefully() {
        let extractor = WordFrequencyExtractor::new(
            Arc::new(KeywordTable::empty()),
            Arc::new(StopwordSet::empty()),
        );
        let weights = extractor.extract(["เพื่อนบ้าน ปลูกต้นไม้"]);
        assert_eq!(weights.len(), 2);
    }

    #[test]
    fn test_max_terms_is_clamped() {
        let extractor = WordFrequencyExtractor::default().with_options(ExtractorOptions {
            max_terms: 500,
            ..ExtractorOptions::default()
        });
        assert_eq!(extractor.options().max_terms, MAX_TERMS);

        let extractor = extractor.with_options(ExtractorOptions {
            max_terms: 0,
            ..ExtractorOptions::default()
        });
        assert_eq!(extractor.options().max_terms, 1);
    }

    #[test]
    fn test_display_weight() {
        assert_eq!(display_weight(1), 10);
        assert_eq!(display_weight(2), 10);
        assert_eq!(display_weight(3), 15);
        assert_eq!(display_weight(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_variant_counting_from_str() {
        assert_eq!("per_variant".parse::<VariantCounting>().unwrap(), VariantCounting::PerVariant);
        assert_eq!(" Once-Per-Text ".parse::<VariantCounting>().unwrap(), VariantCounting::OncePerText);
        assert!("sometimes".parse::<VariantCounting>().is_err());
    }

    #[test]
    fn test_word_weight_json_shape() {
        let json = serde_json::to_value(WordWeight { term: "ไผ่".into(), weight: 15 }).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "ไผ่", "value": 15 }));
    }

    fn idea_text() -> impl Strategy<Value = String> {
        let words = prop::sample::select(vec![
            "ปลูกต้นไม้", "ไผ่", "ต้นไผ่", "เครื่องกรอง", "ฝุ่นควัน", "เพื่อ", "ที่",
            "ออกซิเจน", "HEPA", "diy", "pm2.5", "123", "!!", "หมอกควัน", "ชุมชน",
            "รณรงค์", "ไม่เผา", "ถนน", "โรงเรียน", "ลดฝุ่น",
        ]);
        prop::collection::vec(words, 0..12).prop_map(|w| w.join(" "))
    }

    proptest! {
        #[test]
        fn prop_output_is_deterministic(texts in prop::collection::vec(idea_text(), 0..30)) {
            let extractor = WordFrequencyExtractor::default();
            prop_assert_eq!(extractor.extract(&texts), extractor.extract(&texts));
        }

        #[test]
        fn prop_output_is_bounded_and_sorted(texts in prop::collection::vec(".{0,40}", 0..60)) {
            let extractor = WordFrequencyExtractor::default();
            let weights = extractor.extract(&texts);
            prop_assert!(weights.len() <= MAX_TERMS);
            for pair in weights.windows(2) {
                prop_assert!(pair[0].weight >= pair[1].weight);
            }
        }

        #[test]
        fn prop_weights_follow_rescale_law(texts in prop::collection::vec(idea_text(), 0..30)) {
            let extractor = WordFrequencyExtractor::default();
            let counts = extractor.count_terms(&texts);
            let weights = extractor.extract(&texts);
            for (w, c) in weights.iter().zip(counts.iter()) {
                prop_assert_eq!(&w.term, &c.term);
                prop_assert_eq!(w.weight, (c.count * 5).max(10));
            }
        }

        #[test]
        fn prop_stopwords_and_length_filter(texts in prop::collection::vec(idea_text(), 0..30)) {
            let extractor = WordFrequencyExtractor::default();
            let canonical: Vec<&str> = extractor.keywords().groups().map(|g| g.term.as_str()).collect();
            // Canonical terms such as "ลด" may coincide with stopwords; only free tokens are filtered.
            for w in extractor.extract(&texts) {
                if !canonical.contains(&w.term.as_str()) {
                    prop_assert!(!extractor.stopwords().contains(&w.term));
                    let len = TextUtils::char_len(&w.term);
                    prop_assert!(len > 2 && len < 15);
                }
            }
        }
    }
}
