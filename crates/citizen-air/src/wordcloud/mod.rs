//! Word-cloud module - keyword groups, stopwords and frequency extraction for idea submissions

pub mod extractor;
pub mod keywords;
pub mod stopwords;
pub mod text;

pub use extractor::{
    display_weight, ExtractorOptions, TermCount, VariantCounting, WordFrequencyExtractor,
    WordWeight, MAX_TERMS,
};
pub use keywords::{KeywordGroup, KeywordTable};
pub use stopwords::StopwordSet;
pub use text::TextUtils;
