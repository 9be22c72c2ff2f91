// citizen-air/crates/citizen-air/src/lib.rs

pub mod config;
pub mod report;
pub mod submissions;
pub mod telemetry;
pub mod wordcloud;

// Public API exports
pub use config::Config;
pub use report::DistrictReport;
pub use submissions::{
    DistrictSummary, IdeaStore, NewSubmission, Submission, SubmissionDatabase,
};
pub use wordcloud::{
    ExtractorOptions, KeywordGroup, KeywordTable, StopwordSet, VariantCounting,
    WordFrequencyExtractor, WordWeight,
};
