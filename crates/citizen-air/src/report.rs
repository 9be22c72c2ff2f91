//! District report - the payload the dashboard sidebar renders for one district

use anyhow::bail;
use serde::Serialize;
use tracing::info;

use crate::submissions::{IdeaStore, Submission};
use crate::wordcloud::{WordFrequencyExtractor, WordWeight};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictReport {
    pub district: String,
    pub count: usize,
    pub ideas: Vec<Submission>,
    pub word_cloud_data: Vec<WordWeight>,
}

impl DistrictReport {
    /// Load the approved ideas for `district` and rank their words
    pub fn build(
        store: &IdeaStore,
        extractor: &WordFrequencyExtractor,
        district: &str,
    ) -> anyhow::Result<Self> {
        let district = district.trim();
        if district.is_empty() {
            bail!("District parameter is required");
        }

        let ideas = store.ideas_for_district(district)?;
        let report = Self::from_ideas(district, ideas, extractor);
        info!(
            "District report for {}: {} ideas, {} word-cloud terms",
            report.district,
            report.count,
            report.word_cloud_data.len()
        );
        Ok(report)
    }

    pub fn from_ideas(
        district: &str,
        ideas: Vec<Submission>,
        extractor: &WordFrequencyExtractor,
    ) -> Self {
        let word_cloud_data = extractor.extract_from_submissions(&ideas);
        Self {
            district: district.to_string(),
            count: ideas.len(),
            ideas,
            word_cloud_data,
        }
    }
}
