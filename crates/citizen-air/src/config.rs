// citizen-air/crates/citizen-air/src/config.rs

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::wordcloud::{
    ExtractorOptions, KeywordTable, StopwordSet, VariantCounting, WordFrequencyExtractor, MAX_TERMS,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub keywords_path: Option<PathBuf>,
    pub stopwords_path: Option<PathBuf>,
    pub max_terms: usize,
    pub variant_counting: VariantCounting,
}

impl Config {
    /// Read configuration from the process environment. The binary loads
    /// `.env` before calling this.
    pub fn from_env() -> Result<Self> {
        let database_path: PathBuf = env::var("CITIZENAIR_DB_PATH")
            .unwrap_or_else(|_| "./data/citizenair.db".into())
            .into();

        let keywords_path = Self::optional_path("KEYWORDS_PATH");
        let stopwords_path = Self::optional_path("STOPWORDS_PATH");

        let max_terms = Self::parse_max_terms(env::var("WORD_CLOUD_MAX_TERMS").ok())?;

        let variant_counting = env::var("VARIANT_COUNTING")
            .unwrap_or_else(|_| "per_variant".into())
            .parse::<VariantCounting>()
            .context("Invalid VARIANT_COUNTING")?;

        Ok(Self {
            database_path,
            keywords_path,
            stopwords_path,
            max_terms,
            variant_counting,
        })
    }

    fn optional_path(var: &str) -> Option<PathBuf> {
        env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    /// Unset means the full word cloud; values are clamped to `1..=MAX_TERMS`
    fn parse_max_terms(raw: Option<String>) -> Result<usize> {
        let Some(raw) = raw else {
            return Ok(MAX_TERMS);
        };
        let requested: usize = raw
            .trim()
            .parse()
            .with_context(|| format!("WORD_CLOUD_MAX_TERMS must be a number, got '{}'", raw))?;
        let clamped = requested.clamp(1, MAX_TERMS);
        if clamped != requested {
            warn!("WORD_CLOUD_MAX_TERMS={} out of range, using {}", requested, clamped);
        }
        Ok(clamped)
    }

    pub fn extractor_options(&self) -> ExtractorOptions {
        ExtractorOptions {
            max_terms: self.max_terms,
            variant_counting: self.variant_counting,
        }
    }

    /// Build the shared extractor, loading keyword and stopword files when configured
    pub fn load_extractor(&self) -> Result<WordFrequencyExtractor> {
        let keywords = match &self.keywords_path {
            Some(path) => KeywordTable::from_json_file(path)?,
            None => KeywordTable::thai_default(),
        };
        let stopwords = match &self.stopwords_path {
            Some(path) => StopwordSet::from_json_file(path)?,
            None => StopwordSet::thai_default(),
        };

        Ok(WordFrequencyExtractor::new(Arc::new(keywords), Arc::new(stopwords))
            .with_options(self.extractor_options()))
    }

    pub fn print_config(&self) {
        info!("Idea database: {}", self.database_path.display());
        info!(
            "Keyword groups: {}",
            self.keywords_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".into())
        );
        info!(
            "Stopwords: {}",
            self.stopwords_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".into())
        );
        info!(
            "Word cloud: up to {} terms, variant counting {:?}",
            self.max_terms, self.variant_counting
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_test_config() -> Config {
        Config {
            database_path: PathBuf::from("./data/test.db"),
            keywords_path: None,
            stopwords_path: None,
            max_terms: 20,
            variant_counting: VariantCounting::PerVariant,
        }
    }

    #[test]
    fn test_parse_max_terms_default() {
        assert_eq!(Config::parse_max_terms(None).unwrap(), MAX_TERMS);
    }

    #[test]
    fn test_parse_max_terms_clamps() {
        assert_eq!(Config::parse_max_terms(Some("50".into())).unwrap(), MAX_TERMS);
        assert_eq!(Config::parse_max_terms(Some("0".into())).unwrap(), 1);
        assert_eq!(Config::parse_max_terms(Some(" 8 ".into())).unwrap(), 8);
    }

    #[test]
    fn test_parse_max_terms_rejects_garbage() {
        assert!(Config::parse_max_terms(Some("many".into())).is_err());
    }

    #[test]
    fn test_extractor_options_follow_config() {
        let config = Config {
            max_terms: 5,
            variant_counting: VariantCounting::OncePerText,
            ..create_test_config()
        };
        let options = config.extractor_options();
        assert_eq!(options.max_terms, 5);
        assert_eq!(options.variant_counting, VariantCounting::OncePerText);
    }

    #[test]
    fn test_load_extractor_with_builtin_tables() {
        let extractor = create_test_config().load_extractor().unwrap();
        assert_eq!(extractor.keywords().len(), 13);
        assert_eq!(extractor.stopwords().len(), 70);
    }

    #[test]
    fn test_load_extractor_from_files() {
        let mut keywords = tempfile::NamedTempFile::new().unwrap();
        write!(keywords, r#"[{{"term": "ควัน", "variants": ["หมอกควัน"]}}]"#).unwrap();
        let mut stopwords = tempfile::NamedTempFile::new().unwrap();
        write!(stopwords, r#"["ชุมชน"]"#).unwrap();

        let config = Config {
            keywords_path: Some(keywords.path().to_path_buf()),
            stopwords_path: Some(stopwords.path().to_path_buf()),
            ..create_test_config()
        };
        let extractor = config.load_extractor().unwrap();
        let weights = extractor.extract(["หมอกควันหนาแน่น ชุมชน ช่วยกัน"]);
        let terms: Vec<&str> = weights.iter().map(|w| w.term.as_str()).collect();
        assert_eq!(terms, vec!["ควัน", "ช่วยกัน"]);
    }

    #[test]
    fn test_load_extractor_missing_file_fails() {
        let config = Config {
            keywords_path: Some(PathBuf::from("/nonexistent/keywords.json")),
            ..create_test_config()
        };
        assert!(config.load_extractor().is_err());
    }
}
